use std::net::TcpListener;

use actix_web::{dev::Server, middleware::Logger, web, App, HttpServer};
use sqlx::PgPool;

use crate::{
    routes::{company_route, default_route},
    services::Fetcher,
};

pub fn run(listener: TcpListener, db_pool: PgPool, fetcher: Fetcher) -> Result<Server, std::io::Error> {
    let db_pool = web::Data::new(db_pool);
    let fetcher = web::Data::new(fetcher);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .service(default_route::default)
            .service(
                web::scope("/companies")
                    .service(company_route::get_companies)
                    .service(company_route::post_companies),
            )
            .app_data(db_pool.clone())
            .app_data(fetcher.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
