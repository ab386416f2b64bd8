use std::net::TcpListener;

use anyhow::Context;
use env_logger::Env;
use glassbox::{configuration::get_configuration, services::Fetcher, startup::run};
use sqlx::postgres::PgPoolOptions;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let configuration = get_configuration().context("Failed to read configuration.")?;

    let connection_pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(std::time::Duration::from_secs(10))
        .connect_lazy_with(configuration.database.with_db());

    sqlx::migrate!("./migrations")
        .run(&connection_pool)
        .await
        .context("Failed to run migrations.")?;

    let address = format!(
        "{}:{}",
        configuration.application.host, configuration.application.port
    );
    let listener = TcpListener::bind(&address)?;
    log::info!("Listening on {}", address);

    let fetcher = Fetcher::new(&configuration.scraper)?;

    run(listener, connection_pool, fetcher)?.await?;
    Ok(())
}
