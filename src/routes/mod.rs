pub mod company_route;
pub mod default_route;

pub use company_route::*;
pub use default_route::*;
