/// Environment-driven server settings.
pub mod config;
/// HTTP error mapping.
pub mod error;
/// Player endpoints.
pub mod routes;

pub use config::Config;
pub use routes::app;
