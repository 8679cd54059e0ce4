pub mod app;
pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod routes;

pub use app::{build_registry, build_service};
pub use config::Config;
pub use error::ApiError;
