pub mod bootstrap;
pub mod config;
pub mod observability;
pub mod server;

pub use config::{AppConfig, LoggingConfig, ServerConfig};
pub use observability::{init_tracing, shutdown_tracing};
pub use server::{CodegrantServer, ServerBuilder, build_app, spawn_code_cleanup};
