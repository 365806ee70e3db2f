//! Application layer: configuration, shared state and the lifecycle controller.

pub mod config;
pub mod server;
pub mod state;

pub use config::{AppConfig, Environment, SHUTDOWN_GRACE_PERIOD};
pub use server::Server;
pub use state::AppState;
