//! Domain layer containing core types, traits, and error definitions.

pub mod error;
pub mod traits;
pub mod types;

pub use error::{AppError, ConfigError, DatabaseError, Listener, ServerError};
pub use traits::TokenValidator;
pub use types::{
    Claims, ErrorResponse, HealthResponse, LifecycleState, MigrationVersion, SessionResponse,
    TenantId,
};
