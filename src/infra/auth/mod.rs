//! Authentication collaborators.

pub mod jwt;

pub use jwt::JwtValidator;
