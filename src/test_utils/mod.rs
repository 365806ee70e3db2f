//! Test utilities and mock implementations.
//!
//! This module provides reusable mock implementations of domain traits
//! and token fixtures for use in unit and integration tests.

pub mod mocks;

pub use mocks::{
    MockTokenValidator, claims_for, fixture_public_key_path, sign_token,
    sign_token_with_foreign_key,
};
