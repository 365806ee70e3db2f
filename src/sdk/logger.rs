//! Logging capability injected into SDK clients.

use tracing::{error, info, warn};

/// Minimal logger the SDK reports through, so embedding applications can
/// route client diagnostics into their own logging.
pub trait Logger: Send + Sync {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

/// Forwards to `tracing` under the `sdk` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn info(&self, message: &str) {
        info!(target: "sdk", "{message}");
    }

    fn warn(&self, message: &str) {
        warn!(target: "sdk", "{message}");
    }

    fn error(&self, message: &str) {
        error!(target: "sdk", "{message}");
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl Logger for NoopLogger {
    fn info(&self, _message: &str) {}
    fn warn(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
}
