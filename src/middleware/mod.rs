//! # Middleware Module
//!
//! Cross-cutting hooks that run in the dispatcher around each handler call.
//! The service installs [`TracingMiddleware`] for per-request logging.

mod core;
mod tracing;

pub use self::core::Middleware;
pub use self::tracing::TracingMiddleware;
