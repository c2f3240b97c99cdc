//! # Dispatcher Module
//!
//! Hands matched requests to handler coroutines and waits for their replies.
//!
//! ## Architecture
//!
//! Every handler registered with [`Dispatcher::register`] gets its own `may`
//! coroutine fed by an MPSC channel. The HTTP connection coroutine builds a
//! [`HandlerRequest`] carrying a one-shot reply channel, sends it, and blocks
//! until the [`HandlerResponse`] comes back.
//!
//! ```rust
//! use account_book::dispatcher::{Dispatcher, HandlerRequest, HandlerResponse};
//!
//! let mut dispatcher = Dispatcher::new();
//! dispatcher
//!     .register("ping", |_req: &HandlerRequest| {
//!         HandlerResponse::ok(serde_json::json!({ "pong": true }))
//!     })
//!     .unwrap();
//! assert!(dispatcher.has_handler("ping"));
//! ```
//!
//! ## Error Handling
//!
//! - Unregistered handler names return `None` (the server answers 500)
//! - Handler panics are caught and answered with 500
//! - A handler coroutine that no longer receives yields 503

mod core;

pub use self::core::{
    Dispatcher, Handler, HandlerRequest, HandlerResponse, HandlerSender, RequestBody,
};
