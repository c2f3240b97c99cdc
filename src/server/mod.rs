//! # Server Module
//!
//! HTTP front end built on `may_minihttp`. [`AppService`] parses each request,
//! answers `GET /health` itself, routes everything else through the
//! [`Router`](crate::router::Router) and [`Dispatcher`](crate::dispatcher::Dispatcher),
//! and writes the JSON response. Unknown paths get a 404.

pub mod http_server;
pub mod request;
pub mod response;
pub mod service;

pub use http_server::{HttpServer, ServerHandle, MAX_REQUEST_HEADERS};
pub use request::{parse_request, HeaderVec, ParsedRequest, MAX_INLINE_HEADERS};
pub use service::{health_endpoint, AppService};
