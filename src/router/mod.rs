//! # Router Module
//!
//! Matches an incoming `(method, path)` pair to one entry of the service's
//! static route table and extracts path parameters.
//!
//! Path templates such as `/items/{id}` are compiled once at startup into
//! anchored regexes; `{id}` matches exactly one non-empty path segment. A
//! single trailing slash is tolerated.
//!
//! ## Example
//!
//! ```rust
//! use account_book::router::{RouteMeta, Router};
//! use http::Method;
//!
//! let router = Router::new(vec![RouteMeta::new(Method::GET, "/items/{id}", "get_item")]).unwrap();
//! let m = router.route(Method::GET, "/items/42").unwrap();
//! assert_eq!(m.handler_name, "get_item");
//! assert_eq!(m.get_path_param("id"), Some("42"));
//! ```

mod core;

pub use self::core::{ParamVec, RouteMatch, RouteMeta, Router, MAX_INLINE_PARAMS};
