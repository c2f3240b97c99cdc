//! # account_book
//!
//! A small personal-ledger HTTP service: create, list, fetch, overwrite and
//! delete **items** (named monetary entries with a free-form type and a
//! creation timestamp), plus per-month budgets and a per-day spending
//! summary. Everything is persisted in a single SQLite file.
//!
//! ## Architecture
//!
//! - **[`store`]** - SQLite connection, schema initialisation and every SQL statement
//! - **[`models`]** - Item, budget and summary types as they appear on the wire
//! - **[`router`]** - Static route table compiled to path regexes
//! - **[`dispatcher`]** - One `may` coroutine per handler, fed over channels
//! - **[`handlers`]** - One controller per route, each holding a [`store::Store`]
//! - **[`registry`]** - Wires routes to controllers
//! - **[`server`]** - HTTP server built on `may_minihttp`
//! - **[`middleware`]** - Request tracing around every dispatch
//! - **[`logging`]**, **[`runtime_config`]**, **[`cli`]** - process setup
//!
//! ### Request Handling Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Client
//!     participant Server as AppService<br/>(may_minihttp)
//!     participant Router
//!     participant Dispatcher
//!     participant Handler as Controller<br/>(coroutine)
//!     participant Store as Store<br/>(SQLite)
//!
//!     Client->>Server: PUT /items/7 {"name":"tea",...}
//!     Server->>Server: Parse method, path,<br/>headers, JSON body
//!     Server->>Router: route(PUT, "/items/7")
//!     alt No Route Match
//!         Router-->>Client: 404 {"error":"Not Found"}
//!     end
//!     Router-->>Server: RouteMatch(update_item, {id: "7"})
//!     Server->>Dispatcher: dispatch(route, body, request_id)
//!     Dispatcher->>Handler: HandlerRequest over channel
//!     Handler->>Store: UPDATE items ... WHERE id = 7
//!     Store-->>Handler: rows affected
//!     alt Handler Panics
//!         Dispatcher-->>Client: 500
//!     end
//!     Handler-->>Dispatcher: HandlerResponse
//!     Dispatcher-->>Server: status + JSON
//!     Server-->>Client: 200 {"message":"item updated","data":{...}}
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use account_book::registry::build_service;
//! use account_book::server::HttpServer;
//! use account_book::store::Store;
//!
//! fn main() -> anyhow::Result<()> {
//!     let store = Store::open(".account_book.db")?;
//!     let handle = HttpServer(build_service(&store)?).start("127.0.0.1:8080")?;
//!     handle.join().map_err(|e| anyhow::anyhow!("{e:?}"))?;
//!     Ok(())
//! }
//! ```
//!
//! ## Runtime Considerations
//!
//! Handlers run on `may` coroutines with fixed-size stacks
//! (see [`runtime_config`]). All handlers share one SQLite connection behind
//! a mutex; each statement holds it only for its own duration and no
//! multi-statement transactions are used.

pub mod cli;
pub mod dispatcher;
pub mod handlers;
pub mod ids;
pub mod logging;
pub mod middleware;
pub mod models;
pub mod registry;
pub mod router;
pub mod runtime_config;
pub mod server;
pub mod store;

pub use models::{Item, ItemPayload};
pub use store::{Store, StoreError};
