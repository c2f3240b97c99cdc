//! # CLI Module
//!
//! Command line for the `account-book` binary.
//!
//! ## Commands
//!
//! ### `serve` (default)
//!
//! Open (creating if needed) the database, register every route and serve
//! HTTP until the process is killed:
//!
//! ```bash
//! account-book serve --db ./ledger.db --addr 127.0.0.1:8080
//! ```
//!
//! With no subcommand the same flags apply, so a bare `account-book`
//! listens on `0.0.0.0:8080` with `.account_book.db` in the working
//! directory. `--db` and `--addr` fall back to `ACCOUNT_BOOK_DB` and
//! `ACCOUNT_BOOK_ADDR`.
//!
//! ### `init-db`
//!
//! Create the database file and its tables, then exit.
//!
//! ### `routes`
//!
//! Print the route table.

mod commands;


pub use commands::{run, run_cli, Cli, Commands, ServeArgs, DEFAULT_ADDR};
