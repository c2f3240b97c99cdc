//! # Store Module
//!
//! SQLite persistence for the ledger. A [`Store`] owns one connection that is
//! shared by every handler coroutine; each method runs exactly one statement
//! while holding the connection lock, and no multi-statement transactions are
//! ever opened.
//!
//! ## Tables
//!
//! - `items` - ledger entries (`id`, `name`, `value`, `type`, `created_at`)
//! - `monthly_budgets` - one budget amount per month, `month` is unique
//!
//! ## Example
//!
//! ```rust
//! use account_book::store::Store;
//! use account_book::models::ItemPayload;
//!
//! let store = Store::open_in_memory().unwrap();
//! let id = store
//!     .insert_item(&ItemPayload { name: "coffee".into(), value: 4.5, ..Default::default() })
//!     .unwrap();
//! assert_eq!(store.get_item(id).unwrap().unwrap().name, "coffee");
//! ```

mod budgets;
mod items;
mod schema;

pub use schema::init_schema;

use rusqlite::types::ValueRef;
use rusqlite::{Connection, Row};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;
use tracing::info;

/// Default database file, relative to the working directory.
pub const DEFAULT_DB_PATH: &str = ".account_book.db";

/// Errors raised by the storage layer
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// A coroutine panicked while holding the connection
    #[error("database connection lock poisoned")]
    Poisoned,
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Shared handle to the ledger database.
///
/// Cloning is cheap; all clones use the same connection.
#[derive(Clone)]
pub struct Store {
    conn: Arc<Mutex<Connection>>,
    path: String,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").field("path", &self.path).finish()
    }
}

impl Store {
    /// Open (creating if absent) the database file at `path` and ensure the
    /// schema exists.
    ///
    /// # Errors
    ///
    /// Fails if the parent directory cannot be created, the file cannot be
    /// opened, or a `CREATE TABLE` statement fails.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        Self::with_connection(conn, path.to_string_lossy().into_owned())
    }

    /// Open a private in-memory database (tests, `--db :memory:`).
    ///
    /// # Errors
    ///
    /// Fails if SQLite cannot allocate the database or create the schema.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn, ":memory:".to_string())
    }

    fn with_connection(conn: Connection, path: String) -> Result<Self> {
        init_schema(&conn)?;
        info!(db_path = %path, "Ledger database ready");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path,
        })
    }

    /// Path the store was opened with
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }
}

/// Read a column as text whatever storage class SQLite picked for it.
///
/// `created_at` is declared `TIMESTAMP`, which has NUMERIC affinity, so a
/// client value such as `"2024"` is stored as an integer.
pub(crate) fn text_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<String> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Null => String::new(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Text(t) | ValueRef::Blob(t) => String::from_utf8_lossy(t).into_owned(),
    })
}
