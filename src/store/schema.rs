//! Schema creation. Runs once per [`Store`](super::Store) open.

use rusqlite::Connection;
use tracing::debug;

const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS items (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    value REAL NOT NULL,
    type TEXT NOT NULL,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS monthly_budgets (
    id INTEGER PRIMARY KEY,
    month TEXT NOT NULL UNIQUE,
    budget_amount REAL NOT NULL
);
";

/// Create the ledger tables if they don't exist.
///
/// # Errors
///
/// Returns the SQLite error if any statement fails.
pub fn init_schema(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    debug!("Ledger schema ensured");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_names(conn: &Connection) -> Vec<String> {
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .unwrap();
        stmt.query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<Vec<String>, _>>()
            .unwrap()
    }

    #[test]
    fn test_init_schema_creates_tables() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        let names = table_names(&conn);
        assert!(names.contains(&"items".to_string()));
        assert!(names.contains(&"monthly_budgets".to_string()));
    }

    #[test]
    fn test_init_schema_twice() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        init_schema(&conn).unwrap();
    }

    #[test]
    fn test_created_at_defaults_when_column_omitted() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        conn.execute(
            "INSERT INTO items (name, value, type) VALUES ('x', 1.0, 'y')",
            [],
        )
        .unwrap();
        let created: String = conn
            .query_row("SELECT created_at FROM items", [], |row| row.get(0))
            .unwrap();
        assert!(!created.is_empty());
    }
}
