use super::{text_column, Result, Store};
use crate::models::{Item, ItemPayload};
use rusqlite::{params, OptionalExtension, Row};

const SELECT_ITEM: &str = "SELECT id, name, value, type, created_at FROM items";

fn row_to_item(row: &Row<'_>) -> rusqlite::Result<Item> {
    Ok(Item {
        id: row.get(0)?,
        name: text_column(row, 1)?,
        value: row.get(2)?,
        item_type: text_column(row, 3)?,
        created_at: text_column(row, 4)?,
    })
}

impl Store {
    /// Every item, in whatever order SQLite returns them.
    ///
    /// # Errors
    ///
    /// Any prepare/step/decode failure; no partial list is returned.
    pub fn list_items(&self) -> Result<Vec<Item>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(SELECT_ITEM)?;
        let items = stmt
            .query_map([], row_to_item)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(items)
    }

    /// Look up one item by id.
    ///
    /// # Errors
    ///
    /// Storage failures only; a missing row is `Ok(None)`.
    pub fn get_item(&self, id: i64) -> Result<Option<Item>> {
        let conn = self.conn()?;
        let item = conn
            .query_row(&format!("{SELECT_ITEM} WHERE id = ?1"), [id], row_to_item)
            .optional()?;
        Ok(item)
    }

    /// Insert a new item and return the id SQLite assigned to it.
    ///
    /// # Errors
    ///
    /// Returns the SQLite error if the insert fails.
    pub fn insert_item(&self, item: &ItemPayload) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO items (name, value, type, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![item.name, item.value, item.item_type, item.created_at],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Overwrite every mutable column of row `id`. Returns the number of rows
    /// affected (0 when no such row).
    ///
    /// # Errors
    ///
    /// Returns the SQLite error if the update fails.
    pub fn update_item(&self, id: i64, item: &ItemPayload) -> Result<usize> {
        let conn = self.conn()?;
        let affected = conn.execute(
            "UPDATE items SET name = ?1, value = ?2, type = ?3, created_at = ?4 WHERE id = ?5",
            params![item.name, item.value, item.item_type, item.created_at, id],
        )?;
        Ok(affected)
    }

    /// Whether a row with this id exists.
    ///
    /// # Errors
    ///
    /// Returns the SQLite error if the query fails.
    pub fn item_exists(&self, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let exists = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM items WHERE id = ?1)",
            [id],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    /// Delete by the raw id text from the URL. SQLite applies the column's
    /// integer affinity, so `"5"` matches row 5 and `"abc"` matches nothing.
    /// Returns the number of rows removed.
    ///
    /// # Errors
    ///
    /// Returns the SQLite error if the delete fails.
    pub fn delete_item(&self, id: &str) -> Result<usize> {
        let conn = self.conn()?;
        let affected = conn.execute("DELETE FROM items WHERE id = ?1", [id])?;
        Ok(affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coffee() -> ItemPayload {
        ItemPayload {
            name: "coffee".into(),
            value: 4.5,
            item_type: "expense".into(),
            created_at: "2024-01-01".into(),
        }
    }

    #[test]
    fn test_insert_then_list_and_get() {
        let store = Store::open_in_memory().unwrap();
        let id = store.insert_item(&coffee()).unwrap();
        assert!(id > 0);

        let expected = coffee().into_item(id);
        let items = store.list_items().unwrap();
        assert_eq!(items, vec![expected.clone()]);
        assert_eq!(store.get_item(id).unwrap(), Some(expected));
        assert_eq!(store.get_item(id + 1).unwrap(), None);
    }

    #[test]
    fn test_ids_are_distinct() {
        let store = Store::open_in_memory().unwrap();
        let a = store.insert_item(&coffee()).unwrap();
        let b = store.insert_item(&coffee()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_update_overwrites_all_fields() {
        let store = Store::open_in_memory().unwrap();
        let id = store.insert_item(&coffee()).unwrap();

        let replacement = ItemPayload {
            name: "tea".into(),
            ..Default::default()
        };
        assert_eq!(store.update_item(id, &replacement).unwrap(), 1);

        let item = store.get_item(id).unwrap().unwrap();
        assert_eq!(item, replacement.into_item(id));
    }

    #[test]
    fn test_update_missing_row_affects_nothing() {
        let store = Store::open_in_memory().unwrap();
        assert_eq!(store.update_item(999_999, &coffee()).unwrap(), 0);
        assert!(!store.item_exists(999_999).unwrap());
    }

    #[test]
    fn test_delete_by_text_id() {
        let store = Store::open_in_memory().unwrap();
        let id = store.insert_item(&coffee()).unwrap();

        assert_eq!(store.delete_item("abc").unwrap(), 0);
        assert_eq!(store.delete_item(&id.to_string()).unwrap(), 1);
        assert_eq!(store.delete_item(&id.to_string()).unwrap(), 0);
        assert!(store.list_items().unwrap().is_empty());
    }

    #[test]
    fn test_numeric_looking_created_at_reads_back_as_text() {
        let store = Store::open_in_memory().unwrap();
        let id = store
            .insert_item(&ItemPayload {
                created_at: "2024".into(),
                ..coffee()
            })
            .unwrap();
        assert_eq!(store.get_item(id).unwrap().unwrap().created_at, "2024");
    }
}
