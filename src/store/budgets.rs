use super::{text_column, Result, Store};
use crate::models::DailySummary;
use rusqlite::{params, OptionalExtension};

impl Store {
    /// Budget amount for `month`, or `None` if none has been set.
    ///
    /// # Errors
    ///
    /// Returns the SQLite error if the query fails.
    pub fn get_budget(&self, month: &str) -> Result<Option<f64>> {
        let conn = self.conn()?;
        let amount = conn
            .query_row(
                "SELECT budget_amount FROM monthly_budgets WHERE month = ?1",
                [month],
                |row| row.get(0),
            )
            .optional()?;
        Ok(amount)
    }

    /// Insert or replace the budget for `month`.
    ///
    /// # Errors
    ///
    /// Returns the SQLite error if the statement fails.
    pub fn set_budget(&self, month: &str, amount: f64) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT OR REPLACE INTO monthly_budgets (month, budget_amount) VALUES (?1, ?2)",
            params![month, amount],
        )?;
        Ok(())
    }

    /// Per-day totals of item values, keyed by the date prefix of
    /// `created_at` and ordered by date.
    ///
    /// # Errors
    ///
    /// Any prepare/step/decode failure.
    pub fn daily_totals(&self) -> Result<Vec<DailySummary>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT substr(created_at, 1, 10) AS day, SUM(value) FROM items \
             GROUP BY day ORDER BY day",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(DailySummary {
                    date: text_column(row, 0)?,
                    total: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ItemPayload;

    fn item(value: f64, created_at: &str) -> ItemPayload {
        ItemPayload {
            name: "x".into(),
            value,
            item_type: "expense".into(),
            created_at: created_at.into(),
        }
    }

    #[test]
    fn test_budget_absent_then_set_then_replaced() {
        let store = Store::open_in_memory().unwrap();
        assert_eq!(store.get_budget("2024-01").unwrap(), None);

        store.set_budget("2024-01", 1500.0).unwrap();
        assert_eq!(store.get_budget("2024-01").unwrap(), Some(1500.0));

        store.set_budget("2024-01", 900.0).unwrap();
        assert_eq!(store.get_budget("2024-01").unwrap(), Some(900.0));
        assert_eq!(store.get_budget("2024-02").unwrap(), None);
    }

    #[test]
    fn test_daily_totals_group_by_date_prefix() {
        let store = Store::open_in_memory().unwrap();
        for (value, created_at) in [
            (2.0, "2024-01-02T09:00:00Z"),
            (4.5, "2024-01-01"),
            (1.5, "2024-01-01 18:30:00"),
        ] {
            store.insert_item(&item(value, created_at)).unwrap();
        }

        let totals = store.daily_totals().unwrap();
        assert_eq!(
            totals,
            vec![
                DailySummary {
                    date: "2024-01-01".into(),
                    total: 6.0
                },
                DailySummary {
                    date: "2024-01-02".into(),
                    total: 2.0
                },
            ]
        );
    }

    #[test]
    fn test_daily_totals_empty() {
        let store = Store::open_in_memory().unwrap();
        assert!(store.daily_totals().unwrap().is_empty());
    }
}
