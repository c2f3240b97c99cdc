//! Wire and row types shared by the store and the handlers.
//!
//! Request payloads use `#[serde(default)]` so an omitted field binds to its
//! zero value (`""` or `0.0`), and so does an explicit `null`. A field of the
//! wrong JSON type still fails to decode. Unknown fields, including a
//! client-supplied `id`, are ignored.

use serde::{Deserialize, Deserializer, Serialize};

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A single ledger entry as stored in the `items` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Row id assigned by SQLite on insert
    pub id: i64,
    pub name: String,
    pub value: f64,
    /// Free-form category, serialized as `type`
    #[serde(rename = "type")]
    pub item_type: String,
    pub created_at: String,
}

/// Body of `POST /items` and `PUT /items/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ItemPayload {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub value: f64,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub item_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub created_at: String,
}

impl ItemPayload {
    /// Attach a storage id, producing the item echoed back to the client.
    #[must_use]
    pub fn into_item(self, id: i64) -> Item {
        Item {
            id,
            name: self.name,
            value: self.value,
            item_type: self.item_type,
            created_at: self.created_at,
        }
    }
}

/// Budget for one month. `budget_amount` is `None` until one has been set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyBudget {
    pub month: String,
    pub budget_amount: Option<f64>,
}

/// Body of `PUT /budgets/{month}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BudgetPayload {
    #[serde(deserialize_with = "null_as_default")]
    pub budget_amount: f64,
}

/// Sum of item values for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    /// `YYYY-MM-DD`, the first ten characters of `created_at`
    pub date: String,
    pub total: f64,
}
