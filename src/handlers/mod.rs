//! # Handlers Module
//!
//! One controller per route. Each controller owns a [`Store`](crate::store::Store)
//! handle given to it at construction and runs exactly one storage operation
//! per request (update also checks that the row exists when its body is bad).
//!
//! Error bodies are always `{"error": "<message>"}`:
//!
//! | Condition | Status |
//! |---|---|
//! | body missing, not JSON, or wrong field types | 400 |
//! | path id missing or not an integer (get/update) | 400 |
//! | no such row (get/update) | 404 |
//! | storage failure | 500, storage error text included |

pub mod budgets;
pub mod items;
pub mod summary;

pub use budgets::{GetBudgetController, SetBudgetController};
pub use items::{
    CreateItemController, DeleteItemController, GetItemController, ListItemsController,
    UpdateItemController,
};
pub use summary::DailySummaryController;

use crate::dispatcher::{HandlerRequest, HandlerResponse};
use crate::store::StoreError;
use serde::Serialize;
use tracing::error;

/// 200 with `value` serialized as the body.
pub(crate) fn ok_json<T: Serialize>(value: &T) -> HandlerResponse {
    match serde_json::to_value(value) {
        Ok(body) => HandlerResponse::ok(body),
        Err(e) => {
            error!(error = %e, "Failed to serialize response");
            HandlerResponse::error(500, &format!("failed to serialize response: {e}"))
        }
    }
}

/// 500 carrying the storage error text verbatim after `context`.
pub(crate) fn storage_error(
    req: &HandlerRequest,
    context: &str,
    err: &StoreError,
) -> HandlerResponse {
    error!(
        request_id = %req.request_id,
        handler = %req.handler_name,
        error = %err,
        "{context}"
    );
    HandlerResponse::error(500, &format!("{context}: {err}"))
}

pub(crate) fn bad_body(message: &str) -> HandlerResponse {
    HandlerResponse::error(400, &format!("invalid request body: {message}"))
}

/// Raw path parameter, or a 400 if the route didn't supply it.
pub(crate) fn path_param<'a>(
    req: &'a HandlerRequest,
    name: &str,
) -> Result<&'a str, HandlerResponse> {
    match req.get_path_param(name) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => {
            let message = format!("missing path parameter '{name}'");
            Err(HandlerResponse::error(400, &message))
        }
    }
}

/// The `{id}` path parameter parsed as an integer, or a 400.
pub(crate) fn item_id(req: &HandlerRequest) -> Result<i64, HandlerResponse> {
    let raw = path_param(req, "id")?;
    raw.parse::<i64>()
        .map_err(|_| HandlerResponse::error(400, &format!("invalid item id '{raw}'")))
}
