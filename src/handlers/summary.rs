//! `GET /summary/daily`

use super::{ok_json, storage_error};
use crate::dispatcher::{Handler, HandlerRequest, HandlerResponse};
use crate::store::Store;

/// Per-day totals of item values, oldest day first.
pub struct DailySummaryController {
    store: Store,
}

impl DailySummaryController {
    #[must_use]
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

impl Handler for DailySummaryController {
    fn handle(&self, req: &HandlerRequest) -> HandlerResponse {
        match self.store.daily_totals() {
            Ok(days) => ok_json(&days),
            Err(e) => storage_error(req, "failed to summarize items", &e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::RequestBody;
    use crate::handlers::test_support::request;
    use crate::models::ItemPayload;
    use http::Method;
    use serde_json::json;

    fn item(value: f64, created_at: &str) -> ItemPayload {
        ItemPayload {
            name: "x".into(),
            value,
            item_type: "expense".into(),
            created_at: created_at.into(),
        }
    }

    #[test]
    fn test_groups_by_day() {
        let store = Store::open_in_memory().unwrap();
        store.insert_item(&item(2.0, "2024-01-02 09:00:00")).unwrap();
        store.insert_item(&item(1.5, "2024-01-01 08:00:00")).unwrap();
        store.insert_item(&item(3.0, "2024-01-02 18:30:00")).unwrap();

        let summary = DailySummaryController::new(store);
        let resp = summary.handle(&request(Method::GET, &[], RequestBody::Empty));
        assert_eq!(resp.status, 200);
        assert_eq!(
            resp.body,
            json!([
                { "date": "2024-01-01", "total": 1.5 },
                { "date": "2024-01-02", "total": 5.0 }
            ])
        );
    }
}
