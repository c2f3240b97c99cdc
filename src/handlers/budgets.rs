//! Monthly budget controllers: `/budgets/{month}`.
//!
//! `month` is an opaque key (conventionally `YYYY-MM`) and is not validated.

use super::{bad_body, ok_json, path_param, storage_error};
use crate::dispatcher::{Handler, HandlerRequest, HandlerResponse};
use crate::models::{BudgetPayload, MonthlyBudget};
use crate::store::Store;
use serde_json::json;

/// `GET /budgets/{month}`: `budget_amount` is `null` when none was saved.
pub struct GetBudgetController {
    store: Store,
}

impl GetBudgetController {
    #[must_use]
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

impl Handler for GetBudgetController {
    fn handle(&self, req: &HandlerRequest) -> HandlerResponse {
        let month = match path_param(req, "month") {
            Ok(m) => m,
            Err(resp) => return resp,
        };
        match self.store.get_budget(month) {
            Ok(budget_amount) => ok_json(&MonthlyBudget {
                month: month.to_string(),
                budget_amount,
            }),
            Err(e) => storage_error(req, "failed to fetch budget", &e),
        }
    }
}

/// `PUT /budgets/{month}`: upsert.
pub struct SetBudgetController {
    store: Store,
}

impl SetBudgetController {
    #[must_use]
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

impl Handler for SetBudgetController {
    fn handle(&self, req: &HandlerRequest) -> HandlerResponse {
        let month = match path_param(req, "month") {
            Ok(m) => m,
            Err(resp) => return resp,
        };
        let payload: BudgetPayload = match req.json() {
            Ok(p) => p,
            Err(msg) => return bad_body(&msg),
        };
        match self.store.set_budget(month, payload.budget_amount) {
            Ok(()) => ok_json(&json!({
                "message": "budget saved",
                "data": MonthlyBudget {
                    month: month.to_string(),
                    budget_amount: Some(payload.budget_amount),
                },
            })),
            Err(e) => storage_error(req, "failed to save budget", &e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::RequestBody;
    use crate::handlers::test_support::request;
    use http::Method;
    use serde_json::Value;

    const MARCH: [(&str, &str); 1] = [("month", "2024-03")];

    fn put(amount: Value) -> HandlerRequest {
        let body = RequestBody::Json(json!({ "budget_amount": amount }));
        request(Method::PUT, &MARCH, body)
    }

    #[test]
    fn test_unset_month_reports_null() {
        let store = Store::open_in_memory().unwrap();
        let get = GetBudgetController::new(store);
        let resp = get.handle(&request(Method::GET, &MARCH, RequestBody::Empty));
        assert_eq!(resp.status, 200);
        assert_eq!(
            resp.body,
            json!({ "month": "2024-03", "budget_amount": null })
        );
    }

    #[test]
    fn test_set_then_overwrite() {
        let store = Store::open_in_memory().unwrap();
        let set = SetBudgetController::new(store.clone());
        let get = GetBudgetController::new(store);

        let first = set.handle(&put(json!(500.0)));
        assert_eq!(first.status, 200);
        assert_eq!(first.body["message"], "budget saved");
        assert_eq!(first.body["data"]["budget_amount"], 500.0);

        set.handle(&put(json!(750.25)));
        let resp = get.handle(&request(Method::GET, &MARCH, RequestBody::Empty));
        assert_eq!(resp.body["budget_amount"], 750.25);
    }

    #[test]
    fn test_bad_body_is_400() {
        let store = Store::open_in_memory().unwrap();
        let set = SetBudgetController::new(store.clone());
        let resp = set.handle(&put(json!("lots")));
        assert_eq!(resp.status, 400);
        assert_eq!(store.get_budget("2024-03").unwrap(), None);
    }
}
