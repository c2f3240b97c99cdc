//! Item CRUD controllers: `/items` and `/items/{id}`.

use super::{bad_body, item_id, ok_json, path_param, storage_error};
use crate::dispatcher::{Handler, HandlerRequest, HandlerResponse};
use crate::models::ItemPayload;
use crate::store::Store;
use serde_json::json;
use tracing::debug;

fn item_not_found(id: i64) -> HandlerResponse {
    HandlerResponse::error(404, &format!("item {id} not found"))
}

/// `GET /items`
pub struct ListItemsController {
    store: Store,
}

impl ListItemsController {
    #[must_use]
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

impl Handler for ListItemsController {
    fn handle(&self, req: &HandlerRequest) -> HandlerResponse {
        match self.store.list_items() {
            Ok(items) => ok_json(&items),
            Err(e) => storage_error(req, "failed to list items", &e),
        }
    }
}

/// `GET /items/{id}`
pub struct GetItemController {
    store: Store,
}

impl GetItemController {
    #[must_use]
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

impl Handler for GetItemController {
    fn handle(&self, req: &HandlerRequest) -> HandlerResponse {
        let id = match item_id(req) {
            Ok(id) => id,
            Err(resp) => return resp,
        };
        match self.store.get_item(id) {
            Ok(Some(item)) => ok_json(&item),
            Ok(None) => item_not_found(id),
            Err(e) => storage_error(req, "failed to fetch item", &e),
        }
    }
}

/// `POST /items`
pub struct CreateItemController {
    store: Store,
}

impl CreateItemController {
    #[must_use]
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

impl Handler for CreateItemController {
    fn handle(&self, req: &HandlerRequest) -> HandlerResponse {
        let payload: ItemPayload = match req.json() {
            Ok(p) => p,
            Err(msg) => return bad_body(&msg),
        };
        match self.store.insert_item(&payload) {
            Ok(id) => {
                debug!(request_id = %req.request_id, item_id = id, "Item created");
                ok_json(&payload.into_item(id))
            }
            Err(e) => storage_error(req, "failed to insert item", &e),
        }
    }
}

/// `PUT /items/{id}`: full overwrite, no patch semantics.
pub struct UpdateItemController {
    store: Store,
}

impl UpdateItemController {
    #[must_use]
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

impl Handler for UpdateItemController {
    fn handle(&self, req: &HandlerRequest) -> HandlerResponse {
        let id = match item_id(req) {
            Ok(id) => id,
            Err(resp) => return resp,
        };

        let payload: ItemPayload = match req.json() {
            Ok(p) => p,
            // an absent row is reported as 404 even when the body is bad
            Err(msg) => {
                return match self.store.item_exists(id) {
                    Ok(true) => bad_body(&msg),
                    Ok(false) => item_not_found(id),
                    Err(e) => storage_error(req, "failed to look up item", &e),
                }
            }
        };

        match self.store.update_item(id, &payload) {
            Ok(0) => item_not_found(id),
            Ok(_) => ok_json(&json!({
                "message": "item updated",
                "data": payload.into_item(id),
            })),
            Err(e) => storage_error(req, "failed to update item", &e),
        }
    }
}

/// `DELETE /items/{id}`: succeeds whether or not a row matched.
pub struct DeleteItemController {
    store: Store,
}

impl DeleteItemController {
    #[must_use]
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

impl Handler for DeleteItemController {
    fn handle(&self, req: &HandlerRequest) -> HandlerResponse {
        let id = match path_param(req, "id") {
            Ok(id) => id,
            Err(resp) => return resp,
        };
        match self.store.delete_item(id) {
            Ok(removed) => {
                debug!(
                    request_id = %req.request_id,
                    item_id = %id,
                    removed,
                    "Item delete executed"
                );
                ok_json(&json!({ "message": "item deleted", "id": id }))
            }
            Err(e) => storage_error(req, "failed to delete item", &e),
        }
    }
}
