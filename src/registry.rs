//! Route table and handler registration for the account book service.
//!
//! Handler names tie the two halves together: the router resolves a request
//! to a name, the dispatcher resolves the name to a controller coroutine.

use crate::dispatcher::Dispatcher;
use crate::handlers::{
    CreateItemController, DailySummaryController, DeleteItemController, GetBudgetController,
    GetItemController, ListItemsController, SetBudgetController, UpdateItemController,
};
use crate::middleware::TracingMiddleware;
use crate::router::{RouteMeta, Router};
use crate::server::AppService;
use crate::store::Store;
use anyhow::Context;
use http::Method;
use std::io;
use std::sync::Arc;

pub const LIST_ITEMS: &str = "list_items";
pub const CREATE_ITEM: &str = "create_item";
pub const GET_ITEM: &str = "get_item";
pub const UPDATE_ITEM: &str = "update_item";
pub const DELETE_ITEM: &str = "delete_item";
pub const GET_BUDGET: &str = "get_budget";
pub const SET_BUDGET: &str = "set_budget";
pub const DAILY_SUMMARY: &str = "daily_summary";

/// Every route the service answers, besides the built-in `/health`.
#[must_use]
pub fn routes() -> Vec<RouteMeta> {
    vec![
        RouteMeta::new(Method::GET, "/items", LIST_ITEMS),
        RouteMeta::new(Method::POST, "/items", CREATE_ITEM),
        RouteMeta::new(Method::GET, "/items/{id}", GET_ITEM),
        RouteMeta::new(Method::PUT, "/items/{id}", UPDATE_ITEM),
        RouteMeta::new(Method::DELETE, "/items/{id}", DELETE_ITEM),
        RouteMeta::new(Method::GET, "/budgets/{month}", GET_BUDGET),
        RouteMeta::new(Method::PUT, "/budgets/{month}", SET_BUDGET),
        RouteMeta::new(Method::GET, "/summary/daily", DAILY_SUMMARY),
    ]
}

/// Compile [`routes`] into a [`Router`].
///
/// # Errors
///
/// Only if a path template fails to compile, which the fixed table never does.
pub fn build_router() -> Result<Router, regex::Error> {
    Router::new(routes())
}

/// Spawn one controller coroutine per route, each holding a clone of `store`.
///
/// # Errors
///
/// Returns the spawn error if a coroutine cannot be started.
pub fn register_all(dispatcher: &mut Dispatcher, store: &Store) -> io::Result<()> {
    dispatcher.register(LIST_ITEMS, ListItemsController::new(store.clone()))?;
    dispatcher.register(CREATE_ITEM, CreateItemController::new(store.clone()))?;
    dispatcher.register(GET_ITEM, GetItemController::new(store.clone()))?;
    dispatcher.register(UPDATE_ITEM, UpdateItemController::new(store.clone()))?;
    dispatcher.register(DELETE_ITEM, DeleteItemController::new(store.clone()))?;
    dispatcher.register(GET_BUDGET, GetBudgetController::new(store.clone()))?;
    dispatcher.register(SET_BUDGET, SetBudgetController::new(store.clone()))?;
    dispatcher.register(DAILY_SUMMARY, DailySummaryController::new(store.clone()))?;
    Ok(())
}

/// Router plus a dispatcher with request tracing and every controller
/// registered, ready to hand to [`HttpServer`](crate::server::HttpServer).
///
/// # Errors
///
/// Route compilation or handler coroutine spawn failure.
pub fn build_service(store: &Store) -> anyhow::Result<AppService> {
    let router = build_router().context("failed to compile route table")?;
    let mut dispatcher = Dispatcher::new();
    dispatcher.add_middleware(Arc::new(TracingMiddleware));
    register_all(&mut dispatcher, store).context("failed to start handler coroutines")?;
    Ok(AppService::new(router, dispatcher))
}
