use super::request::{header, parse_request, ParsedRequest};
use super::response::{write_handler_response, write_json_error};
use crate::dispatcher::Dispatcher;
use crate::ids::{RequestId, REQUEST_ID_HEADER};
use crate::router::Router;
use http::Method;
use may_minihttp::{HttpService, Request, Response};
use serde_json::json;
use std::io;
use std::sync::Arc;
use tracing::{debug, error};

/// The `may_minihttp` service: routes each request and hands it to the
/// dispatcher. Cloned once per connection; clones share router and dispatcher.
#[derive(Clone)]
pub struct AppService {
    pub router: Arc<Router>,
    pub dispatcher: Arc<Dispatcher>,
}

impl AppService {
    #[must_use]
    pub fn new(router: Router, dispatcher: Dispatcher) -> Self {
        Self {
            router: Arc::new(router),
            dispatcher: Arc::new(dispatcher),
        }
    }
}

/// Liveness endpoint returning `{ "status": "ok" }`.
pub fn health_endpoint(res: &mut Response) -> io::Result<()> {
    write_json_error(res, 200, json!({ "status": "ok" }));
    Ok(())
}

fn not_found(res: &mut Response, method: &str, path: &str) {
    write_json_error(
        res,
        404,
        json!({ "error": "Not Found", "method": method, "path": path }),
    );
}

impl HttpService for AppService {
    fn call(&mut self, req: Request, res: &mut Response) -> io::Result<()> {
        let ParsedRequest {
            method,
            path,
            headers,
            body,
        } = parse_request(req);
        let request_id = RequestId::from_header_or_new(header(&headers, REQUEST_ID_HEADER));

        if method == "GET" && path == "/health" {
            return health_endpoint(res);
        }

        let Ok(http_method) = method.parse::<Method>() else {
            not_found(res, &method, &path);
            return Ok(());
        };

        let Some(route_match) = self.router.route(http_method, &path) else {
            debug!(request_id = %request_id, method = %method, path = %path, "Route not found");
            not_found(res, &method, &path);
            return Ok(());
        };

        match self
            .dispatcher
            .dispatch(route_match, path.clone(), body, request_id)
        {
            Some(resp) => write_handler_response(res, &resp),
            None => {
                error!(
                    request_id = %request_id,
                    method = %method,
                    path = %path,
                    "No handler for matched route"
                );
                write_json_error(
                    res,
                    500,
                    json!({
                        "error": "Handler failed or not registered",
                        "method": method,
                        "path": path
                    }),
                );
            }
        }
        Ok(())
    }
}
