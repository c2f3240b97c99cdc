//! Dispatcher core: handler coroutines, request/response envelopes.

use crate::ids::RequestId;
use crate::middleware::Middleware;
use crate::router::{ParamVec, RouteMatch};
use http::Method;
use may::coroutine;
use may::sync::mpsc;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Request body as received on the wire.
///
/// Syntax errors are kept rather than dropped so each handler decides how a
/// bad body maps to a status code.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// No body bytes were sent
    Empty,
    /// Body parsed as JSON
    Json(Value),
    /// Body bytes were present but not valid JSON; holds the parser message
    Malformed(String),
}

impl RequestBody {
    /// Classify raw body text.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        if text.trim().is_empty() {
            return RequestBody::Empty;
        }
        match serde_json::from_str(text) {
            Ok(v) => RequestBody::Json(v),
            Err(e) => RequestBody::Malformed(e.to_string()),
        }
    }
}

/// Request data passed to a handler coroutine
#[derive(Debug, Clone)]
pub struct HandlerRequest {
    /// Correlation id attached to every log line for this request
    pub request_id: RequestId,
    pub method: Method,
    /// Concrete request path (query string stripped)
    pub path: String,
    pub handler_name: String,
    /// Path parameters extracted by the router
    pub path_params: ParamVec,
    pub body: RequestBody,
    /// Channel for sending the response back to the dispatcher
    pub reply_tx: mpsc::Sender<HandlerResponse>,
}

impl HandlerRequest {
    /// Get a path parameter by name
    #[inline]
    #[must_use]
    pub fn get_path_param(&self, name: &str) -> Option<&str> {
        self.path_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Decode the JSON body into `T`.
    ///
    /// # Errors
    ///
    /// Returns a human-readable message when the body is empty, is not
    /// valid JSON, or does not match the shape of `T`. A literal `null`
    /// body decodes as an empty object.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, String> {
        match &self.body {
            RequestBody::Empty => Err("request body is empty".to_string()),
            RequestBody::Malformed(msg) => Err(msg.clone()),
            RequestBody::Json(Value::Null) => {
                let empty = Value::Object(Map::new());
                T::deserialize(&empty).map_err(|e| e.to_string())
            }
            RequestBody::Json(v) => T::deserialize(v).map_err(|e| e.to_string()),
        }
    }
}

/// Response data sent back from a handler coroutine. Bodies are always JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct HandlerResponse {
    pub status: u16,
    pub body: Value,
}

impl HandlerResponse {
    /// Create a JSON response
    #[must_use]
    pub fn json(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    /// 200 with a JSON body
    #[must_use]
    pub fn ok(body: Value) -> Self {
        Self::json(200, body)
    }

    /// `{"error": message}` with the given status
    #[must_use]
    pub fn error(status: u16, message: &str) -> Self {
        Self::json(status, serde_json::json!({ "error": message }))
    }
}

/// A request handler. Runs inside its own coroutine; state it needs (such as
/// the store) is owned by the implementing type.
pub trait Handler: Send + 'static {
    fn handle(&self, req: &HandlerRequest) -> HandlerResponse;
}

impl<F> Handler for F
where
    F: Fn(&HandlerRequest) -> HandlerResponse + Send + 'static,
{
    fn handle(&self, req: &HandlerRequest) -> HandlerResponse {
        self(req)
    }
}

/// Channel sender that feeds a handler coroutine
pub type HandlerSender = mpsc::Sender<HandlerRequest>;

/// Routes matched requests to registered handler coroutines
#[derive(Clone, Default)]
pub struct Dispatcher {
    handlers: HashMap<String, HandlerSender>,
    middlewares: Vec<Arc<dyn Middleware>>,
}

impl Dispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a coroutine running `handler` and register it under `name`.
    ///
    /// The coroutine serves requests from a channel until the dispatcher (and
    /// every clone of it) is dropped. A panic inside the handler is caught and
    /// answered with a 500; the coroutine keeps serving.
    ///
    /// # Errors
    ///
    /// Returns the spawn error if the coroutine cannot be created.
    pub fn register<H: Handler>(&mut self, name: &str, handler: H) -> io::Result<()> {
        let (tx, rx) = mpsc::channel::<HandlerRequest>();
        let stack_size = may::config().get_stack_size();
        let handler_name = name.to_string();

        // SAFETY: `Builder::spawn` is unsafe because the closure must not rely on
        // thread-local state surviving a yield. The closure owns `handler` and
        // `rx` outright and handlers only make blocking SQLite calls.
        #[allow(unsafe_code)]
        let spawned = unsafe {
            coroutine::Builder::new()
                .name(format!("handler-{name}"))
                .stack_size(stack_size)
                .spawn(move || {
                    debug!(handler_name = %handler_name, stack_size, "Handler coroutine start");
                    for req in rx.iter() {
                        serve_one(&handler, req);
                    }
                    debug!(handler_name = %handler_name, "Handler coroutine exit");
                })
        };

        if let Err(e) = spawned {
            error!(handler_name = %name, error = %e, "Failed to spawn handler coroutine");
            return Err(e);
        }

        if self.handlers.insert(name.to_string(), tx).is_some() {
            warn!(handler_name = %name, "Replaced existing handler - old coroutine will exit");
        }
        info!(
            handler_name = %name,
            total_handlers = self.handlers.len(),
            "Handler registered"
        );
        Ok(())
    }

    /// Add middleware; runs in insertion order around every dispatch.
    pub fn add_middleware(&mut self, mw: Arc<dyn Middleware>) {
        self.middlewares.push(mw);
    }

    /// Whether a handler is registered under `name`
    #[must_use]
    pub fn has_handler(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Send a matched request to its handler and wait for the response.
    ///
    /// Returns `None` if no handler is registered for the route. A handler
    /// coroutine that has gone away yields a 503.
    #[must_use]
    pub fn dispatch(
        &self,
        route_match: RouteMatch,
        path: String,
        body: RequestBody,
        request_id: RequestId,
    ) -> Option<HandlerResponse> {
        let Some(tx) = self.handlers.get(&route_match.handler_name) else {
            error!(
                request_id = %request_id,
                handler_name = %route_match.handler_name,
                "Handler not found"
            );
            return None;
        };

        let (reply_tx, reply_rx) = mpsc::channel();
        let request = HandlerRequest {
            request_id,
            method: route_match.route.method.clone(),
            path,
            handler_name: route_match.handler_name,
            path_params: route_match.path_params,
            body,
            reply_tx,
        };

        let early = self
            .middlewares
            .iter()
            .find_map(|mw| mw.before(&request));

        let start = Instant::now();
        let mut resp = match early {
            Some(r) => r,
            None => {
                debug!(
                    request_id = %request_id,
                    handler_name = %request.handler_name,
                    "Request dispatched to handler"
                );
                if let Err(e) = tx.send(request.clone()) {
                    error!(
                        request_id = %request_id,
                        handler_name = %request.handler_name,
                        error = %e,
                        "Failed to send request to handler"
                    );
                    return Some(unavailable(&request.handler_name));
                }
                match reply_rx.recv() {
                    Ok(r) => r,
                    Err(e) => {
                        error!(
                            request_id = %request_id,
                            handler_name = %request.handler_name,
                            error = %e,
                            "Handler channel closed - handler may have crashed"
                        );
                        return Some(unavailable(&request.handler_name));
                    }
                }
            }
        };
        let latency: Duration = start.elapsed();

        for mw in &self.middlewares {
            mw.after(&request, &mut resp, latency);
        }
        Some(resp)
    }
}

fn unavailable(handler_name: &str) -> HandlerResponse {
    HandlerResponse::error(503, &format!("handler '{handler_name}' is not responding"))
}

fn serve_one<H: Handler>(handler: &H, req: HandlerRequest) {
    let reply_tx = req.reply_tx.clone();
    let request_id = req.request_id;
    let start = Instant::now();

    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| handler.handle(&req)));
    let resp = match outcome {
        Ok(resp) => {
            debug!(
                request_id = %request_id,
                handler_name = %req.handler_name,
                status = resp.status,
                execution_time_ms = start.elapsed().as_millis() as u64,
                "Handler execution complete"
            );
            resp
        }
        Err(panic) => {
            let message = panic
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            error!(
                request_id = %request_id,
                handler_name = %req.handler_name,
                panic_message = %message,
                "Handler panicked"
            );
            HandlerResponse::error(500, &format!("handler panicked: {message}"))
        }
    };

    if reply_tx.send(resp).is_err() {
        warn!(request_id = %request_id, "Reply channel closed before response was sent");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::{RouteMeta, Router};
    use serde_json::json;

    fn single_route(method: Method, pattern: &str, name: &str) -> Router {
        may::config().set_stack_size(0x8000);
        Router::new(vec![RouteMeta::new(method, pattern, name)]).unwrap()
    }

    fn dispatch_get(
        dispatcher: &Dispatcher,
        router: &Router,
        path: &str,
    ) -> Option<HandlerResponse> {
        let route_match = router.route(Method::GET, path).unwrap();
        let request_id = RequestId::new();
        dispatcher.dispatch(route_match, path.into(), RequestBody::Empty, request_id)
    }

    #[test]
    fn test_request_body_from_text() {
        assert_eq!(RequestBody::from_text(""), RequestBody::Empty);
        assert_eq!(RequestBody::from_text("  \r\n"), RequestBody::Empty);
        assert_eq!(
            RequestBody::from_text(r#"{"a":1}"#),
            RequestBody::Json(json!({"a": 1}))
        );
        assert!(matches!(
            RequestBody::from_text("{not json"),
            RequestBody::Malformed(_)
        ));
    }

    #[test]
    fn test_dispatch_to_registered_handler() {
        let router = single_route(Method::GET, "/echo/{id}", "echo");
        let mut dispatcher = Dispatcher::new();
        dispatcher
            .register("echo", |req: &HandlerRequest| {
                HandlerResponse::ok(json!({ "id": req.get_path_param("id") }))
            })
            .unwrap();

        let resp = dispatch_get(&dispatcher, &router, "/echo/9").unwrap();
        assert_eq!(resp.status, 200);
        assert_eq!(resp.body, json!({ "id": "9" }));
    }

    #[test]
    fn test_dispatch_unknown_handler() {
        let router = single_route(Method::GET, "/x", "missing");
        let dispatcher = Dispatcher::new();
        assert!(dispatch_get(&dispatcher, &router, "/x").is_none());
    }

    #[test]
    fn test_handler_panic_becomes_500() {
        let router = single_route(Method::GET, "/boom", "boom");
        let mut dispatcher = Dispatcher::new();
        dispatcher
            .register("boom", |_req: &HandlerRequest| -> HandlerResponse {
                panic!("kaboom")
            })
            .unwrap();

        for _ in 0..2 {
            let resp = dispatch_get(&dispatcher, &router, "/boom").unwrap();
            assert_eq!(resp.status, 500);
            let message = resp.body["error"].as_str().unwrap();
            assert!(message.contains("kaboom"));
        }
    }

    #[test]
    fn test_json_decoding_errors() {
        #[derive(serde::Deserialize, Debug, Default)]
        #[serde(default)]
        struct Body {
            n: i64,
        }
        let (reply_tx, _rx) = mpsc::channel();
        let mut req = HandlerRequest {
            request_id: RequestId::new(),
            method: Method::POST,
            path: "/".into(),
            handler_name: "h".into(),
            path_params: ParamVec::new(),
            body: RequestBody::Empty,
            reply_tx,
        };
        assert!(req.json::<Body>().is_err());
        req.body = RequestBody::Json(json!({ "n": "one" }));
        assert!(req.json::<Body>().is_err());
        req.body = RequestBody::Json(json!({ "n": 1 }));
        assert_eq!(req.json::<Body>().unwrap().n, 1);
    }

    #[test]
    fn test_json_null_body_binds_defaults() {
        #[derive(serde::Deserialize, Debug, Default)]
        #[serde(default)]
        struct Body {
            n: i64,
        }
        let (reply_tx, _rx) = mpsc::channel();
        let req = HandlerRequest {
            request_id: RequestId::new(),
            method: Method::POST,
            path: "/".into(),
            handler_name: "h".into(),
            path_params: ParamVec::new(),
            body: RequestBody::Json(Value::Null),
            reply_tx,
        };
        assert_eq!(req.json::<Body>().unwrap().n, 0);
    }
}
