use crate::dispatcher::HandlerResponse;
use may_minihttp::Response;
use serde_json::Value;
use tracing::error;

pub(crate) fn status_reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "OK",
    }
}

/// Serialize a JSON body, falling back to a fixed error document.
pub(crate) fn encode_body(body: &Value) -> Vec<u8> {
    serde_json::to_vec(body).unwrap_or_else(|e| {
        error!(error = %e, "Failed to serialize response body");
        br#"{"error":"failed to serialize response"}"#.to_vec()
    })
}

/// Write a handler's response to the wire.
pub fn write_handler_response(res: &mut Response, resp: &HandlerResponse) {
    write_json(res, resp.status, &resp.body);
}

/// Write a JSON error document produced by the server itself.
pub fn write_json_error(res: &mut Response, status: u16, body: Value) {
    write_json(res, status, &body);
}

fn write_json(res: &mut Response, status: u16, body: &Value) {
    res.status_code(status as usize, status_reason(status));
    res.header("Content-Type: application/json");
    res.body_vec(encode_body(body));
}
