use crate::dispatcher::RequestBody;
use may_minihttp::Request;
use smallvec::SmallVec;
use std::io::Read;
use std::sync::Arc;
use tracing::{debug, warn};

/// Maximum inline headers before heap allocation
pub const MAX_INLINE_HEADERS: usize = 16;

/// Header storage: `(lowercase name, value)` pairs
pub type HeaderVec = SmallVec<[(Arc<str>, String); MAX_INLINE_HEADERS]>;

/// Parsed HTTP request data used by `AppService`.
#[derive(Debug, PartialEq)]
pub struct ParsedRequest {
    /// HTTP method (GET, POST, etc.)
    pub method: String,
    /// Request path without the query string
    pub path: String,
    /// HTTP headers (lowercase names)
    pub headers: HeaderVec,
    pub body: RequestBody,
}

/// Strip the query string from a raw request target.
#[must_use]
pub fn split_path(raw_path: &str) -> &str {
    match raw_path.split('?').next() {
        Some(p) if !p.is_empty() => p,
        _ => "/",
    }
}

/// Decode raw body bytes. Non-UTF-8 input is reported as malformed.
#[must_use]
pub fn decode_body(bytes: &[u8]) -> RequestBody {
    match std::str::from_utf8(bytes) {
        Ok(text) => RequestBody::from_text(text),
        Err(e) => RequestBody::Malformed(format!("request body is not valid UTF-8: {e}")),
    }
}

/// Look up a header by lowercase name
#[must_use]
pub fn header<'a>(headers: &'a HeaderVec, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.as_ref() == name)
        .map(|(_, v)| v.as_str())
}

/// Extract method, path, headers, and body from a `may_minihttp::Request`.
pub fn parse_request(req: Request) -> ParsedRequest {
    let method = req.method().to_string();
    let path = split_path(req.path()).to_string();

    let headers: HeaderVec = req
        .headers()
        .iter()
        .map(|h| {
            (
                Arc::from(h.name.to_ascii_lowercase()),
                String::from_utf8_lossy(h.value).to_string(),
            )
        })
        .collect();

    let mut bytes = Vec::new();
    let body = match req.body().read_to_end(&mut bytes) {
        Ok(_) => decode_body(&bytes),
        Err(e) => {
            warn!(method = %method, path = %path, error = %e, "Failed to read request body");
            RequestBody::Malformed(format!("failed to read request body: {e}"))
        }
    };

    debug!(
        method = %method,
        path = %path,
        header_count = headers.len(),
        body_bytes = bytes.len(),
        "HTTP request parsed"
    );

    ParsedRequest {
        method,
        path,
        headers,
        body,
    }
}
