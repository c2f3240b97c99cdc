#![allow(dead_code)]

pub mod test_server {
    use super::http;
    use account_book::registry::build_service;
    use account_book::server::{HttpServer, ServerHandle};
    use account_book::store::Store;
    use serde_json::Value;
    use std::net::{SocketAddr, TcpListener};
    use std::path::{Path, PathBuf};
    use std::sync::Once;
    use tempfile::TempDir;

    /// Ensures May coroutines and test logging are configured only once
    static MAY_INIT: Once = Once::new();

    pub fn setup_may_runtime() {
        MAY_INIT.call_once(|| {
            may::config().set_stack_size(0x8000);
            let _ = tracing_subscriber::fmt()
                .with_env_filter("account_book=debug")
                .with_test_writer()
                .try_init();
        });
    }

    /// A running service on an ephemeral port with its own database file.
    pub struct TestServer {
        pub addr: SocketAddr,
        pub db_path: PathBuf,
        handle: Option<ServerHandle>,
        _dir: Option<TempDir>,
    }

    impl TestServer {
        /// Fresh database in a new temporary directory.
        pub fn start() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let db_path = dir.path().join("ledger.db");
            let mut server = Self::start_at(&db_path);
            server._dir = Some(dir);
            server
        }

        /// Serve an existing (or new) database file; the caller owns its lifetime.
        pub fn start_at(db_path: &Path) -> Self {
            setup_may_runtime();
            let store = Store::open(db_path).unwrap();
            let service = build_service(&store).unwrap();

            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            let addr = listener.local_addr().unwrap();
            drop(listener);

            let handle = HttpServer(service).start(addr).unwrap();
            handle.wait_ready().unwrap();
            Self {
                addr,
                db_path: db_path.to_path_buf(),
                handle: Some(handle),
                _dir: None,
            }
        }

        pub fn get(&self, path: &str) -> (u16, Value) {
            http::send(&self.addr, "GET", path, None)
        }

        pub fn post(&self, path: &str, body: &str) -> (u16, Value) {
            http::send(&self.addr, "POST", path, Some(body))
        }

        pub fn put(&self, path: &str, body: &str) -> (u16, Value) {
            http::send(&self.addr, "PUT", path, Some(body))
        }

        pub fn delete(&self, path: &str) -> (u16, Value) {
            http::send(&self.addr, "DELETE", path, None)
        }

        pub fn stop(mut self) {
            if let Some(handle) = self.handle.take() {
                handle.stop();
            }
        }
    }

    impl Drop for TestServer {
        fn drop(&mut self) {
            if let Some(handle) = self.handle.take() {
                handle.stop();
            }
        }
    }
}

pub mod http {
    use serde_json::Value;
    use std::io::{Read, Write};
    use std::net::{SocketAddr, TcpStream};
    use std::time::Duration;

    /// Build a raw HTTP/1.1 request, with a JSON content type when a body is given.
    pub fn raw_request(method: &str, path: &str, body: Option<&str>) -> String {
        let mut req = format!("{method} {path} HTTP/1.1\r\nHost: localhost\r\n");
        if let Some(body) = body {
            req.push_str("Content-Type: application/json\r\n");
            req.push_str(&format!("Content-Length: {}\r\n", body.len()));
        }
        req.push_str("\r\n");
        req.push_str(body.unwrap_or(""));
        req
    }

    /// Write `req` and read exactly one response, using its Content-Length.
    pub fn send_raw(addr: &SocketAddr, req: &str) -> (u16, String, String) {
        let mut stream = TcpStream::connect(addr).unwrap();
        stream
            .set_read_timeout(Some(Duration::from_secs(5)))
            .unwrap();
        stream.write_all(req.as_bytes()).unwrap();

        let mut buf = Vec::new();
        let mut tmp = [0u8; 4096];
        let header_end = loop {
            if let Some(pos) = find(&buf, b"\r\n\r\n") {
                break pos;
            }
            let n = stream.read(&mut tmp).unwrap();
            assert!(n > 0, "connection closed before response headers");
            buf.extend_from_slice(&tmp[..n]);
        };

        let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
        let content_length = head
            .lines()
            .filter_map(|l| l.split_once(':'))
            .find(|(k, _)| k.trim().eq_ignore_ascii_case("content-length"))
            .and_then(|(_, v)| v.trim().parse::<usize>().ok())
            .unwrap_or(0);

        let body_start = header_end + 4;
        while buf.len() < body_start + content_length {
            let n = stream.read(&mut tmp).unwrap();
            assert!(n > 0, "connection closed before full body");
            buf.extend_from_slice(&tmp[..n]);
        }

        let status = head
            .lines()
            .next()
            .and_then(|l| l.split_whitespace().nth(1))
            .and_then(|s| s.parse().ok())
            .unwrap_or(0);
        let body_bytes = &buf[body_start..body_start + content_length];
        let body = String::from_utf8_lossy(body_bytes).to_string();
        (status, head, body)
    }

    /// Send a request and decode the JSON body (`Value::Null` if it isn't JSON).
    pub fn send(addr: &SocketAddr, method: &str, path: &str, body: Option<&str>) -> (u16, Value) {
        let (status, _, body) = send_raw(addr, &raw_request(method, path, body));
        (status, serde_json::from_str(&body).unwrap_or(Value::Null))
    }

    fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack.windows(needle.len()).position(|w| w == needle)
    }
}
