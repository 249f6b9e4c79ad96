//! REST API over the design store.
//!
//! Routing is a pure function ([`route`]) from method, path and body to a
//! status and JSON body, so it can be tested without a socket. [`DesignServer`]
//! wraps it in a `tiny_http` loop that handles one request at a time.

use std::io::Read;
use std::net::SocketAddr;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use serde_json::{json, Value};

use crate::store::{DesignStore, Record};
use crate::{Error, Result};

/// Largest accepted request body
pub const MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

const COLLECTION: &str = "/api/designs";

/// Status plus optional JSON body
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Option<Value>,
}

impl ApiResponse {
    fn ok(body: Value) -> Self {
        Self { status: 200, body: Some(body) }
    }

    fn error(status: u16, message: &str) -> Self {
        Self { status, body: Some(json!({ "error": message })) }
    }

    fn no_content() -> Self {
        Self { status: 204, body: None }
    }
}

enum Target<'a> {
    Collection,
    Item(&'a str),
}

fn parse_target(path: &str) -> Option<Target<'_>> {
    let path = path.split('?').next().unwrap_or(path);
    let rest = path.strip_prefix(COLLECTION)?;
    match rest.trim_end_matches('/') {
        "" => Some(Target::Collection),
        item => item.strip_prefix('/').filter(|id| !id.contains('/')).map(Target::Item),
    }
}

fn parse_object(body: &[u8]) -> std::result::Result<Record, ApiResponse> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(record)) => Ok(record),
        _ => Err(ApiResponse::error(400, "Request body must be a JSON object")),
    }
}

fn failure(e: &Error, message: &str) -> ApiResponse {
    if e.is_not_found() {
        return ApiResponse::error(404, "Design not found");
    }
    log::error!("{}: {}", message, e);
    ApiResponse::error(500, message)
}

/// Dispatch one request against `store`.
pub fn route(store: &dyn DesignStore, method: &str, path: &str, body: &[u8]) -> ApiResponse {
    let Some(target) = parse_target(path) else {
        return ApiResponse::error(404, "Not found");
    };
    if method.eq_ignore_ascii_case("OPTIONS") {
        return ApiResponse::no_content();
    }

    match (method.to_ascii_uppercase().as_str(), target) {
        ("GET", Target::Collection) => match store.list() {
            Ok(designs) => ApiResponse::ok(Value::Array(designs.into_iter().map(Value::Object).collect())),
            Err(e) => failure(&e, "Failed to read designs"),
        },
        ("POST", Target::Collection) => match parse_object(body) {
            Ok(record) => match store.create(record) {
                Ok(saved) => ApiResponse::ok(Value::Object(saved)),
                Err(e) => failure(&e, "Failed to save design"),
            },
            Err(resp) => resp,
        },
        ("GET", Target::Item(id)) => match store.get(id) {
            Ok(record) => ApiResponse::ok(Value::Object(record)),
            Err(e) => failure(&e, "Failed to read design"),
        },
        ("PUT", Target::Item(id)) => match parse_object(body) {
            Ok(record) => match store.update(id, record) {
                Ok(saved) => ApiResponse::ok(Value::Object(saved)),
                Err(e) => failure(&e, "Failed to update design"),
            },
            Err(resp) => resp,
        },
        ("DELETE", Target::Item(id)) => match store.delete(id) {
            Ok(()) => ApiResponse::ok(json!({ "message": "Design deleted successfully" })),
            Err(e) => failure(&e, "Failed to delete design"),
        },
        _ => ApiResponse::error(405, "Method not allowed"),
    }
}

fn header(name: &str, value: &str) -> Option<tiny_http::Header> {
    tiny_http::Header::from_bytes(name.as_bytes(), value.as_bytes()).ok()
}

fn respond(request: tiny_http::Request, resp: ApiResponse) {
    let data = resp.body.map(|b| b.to_string().into_bytes()).unwrap_or_default();
    let mut response = tiny_http::Response::from_data(data).with_status_code(resp.status);
    let headers = [
        header("Content-Type", "application/json"),
        header("Access-Control-Allow-Origin", "*"),
        header("Access-Control-Allow-Methods", "GET, POST, PUT, DELETE, OPTIONS"),
        header("Access-Control-Allow-Headers", "Content-Type"),
    ];
    for h in headers.into_iter().flatten() {
        response.add_header(h);
    }
    if let Err(e) = request.respond(response) {
        log::warn!("failed to write response: {}", e);
    }
}

fn handle(store: &dyn DesignStore, mut request: tiny_http::Request) {
    let method = request.method().as_str().to_string();
    let path = request.url().to_string();

    if request.body_length().map_or(false, |len| len > MAX_BODY_BYTES) {
        return respond(request, ApiResponse::error(413, "Request body too large"));
    }
    let mut body = Vec::new();
    let read = request.as_reader().take(MAX_BODY_BYTES as u64 + 1).read_to_end(&mut body);
    let resp = match read {
        Err(e) => {
            log::warn!("{} {}: failed to read body: {}", method, path, e);
            ApiResponse::error(400, "Unreadable request body")
        }
        Ok(_) if body.len() > MAX_BODY_BYTES => ApiResponse::error(413, "Request body too large"),
        Ok(_) => route(store, &method, &path, &body),
    };
    log::info!("{} {} -> {}", method, path, resp.status);
    respond(request, resp);
}

/// HTTP front end for a [`DesignStore`]
pub struct DesignServer {
    server: Arc<tiny_http::Server>,
    store: Arc<dyn DesignStore>,
}

impl DesignServer {
    /// Bind to `addr` (use port 0 for an ephemeral port).
    pub fn bind(addr: &str, store: impl DesignStore + 'static) -> Result<Self> {
        let server = tiny_http::Server::http(addr)
            .map_err(|e| Error::ConfigError(format!("cannot bind {}: {}", addr, e)))?;
        Ok(Self { server: Arc::new(server), store: Arc::new(store) })
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.server.server_addr().to_ip()
    }

    /// `http://host:port` of the bound socket
    pub fn base_url(&self) -> String {
        format!("http://{}", self.server.server_addr())
    }

    /// Serve until the listener is unblocked.
    pub fn serve(&self) {
        log::info!("design API listening on {}", self.base_url());
        for request in self.server.incoming_requests() {
            handle(self.store.as_ref(), request);
        }
        log::info!("design API stopped");
    }

    /// Serve on a background thread.
    pub fn spawn(self) -> ServerHandle {
        let base_url = self.base_url();
        let server = Arc::clone(&self.server);
        let thread = thread::spawn(move || self.serve());
        ServerHandle { base_url, server, thread: Some(thread) }
    }
}

/// A server running on its own thread; stops on [`ServerHandle::shutdown`] or drop.
pub struct ServerHandle {
    base_url: String,
    server: Arc<tiny_http::Server>,
    thread: Option<JoinHandle<()>>,
}

impl ServerHandle {
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        self.server.unblock();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
