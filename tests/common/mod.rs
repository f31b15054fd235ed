//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::sync::{Arc, Mutex, mpsc};
use std::thread;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};
use tokio::net::TcpListener;

/// One canned response
#[derive(Debug, Clone)]
struct Route {
    method: String,
    path: String,
    status: u16,
    body: String,
}

/// A request as the mock server received it
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RecordedRequest {
    /// Header value by case-insensitive name
    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.headers.iter().find(|(k, _)| *k == name).map(|(_, v)| v.as_str())
    }

    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).expect("request body is not JSON")
    }
}

#[derive(Clone, Default)]
struct MockState {
    routes: Arc<Mutex<Vec<Route>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// Builder for an axum mock of the backend API.
///
/// Routes match on method and exact (still percent-encoded) path. When several
/// routes share a method and path they answer in order and the last one keeps
/// answering. Unknown routes get a 404 with an `error.message` body.
pub struct MockServerBuilder {
    routes: Vec<Route>,
}

impl MockServerBuilder {
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    pub fn route(self, method: &str, path: &str, status: u16, body: Value) -> Self {
        let body = if body.is_null() { String::new() } else { body.to_string() };
        self.raw_route(method, path, status, &body)
    }

    /// Route answering with a raw (possibly invalid) body
    pub fn raw_route(mut self, method: &str, path: &str, status: u16, body: &str) -> Self {
        self.routes.push(Route {
            method: method.to_string(),
            path: path.to_string(),
            status,
            body: body.to_string(),
        });
        self
    }

    /// Convenience for `{ "data": ... }` success responses
    pub fn data(self, method: &str, path: &str, data: Value) -> Self {
        self.route(method, path, 200, json!({ "data": data }))
    }

    /// Serve on `127.0.0.1:0` from a background thread with its own runtime, so
    /// plain and `#[tokio::test]` tests can both use it
    pub fn start(self) -> MockServer {
        let state = MockState {
            routes: Arc::new(Mutex::new(self.routes)),
            requests: Arc::default(),
        };
        let requests = Arc::clone(&state.requests);
        let app = Router::new().fallback(answer).with_state(state);

        let (addr_tx, addr_rx) = mpsc::channel();
        thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("Failed to build mock server runtime");
            runtime.block_on(async move {
                let listener =
                    TcpListener::bind("127.0.0.1:0").await.expect("Failed to bind mock server");
                addr_tx.send(listener.local_addr().expect("no local addr")).unwrap();
                axum::serve(listener, app).await.expect("mock server failed");
            });
        });

        let addr = addr_rx.recv().expect("mock server did not start");
        MockServer { url: format!("http://{}", addr), requests }
    }
}

pub struct MockServer {
    url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockServer {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, method: &str, path: &str) -> Vec<RecordedRequest> {
        self.requests().into_iter().filter(|r| r.method == method && r.path == path).collect()
    }
}

async fn answer(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request = RecordedRequest {
        method: method.as_str().to_string(),
        path: uri.path().to_string(),
        headers: headers
            .iter()
            .map(|(name, value)| {
                (name.as_str().to_string(), value.to_str().unwrap_or_default().to_string())
            })
            .collect(),
        body: String::from_utf8_lossy(&body).into_owned(),
    };

    let (status, body) = {
        let mut routes = state.routes.lock().unwrap();
        let matching: Vec<usize> = routes
            .iter()
            .enumerate()
            .filter(|(_, r)| r.method == request.method && r.path == request.path)
            .map(|(i, _)| i)
            .collect();
        match matching.as_slice() {
            [] => (404, json!({ "error": { "message": "not found" } }).to_string()),
            [only] => (routes[*only].status, routes[*only].body.clone()),
            [first, ..] => {
                let route = routes.remove(*first);
                (route.status, route.body)
            }
        }
    };
    state.requests.lock().unwrap().push(request);

    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
}

/// A conversation JSON object as the backend returns it
pub fn conversation_json(id: &str, title: &str) -> Value {
    json!({ "id": id, "title": title, "updated_at": "2025-03-01T08:00:00Z" })
}

pub fn message_json(role: &str, content: &str) -> Value {
    json!({ "role": role, "content": content, "created_at": "2025-03-01 08:00:00" })
}
