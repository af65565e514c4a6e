//! wiremock fixtures for driving the blocking client from sync tests.
//!
//! The mock server lives on its own multi-threaded runtime so it keeps
//! answering while a test thread is blocked inside a `ureq` call.

use serde_json::Value;
use tokio::runtime::Runtime;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

pub const TEST_TOKEN: &str = "T";

pub struct PrismaStub {
    // Dropped before the runtime so `expect` counts are verified while it still runs.
    server: MockServer,
    runtime: Runtime,
}

impl PrismaStub {
    pub fn start() -> Self {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap();
        let server = runtime.block_on(MockServer::start());
        Self { server, runtime }
    }

    pub fn base_url(&self) -> String {
        self.server.uri()
    }

    pub fn mount(&self, mock: Mock) {
        self.runtime.block_on(mock.mount(&self.server));
    }

    /// `/login` for the given credentials answers with [`TEST_TOKEN`].
    pub fn mount_login(&self, access_key: &str, secret_key: &str) {
        self.mount(
            Mock::given(method("POST"))
                .and(path("/login"))
                .and(body_json(serde_json::json!({
                    "username": access_key,
                    "password": secret_key,
                })))
                .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "token": TEST_TOKEN,
                    "message": "login_successful",
                }))),
        );
    }

    /// Every request received so far, in arrival order.
    pub fn received(&self) -> Vec<Request> {
        self.runtime
            .block_on(self.server.received_requests())
            .unwrap_or_default()
    }

    /// `(method, path)` of every request received so far.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.received()
            .iter()
            .map(|r| (r.method.to_string(), r.url.path().to_string()))
            .collect()
    }
}

/// A mock for an authenticated call: `verb endpoint` carrying the test token.
pub fn authed(verb: &str, endpoint: &str) -> wiremock::MockBuilder {
    Mock::given(method(verb))
        .and(path(endpoint))
        .and(header("x-redlock-auth", TEST_TOKEN))
}

pub fn json_response(body: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(body)
}

pub fn header_value<'a>(request: &'a Request, name: &str) -> Option<&'a str> {
    request.headers.get(name).and_then(|v| v.to_str().ok())
}

pub fn body_value(request: &Request) -> Value {
    serde_json::from_slice(&request.body).unwrap_or(Value::Null)
}
