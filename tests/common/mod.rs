//! Shared utilities for integration testing.
#![allow(dead_code)]

use axum::{
    body::Bytes,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

use config_admin::config::AdminServiceConfig;
use config_admin::lifecycle::startup::Backends;
use config_admin::store::{MemoryStore, RemoteStore};
use config_admin::{AdminServer, Shutdown};

pub const ADMIN_KEY: &str = "test-admin-key";

/// A request seen by the mock backend.
#[derive(Debug, Clone)]
pub struct Captured {
    pub method: Method,
    /// Path plus query string.
    pub target: String,
    pub headers: HeaderMap,
    pub body: Option<Value>,
}

/// Requests recorded by a mock backend, oldest first.
#[derive(Debug, Clone, Default)]
pub struct Recorder(Arc<Mutex<Vec<Captured>>>);

impl Recorder {
    pub fn all(&self) -> Vec<Captured> {
        self.0.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.0.lock().unwrap().len()
    }
}

/// Start a programmable mock backend on an ephemeral port.
///
/// `respond` sees every request and returns the status and JSON body to
/// answer with.
pub async fn start_programmable_backend<F>(respond: F) -> (SocketAddr, Recorder)
where
    F: Fn(&Captured) -> (u16, String) + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let recorder = Recorder::default();
    let respond = Arc::new(respond);

    let seen = recorder.clone();
    let app = Router::new().fallback(move |method: Method, uri: Uri, headers: HeaderMap, body: Bytes| {
        let respond = respond.clone();
        let seen = seen.clone();
        async move {
            let captured = Captured {
                method,
                target: uri
                    .path_and_query()
                    .map(|pq| pq.as_str().to_string())
                    .unwrap_or_default(),
                headers,
                body: serde_json::from_slice(&body).ok(),
            };
            let (status, body) = respond(&captured);
            seen.0.lock().unwrap().push(captured);
            json_response(status, body)
        }
    });

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, recorder)
}

/// Start a mock backend that returns a fixed response.
pub async fn start_mock_backend(status: u16, body: &'static str) -> (SocketAddr, Recorder) {
    start_programmable_backend(move |_| (status, body.to_string())).await
}

fn json_response(status: u16, body: String) -> Response {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::OK);
    (status, [("content-type", "application/json")], body).into_response()
}

/// A running admin server and the handle that stops it.
pub struct TestServer {
    pub base: String,
    pub shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub fn client(&self) -> AuthedClient {
        AuthedClient {
            client: reqwest::Client::new(),
            base: self.base.clone(),
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// reqwest client that sends the admin bearer token.
pub struct AuthedClient {
    pub client: reqwest::Client,
    base: String,
}

impl AuthedClient {
    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{}", self.base, path))
            .bearer_auth(ADMIN_KEY)
            .send()
            .await
            .unwrap()
    }

    pub async fn send(&self, method: reqwest::Method, path: &str, body: Option<Value>) -> reqwest::Response {
        let mut request = self
            .client
            .request(method, format!("{}{}", self.base, path))
            .bearer_auth(ADMIN_KEY);
        if let Some(body) = body {
            request = request.json(&body);
        }
        request.send().await.unwrap()
    }
}

pub fn test_config() -> AdminServiceConfig {
    let mut config = AdminServiceConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.admin.api_key = ADMIN_KEY.to_string();
    config
}

/// Serve `config` over already-built backends.
pub async fn start_server_with(config: AdminServiceConfig, backends: Backends) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();

    let server = AdminServer::with_backends(config, backends);
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        server.run(listener, rx).await.unwrap();
    });

    TestServer {
        base: format!("http://{}", addr),
        shutdown,
    }
}

/// Serve an in-memory store with forwarding disabled.
pub async fn start_memory_server() -> (TestServer, MemoryStore) {
    let store = MemoryStore::new();
    let backends = Backends {
        store: Arc::new(store.clone()) as Arc<dyn RemoteStore>,
        functions: None,
    };
    (start_server_with(test_config(), backends).await, store)
}

/// Serve a configuration that points the rest store and functions at `addr`.
pub async fn start_rest_server(addr: SocketAddr) -> TestServer {
    let mut config = test_config();
    config.store.backend = config_admin::config::StoreBackend::Rest;
    config.store.url = format!("http://{}", addr);
    config.store.api_key = "service-key".to_string();

    let server = AdminServer::new(config).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        server.run(listener, rx).await.unwrap();
    });

    TestServer { base, shutdown }
}
