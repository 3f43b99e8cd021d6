// ABOUTME: Shared test doubles: a scripted backend transport and an in-memory exec connector

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use url::Url;

use dockdeck::api::{ApiClient, ApiError, ApiRequest, ApiResponse, RequestContext, Transport};
use dockdeck::app::App;
use dockdeck::config::{AppConfig, ClientState, MemoryStore};
use dockdeck::models::User;
use dockdeck::terminal::{ExecChannel, ExecConnector, Inbound, Outbound, SessionError};

/// Answers requests from a route table keyed by `"METHOD path"`. Unknown routes get `200 []`.
#[derive(Default)]
pub struct StubTransport {
    routes: Mutex<HashMap<String, ApiResponse>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl StubTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn route(&self, method: &str, path: &str, status: u16, body: &str) {
        self.routes
            .lock()
            .unwrap()
            .insert(format!("{method} {path}"), ApiResponse::new(status, body));
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn calls_to(&self, method: &str, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method.as_str() == method && r.path == path)
            .count()
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let key = format!("{} {}", request.method.as_str(), request.path);
        self.requests.lock().unwrap().push(request);
        Ok(self
            .routes
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .unwrap_or_else(|| ApiResponse::new(200, "[]")))
    }
}

/// The far end of one fake socket.
pub struct ServerEnd {
    pub url: Url,
    pub from_client: mpsc::UnboundedReceiver<Outbound>,
    pub to_client: mpsc::UnboundedSender<Inbound>,
}

impl ServerEnd {
    pub fn drain(&mut self) -> Vec<Outbound> {
        let mut frames = Vec::new();
        while let Ok(frame) = self.from_client.try_recv() {
            frames.push(frame);
        }
        frames
    }
}

#[derive(Default)]
pub struct FakeConnector {
    pub fail_with: Mutex<Option<String>>,
    pub servers: Mutex<Vec<ServerEnd>>,
}

impl FakeConnector {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn take_server(&self, index: usize) -> ServerEnd {
        self.servers.lock().unwrap().remove(index)
    }

    pub fn connections(&self) -> usize {
        self.servers.lock().unwrap().len()
    }
}

#[async_trait]
impl ExecConnector for FakeConnector {
    async fn connect(&self, url: &Url, _ctx: &RequestContext) -> Result<ExecChannel, SessionError> {
        if let Some(reason) = self.fail_with.lock().unwrap().clone() {
            return Err(SessionError::Connect(reason));
        }
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
        self.servers.lock().unwrap().push(ServerEnd {
            url: url.clone(),
            from_client: outbound_rx,
            to_client: inbound_tx,
        });
        Ok(ExecChannel::new(outbound_tx, inbound_rx))
    }
}

pub fn user(role: &str) -> User {
    User {
        id: 1,
        username: "alice".to_string(),
        role: role.to_string(),
        created_at: String::new(),
    }
}

pub fn logged_in(role: &str) -> ClientState {
    ClientState {
        auth_token: Some("token-123".to_string()),
        user: Some(user(role)),
        ..ClientState::default()
    }
}

pub struct Harness {
    pub app: App,
    pub transport: Arc<StubTransport>,
    pub connector: Arc<FakeConnector>,
    pub store: Arc<MemoryStore>,
}

pub fn harness(state: ClientState) -> Harness {
    let mut config = AppConfig::default();
    config.ui.refresh_interval_secs = 0;
    harness_with_config(state, config)
}

pub fn harness_with_config(state: ClientState, config: AppConfig) -> Harness {
    let transport = StubTransport::new();
    let connector = FakeConnector::new();
    let store = Arc::new(MemoryStore::new(state));
    let app = App::new(
        config,
        ApiClient::new(transport.clone()),
        connector.clone(),
        store.clone(),
    );
    Harness {
        app,
        transport,
        connector,
        store,
    }
}

pub fn containers_json(names: &[&str]) -> String {
    let items: Vec<String> = names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            format!(
                r#"{{"id":"c{i}","name":"/{name}","image":"nginx","state":"running","status":"Up"}}"#
            )
        })
        .collect();
    format!("[{}]", items.join(","))
}
