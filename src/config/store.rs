// ABOUTME: Client-local persisted keys (active host, sidebar flag, token, cached user)
// Stored as one JSON file; last write wins and an unreadable file means defaults

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{debug, warn};

use crate::api::{RequestContext, DEFAULT_HOST_ID};
use crate::models::User;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientState {
    #[serde(default = "default_host")]
    pub active_host_id: i64,

    #[serde(default)]
    pub sidebar_collapsed: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

fn default_host() -> i64 {
    DEFAULT_HOST_ID
}

impl Default for ClientState {
    fn default() -> Self {
        Self {
            active_host_id: DEFAULT_HOST_ID,
            sidebar_collapsed: false,
            auth_token: None,
            user: None,
        }
    }
}

impl ClientState {
    pub fn context(&self) -> RequestContext {
        RequestContext::new(self.active_host_id, self.auth_token.clone())
    }

    pub fn is_logged_in(&self) -> bool {
        self.auth_token.as_deref().is_some_and(|t| !t.is_empty())
    }

    pub fn clear_auth(&mut self) {
        self.auth_token = None;
        self.user = None;
    }
}

pub trait ClientStore: Send + Sync {
    fn load(&self) -> ClientState;
    fn save(&self, state: &ClientState) -> Result<()>;
}

pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// `<dir>/state.json`
    pub fn in_dir(dir: PathBuf) -> Self {
        Self::new(dir.join("state.json"))
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl ClientStore for FileStore {
    fn load(&self) -> ClientState {
        if !self.path.exists() {
            return ClientState::default();
        }
        match fs::read_to_string(&self.path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(state) => state,
                Err(e) => {
                    warn!("Failed to parse state file {:?}: {}", self.path, e);
                    ClientState::default()
                }
            },
            Err(e) => {
                warn!("Failed to read state file {:?}: {}", self.path, e);
                ClientState::default()
            }
        }
    }

    fn save(&self, state: &ClientState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(state)?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write state to {}", self.path.display()))?;
        debug!("Saved client state to {:?}", self.path);
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<ClientState>,
}

impl MemoryStore {
    pub fn new(state: ClientState) -> Self {
        Self {
            state: Mutex::new(state),
        }
    }
}

impl ClientStore for MemoryStore {
    fn load(&self) -> ClientState {
        self.state
            .lock()
            .map(|state| state.clone())
            .unwrap_or_default()
    }

    fn save(&self, state: &ClientState) -> Result<()> {
        let mut guard = self
            .state
            .lock()
            .map_err(|_| anyhow::anyhow!("client state lock poisoned"))?;
        *guard = state.clone();
        Ok(())
    }
}
