// ABOUTME: Per-request context carrying the active Docker host and the bearer token

pub const DEFAULT_HOST_ID: i64 = 1;

/// Passed explicitly to every API call instead of being read from global state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub host_id: i64,
    pub auth_token: Option<String>,
}

impl Default for RequestContext {
    fn default() -> Self {
        Self {
            host_id: DEFAULT_HOST_ID,
            auth_token: None,
        }
    }
}

impl RequestContext {
    pub fn new(host_id: i64, auth_token: Option<String>) -> Self {
        Self {
            host_id,
            auth_token,
        }
    }

    /// Same credentials aimed at another host, for cross-host fan-out.
    pub fn with_host(&self, host_id: i64) -> Self {
        Self {
            host_id,
            auth_token: self.auth_token.clone(),
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.auth_token.as_deref().filter(|t| !t.is_empty())
    }
}
