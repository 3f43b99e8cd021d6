// ABOUTME: Request middleware applied to every backend call, one concern per layer
// Layers run in order before the request and in the same order on the response

use std::sync::Arc;
use tracing::warn;

use super::context::RequestContext;
use super::error::ApiError;
use super::transport::{ApiRequest, ApiResponse};

pub const HOST_HEADER: &str = "X-Docker-Host-ID";
pub const LOGIN_PATH: &str = "auth/login";

pub trait Middleware: Send + Sync {
    fn name(&self) -> &'static str;

    fn before(&self, _request: &mut ApiRequest, _ctx: &RequestContext) {}

    fn after(&self, _request: &ApiRequest, _response: &ApiResponse) -> Result<(), ApiError> {
        Ok(())
    }
}

/// Targets the active Docker host. An explicit header already on the request wins.
pub struct HostHeader;

impl Middleware for HostHeader {
    fn name(&self) -> &'static str {
        "host-header"
    }

    fn before(&self, request: &mut ApiRequest, ctx: &RequestContext) {
        if request.header(HOST_HEADER).is_none() {
            request.set_header(HOST_HEADER, ctx.host_id.to_string());
        }
    }
}

pub struct BearerAuth;

impl Middleware for BearerAuth {
    fn name(&self) -> &'static str {
        "bearer-auth"
    }

    fn before(&self, request: &mut ApiRequest, ctx: &RequestContext) {
        if let Some(token) = ctx.token() {
            request.set_header("Authorization", format!("Bearer {token}"));
        }
    }
}

/// Turns a 401 into `ApiError::Unauthorized` everywhere except the login call,
/// where a 401 just means bad credentials.
pub struct UnauthorizedGuard;

impl Middleware for UnauthorizedGuard {
    fn name(&self) -> &'static str {
        "unauthorized-guard"
    }

    fn after(&self, request: &ApiRequest, response: &ApiResponse) -> Result<(), ApiError> {
        if response.status == 401 && request.path != LOGIN_PATH {
            warn!("401 from {}, session is no longer valid", request.path);
            return Err(ApiError::Unauthorized);
        }
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct MiddlewareChain {
    layers: Vec<Arc<dyn Middleware>>,
}

impl MiddlewareChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Host header, bearer token, then the 401 guard.
    pub fn standard() -> Self {
        Self::new()
            .with(HostHeader)
            .with(BearerAuth)
            .with(UnauthorizedGuard)
    }

    #[must_use]
    pub fn with(mut self, layer: impl Middleware + 'static) -> Self {
        self.layers.push(Arc::new(layer));
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.layers.iter().map(|layer| layer.name()).collect()
    }

    pub fn prepare(&self, mut request: ApiRequest, ctx: &RequestContext) -> ApiRequest {
        for layer in &self.layers {
            layer.before(&mut request, ctx);
        }
        request
    }

    pub fn inspect(&self, request: &ApiRequest, response: &ApiResponse) -> Result<(), ApiError> {
        for layer in &self.layers {
            layer.after(request, response)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> RequestContext {
        RequestContext::new(3, Some("tok".to_string()))
    }

    #[test]
    fn test_standard_chain_sets_host_and_auth() {
        let request = MiddlewareChain::standard().prepare(ApiRequest::get("containers"), &ctx());
        assert_eq!(request.header(HOST_HEADER), Some("3"));
        assert_eq!(request.header("Authorization"), Some("Bearer tok"));
    }

    #[test]
    fn test_explicit_host_header_is_kept() {
        let mut request = ApiRequest::get("containers");
        request.set_header(HOST_HEADER, "7");
        let request = MiddlewareChain::standard().prepare(request, &ctx());
        assert_eq!(request.header(HOST_HEADER), Some("7"));
    }

    #[test]
    fn test_no_token_means_no_authorization_header() {
        let request = MiddlewareChain::standard()
            .prepare(ApiRequest::get("hosts"), &RequestContext::default());
        assert_eq!(request.header("Authorization"), None);
        assert_eq!(request.header(HOST_HEADER), Some("1"));
    }

    #[test]
    fn test_unauthorized_guard_skips_login() {
        let chain = MiddlewareChain::standard();
        let denied = ApiResponse::new(401, "Unauthorized");

        let login = ApiRequest::post(LOGIN_PATH);
        assert!(chain.inspect(&login, &denied).is_ok());

        let list = ApiRequest::get("containers");
        assert!(chain.inspect(&list, &denied).unwrap_err().is_unauthorized());
    }
}
