// ABOUTME: Load balancer endpoints for Traefik routes

use tracing::info;

use super::client::ApiClient;
use super::context::RequestContext;
use super::error::ApiError;
use super::transport::ApiRequest;
use crate::models::{LbRoute, NewRoute, TraefikStatus};

impl ApiClient {
    pub async fn list_routes(&self, ctx: &RequestContext) -> Result<Vec<LbRoute>, ApiError> {
        self.get_collection(ctx, ApiRequest::get("lb/routes")).await
    }

    pub async fn create_route(&self, ctx: &RequestContext, route: &NewRoute) -> Result<(), ApiError> {
        if route.domain.trim().is_empty() {
            return Err(ApiError::Validation("Domain required".to_string()));
        }
        if route.container_name.is_empty() || route.container_port == 0 {
            return Err(ApiError::Validation("Container details required".to_string()));
        }
        info!("Adding route {} -> {}", route.domain, route.container_name);
        self.post(ctx, "lb/routes", route).await
    }

    pub async fn delete_route(&self, ctx: &RequestContext, route_id: i64) -> Result<(), ApiError> {
        self.delete(ctx, ApiRequest::delete(format!("lb/routes/{route_id}")))
            .await
    }

    pub async fn traefik_status(&self, ctx: &RequestContext) -> Result<TraefikStatus, ApiError> {
        self.get_json(ctx, "lb/status").await
    }

    /// Deploys the Traefik proxy container on the active host.
    pub async fn setup_load_balancer(&self, ctx: &RequestContext) -> Result<(), ApiError> {
        info!("Setting up load balancer on host {}", ctx.host_id);
        self.post_empty(ctx, "lb/setup").await
    }
}
