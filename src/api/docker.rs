// ABOUTME: Docker host endpoints: hosts, containers, images, volumes, networks and activity
// All calls target the host named by the request context's X-Docker-Host-ID header

use serde_json::{json, Value};
use tracing::info;

use super::client::ApiClient;
use super::context::RequestContext;
use super::error::ApiError;
use super::transport::ApiRequest;
use crate::models::{
    ActivityLog, ContainerInfo, Host, ImageInfo, NetworkInfo, NewContainer, NewHost, NewNetwork,
    NewVolume, VolumeInfo,
};

/// Lifecycle verbs posted to `containers/{id}/{verb}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerAction {
    Start,
    Stop,
    Restart,
}

impl ContainerAction {
    pub fn verb(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Restart => "restart",
        }
    }
}

/// Resource groups that support `POST {group}/prune`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PruneTarget {
    Containers,
    Images,
    Volumes,
    Networks,
}

impl PruneTarget {
    fn segment(self) -> &'static str {
        match self {
            Self::Containers => "containers",
            Self::Images => "images",
            Self::Volumes => "volumes",
            Self::Networks => "networks",
        }
    }
}

fn require(value: &str, message: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::Validation(message.to_string()));
    }
    Ok(())
}

impl ApiClient {
    pub async fn list_hosts(&self, ctx: &RequestContext) -> Result<Vec<Host>, ApiError> {
        self.get_collection(ctx, ApiRequest::get("hosts")).await
    }

    pub async fn create_host(&self, ctx: &RequestContext, host: &NewHost) -> Result<(), ApiError> {
        require(&host.name, "Host name is required")?;
        require(&host.uri, "Host URI is required")?;
        info!("Registering Docker host {} at {}", host.name, host.uri);
        self.post(ctx, "hosts/create", host).await
    }

    pub async fn remove_host(&self, ctx: &RequestContext, host_id: i64) -> Result<(), ApiError> {
        self.delete(ctx, ApiRequest::delete(format!("hosts/{host_id}")))
            .await
    }

    pub async fn list_containers(
        &self,
        ctx: &RequestContext,
    ) -> Result<Vec<ContainerInfo>, ApiError> {
        self.get_collection(ctx, ApiRequest::get("containers")).await
    }

    pub async fn create_container(
        &self,
        ctx: &RequestContext,
        spec: &NewContainer,
    ) -> Result<(), ApiError> {
        require(&spec.image, "Image is required")?;
        self.post(ctx, "containers/create", spec).await
    }

    pub async fn container_action(
        &self,
        ctx: &RequestContext,
        id: &str,
        action: ContainerAction,
    ) -> Result<(), ApiError> {
        info!("Container {} -> {}", id, action.verb());
        self.post_empty(ctx, &format!("containers/{id}/{}", action.verb()))
            .await
    }

    pub async fn remove_container(&self, ctx: &RequestContext, id: &str) -> Result<(), ApiError> {
        self.delete(ctx, ApiRequest::delete(format!("containers/{id}/remove")))
            .await
    }

    pub async fn rename_container(
        &self,
        ctx: &RequestContext,
        id: &str,
        name: &str,
    ) -> Result<(), ApiError> {
        require(name, "New name is required")?;
        self.post(ctx, &format!("containers/{id}/rename"), &json!({ "name": name }))
            .await
    }

    pub async fn list_images(&self, ctx: &RequestContext) -> Result<Vec<ImageInfo>, ApiError> {
        self.get_collection(ctx, ApiRequest::get("images")).await
    }

    pub async fn pull_image(&self, ctx: &RequestContext, image: &str) -> Result<(), ApiError> {
        require(image, "Image name is required")?;
        info!("Pulling image {}", image);
        self.post(ctx, "images/pull", &json!({ "image": image }))
            .await
    }

    pub async fn remove_image(&self, ctx: &RequestContext, id: &str) -> Result<(), ApiError> {
        self.delete(
            ctx,
            ApiRequest::delete(format!("images/{id}/remove")).query("force", true),
        )
        .await
    }

    pub async fn list_volumes(&self, ctx: &RequestContext) -> Result<Vec<VolumeInfo>, ApiError> {
        self.get_collection(ctx, ApiRequest::get("volumes")).await
    }

    pub async fn create_volume(
        &self,
        ctx: &RequestContext,
        volume: &NewVolume,
    ) -> Result<(), ApiError> {
        require(&volume.name, "Volume name is required")?;
        self.post(ctx, "volumes/create", volume).await
    }

    pub async fn remove_volume(&self, ctx: &RequestContext, name: &str) -> Result<(), ApiError> {
        self.delete(ctx, ApiRequest::delete(format!("volumes/{name}/remove")))
            .await
    }

    pub async fn list_networks(
        &self,
        ctx: &RequestContext,
    ) -> Result<Vec<NetworkInfo>, ApiError> {
        self.get_collection(ctx, ApiRequest::get("networks")).await
    }

    pub async fn create_network(
        &self,
        ctx: &RequestContext,
        network: &NewNetwork,
    ) -> Result<(), ApiError> {
        require(&network.name, "Network name is required")?;
        self.post(ctx, "networks/create", network).await
    }

    pub async fn remove_network(&self, ctx: &RequestContext, id: &str) -> Result<(), ApiError> {
        self.delete(ctx, ApiRequest::delete(format!("networks/{id}/remove")))
            .await
    }

    pub async fn prune(&self, ctx: &RequestContext, target: PruneTarget) -> Result<(), ApiError> {
        info!("Pruning unused {}", target.segment());
        self.post_empty(ctx, &format!("{}/prune", target.segment()))
            .await
    }

    /// Raw inspect document for a container, image, volume or network, pretty-printed.
    pub async fn inspect(
        &self,
        ctx: &RequestContext,
        group: &str,
        id: &str,
    ) -> Result<String, ApiError> {
        let document: Value = self
            .get_json(ctx, &format!("{group}/{id}/inspect"))
            .await?;
        Ok(serde_json::to_string_pretty(&document)?)
    }

    pub async fn activity_logs(&self, ctx: &RequestContext) -> Result<Vec<ActivityLog>, ApiError> {
        self.get_collection(ctx, ApiRequest::get("logs")).await
    }

    pub async fn docker_info(&self, ctx: &RequestContext) -> Result<Value, ApiError> {
        self.get_json(ctx, "info").await
    }
}
