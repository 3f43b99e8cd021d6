// ABOUTME: Kubernetes endpoints proxied by the backend under k0s/clusters/{id}/k8s
// Manifests are posted as YAML text and applied server-side

use serde_json::json;
use tracing::info;

use super::client::ApiClient;
use super::context::RequestContext;
use super::error::ApiError;
use super::transport::ApiRequest;
use crate::models::{Cluster, ClusterInfo, K8sObject, NamespaceFilter, ResourceKind};

fn cluster_path(cluster_id: i64, rest: &str) -> String {
    format!("k0s/clusters/{cluster_id}/k8s/{rest}")
}

fn segment(kind: ResourceKind) -> Result<&'static str, ApiError> {
    kind.k8s_segment()
        .ok_or_else(|| ApiError::Validation(format!("{} is not a Kubernetes resource", kind.label())))
}

impl ApiClient {
    pub async fn list_clusters(&self, ctx: &RequestContext) -> Result<Vec<Cluster>, ApiError> {
        self.get_collection(ctx, ApiRequest::get("k0s/clusters"))
            .await
    }

    pub async fn get_cluster(
        &self,
        ctx: &RequestContext,
        cluster_id: i64,
    ) -> Result<Cluster, ApiError> {
        self.get_json(ctx, &format!("k0s/clusters/{cluster_id}"))
            .await
    }

    pub async fn cluster_info(
        &self,
        ctx: &RequestContext,
        cluster_id: i64,
    ) -> Result<ClusterInfo, ApiError> {
        self.get_json(ctx, &cluster_path(cluster_id, "info")).await
    }

    pub async fn list_namespaces(
        &self,
        ctx: &RequestContext,
        cluster_id: i64,
    ) -> Result<Vec<String>, ApiError> {
        let namespaces: Vec<K8sObject> = self
            .get_collection(ctx, ApiRequest::get(cluster_path(cluster_id, "namespaces")))
            .await?;
        Ok(namespaces
            .into_iter()
            .map(|ns| ns.metadata.name)
            .collect())
    }

    pub async fn create_namespace(
        &self,
        ctx: &RequestContext,
        cluster_id: i64,
        name: &str,
    ) -> Result<(), ApiError> {
        if name.trim().is_empty() {
            return Err(ApiError::Validation("Namespace name is required".to_string()));
        }
        self.post(
            ctx,
            &cluster_path(cluster_id, "namespaces"),
            &json!({ "name": name }),
        )
        .await
    }

    pub async fn list_k8s(
        &self,
        ctx: &RequestContext,
        cluster_id: i64,
        kind: ResourceKind,
        namespace: &NamespaceFilter,
    ) -> Result<Vec<K8sObject>, ApiError> {
        let mut request = ApiRequest::get(cluster_path(cluster_id, segment(kind)?));
        if kind.is_namespaced() {
            request = request.query("namespace", namespace.as_query());
        }
        self.get_collection(ctx, request).await
    }

    /// Full object as pretty-printed JSON, for the detail overlay.
    pub async fn get_k8s(
        &self,
        ctx: &RequestContext,
        cluster_id: i64,
        kind: ResourceKind,
        name: &str,
        namespace: Option<&str>,
    ) -> Result<String, ApiError> {
        let mut request = ApiRequest::get(cluster_path(
            cluster_id,
            &format!("{}/{name}", segment(kind)?),
        ));
        if let Some(ns) = namespace {
            request = request.query("namespace", ns);
        }
        let document: serde_json::Value = self.fetch_json(ctx, request).await?;
        Ok(serde_json::to_string_pretty(&document)?)
    }

    pub async fn delete_k8s(
        &self,
        ctx: &RequestContext,
        cluster_id: i64,
        kind: ResourceKind,
        name: &str,
        namespace: Option<&str>,
    ) -> Result<(), ApiError> {
        info!("Deleting {} {} from cluster {}", kind.label(), name, cluster_id);
        let mut request = ApiRequest::delete(cluster_path(
            cluster_id,
            &format!("{}/{name}", segment(kind)?),
        ));
        if let Some(ns) = namespace {
            request = request.query("namespace", ns);
        }
        self.delete(ctx, request).await
    }

    /// Applies a manifest and returns the backend's textual output.
    pub async fn apply_manifest(
        &self,
        ctx: &RequestContext,
        cluster_id: i64,
        yaml: &str,
    ) -> Result<String, ApiError> {
        if yaml.trim().is_empty() {
            return Err(ApiError::Validation("YAML body is empty".to_string()));
        }
        info!("Applying manifest to cluster {}", cluster_id);
        let request =
            ApiRequest::post(cluster_path(cluster_id, "apply")).json(&json!({ "yaml": yaml }))?;
        self.get_text(ctx, request).await
    }

    pub async fn pod_logs(
        &self,
        ctx: &RequestContext,
        cluster_id: i64,
        pod: &str,
        namespace: &str,
        tail: Option<u32>,
    ) -> Result<String, ApiError> {
        let mut request = ApiRequest::get(cluster_path(cluster_id, &format!("pods/{pod}/logs")))
            .query("namespace", namespace);
        if let Some(tail) = tail {
            request = request.query("tail", tail);
        }
        self.get_text(ctx, request).await
    }

    pub async fn describe_pod(
        &self,
        ctx: &RequestContext,
        cluster_id: i64,
        pod: &str,
        namespace: &str,
    ) -> Result<String, ApiError> {
        let request = ApiRequest::get(cluster_path(cluster_id, &format!("pods/{pod}/describe")))
            .query("namespace", namespace);
        self.get_text(ctx, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::transport::{ApiResponse, MockTransport};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_list_k8s_passes_namespace_for_namespaced_kinds() {
        let mut transport = MockTransport::new();
        transport
            .expect_execute()
            .withf(|request| {
                request.path == "k0s/clusters/2/k8s/pods"
                    && request.query_value("namespace") == Some("all")
            })
            .times(1)
            .returning(|_| {
                Ok(ApiResponse::new(
                    200,
                    r#"{"items":[{"metadata":{"name":"web-1","namespace":"default"}}]}"#,
                ))
            });

        let client = ApiClient::new(Arc::new(transport));
        let pods = client
            .list_k8s(
                &RequestContext::default(),
                2,
                ResourceKind::Pods,
                &NamespaceFilter::All,
            )
            .await
            .unwrap();
        assert_eq!(pods.len(), 1);
        assert_eq!(pods[0].name(), "web-1");
    }

    #[tokio::test]
    async fn test_nodes_are_listed_without_namespace() {
        let mut transport = MockTransport::new();
        transport
            .expect_execute()
            .withf(|request| request.query.is_empty())
            .returning(|_| Ok(ApiResponse::new(200, "null")));

        let client = ApiClient::new(Arc::new(transport));
        let nodes = client
            .list_k8s(
                &RequestContext::default(),
                2,
                ResourceKind::Nodes,
                &NamespaceFilter::Named("prod".to_string()),
            )
            .await
            .unwrap();
        assert!(nodes.is_empty());
    }

    #[tokio::test]
    async fn test_empty_manifest_is_rejected_before_sending() {
        let transport = MockTransport::new();
        let client = ApiClient::new(Arc::new(transport));
        let err = client
            .apply_manifest(&RequestContext::default(), 1, "   ")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }
}
