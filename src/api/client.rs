// ABOUTME: ApiClient sends requests through the middleware chain and decodes responses
// Endpoint groups (docker, k8s, admin, lb) are implemented as extra impl blocks

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::context::RequestContext;
use super::error::ApiError;
use super::middleware::MiddlewareChain;
use super::transport::{ApiRequest, ApiResponse, HttpTransport, Transport};

/// List endpoints answer with `{"items": [...]}`, a bare array, or `null`.
#[derive(Deserialize)]
#[serde(untagged, bound(deserialize = "T: Deserialize<'de>"))]
enum Collection<T> {
    Bare(Vec<T>),
    Wrapped {
        #[serde(default)]
        items: Option<Vec<T>>,
    },
}

#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    chain: MiddlewareChain,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self::with_chain(transport, MiddlewareChain::standard())
    }

    pub fn with_chain(transport: Arc<dyn Transport>, chain: MiddlewareChain) -> Self {
        Self { transport, chain }
    }

    pub fn http(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        Ok(Self::new(Arc::new(HttpTransport::new(base_url, timeout)?)))
    }

    pub fn chain(&self) -> &MiddlewareChain {
        &self.chain
    }

    /// Runs the request and fails on anything outside 2xx.
    pub async fn send(
        &self,
        ctx: &RequestContext,
        request: ApiRequest,
    ) -> Result<ApiResponse, ApiError> {
        let request = self.chain.prepare(request, ctx);
        let method = request.method.as_str();
        let path = request.path.clone();

        let response = self.transport.execute(request.clone()).await?;
        self.chain.inspect(&request, &response)?;

        if !response.is_success() {
            warn!("{} {} failed with HTTP {}", method, path, response.status);
            return Err(ApiError::Status {
                status: response.status,
                body: response.body,
            });
        }
        debug!("{} {} -> {}", method, path, response.status);
        Ok(response)
    }

    pub async fn fetch_json<T: DeserializeOwned>(
        &self,
        ctx: &RequestContext,
        request: ApiRequest,
    ) -> Result<T, ApiError> {
        let response = self.send(ctx, request).await?;
        decode(&response.body)
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        ctx: &RequestContext,
        path: &str,
    ) -> Result<T, ApiError> {
        self.fetch_json(ctx, ApiRequest::get(path)).await
    }

    pub async fn get_collection<T: DeserializeOwned>(
        &self,
        ctx: &RequestContext,
        request: ApiRequest,
    ) -> Result<Vec<T>, ApiError> {
        let response = self.send(ctx, request).await?;
        decode_collection(&response.body)
    }

    pub async fn get_text(
        &self,
        ctx: &RequestContext,
        request: ApiRequest,
    ) -> Result<String, ApiError> {
        Ok(self.send(ctx, request).await?.body)
    }

    pub async fn post_json<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        ctx: &RequestContext,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.fetch_json(ctx, ApiRequest::post(path).json(body)?)
            .await
    }

    /// POST whose response body is ignored.
    pub async fn post<B: Serialize + Sync>(
        &self,
        ctx: &RequestContext,
        path: &str,
        body: &B,
    ) -> Result<(), ApiError> {
        self.send(ctx, ApiRequest::post(path).json(body)?)
            .await
            .map(|_| ())
    }

    pub async fn post_empty(&self, ctx: &RequestContext, path: &str) -> Result<(), ApiError> {
        self.send(ctx, ApiRequest::post(path)).await.map(|_| ())
    }

    pub async fn put_json<B: Serialize + Sync>(
        &self,
        ctx: &RequestContext,
        path: &str,
        body: &B,
    ) -> Result<(), ApiError> {
        self.send(ctx, ApiRequest::put(path).json(body)?)
            .await
            .map(|_| ())
    }

    pub async fn delete(&self, ctx: &RequestContext, request: ApiRequest) -> Result<(), ApiError> {
        self.send(ctx, request).await.map(|_| ())
    }
}

pub(crate) fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    Ok(serde_json::from_str(body)?)
}

pub(crate) fn decode_collection<T: DeserializeOwned>(body: &str) -> Result<Vec<T>, ApiError> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    let collection: Option<Collection<T>> = serde_json::from_str(body)?;
    Ok(match collection {
        Some(Collection::Bare(items)) | Some(Collection::Wrapped { items: Some(items) }) => items,
        Some(Collection::Wrapped { items: None }) | None => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::middleware::HOST_HEADER;
    use crate::api::transport::MockTransport;
    use crate::models::Host;

    #[test]
    fn test_collection_shapes() {
        let bare: Vec<i64> = decode_collection("[1,2]").unwrap();
        assert_eq!(bare, vec![1, 2]);
        let wrapped: Vec<i64> = decode_collection(r#"{"items":[3]}"#).unwrap();
        assert_eq!(wrapped, vec![3]);
        let null: Vec<i64> = decode_collection("null").unwrap();
        assert!(null.is_empty());
        let null_items: Vec<i64> = decode_collection(r#"{"items":null}"#).unwrap();
        assert!(null_items.is_empty());
    }

    #[tokio::test]
    async fn test_send_applies_chain_before_transport() {
        let mut transport = MockTransport::new();
        transport
            .expect_execute()
            .withf(|request| {
                request.path == "hosts" && request.header(HOST_HEADER) == Some("4")
            })
            .times(1)
            .returning(|_| Ok(ApiResponse::new(200, r#"[{"id":4,"name":"edge"}]"#)));

        let client = ApiClient::new(Arc::new(transport));
        let hosts: Vec<Host> = client
            .get_collection(&RequestContext::new(4, None), ApiRequest::get("hosts"))
            .await
            .unwrap();
        assert_eq!(hosts[0].name, "edge");
    }

    #[tokio::test]
    async fn test_non_success_keeps_body() {
        let mut transport = MockTransport::new();
        transport
            .expect_execute()
            .returning(|_| Ok(ApiResponse::new(500, "in use")));

        let client = ApiClient::new(Arc::new(transport));
        let err = client
            .delete(
                &RequestContext::default(),
                ApiRequest::delete("containers/7/remove"),
            )
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.to_string(), "in use");
    }
}
