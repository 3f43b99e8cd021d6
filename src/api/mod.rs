// ABOUTME: HTTP client for the management backend
// Every call flows ApiClient -> MiddlewareChain -> Transport

pub mod admin;
pub mod client;
pub mod context;
pub mod docker;
pub mod error;
pub mod fanout;
pub mod k8s;
pub mod lb;
pub mod middleware;
pub mod transport;

pub use client::ApiClient;
pub use context::{RequestContext, DEFAULT_HOST_ID};
pub use docker::{ContainerAction, PruneTarget};
pub use error::ApiError;
pub use middleware::{
    BearerAuth, HostHeader, Middleware, MiddlewareChain, UnauthorizedGuard, HOST_HEADER,
};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Method, Transport};
