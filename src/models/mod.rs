// ABOUTME: Core data models returned by the management backend and the resource kinds the console lists

pub mod admin;
pub mod docker;
pub mod k8s;
pub mod lb;
pub mod resource_kind;

pub use admin::{
    AuthResponse, NewUser, Project, ProjectDetail, ProjectMember, ProjectResource, User,
    UserUpdate,
};
pub use docker::{
    ActivityLog, ContainerInfo, DashboardStats, Host, HostedContainer, ImageInfo, NetworkInfo,
    NewContainer, NewHost, NewNetwork, NewVolume, VolumeInfo,
};
pub use k8s::{Cluster, ClusterInfo, K8sObject, NamespaceFilter, ObjectMeta};
pub use lb::{LbRoute, NewRoute, TraefikStatus};
pub use resource_kind::ResourceKind;
