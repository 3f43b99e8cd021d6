// ABOUTME: Resource kinds the console can list, with their labels, columns and API path segments

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    // Docker host resources
    Containers,
    Images,
    Volumes,
    Networks,
    Hosts,
    Activity,
    // Administration
    Users,
    Projects,
    LbRoutes,
    // Kubernetes
    Clusters,
    Nodes,
    Pods,
    Deployments,
    StatefulSets,
    DaemonSets,
    Jobs,
    Services,
    Ingresses,
    ConfigMaps,
    Secrets,
    PersistentVolumeClaims,
    Namespaces,
}

impl ResourceKind {
    pub const DOCKER: [Self; 6] = [
        Self::Containers,
        Self::Images,
        Self::Volumes,
        Self::Networks,
        Self::Hosts,
        Self::Activity,
    ];

    pub const ADMIN: [Self; 4] = [Self::Users, Self::Projects, Self::LbRoutes, Self::Clusters];

    pub const CLUSTER: [Self; 12] = [
        Self::Nodes,
        Self::Pods,
        Self::Deployments,
        Self::StatefulSets,
        Self::DaemonSets,
        Self::Jobs,
        Self::Services,
        Self::Ingresses,
        Self::ConfigMaps,
        Self::Secrets,
        Self::PersistentVolumeClaims,
        Self::Namespaces,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Containers => "Containers",
            Self::Images => "Images",
            Self::Volumes => "Volumes",
            Self::Networks => "Networks",
            Self::Hosts => "Hosts",
            Self::Activity => "Activity",
            Self::Users => "Users",
            Self::Projects => "Projects",
            Self::LbRoutes => "Load Balancer",
            Self::Clusters => "Clusters",
            Self::Nodes => "Nodes",
            Self::Pods => "Pods",
            Self::Deployments => "Deployments",
            Self::StatefulSets => "StatefulSets",
            Self::DaemonSets => "DaemonSets",
            Self::Jobs => "Jobs",
            Self::Services => "Services",
            Self::Ingresses => "Ingresses",
            Self::ConfigMaps => "ConfigMaps",
            Self::Secrets => "Secrets",
            Self::PersistentVolumeClaims => "PVCs",
            Self::Namespaces => "Namespaces",
        }
    }

    /// Path segment under `/k0s/clusters/{id}/k8s/` for Kubernetes kinds.
    pub fn k8s_segment(self) -> Option<&'static str> {
        let segment = match self {
            Self::Nodes => "nodes",
            Self::Pods => "pods",
            Self::Deployments => "deployments",
            Self::StatefulSets => "statefulsets",
            Self::DaemonSets => "daemonsets",
            Self::Jobs => "jobs",
            Self::Services => "services",
            Self::Ingresses => "ingresses",
            Self::ConfigMaps => "configmaps",
            Self::Secrets => "secrets",
            Self::PersistentVolumeClaims => "persistentvolumeclaims",
            Self::Namespaces => "namespaces",
            _ => return None,
        };
        Some(segment)
    }

    pub fn is_k8s(self) -> bool {
        self.k8s_segment().is_some()
    }

    /// Kinds that accept a `?namespace=` filter.
    pub fn is_namespaced(self) -> bool {
        matches!(
            self,
            Self::Pods
                | Self::Deployments
                | Self::StatefulSets
                | Self::DaemonSets
                | Self::Jobs
                | Self::Services
                | Self::Ingresses
                | Self::ConfigMaps
                | Self::Secrets
                | Self::PersistentVolumeClaims
        )
    }

    pub fn columns(self) -> &'static [&'static str] {
        match self {
            Self::Containers => &["Name", "Image", "State", "Status", "Ports"],
            Self::Images => &["Repository", "Tag", "Id", "Size"],
            Self::Volumes => &["Name", "Driver", "Scope", "Mountpoint"],
            Self::Networks => &["Name", "Driver", "Scope", "Internal"],
            Self::Hosts => &["Id", "Name", "URI"],
            Self::Activity => &["Time", "Action", "Target", "Status"],
            Self::Users => &["Username", "Roles", "Created"],
            Self::Projects => &["Id", "Name", "Description"],
            Self::LbRoutes => &["Domain", "Target", "Type"],
            Self::Clusters => &["Id", "Name", "Address", "Status"],
            Self::Nodes => &["Name", "Status", "Roles", "Version", "Age"],
            Self::Pods => &["Name", "Namespace", "Status", "Restarts", "Age"],
            Self::Deployments | Self::StatefulSets | Self::DaemonSets => {
                &["Name", "Namespace", "Ready", "Age"]
            }
            Self::Services => &["Name", "Namespace", "Type", "Cluster IP", "Ports"],
            Self::Ingresses => &["Name", "Namespace", "Hosts", "Age"],
            Self::Namespaces => &["Name", "Status", "Age"],
            Self::Jobs
            | Self::ConfigMaps
            | Self::Secrets
            | Self::PersistentVolumeClaims => &["Name", "Namespace", "Age"],
        }
    }

    /// Whether the kind supports a shell session from a row.
    pub fn supports_exec(self) -> bool {
        matches!(self, Self::Containers | Self::Pods)
    }

    pub fn supports_lifecycle(self) -> bool {
        matches!(self, Self::Containers)
    }

    pub fn supports_delete(self) -> bool {
        !matches!(self, Self::Activity | Self::Clusters | Self::Nodes)
    }
}
