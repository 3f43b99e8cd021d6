// ABOUTME: Uniform table row built from any backend model, plus per-model conversions

use chrono::{DateTime, Utc};

use super::list_state::Searchable;
use crate::models::{
    ActivityLog, Cluster, ContainerInfo, Host, ImageInfo, K8sObject, LbRoute, NetworkInfo,
    Project, ResourceKind, User, VolumeInfo,
};

/// Colour hint for the status cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowStatus {
    Good,
    Warning,
    Bad,
    #[default]
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRow {
    /// Identifier used in API paths (container id, volume name, user id...).
    pub key: String,
    pub name: String,
    pub namespace: Option<String>,
    pub category: String,
    pub cells: Vec<String>,
    pub status: RowStatus,
}

impl ResourceRow {
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            namespace: None,
            category: String::new(),
            cells: Vec::new(),
            status: RowStatus::Neutral,
        }
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    #[must_use]
    pub fn cells(mut self, cells: Vec<String>) -> Self {
        self.cells = cells;
        self
    }

    #[must_use]
    pub fn status(mut self, status: RowStatus) -> Self {
        self.status = status;
        self
    }
}

impl Searchable for ResourceRow {
    fn primary_name(&self) -> &str {
        &self.name
    }

    fn category(&self) -> &str {
        &self.category
    }
}

pub trait TableRow {
    fn to_row(&self, now: DateTime<Utc>) -> ResourceRow;
}

impl TableRow for ContainerInfo {
    fn to_row(&self, _now: DateTime<Utc>) -> ResourceRow {
        let status = match self.state.as_str() {
            "running" => RowStatus::Good,
            "paused" | "restarting" | "created" => RowStatus::Warning,
            "exited" | "dead" => RowStatus::Bad,
            _ => RowStatus::Neutral,
        };
        ResourceRow::new(&self.id, self.display_name())
            .category(&self.image)
            .cells(vec![
                self.display_name(),
                self.image.clone(),
                self.state.clone(),
                self.status.clone(),
                self.ports.join(", "),
            ])
            .status(status)
    }
}

impl TableRow for ImageInfo {
    fn to_row(&self, _now: DateTime<Utc>) -> ResourceRow {
        ResourceRow::new(&self.id, &self.repository)
            .category(&self.tag)
            .cells(vec![
                self.repository.clone(),
                self.tag.clone(),
                self.short_id(),
                self.human_size(),
            ])
    }
}

impl TableRow for VolumeInfo {
    fn to_row(&self, _now: DateTime<Utc>) -> ResourceRow {
        ResourceRow::new(&self.name, &self.name)
            .category(&self.driver)
            .cells(vec![
                self.name.clone(),
                self.driver.clone(),
                self.scope.clone(),
                self.mountpoint.clone(),
            ])
    }
}

impl TableRow for NetworkInfo {
    fn to_row(&self, _now: DateTime<Utc>) -> ResourceRow {
        ResourceRow::new(&self.id, &self.name)
            .category(&self.driver)
            .cells(vec![
                self.name.clone(),
                self.driver.clone(),
                self.scope.clone(),
                if self.internal { "yes" } else { "no" }.to_string(),
            ])
    }
}

impl TableRow for Host {
    fn to_row(&self, _now: DateTime<Utc>) -> ResourceRow {
        ResourceRow::new(self.id.to_string(), &self.name)
            .category(&self.uri)
            .cells(vec![self.id.to_string(), self.name.clone(), self.uri.clone()])
    }
}

impl TableRow for ActivityLog {
    fn to_row(&self, _now: DateTime<Utc>) -> ResourceRow {
        let status = if self.status.eq_ignore_ascii_case("success") {
            RowStatus::Good
        } else if self.status.is_empty() {
            RowStatus::Neutral
        } else {
            RowStatus::Bad
        };
        ResourceRow::new(self.id.to_string(), &self.action)
            .category(&self.target)
            .cells(vec![
                self.timestamp.clone(),
                self.action.clone(),
                self.target.clone(),
                self.status.clone(),
            ])
            .status(status)
    }
}

impl TableRow for User {
    fn to_row(&self, _now: DateTime<Utc>) -> ResourceRow {
        let status = if self.is_admin() {
            RowStatus::Good
        } else {
            RowStatus::Neutral
        };
        ResourceRow::new(self.id.to_string(), &self.username)
            .category(&self.role)
            .cells(vec![
                self.username.clone(),
                self.roles().join(", "),
                self.created_at.clone(),
            ])
            .status(status)
    }
}

impl TableRow for Project {
    fn to_row(&self, _now: DateTime<Utc>) -> ResourceRow {
        ResourceRow::new(self.id.to_string(), &self.name)
            .category(&self.description)
            .cells(vec![
                self.id.to_string(),
                self.name.clone(),
                self.description.clone(),
            ])
    }
}

impl TableRow for LbRoute {
    fn to_row(&self, _now: DateTime<Utc>) -> ResourceRow {
        ResourceRow::new(self.id.to_string(), &self.domain)
            .category(&self.target_type)
            .cells(vec![
                self.domain.clone(),
                self.target(),
                self.target_type.clone(),
            ])
    }
}

impl TableRow for Cluster {
    fn to_row(&self, _now: DateTime<Utc>) -> ResourceRow {
        let status = if self.status == "running" {
            RowStatus::Good
        } else {
            RowStatus::Warning
        };
        ResourceRow::new(self.id.to_string(), &self.name)
            .category(&self.status)
            .cells(vec![
                self.id.to_string(),
                self.name.clone(),
                self.ip_address.clone(),
                self.status.clone(),
            ])
            .status(status)
    }
}

/// Kubernetes objects share one model, so the kind decides the columns.
pub fn k8s_row(kind: ResourceKind, object: &K8sObject, now: DateTime<Utc>) -> ResourceRow {
    let name = object.name().to_string();
    let namespace = object.namespace().unwrap_or_default().to_string();
    let age = object.age(now);

    let (cells, status) = match kind {
        ResourceKind::Nodes => {
            let ready = object.node_ready();
            (
                vec![
                    name.clone(),
                    if ready { "Ready" } else { "NotReady" }.to_string(),
                    object.node_roles(),
                    object.kubelet_version(),
                    age,
                ],
                if ready { RowStatus::Good } else { RowStatus::Bad },
            )
        }
        ResourceKind::Pods => {
            let phase = object.phase();
            let status = match phase.as_str() {
                "Running" | "Succeeded" => RowStatus::Good,
                "Pending" => RowStatus::Warning,
                _ => RowStatus::Bad,
            };
            (
                vec![
                    name.clone(),
                    namespace.clone(),
                    phase,
                    object.restart_count().to_string(),
                    age,
                ],
                status,
            )
        }
        ResourceKind::Deployments | ResourceKind::StatefulSets | ResourceKind::DaemonSets => {
            let ready = object.ready_replicas();
            let status = match ready.split_once('/') {
                Some((have, want)) if have == want => RowStatus::Good,
                Some(("0", _)) => RowStatus::Bad,
                _ => RowStatus::Warning,
            };
            (vec![name.clone(), namespace.clone(), ready, age], status)
        }
        ResourceKind::Services => (
            vec![
                name.clone(),
                namespace.clone(),
                object.service_type(),
                object.cluster_ip(),
                object.service_ports(),
            ],
            RowStatus::Neutral,
        ),
        ResourceKind::Ingresses => (
            vec![name.clone(), namespace.clone(), object.ingress_hosts(), age],
            RowStatus::Neutral,
        ),
        ResourceKind::Namespaces => {
            let phase = object
                .status
                .get("phase")
                .and_then(serde_json::Value::as_str)
                .unwrap_or("Active")
                .to_string();
            let status = if phase == "Active" {
                RowStatus::Good
            } else {
                RowStatus::Warning
            };
            (vec![name.clone(), phase, age], status)
        }
        _ => (
            vec![name.clone(), namespace.clone(), age],
            RowStatus::Neutral,
        ),
    };

    let mut row = ResourceRow::new(&name, &name)
        .category(&namespace)
        .cells(cells)
        .status(status);
    if !namespace.is_empty() {
        row.namespace = Some(namespace);
    }
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_container_row_searches_by_image() {
        let container: ContainerInfo = serde_json::from_value(json!({
            "id": "c7", "name": "/web-1", "image": "nginx:1.25", "state": "running"
        }))
        .unwrap();
        let row = container.to_row(Utc::now());
        assert_eq!(row.key, "c7");
        assert_eq!(row.name, "web-1");
        assert_eq!(row.category, "nginx:1.25");
        assert_eq!(row.status, RowStatus::Good);
    }

    #[test]
    fn test_deployment_row_ready_column() {
        let deployment: K8sObject = serde_json::from_value(json!({
            "metadata": {"name": "api", "namespace": "prod"},
            "spec": {"replicas": 3},
            "status": {"readyReplicas": 2}
        }))
        .unwrap();
        let row = k8s_row(ResourceKind::Deployments, &deployment, Utc::now());
        assert_eq!(row.cells[2], "2/3");
        assert_eq!(row.status, RowStatus::Warning);
        assert_eq!(row.namespace.as_deref(), Some("prod"));
        assert_eq!(row.cells.len(), ResourceKind::Deployments.columns().len());
    }
}
