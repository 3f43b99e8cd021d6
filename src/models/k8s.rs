// ABOUTME: Kubernetes objects proxied by the backend, kept mostly as raw JSON with typed metadata
// Column values are derived from spec/status the same way kubectl summarises them

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub ip_address: String,
    #[serde(default)]
    pub status: String,
}

/// Counters are reported as trimmed command output, so they stay strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterInfo {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub node_count: String,
    #[serde(default)]
    pub pod_count: String,
    #[serde(default)]
    pub ns_count: String,
}

impl ClusterInfo {
    pub fn counter(value: &str) -> &str {
        if value.is_empty() {
            "-"
        } else {
            value
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default)]
    pub creation_timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub labels: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct K8sObject {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: Value,
    #[serde(default)]
    pub status: Value,
}

impl K8sObject {
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn namespace(&self) -> Option<&str> {
        self.metadata.namespace.as_deref()
    }

    pub fn age(&self, now: DateTime<Utc>) -> String {
        format_age(self.metadata.creation_timestamp, now)
    }

    pub fn phase(&self) -> String {
        self.status
            .get("phase")
            .and_then(Value::as_str)
            .unwrap_or("Unknown")
            .to_string()
    }

    pub fn restart_count(&self) -> u64 {
        container_statuses(&self.status)
            .iter()
            .filter_map(|status| status.get("restartCount").and_then(Value::as_u64))
            .sum()
    }

    /// `ready/desired` for workload controllers.
    pub fn ready_replicas(&self) -> String {
        let desired = self
            .spec
            .get("replicas")
            .and_then(Value::as_u64)
            .or_else(|| {
                self.status
                    .get("desiredNumberScheduled")
                    .and_then(Value::as_u64)
            })
            .unwrap_or(0);
        let ready = self
            .status
            .get("readyReplicas")
            .or_else(|| self.status.get("numberReady"))
            .and_then(Value::as_u64)
            .unwrap_or(0);
        format!("{ready}/{desired}")
    }

    pub fn node_ready(&self) -> bool {
        self.status
            .get("conditions")
            .and_then(Value::as_array)
            .map_or(false, |conditions| {
                conditions.iter().any(|c| {
                    c.get("type").and_then(Value::as_str) == Some("Ready")
                        && c.get("status").and_then(Value::as_str) == Some("True")
                })
            })
    }

    pub fn node_roles(&self) -> String {
        let mut roles: Vec<&str> = self
            .metadata
            .labels
            .keys()
            .filter_map(|key| key.strip_prefix("node-role.kubernetes.io/"))
            .collect();
        roles.sort_unstable();
        if roles.is_empty() {
            "worker".to_string()
        } else {
            roles.join(", ")
        }
    }

    pub fn kubelet_version(&self) -> String {
        self.status
            .pointer("/nodeInfo/kubeletVersion")
            .and_then(Value::as_str)
            .unwrap_or("-")
            .to_string()
    }

    pub fn service_type(&self) -> String {
        string_at(&self.spec, "type")
    }

    pub fn cluster_ip(&self) -> String {
        string_at(&self.spec, "clusterIP")
    }

    pub fn service_ports(&self) -> String {
        self.spec
            .get("ports")
            .and_then(Value::as_array)
            .map(|ports| {
                ports
                    .iter()
                    .map(|port| {
                        let number = port.get("port").map(value_text).unwrap_or_default();
                        let protocol = port
                            .get("protocol")
                            .and_then(Value::as_str)
                            .unwrap_or("TCP");
                        match port.get("targetPort") {
                            Some(target) => {
                                format!("{number}:{}/{protocol}", value_text(target))
                            }
                            None => format!("{number}/{protocol}"),
                        }
                    })
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default()
    }

    pub fn ingress_hosts(&self) -> String {
        self.spec
            .get("rules")
            .and_then(Value::as_array)
            .map(|rules| {
                rules
                    .iter()
                    .filter_map(|rule| rule.get("host").and_then(Value::as_str))
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .filter(|hosts| !hosts.is_empty())
            .unwrap_or_else(|| "*".to_string())
    }
}

fn container_statuses(status: &Value) -> Vec<Value> {
    status
        .get("containerStatuses")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

fn string_at(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or("-")
        .to_string()
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Minutes below an hour, hours below a day, days otherwise.
pub fn format_age(created: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(created) = created else {
        return "-".to_string();
    };
    let minutes = (now - created).num_minutes().max(0);
    if minutes < 60 {
        return format!("{minutes}m");
    }
    let hours = minutes / 60;
    if hours < 24 {
        return format!("{hours}h");
    }
    format!("{}d", hours / 24)
}

/// Namespace dropdown value. `All` maps to `?namespace=all` on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum NamespaceFilter {
    #[default]
    All,
    Named(String),
}

impl NamespaceFilter {
    pub fn as_query(&self) -> &str {
        match self {
            Self::All => "all",
            Self::Named(name) => name,
        }
    }

    /// Namespace to use when creating something while this filter is active.
    pub fn for_create(&self) -> &str {
        match self {
            Self::All => "default",
            Self::Named(name) => name,
        }
    }
}

impl fmt::Display for NamespaceFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "All Namespaces"),
            Self::Named(name) => write!(f, "{name}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn pod() -> K8sObject {
        serde_json::from_value(json!({
            "metadata": {
                "name": "web-1",
                "namespace": "default",
                "creationTimestamp": "2026-10-17T10:00:00Z"
            },
            "spec": {"containers": [{"name": "web"}]},
            "status": {
                "phase": "Running",
                "containerStatuses": [{"restartCount": 2}, {"restartCount": 1}]
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_pod_summary_fields() {
        let pod = pod();
        assert_eq!(pod.name(), "web-1");
        assert_eq!(pod.namespace(), Some("default"));
        assert_eq!(pod.phase(), "Running");
        assert_eq!(pod.restart_count(), 3);
    }

    #[test]
    fn test_age_buckets() {
        let created = Utc.with_ymd_and_hms(2026, 10, 17, 10, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2026, 10, 17, 10, 42, 0).unwrap();
        assert_eq!(format_age(Some(created), now), "42m");
        let now = Utc.with_ymd_and_hms(2026, 10, 17, 15, 0, 0).unwrap();
        assert_eq!(format_age(Some(created), now), "5h");
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 11, 0, 0).unwrap();
        assert_eq!(format_age(Some(created), now), "2d");
        assert_eq!(format_age(None, now), "-");
    }

    #[test]
    fn test_service_ports_and_node_roles() {
        let service: K8sObject = serde_json::from_value(json!({
            "metadata": {"name": "api"},
            "spec": {"type": "ClusterIP", "clusterIP": "10.0.0.7",
                     "ports": [{"port": 80, "targetPort": 8080, "protocol": "TCP"}]}
        }))
        .unwrap();
        assert_eq!(service.service_ports(), "80:8080/TCP");
        assert_eq!(service.cluster_ip(), "10.0.0.7");

        let node: K8sObject = serde_json::from_value(json!({
            "metadata": {"name": "n1", "labels": {"node-role.kubernetes.io/control-plane": ""}},
            "status": {"conditions": [{"type": "Ready", "status": "True"}]}
        }))
        .unwrap();
        assert!(node.node_ready());
        assert_eq!(node.node_roles(), "control-plane");
    }
}
