// ABOUTME: Docker host resources as the backend reports them (hosts, containers, images, volumes, networks)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Host {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub created_at: String,
}

impl Host {
    /// The built-in local host cannot be removed.
    pub fn is_default(&self) -> bool {
        self.id == 1
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerInfo {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub created: i64,
    #[serde(default)]
    pub ports: Vec<String>,
    #[serde(default)]
    pub labels: HashMap<String, String>,
}

impl ContainerInfo {
    pub fn is_running(&self) -> bool {
        self.state == "running"
    }

    /// Name without the leading slash Docker puts on container names,
    /// falling back to the short id.
    pub fn display_name(&self) -> String {
        let trimmed = self.name.trim_start_matches('/');
        if trimmed.is_empty() {
            self.id.chars().take(12).collect()
        } else {
            trimmed.to_string()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInfo {
    pub id: String,
    #[serde(default)]
    pub repository: String,
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub size: i64,
    #[serde(default)]
    pub created: i64,
}

impl ImageInfo {
    pub fn short_id(&self) -> String {
        self.id
            .trim_start_matches("sha256:")
            .chars()
            .take(12)
            .collect()
    }

    pub fn human_size(&self) -> String {
        human_bytes(self.size)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeInfo {
    pub name: String,
    #[serde(default)]
    pub driver: String,
    #[serde(default)]
    pub mountpoint: String,
    #[serde(default)]
    pub created: String,
    #[serde(default)]
    pub labels: HashMap<String, String>,
    #[serde(default)]
    pub scope: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkInfo {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub driver: String,
    #[serde(default)]
    pub scope: String,
    #[serde(default)]
    pub created: String,
    #[serde(default)]
    pub internal: bool,
    #[serde(default)]
    pub labels: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityLog {
    pub id: i64,
    pub action: String,
    #[serde(default)]
    pub target: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub status: String,
}

/// Header counters shown above every table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardStats {
    pub total_containers: usize,
    pub running_containers: usize,
    pub images: usize,
    pub volumes: usize,
    pub networks: usize,
}

/// A container tagged with the host it was fetched from, used by cross-host pickers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostedContainer {
    pub host_id: i64,
    pub host_name: String,
    pub container: ContainerInfo,
}

impl HostedContainer {
    /// Value used when assigning the container to a project: `hostId:containerName`.
    pub fn assignment_key(&self) -> String {
        format!("{}:{}", self.host_id, self.container.display_name())
    }

    pub fn label(&self) -> String {
        format!("[{}] {}", self.host_name, self.container.display_name())
    }
}

/// Body of `POST containers/create`. Empty optional fields fall back to backend defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NewContainer {
    pub name: String,
    pub image: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub volumes: Vec<String>,
    #[serde(rename = "restartPolicy", skip_serializing_if = "String::is_empty")]
    pub restart_policy: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NewVolume {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub driver: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NewNetwork {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub driver: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub subnet: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NewHost {
    pub name: String,
    pub uri: String,
}

pub(crate) fn human_bytes(size: i64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    #[allow(clippy::cast_precision_loss)]
    let mut value = size.max(0) as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", size.max(0), UNITS[0])
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_display_name_strips_slash() {
        let container: ContainerInfo =
            serde_json::from_str(r#"{"id":"abcdef0123456789","name":"/web-1"}"#).unwrap();
        assert_eq!(container.display_name(), "web-1");

        let unnamed: ContainerInfo = serde_json::from_str(r#"{"id":"abcdef0123456789"}"#).unwrap();
        assert_eq!(unnamed.display_name(), "abcdef012345");
    }

    #[test]
    fn test_human_bytes() {
        assert_eq!(human_bytes(512), "512 B");
        assert_eq!(human_bytes(1536), "1.5 KB");
        assert_eq!(human_bytes(142 * 1024 * 1024), "142.0 MB");
    }
}
