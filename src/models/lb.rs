// ABOUTME: Load balancer (Traefik) routes and proxy status

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LbRoute {
    pub id: i64,
    pub domain: String,
    #[serde(default)]
    pub host_id: Option<i64>,
    #[serde(default)]
    pub container_name: String,
    #[serde(default)]
    pub container_port: u16,
    #[serde(default)]
    pub manual_ip: String,
    #[serde(default)]
    pub manual_port: u16,
    #[serde(default)]
    pub target_type: String,
}

impl LbRoute {
    pub fn target(&self) -> String {
        if self.target_type == "manual" {
            format!("{}:{}", self.manual_ip, self.manual_port)
        } else {
            format!("{}:{}", self.container_name, self.container_port)
        }
    }
}

/// Payload for `POST lb/routes`; only container targets are created from the console.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewRoute {
    pub domain: String,
    pub target_type: String,
    pub host_id: i64,
    pub container_name: String,
    pub container_port: u16,
}

impl NewRoute {
    pub fn container(domain: &str, host_id: i64, container_name: &str, port: u16) -> Self {
        Self {
            domain: domain.to_string(),
            target_type: "container".to_string(),
            host_id,
            container_name: container_name.to_string(),
            container_port: port,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraefikStatus {
    #[serde(default)]
    pub running: bool,
    #[serde(default)]
    pub container_id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub host_name: String,
    #[serde(default)]
    pub host_id: i64,
    #[serde(default)]
    pub ports: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_target_by_type() {
        let route: LbRoute = serde_json::from_str(
            r#"{"id":1,"domain":"app.local","host_id":null,"manual_ip":"10.0.0.2","manual_port":8080,"target_type":"manual"}"#,
        )
        .unwrap();
        assert_eq!(route.target(), "10.0.0.2:8080");
        assert_eq!(route.host_id, None);
    }
}
