// ABOUTME: What an exec session attaches to and the WebSocket URL for it

use url::Url;

use super::error::SessionError;
use crate::api::RequestContext;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecTarget {
    Container {
        id: String,
        name: String,
    },
    Pod {
        cluster_id: i64,
        pod: String,
        namespace: String,
        container: Option<String>,
    },
}

impl ExecTarget {
    pub fn title(&self) -> String {
        match self {
            Self::Container { name, .. } => format!("Container: {name}"),
            Self::Pod { pod, namespace, .. } => format!("Pod: {namespace}/{pod}"),
        }
    }

    /// `http(s)://server` becomes `ws(s)://server/api/...`. Pod sessions pass the
    /// token in the query string as well, since that endpoint reads it from there.
    pub fn url(
        &self,
        base_url: &str,
        shell: &str,
        ctx: &RequestContext,
    ) -> Result<Url, SessionError> {
        let mut url = Url::parse(base_url)?;
        let scheme = match url.scheme() {
            "http" | "ws" => "ws",
            "https" | "wss" => "wss",
            other => return Err(SessionError::InvalidUrl(format!("unsupported scheme {other}"))),
        };
        url.set_scheme(scheme)
            .map_err(|()| SessionError::InvalidUrl(base_url.to_string()))?;

        let prefix = url.path().trim_end_matches('/').to_string();
        match self {
            Self::Container { id, .. } => {
                url.set_path(&format!("{prefix}/api/containers/{id}/exec"));
            }
            Self::Pod {
                cluster_id,
                pod,
                namespace,
                container,
            } => {
                url.set_path(&format!(
                    "{prefix}/api/k0s/clusters/{cluster_id}/k8s/pods/{pod}/exec"
                ));
                let mut query = url.query_pairs_mut();
                query.append_pair("namespace", namespace);
                query.append_pair("shell", shell);
                if let Some(container) = container {
                    query.append_pair("container", container);
                }
                query.append_pair("token", ctx.token().unwrap_or_default());
            }
        }
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_url() {
        let target = ExecTarget::Container {
            id: "abc123".to_string(),
            name: "web".to_string(),
        };
        let url = target
            .url("https://console.local", "sh", &RequestContext::default())
            .unwrap();
        assert_eq!(url.as_str(), "wss://console.local/api/containers/abc123/exec");
    }

    #[test]
    fn test_pod_url_carries_namespace_shell_and_token() {
        let target = ExecTarget::Pod {
            cluster_id: 3,
            pod: "web-1".to_string(),
            namespace: "prod".to_string(),
            container: None,
        };
        let ctx = RequestContext::new(1, Some("t k".to_string()));
        let url = target.url("http://localhost:8080", "bash", &ctx).unwrap();
        assert_eq!(
            url.as_str(),
            "ws://localhost:8080/api/k0s/clusters/3/k8s/pods/web-1/exec?namespace=prod&shell=bash&token=t+k"
        );
    }

    #[test]
    fn test_unsupported_scheme_is_rejected() {
        let target = ExecTarget::Container {
            id: "a".to_string(),
            name: "a".to_string(),
        };
        assert!(target
            .url("ftp://host", "sh", &RequestContext::default())
            .is_err());
    }
}
