// ABOUTME: Form models for creating Kubernetes objects and their YAML manifests
// The YAML is handed to the backend apply endpoint without further interpretation

use serde::Serialize;
use std::collections::BTreeMap;

use crate::api::ApiError;

const DEFAULT_NAMESPACE: &str = "default";

fn required(value: &str, message: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::Validation(message.to_string()));
    }
    Ok(())
}

fn or_default<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        fallback
    } else {
        trimmed
    }
}

fn to_yaml<T: Serialize>(manifest: &T) -> Result<String, ApiError> {
    serde_yaml::to_string(manifest).map_err(|err| ApiError::Decode(err.to_string()))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Manifest<S> {
    api_version: &'static str,
    kind: &'static str,
    metadata: Metadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    spec: Option<S>,
}

#[derive(Serialize)]
struct Metadata {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    labels: BTreeMap<String, String>,
}

fn app_labels(app: &str) -> BTreeMap<String, String> {
    BTreeMap::from([("app".to_string(), app.to_string())])
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentForm {
    pub name: String,
    pub namespace: String,
    pub image: String,
    pub replicas: u32,
    pub port: u16,
    pub cpu_request: String,
    pub cpu_limit: String,
    pub memory_request: String,
    pub memory_limit: String,
    /// `app` label; the name is used when left blank.
    pub label: String,
}

impl Default for DeploymentForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            image: String::new(),
            replicas: 1,
            port: 80,
            cpu_request: "100m".to_string(),
            cpu_limit: "100m".to_string(),
            memory_request: "128Mi".to_string(),
            memory_limit: "128Mi".to_string(),
            label: String::new(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeploymentSpec {
    replicas: u32,
    selector: Selector,
    template: PodTemplate,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Selector {
    match_labels: BTreeMap<String, String>,
}

#[derive(Serialize)]
struct PodTemplate {
    metadata: TemplateMetadata,
    spec: PodSpec,
}

#[derive(Serialize)]
struct TemplateMetadata {
    labels: BTreeMap<String, String>,
}

#[derive(Serialize)]
struct PodSpec {
    containers: Vec<ContainerSpec>,
}

#[derive(Serialize)]
struct ContainerSpec {
    name: String,
    image: String,
    ports: Vec<ContainerPort>,
    resources: Resources,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ContainerPort {
    container_port: u16,
}

#[derive(Serialize)]
struct Resources {
    requests: Quantities,
    limits: Quantities,
}

#[derive(Serialize)]
struct Quantities {
    cpu: String,
    memory: String,
}

impl DeploymentForm {
    pub fn validate(&self) -> Result<(), ApiError> {
        required(&self.name, "Deployment name is required")?;
        required(&self.image, "Docker image is required")
    }

    pub fn to_yaml(&self) -> Result<String, ApiError> {
        self.validate()?;
        let name = self.name.trim().to_string();
        let label = or_default(&self.label, &name).to_string();
        let manifest = Manifest {
            api_version: "apps/v1",
            kind: "Deployment",
            metadata: Metadata {
                name: name.clone(),
                namespace: Some(or_default(&self.namespace, DEFAULT_NAMESPACE).to_string()),
                labels: BTreeMap::new(),
            },
            spec: Some(DeploymentSpec {
                replicas: self.replicas.max(1),
                selector: Selector {
                    match_labels: app_labels(&label),
                },
                template: PodTemplate {
                    metadata: TemplateMetadata {
                        labels: app_labels(&label),
                    },
                    spec: PodSpec {
                        containers: vec![ContainerSpec {
                            name,
                            image: self.image.trim().to_string(),
                            ports: vec![ContainerPort {
                                container_port: self.port,
                            }],
                            resources: Resources {
                                requests: Quantities {
                                    cpu: or_default(&self.cpu_request, "100m").to_string(),
                                    memory: or_default(&self.memory_request, "128Mi").to_string(),
                                },
                                limits: Quantities {
                                    cpu: or_default(&self.cpu_limit, "100m").to_string(),
                                    memory: or_default(&self.memory_limit, "128Mi").to_string(),
                                },
                            },
                        }],
                    },
                },
            }),
        };
        to_yaml(&manifest)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceForm {
    pub name: String,
    pub namespace: String,
    pub service_type: String,
    pub selector: String,
    pub port: u16,
    pub target_port: u16,
    pub protocol: String,
}

impl Default for ServiceForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            service_type: "ClusterIP".to_string(),
            selector: String::new(),
            port: 80,
            target_port: 80,
            protocol: "TCP".to_string(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ServiceSpec {
    #[serde(rename = "type")]
    service_type: String,
    selector: BTreeMap<String, String>,
    ports: Vec<ServicePort>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ServicePort {
    protocol: String,
    port: u16,
    target_port: u16,
}

impl ServiceForm {
    pub const TYPES: [&'static str; 3] = ["ClusterIP", "NodePort", "LoadBalancer"];

    pub fn validate(&self) -> Result<(), ApiError> {
        required(&self.name, "Service name is required")?;
        required(&self.namespace, "Namespace is required")?;
        required(&self.selector, "App selector is required")?;
        if !Self::TYPES.contains(&self.service_type.as_str()) {
            return Err(ApiError::Validation(format!(
                "Unknown service type: {}",
                self.service_type
            )));
        }
        Ok(())
    }

    pub fn to_yaml(&self) -> Result<String, ApiError> {
        self.validate()?;
        let manifest = Manifest {
            api_version: "v1",
            kind: "Service",
            metadata: Metadata {
                name: self.name.trim().to_string(),
                namespace: Some(self.namespace.trim().to_string()),
                labels: BTreeMap::new(),
            },
            spec: Some(ServiceSpec {
                service_type: self.service_type.clone(),
                selector: app_labels(self.selector.trim()),
                ports: vec![ServicePort {
                    protocol: or_default(&self.protocol, "TCP").to_string(),
                    port: self.port,
                    target_port: self.target_port,
                }],
            }),
        };
        to_yaml(&manifest)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngressForm {
    pub name: String,
    pub namespace: String,
    pub hostname: String,
    pub service: String,
    pub port: u16,
    pub path: String,
}

impl Default for IngressForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            hostname: String::new(),
            service: String::new(),
            port: 80,
            path: "/".to_string(),
        }
    }
}

#[derive(Serialize)]
struct IngressSpec {
    rules: Vec<IngressRule>,
}

#[derive(Serialize)]
struct IngressRule {
    host: String,
    http: HttpRule,
}

#[derive(Serialize)]
struct HttpRule {
    paths: Vec<HttpPath>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HttpPath {
    path: String,
    path_type: &'static str,
    backend: IngressBackend,
}

#[derive(Serialize)]
struct IngressBackend {
    service: BackendService,
}

#[derive(Serialize)]
struct BackendService {
    name: String,
    port: BackendPort,
}

#[derive(Serialize)]
struct BackendPort {
    number: u16,
}

impl IngressForm {
    pub fn validate(&self) -> Result<(), ApiError> {
        required(&self.name, "Ingress name is required")?;
        required(&self.namespace, "Namespace is required")?;
        required(&self.hostname, "Hostname is required")?;
        required(&self.service, "Service name is required")
    }

    pub fn to_yaml(&self) -> Result<String, ApiError> {
        self.validate()?;
        let manifest = Manifest {
            api_version: "networking.k8s.io/v1",
            kind: "Ingress",
            metadata: Metadata {
                name: self.name.trim().to_string(),
                namespace: Some(self.namespace.trim().to_string()),
                labels: BTreeMap::new(),
            },
            spec: Some(IngressSpec {
                rules: vec![IngressRule {
                    host: self.hostname.trim().to_string(),
                    http: HttpRule {
                        paths: vec![HttpPath {
                            path: or_default(&self.path, "/").to_string(),
                            path_type: "Prefix",
                            backend: IngressBackend {
                                service: BackendService {
                                    name: self.service.trim().to_string(),
                                    port: BackendPort { number: self.port },
                                },
                            },
                        }],
                    },
                }],
            }),
        };
        to_yaml(&manifest)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceForm {
    pub name: String,
}

impl NamespaceForm {
    /// DNS-1123 label: lowercase alphanumerics and hyphens, 63 chars at most,
    /// starting and ending with an alphanumeric.
    pub fn validate(&self) -> Result<(), ApiError> {
        let name = self.name.trim();
        required(name, "Name cannot be empty.")?;
        let valid_chars = name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
        let valid_edges = !name.starts_with('-') && !name.ends_with('-');
        if !valid_chars || !valid_edges || name.len() > 63 {
            return Err(ApiError::Validation(
                "Invalid name: use lowercase letters, numbers and hyphens only.".to_string(),
            ));
        }
        Ok(())
    }

    pub fn to_yaml(&self) -> Result<String, ApiError> {
        self.validate()?;
        let manifest: Manifest<()> = Manifest {
            api_version: "v1",
            kind: "Namespace",
            metadata: Metadata {
                name: self.name.trim().to_string(),
                namespace: None,
                labels: BTreeMap::new(),
            },
            spec: None,
        };
        to_yaml(&manifest)
    }
}
