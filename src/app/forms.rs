// ABOUTME: Create/edit forms shown in the modal: field editing, validation and submission
// Validation errors stay inline in the form; nothing is sent until the form is valid

use tracing::info;

use crate::api::{ApiClient, ApiError, RequestContext};
use crate::manifest::{DeploymentForm, IngressForm, NamespaceForm, ServiceForm};
use crate::models::admin::parse_roles;
use crate::models::{NewContainer, NewHost, NewNetwork, NewRoute, NewUser, NewVolume, ResourceKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormKind {
    NewContainer,
    RenameContainer { id: String },
    PullImage,
    NewVolume,
    NewNetwork,
    NewHost,
    NewUser,
    NewProject,
    NewRoute,
    Deployment,
    Service,
    Ingress,
    Namespace,
}

impl FormKind {
    pub fn title(&self) -> &'static str {
        match self {
            Self::NewContainer => "Create Container",
            Self::RenameContainer { .. } => "Rename Container",
            Self::PullImage => "Pull Image",
            Self::NewVolume => "Create Volume",
            Self::NewNetwork => "Create Network",
            Self::NewHost => "Add Host",
            Self::NewUser => "Create User",
            Self::NewProject => "Create Project",
            Self::NewRoute => "Add Route",
            Self::Deployment => "Create Deployment",
            Self::Service => "Create Service",
            Self::Ingress => "Create Ingress",
            Self::Namespace => "Create Namespace",
        }
    }

    /// The form offered by `n` on a table of the given kind.
    pub fn for_resource(kind: ResourceKind) -> Option<Self> {
        let form = match kind {
            ResourceKind::Containers => Self::NewContainer,
            ResourceKind::Images => Self::PullImage,
            ResourceKind::Volumes => Self::NewVolume,
            ResourceKind::Networks => Self::NewNetwork,
            ResourceKind::Hosts => Self::NewHost,
            ResourceKind::Users => Self::NewUser,
            ResourceKind::Projects => Self::NewProject,
            ResourceKind::LbRoutes => Self::NewRoute,
            ResourceKind::Deployments => Self::Deployment,
            ResourceKind::Services => Self::Service,
            ResourceKind::Ingresses => Self::Ingress,
            ResourceKind::Namespaces => Self::Namespace,
            _ => return None,
        };
        Some(form)
    }

    fn needs_cluster(&self) -> bool {
        matches!(
            self,
            Self::Deployment | Self::Service | Self::Ingress | Self::Namespace
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub label: &'static str,
    pub value: String,
    pub secret: bool,
}

impl FormField {
    fn new(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
            secret: false,
        }
    }

    fn secret(label: &'static str) -> Self {
        Self {
            label,
            value: String::new(),
            secret: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FormState {
    pub kind: FormKind,
    pub fields: Vec<FormField>,
    pub focused: usize,
    pub error: Option<String>,
    pub submitting: bool,
    /// Index into the cross-host container list chosen with the picker
    pub picked: Option<usize>,
    /// Host of the picked container; routes are created against that host
    pub picked_host: Option<i64>,
}

impl FormState {
    pub fn new(kind: FormKind) -> Self {
        let fields = match &kind {
            FormKind::NewContainer => vec![
                FormField::new("Name", ""),
                FormField::new("Image", ""),
                FormField::new("Ports (host:container, ...)", ""),
                FormField::new("Env (KEY=VALUE, ...)", ""),
                FormField::new("Volumes (source:target, ...)", ""),
                FormField::new("Restart policy", "no"),
            ],
            FormKind::RenameContainer { .. } => vec![FormField::new("New name", "")],
            FormKind::PullImage => vec![FormField::new("Image", "")],
            FormKind::NewVolume => vec![
                FormField::new("Name", ""),
                FormField::new("Driver", "local"),
            ],
            FormKind::NewNetwork => vec![
                FormField::new("Name", ""),
                FormField::new("Driver", "bridge"),
                FormField::new("Subnet", ""),
            ],
            FormKind::NewHost => vec![
                FormField::new("Name", ""),
                FormField::new("URI (tcp://host:2375)", ""),
            ],
            FormKind::NewUser => vec![
                FormField::new("Username", ""),
                FormField::secret("Password"),
                FormField::new("Roles (comma separated)", "user_docker"),
            ],
            FormKind::NewProject => vec![
                FormField::new("Name", ""),
                FormField::new("Description", ""),
            ],
            FormKind::NewRoute => vec![
                FormField::new("Domain", ""),
                FormField::new("Container", ""),
                FormField::new("Container port", "80"),
            ],
            FormKind::Deployment => {
                let d = DeploymentForm::default();
                vec![
                    FormField::new("Name", d.name),
                    FormField::new("Namespace", d.namespace),
                    FormField::new("Image", d.image),
                    FormField::new("Replicas", d.replicas.to_string()),
                    FormField::new("Container port", d.port.to_string()),
                    FormField::new("CPU request", d.cpu_request),
                    FormField::new("CPU limit", d.cpu_limit),
                    FormField::new("Memory request", d.memory_request),
                    FormField::new("Memory limit", d.memory_limit),
                    FormField::new("App label", d.label),
                ]
            }
            FormKind::Service => {
                let s = ServiceForm::default();
                vec![
                    FormField::new("Name", s.name),
                    FormField::new("Namespace", s.namespace),
                    FormField::new("Type", s.service_type),
                    FormField::new("App selector", s.selector),
                    FormField::new("Port", s.port.to_string()),
                    FormField::new("Target port", s.target_port.to_string()),
                    FormField::new("Protocol", s.protocol),
                ]
            }
            FormKind::Ingress => {
                let i = IngressForm::default();
                vec![
                    FormField::new("Name", i.name),
                    FormField::new("Namespace", i.namespace),
                    FormField::new("Hostname", i.hostname),
                    FormField::new("Service", i.service),
                    FormField::new("Service port", i.port.to_string()),
                    FormField::new("Path", i.path),
                ]
            }
            FormKind::Namespace => vec![FormField::new("Name", "")],
        };
        Self {
            kind,
            fields,
            focused: 0,
            error: None,
            submitting: false,
            picked: None,
            picked_host: None,
        }
    }

    pub fn title(&self) -> &'static str {
        self.kind.title()
    }

    pub fn next_field(&mut self) {
        if !self.fields.is_empty() {
            self.focused = (self.focused + 1) % self.fields.len();
        }
    }

    pub fn prev_field(&mut self) {
        if !self.fields.is_empty() {
            self.focused = self
                .focused
                .checked_sub(1)
                .unwrap_or(self.fields.len() - 1);
        }
    }

    pub fn input_char(&mut self, ch: char) {
        if let Some(field) = self.fields.get_mut(self.focused) {
            field.value.push(ch);
            self.error = None;
        }
    }

    pub fn backspace(&mut self) {
        if let Some(field) = self.fields.get_mut(self.focused) {
            field.value.pop();
        }
    }

    pub fn set_value(&mut self, label: &str, value: &str) {
        if let Some(field) = self.fields.iter_mut().find(|f| f.label == label) {
            field.value = value.to_string();
        }
    }

    fn text(&self, index: usize) -> String {
        self.fields
            .get(index)
            .map(|f| f.value.trim().to_string())
            .unwrap_or_default()
    }

    fn number<N: std::str::FromStr>(&self, index: usize) -> Result<N, ApiError> {
        let label = self.fields.get(index).map_or("Value", |f| f.label);
        self.text(index)
            .parse()
            .map_err(|_| ApiError::Validation(format!("{label} must be a number")))
    }

    /// Validates the fields and builds the request to send.
    pub fn submission(
        &self,
        host_id: i64,
        cluster_id: Option<i64>,
    ) -> Result<FormSubmission, ApiError> {
        let cluster = if self.kind.needs_cluster() {
            cluster_id
                .ok_or_else(|| ApiError::Validation("Open a cluster first".to_string()))?
        } else {
            0
        };

        let submission = match &self.kind {
            FormKind::NewContainer => {
                let spec = NewContainer {
                    name: self.text(0),
                    image: self.text(1),
                    ports: split_list(&self.text(2)),
                    env: split_list(&self.text(3)),
                    volumes: split_list(&self.text(4)),
                    restart_policy: self.text(5),
                };
                require(&spec.image, "Image is required")?;
                FormSubmission::Container(spec)
            }
            FormKind::RenameContainer { id } => {
                let name = self.text(0);
                require(&name, "New name is required")?;
                FormSubmission::Rename {
                    id: id.clone(),
                    name,
                }
            }
            FormKind::PullImage => {
                let image = self.text(0);
                require(&image, "Image is required")?;
                FormSubmission::PullImage(image)
            }
            FormKind::NewVolume => {
                let volume = NewVolume {
                    name: self.text(0),
                    driver: self.text(1),
                };
                require(&volume.name, "Volume name is required")?;
                FormSubmission::Volume(volume)
            }
            FormKind::NewNetwork => {
                let network = NewNetwork {
                    name: self.text(0),
                    driver: self.text(1),
                    subnet: self.text(2),
                };
                require(&network.name, "Network name is required")?;
                FormSubmission::Network(network)
            }
            FormKind::NewHost => {
                let host = NewHost {
                    name: self.text(0),
                    uri: self.text(1),
                };
                require(&host.name, "Host name is required")?;
                require(&host.uri, "Host URI is required")?;
                FormSubmission::Host(host)
            }
            FormKind::NewUser => {
                let user = NewUser {
                    username: self.text(0),
                    password: self.fields.get(1).map(|f| f.value.clone()).unwrap_or_default(),
                    roles: parse_roles(&self.text(2)),
                };
                require(&user.username, "Username is required")?;
                require(&user.password, "Password is required")?;
                if user.roles.is_empty() {
                    return Err(ApiError::Validation("Select at least one role".to_string()));
                }
                FormSubmission::User(user)
            }
            FormKind::NewProject => {
                let name = self.text(0);
                require(&name, "Project name is required")?;
                FormSubmission::Project {
                    name,
                    description: self.text(1),
                }
            }
            FormKind::NewRoute => {
                let domain = self.text(0);
                require(&domain, "Domain required")?;
                let container = self.text(1);
                let port: u16 = self
                    .number(2)
                    .map_err(|_| ApiError::Validation("Container details required".to_string()))?;
                if container.is_empty() || port == 0 {
                    return Err(ApiError::Validation("Container details required".to_string()));
                }
                FormSubmission::Route(NewRoute::container(&domain, host_id, &container, port))
            }
            FormKind::Deployment => {
                let form = DeploymentForm {
                    name: self.text(0),
                    namespace: self.text(1),
                    image: self.text(2),
                    replicas: self.number(3)?,
                    port: self.number(4)?,
                    cpu_request: self.text(5),
                    cpu_limit: self.text(6),
                    memory_request: self.text(7),
                    memory_limit: self.text(8),
                    label: self.text(9),
                };
                FormSubmission::Manifest {
                    cluster_id: cluster,
                    description: format!("Deployment {}", form.name),
                    yaml: form.to_yaml()?,
                }
            }
            FormKind::Service => {
                let form = ServiceForm {
                    name: self.text(0),
                    namespace: self.text(1),
                    service_type: self.text(2),
                    selector: self.text(3),
                    port: self.number(4)?,
                    target_port: self.number(5)?,
                    protocol: self.text(6),
                };
                FormSubmission::Manifest {
                    cluster_id: cluster,
                    description: format!("Service {}", form.name),
                    yaml: form.to_yaml()?,
                }
            }
            FormKind::Ingress => {
                let form = IngressForm {
                    name: self.text(0),
                    namespace: self.text(1),
                    hostname: self.text(2),
                    service: self.text(3),
                    port: self.number(4)?,
                    path: self.text(5),
                };
                FormSubmission::Manifest {
                    cluster_id: cluster,
                    description: format!("Ingress {}", form.name),
                    yaml: form.to_yaml()?,
                }
            }
            FormKind::Namespace => {
                let form = NamespaceForm { name: self.text(0) };
                form.validate()?;
                FormSubmission::Namespace {
                    cluster_id: cluster,
                    name: form.name,
                }
            }
        };
        Ok(submission)
    }
}

fn require(value: &str, message: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::Validation(message.to_string()));
    }
    Ok(())
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// A validated form, ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormSubmission {
    Container(NewContainer),
    Rename { id: String, name: String },
    PullImage(String),
    Volume(NewVolume),
    Network(NewNetwork),
    Host(NewHost),
    User(NewUser),
    Project { name: String, description: String },
    Route(NewRoute),
    Manifest { cluster_id: i64, description: String, yaml: String },
    Namespace { cluster_id: i64, name: String },
}

impl FormSubmission {
    /// Sends the request and returns the success message.
    pub async fn submit(self, client: &ApiClient, ctx: &RequestContext) -> Result<String, ApiError> {
        match self {
            Self::Container(spec) => {
                client.create_container(ctx, &spec).await?;
                Ok(format!("Container {} created", display_or(&spec.name, &spec.image)))
            }
            Self::Rename { id, name } => {
                client.rename_container(ctx, &id, &name).await?;
                Ok(format!("Container renamed to {name}"))
            }
            Self::PullImage(image) => {
                client.pull_image(ctx, &image).await?;
                Ok(format!("Pulled {image}"))
            }
            Self::Volume(volume) => {
                client.create_volume(ctx, &volume).await?;
                Ok(format!("Volume {} created", volume.name))
            }
            Self::Network(network) => {
                client.create_network(ctx, &network).await?;
                Ok(format!("Network {} created", network.name))
            }
            Self::Host(host) => {
                client.create_host(ctx, &host).await?;
                Ok(format!("Host {} added", host.name))
            }
            Self::User(user) => {
                client.create_user(ctx, &user).await?;
                Ok(format!("User {} created", user.username))
            }
            Self::Project { name, description } => {
                client.create_project(ctx, &name, &description).await?;
                Ok(format!("Project {name} created"))
            }
            Self::Route(route) => {
                client.create_route(ctx, &route).await?;
                Ok(format!("Route {} added", route.domain))
            }
            Self::Manifest {
                cluster_id,
                description,
                yaml,
            } => {
                let output = client.apply_manifest(ctx, cluster_id, &yaml).await?;
                info!("Applied {}: {}", description, output.trim());
                Ok(format!("{description} applied"))
            }
            Self::Namespace { cluster_id, name } => {
                client.create_namespace(ctx, cluster_id, &name).await?;
                Ok(format!("Namespace {name} created"))
            }
        }
    }
}

fn display_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() {
        fallback
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_image_is_reported_inline() {
        let mut form = FormState::new(FormKind::Deployment);
        form.set_value("Name", "web");
        let err = form.submission(1, Some(4)).unwrap_err();
        assert_eq!(err.to_string(), "Docker image is required");
    }

    #[test]
    fn test_deployment_submission_carries_yaml() {
        let mut form = FormState::new(FormKind::Deployment);
        form.set_value("Name", "web");
        form.set_value("Image", "nginx:1.25");
        match form.submission(1, Some(4)).unwrap() {
            FormSubmission::Manifest { cluster_id, yaml, .. } => {
                assert_eq!(cluster_id, 4);
                assert!(yaml.contains("kind: Deployment"));
                assert!(yaml.contains("nginx:1.25"));
            }
            other => panic!("unexpected submission {other:?}"),
        }
    }

    #[test]
    fn test_cluster_forms_need_open_cluster() {
        let mut form = FormState::new(FormKind::Namespace);
        form.set_value("Name", "staging");
        assert!(form.submission(1, None).is_err());
    }

    #[test]
    fn test_route_requires_container_details() {
        let mut form = FormState::new(FormKind::NewRoute);
        form.set_value("Domain", "app.example.com");
        let err = form.submission(2, None).unwrap_err();
        assert_eq!(err.to_string(), "Container details required");
    }

    #[test]
    fn test_field_navigation_wraps() {
        let mut form = FormState::new(FormKind::NewVolume);
        form.prev_field();
        assert_eq!(form.focused, 1);
        form.next_field();
        assert_eq!(form.focused, 0);
    }
}
