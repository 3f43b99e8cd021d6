// ABOUTME: Fetches the list behind a table and runs per-row actions against the backend
// A load is identified by its ListTarget so results for an abandoned target can be dropped

use chrono::Utc;
use tracing::{debug, info};

use super::row::{k8s_row, ResourceRow, TableRow};
use crate::api::{ApiClient, ApiError, ContainerAction, RequestContext};
use crate::models::{NamespaceFilter, ResourceKind};

/// Everything that decides which list a table shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListTarget {
    pub kind: ResourceKind,
    pub host_id: i64,
    pub cluster_id: Option<i64>,
    pub namespace: NamespaceFilter,
}

impl ListTarget {
    pub fn docker(kind: ResourceKind, host_id: i64) -> Self {
        Self {
            kind,
            host_id,
            cluster_id: None,
            namespace: NamespaceFilter::All,
        }
    }

    pub fn cluster(kind: ResourceKind, host_id: i64, cluster_id: i64, namespace: NamespaceFilter) -> Self {
        Self {
            kind,
            host_id,
            cluster_id: Some(cluster_id),
            namespace,
        }
    }

    fn require_cluster(&self) -> Result<i64, ApiError> {
        self.cluster_id
            .ok_or_else(|| ApiError::Validation("Open a cluster first".to_string()))
    }
}

fn rows<T: TableRow>(items: &[T]) -> Vec<ResourceRow> {
    let now = Utc::now();
    items.iter().map(|item| item.to_row(now)).collect()
}

pub async fn load_rows(
    client: &ApiClient,
    ctx: &RequestContext,
    target: &ListTarget,
) -> Result<Vec<ResourceRow>, ApiError> {
    debug!("Loading {} for {:?}", target.kind.label(), target);
    let loaded = match target.kind {
        ResourceKind::Containers => rows(&client.list_containers(ctx).await?),
        ResourceKind::Images => rows(&client.list_images(ctx).await?),
        ResourceKind::Volumes => rows(&client.list_volumes(ctx).await?),
        ResourceKind::Networks => rows(&client.list_networks(ctx).await?),
        ResourceKind::Hosts => rows(&client.list_hosts(ctx).await?),
        ResourceKind::Activity => rows(&client.activity_logs(ctx).await?),
        ResourceKind::Users => rows(&client.list_users(ctx).await?),
        ResourceKind::Projects => rows(&client.list_projects(ctx).await?),
        ResourceKind::LbRoutes => rows(&client.list_routes(ctx).await?),
        ResourceKind::Clusters => rows(&client.list_clusters(ctx).await?),
        kind => {
            let cluster_id = target.require_cluster()?;
            let now = Utc::now();
            client
                .list_k8s(ctx, cluster_id, kind, &target.namespace)
                .await?
                .iter()
                .map(|object| k8s_row(kind, object, now))
                .collect()
        }
    };
    debug!("Loaded {} {} rows", loaded.len(), target.kind.label());
    Ok(loaded)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    Start,
    Stop,
    Restart,
    Delete,
    Inspect,
    Logs,
    Describe,
}

impl RowAction {
    pub fn label(self) -> &'static str {
        match self {
            Self::Start => "Start",
            Self::Stop => "Stop",
            Self::Restart => "Restart",
            Self::Delete => "Delete",
            Self::Inspect => "Inspect",
            Self::Logs => "Logs",
            Self::Describe => "Describe",
        }
    }

    /// Actions offered for a row of the given kind.
    pub fn available(kind: ResourceKind) -> Vec<Self> {
        let mut actions = Vec::new();
        if kind.supports_lifecycle() {
            actions.extend([Self::Start, Self::Stop, Self::Restart]);
        }
        if matches!(
            kind,
            ResourceKind::Containers
                | ResourceKind::Images
                | ResourceKind::Volumes
                | ResourceKind::Networks
                | ResourceKind::Projects
        ) || kind.is_k8s()
        {
            actions.push(Self::Inspect);
        }
        if kind == ResourceKind::Pods {
            actions.extend([Self::Logs, Self::Describe]);
        }
        if kind.supports_delete() {
            actions.push(Self::Delete);
        }
        actions
    }

    /// Actions that change state and are refused for view-only users.
    pub fn is_mutating(self) -> bool {
        matches!(self, Self::Start | Self::Stop | Self::Restart | Self::Delete)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The table must be reloaded; carries the confirmation message.
    Changed(String),
    /// Read-only result to show in the detail overlay.
    Detail { title: String, body: String },
}

const POD_LOG_TAIL: u32 = 500;

pub async fn run_row_action(
    client: &ApiClient,
    ctx: &RequestContext,
    target: &ListTarget,
    row: &ResourceRow,
    action: RowAction,
) -> Result<ActionOutcome, ApiError> {
    let kind = target.kind;
    if !RowAction::available(kind).contains(&action) {
        return Err(ApiError::Validation(format!(
            "{} is not available for {}",
            action.label(),
            kind.label()
        )));
    }
    info!("{} {} {}", action.label(), kind.label(), row.name);

    match action {
        RowAction::Start | RowAction::Stop | RowAction::Restart => {
            let verb = match action {
                RowAction::Start => ContainerAction::Start,
                RowAction::Stop => ContainerAction::Stop,
                _ => ContainerAction::Restart,
            };
            client.container_action(ctx, &row.key, verb).await?;
            Ok(ActionOutcome::Changed(format!(
                "{} {}",
                row.name,
                match verb {
                    ContainerAction::Start => "started",
                    ContainerAction::Stop => "stopped",
                    ContainerAction::Restart => "restarted",
                }
            )))
        }
        RowAction::Delete => {
            delete_row(client, ctx, target, row).await?;
            Ok(ActionOutcome::Changed(format!("{} deleted", row.name)))
        }
        RowAction::Inspect => {
            let body = if kind == ResourceKind::Projects {
                client.project_detail(ctx, numeric_key(row)?).await?.summary()
            } else if kind.is_k8s() {
                client
                    .get_k8s(
                        ctx,
                        target.require_cluster()?,
                        kind,
                        &row.name,
                        row.namespace.as_deref(),
                    )
                    .await?
            } else {
                let group = match kind {
                    ResourceKind::Containers => "containers",
                    ResourceKind::Images => "images",
                    ResourceKind::Volumes => "volumes",
                    _ => "networks",
                };
                client.inspect(ctx, group, &row.key).await?
            };
            Ok(ActionOutcome::Detail {
                title: format!("Inspect {}", row.name),
                body,
            })
        }
        RowAction::Logs => {
            let body = client
                .pod_logs(
                    ctx,
                    target.require_cluster()?,
                    &row.name,
                    row.namespace.as_deref().unwrap_or("default"),
                    Some(POD_LOG_TAIL),
                )
                .await?;
            Ok(ActionOutcome::Detail {
                title: format!("Logs {}", row.name),
                body,
            })
        }
        RowAction::Describe => {
            let body = client
                .describe_pod(
                    ctx,
                    target.require_cluster()?,
                    &row.name,
                    row.namespace.as_deref().unwrap_or("default"),
                )
                .await?;
            Ok(ActionOutcome::Detail {
                title: format!("Describe {}", row.name),
                body,
            })
        }
    }
}

fn numeric_key(row: &ResourceRow) -> Result<i64, ApiError> {
    row.key
        .parse()
        .map_err(|_| ApiError::Validation(format!("Invalid id: {}", row.key)))
}

async fn delete_row(
    client: &ApiClient,
    ctx: &RequestContext,
    target: &ListTarget,
    row: &ResourceRow,
) -> Result<(), ApiError> {
    match target.kind {
        ResourceKind::Containers => client.remove_container(ctx, &row.key).await,
        ResourceKind::Images => client.remove_image(ctx, &row.key).await,
        ResourceKind::Volumes => client.remove_volume(ctx, &row.key).await,
        ResourceKind::Networks => client.remove_network(ctx, &row.key).await,
        ResourceKind::Hosts => {
            let id = numeric_key(row)?;
            if id == crate::api::DEFAULT_HOST_ID {
                return Err(ApiError::Validation(
                    "The default host cannot be removed".to_string(),
                ));
            }
            client.remove_host(ctx, id).await
        }
        ResourceKind::Users => client.delete_user(ctx, numeric_key(row)?).await,
        ResourceKind::Projects => client.delete_project(ctx, numeric_key(row)?).await,
        ResourceKind::LbRoutes => client.delete_route(ctx, numeric_key(row)?).await,
        kind => {
            client
                .delete_k8s(
                    ctx,
                    target.require_cluster()?,
                    kind,
                    &row.name,
                    row.namespace.as_deref(),
                )
                .await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_available_actions_per_kind() {
        assert_eq!(
            RowAction::available(ResourceKind::Containers),
            vec![
                RowAction::Start,
                RowAction::Stop,
                RowAction::Restart,
                RowAction::Inspect,
                RowAction::Delete
            ]
        );
        assert!(!RowAction::available(ResourceKind::Nodes).contains(&RowAction::Delete));
        assert!(RowAction::available(ResourceKind::Pods).contains(&RowAction::Logs));
        assert!(RowAction::available(ResourceKind::Activity).is_empty());
    }
}
