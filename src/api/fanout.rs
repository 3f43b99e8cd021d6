// ABOUTME: Concurrent fan-out over several backend calls that tolerates individual failures
// Every call settles before results are returned; a failed call contributes an empty value

use futures_util::future::join_all;
use std::future::Future;
use tracing::warn;

use super::client::ApiClient;
use super::context::RequestContext;
use super::error::ApiError;
use crate::models::{DashboardStats, Host, HostedContainer};

pub async fn settle_all<T, Fut>(label: &str, calls: impl IntoIterator<Item = Fut>) -> Vec<T>
where
    T: Default,
    Fut: Future<Output = Result<T, ApiError>>,
{
    join_all(calls)
        .await
        .into_iter()
        .enumerate()
        .map(|(index, result)| {
            result.unwrap_or_else(|err| {
                warn!("{} call #{} failed, using empty result: {}", label, index, err);
                T::default()
            })
        })
        .collect()
}

/// Containers from every host, each tagged with its host. Unreachable hosts contribute nothing.
pub async fn containers_across_hosts(
    client: &ApiClient,
    ctx: &RequestContext,
    hosts: &[Host],
) -> Vec<HostedContainer> {
    let calls = hosts.iter().map(|host| {
        let host_ctx = ctx.with_host(host.id);
        async move { client.list_containers(&host_ctx).await }
    });
    let per_host = settle_all("containers-across-hosts", calls).await;

    hosts
        .iter()
        .zip(per_host)
        .flat_map(|(host, containers)| {
            containers.into_iter().map(|container| HostedContainer {
                host_id: host.id,
                host_name: host.name.clone(),
                container,
            })
        })
        .collect()
}

/// Header counters for the active host, from four list calls run together.
pub async fn dashboard_stats(client: &ApiClient, ctx: &RequestContext) -> DashboardStats {
    let (containers, images, volumes, networks) = futures_util::join!(
        client.list_containers(ctx),
        client.list_images(ctx),
        client.list_volumes(ctx),
        client.list_networks(ctx),
    );

    let containers = containers.unwrap_or_else(|err| {
        warn!("stats: container list failed: {}", err);
        Vec::new()
    });
    DashboardStats {
        total_containers: containers.len(),
        running_containers: containers.iter().filter(|c| c.is_running()).count(),
        images: images.map_or(0, |list| list.len()),
        volumes: volumes.map_or(0, |list| list.len()),
        networks: networks.map_or(0, |list| list.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_settle_all_substitutes_failures() {
        let calls = vec![
            futures_util::future::ready(Ok(vec![1, 2])),
            futures_util::future::ready(Err(ApiError::Transport("refused".to_string()))),
            futures_util::future::ready(Ok(vec![3])),
        ];
        let results: Vec<Vec<i32>> = settle_all("test", calls).await;
        assert_eq!(results, vec![vec![1, 2], vec![], vec![3]]);
    }
}
