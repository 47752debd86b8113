//! Application service — resource lookup use-case.
//!
//! Pages through the three listing APIs, builds a fresh Resource Export and
//! overwrites the snapshot. A failing category degrades to empty on its own;
//! the other categories still populate.

use std::collections::{BTreeMap, BTreeSet};
use std::future::Future;

use anyhow::{Context, Result};
use devfleet_common::{LookupReport, ResourceCategory, ResourceExport};

use crate::application::ports::{
    ClusterCatalog, FileSystemCatalog, Page, ProgressReporter, RegistryCatalog, ResourceCatalog,
    SnapshotStore,
};
use crate::application::services::recovery::absorb;
use crate::domain::network::cluster_name_from_arn;
use crate::domain::policy::FailurePolicy;

/// Follow `next_token` until the listing is exhausted.
///
/// # Errors
///
/// Returns the first page error; pages already fetched are discarded.
pub async fn drain<T, F, Fut>(mut fetch: F) -> Result<Vec<T>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let mut items = Vec::new();
    let mut token = None;
    loop {
        let page = fetch(token.take()).await?;
        items.extend(page.items);
        match page.next_token {
            Some(next) => token = Some(next),
            None => return Ok(items),
        }
    }
}

/// All repository names.
///
/// # Errors
///
/// Returns an error if any page cannot be fetched.
pub async fn list_repositories(catalog: &impl RegistryCatalog) -> Result<BTreeSet<String>> {
    let names = drain(move |token| catalog.repository_page(token)).await?;
    Ok(names.into_iter().collect())
}

/// Named file systems, name → id. Unnamed file systems are skipped.
///
/// # Errors
///
/// Returns an error if any page cannot be fetched.
pub async fn list_filesystems(catalog: &impl FileSystemCatalog) -> Result<BTreeMap<String, String>> {
    let summaries = drain(move |token| catalog.file_system_page(token)).await?;
    Ok(summaries
        .into_iter()
        .filter_map(|fs| match fs.name {
            Some(name) if !name.is_empty() => Some((name, fs.file_system_id)),
            _ => None,
        })
        .collect())
}

/// All cluster names, taken from the tail of each cluster ARN.
///
/// # Errors
///
/// Returns an error if any page cannot be fetched.
pub async fn list_clusters(catalog: &impl ClusterCatalog) -> Result<BTreeSet<String>> {
    let arns = drain(move |token| catalog.cluster_page(token)).await?;
    Ok(arns
        .iter()
        .map(|arn| cluster_name_from_arn(arn).to_string())
        .collect())
}

/// Query every category and build the export without persisting it.
///
/// Returns the export and the categories that degraded to empty.
///
/// # Errors
///
/// Returns the first listing error when `policy` is fail-closed.
pub async fn collect_export(
    catalog: &impl ResourceCatalog,
    reporter: &impl ProgressReporter,
    policy: FailurePolicy,
) -> Result<(ResourceExport, Vec<ResourceCategory>)> {
    let mut degraded = Vec::new();

    reporter.step("listing ECR repositories...");
    let ecr_repositories = settle(
        list_repositories(catalog).await,
        ResourceCategory::Registry,
        &mut degraded,
        reporter,
        policy,
    )?;
    tracing::debug!(count = ecr_repositories.len(), "ECR repositories listed");

    reporter.step("listing EFS file systems...");
    let efs_filesystems = settle(
        list_filesystems(catalog).await,
        ResourceCategory::FileSystem,
        &mut degraded,
        reporter,
        policy,
    )?;
    tracing::debug!(count = efs_filesystems.len(), "EFS file systems listed");

    reporter.step("listing ECS clusters...");
    let ecs_clusters = settle(
        list_clusters(catalog).await,
        ResourceCategory::Cluster,
        &mut degraded,
        reporter,
        policy,
    )?;
    tracing::debug!(count = ecs_clusters.len(), "ECS clusters listed");

    Ok((
        ResourceExport {
            ecr_repositories,
            efs_filesystems,
            ecs_clusters,
        },
        degraded,
    ))
}

fn settle<T: Default>(
    result: Result<T>,
    category: ResourceCategory,
    degraded: &mut Vec<ResourceCategory>,
    reporter: &impl ProgressReporter,
    policy: FailurePolicy,
) -> Result<T> {
    if result.is_err() {
        degraded.push(category);
    }
    absorb(policy, reporter, &format!("{category} lookup"), result)
}

/// Run the lookup and overwrite the snapshot.
///
/// # Errors
///
/// Returns an error if the snapshot cannot be written, or on the first
/// listing error when `policy` is fail-closed.
pub async fn lookup_resources(
    catalog: &impl ResourceCatalog,
    store: &impl SnapshotStore,
    reporter: &impl ProgressReporter,
    policy: FailurePolicy,
) -> Result<LookupReport> {
    let (export, degraded) = collect_export(catalog, reporter, policy).await?;

    store
        .save(&export)
        .await
        .with_context(|| format!("writing snapshot {}", store.path().display()))?;
    reporter.success(&format!("snapshot written to {}", store.path().display()));
    tracing::info!(
        path = %store.path().display(),
        repositories = export.ecr_repositories.len(),
        filesystems = export.efs_filesystems.len(),
        clusters = export.ecs_clusters.len(),
        "snapshot written"
    );

    Ok(LookupReport {
        snapshot_path: store.path().display().to_string(),
        ecr_repositories: export.ecr_repositories.len(),
        efs_filesystems: export.efs_filesystems.len(),
        ecs_clusters: export.ecs_clusters.len(),
        degraded,
    })
}
