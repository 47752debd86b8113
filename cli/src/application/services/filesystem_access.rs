//! Application service — NFS access for an imported file system.
//!
//! An imported file system keeps the security groups it was created with.
//! Before the fleet's tasks can mount it, each mount-target group must admit
//! TCP 2049 from the task security group. This is the only control-plane
//! mutation devfleet performs.

use anyhow::Result;
use devfleet_common::IngressReport;

use crate::application::ports::{FileSystemCatalog, NetworkDirectory, ProgressReporter};
use crate::application::services::recovery::absorb;
use crate::domain::network::{IngressOutcome, IngressRule, TASK_SECURITY_GROUP_NAME};
use crate::domain::policy::FailurePolicy;

/// Authorize NFS from the task security group on every mount-target group
/// of `file_system_id`.
///
/// A rule that already exists counts as success. Under fail-open, any other
/// failure is recorded in the report and the remaining groups are still
/// attempted.
///
/// # Errors
///
/// Returns the first failure when `policy` is fail-closed.
pub async fn widen_filesystem_access(
    control: &(impl NetworkDirectory + FileSystemCatalog),
    vpc_id: &str,
    file_system_id: &str,
    reporter: &impl ProgressReporter,
    policy: FailurePolicy,
) -> Result<IngressReport> {
    let mut report = IngressReport::default();

    let task_group = absorb(
        policy,
        reporter,
        "task security group lookup",
        control
            .find_security_group(vpc_id, TASK_SECURITY_GROUP_NAME)
            .await,
    )?;
    let Some(task_group) = task_group else {
        tracing::warn!(
            group = TASK_SECURITY_GROUP_NAME,
            vpc = vpc_id,
            "task security group not found; skipping NFS ingress"
        );
        reporter.warn(&format!(
            "security group {TASK_SECURITY_GROUP_NAME} not found in {vpc_id}; \
             skipping NFS ingress for {file_system_id}"
        ));
        return Ok(report);
    };
    report.task_security_group = Some(task_group.clone());

    let mut groups = absorb(
        policy,
        reporter,
        &format!("mount target lookup for {file_system_id}"),
        control.mount_target_security_groups(file_system_id).await,
    )?;
    groups.sort();
    groups.dedup();

    for group in groups {
        let rule = IngressRule::nfs_from(&task_group, &group);
        let outcome = absorb(
            policy,
            reporter,
            &format!("authorizing NFS ingress on {group}"),
            control.authorize_ingress(&rule).await.map(Some),
        )?;
        match outcome {
            Some(IngressOutcome::Added) => {
                tracing::info!(group = %group, source = %task_group, "NFS ingress added");
                reporter.success(&format!("NFS access granted on {group}"));
                report.authorized.push(group);
            }
            Some(IngressOutcome::AlreadyPresent) => {
                tracing::debug!(group = %group, "NFS ingress already present");
                report.already_present.push(group);
            }
            None => report.failed.push(group),
        }
    }

    Ok(report)
}
