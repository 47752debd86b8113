//! NFS ingress widening for an imported file system.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use devfleet_cli::application::services::filesystem_access::widen_filesystem_access;
use devfleet_cli::domain::policy::FailurePolicy;

use crate::mocks::{FakeCloud, RecordingReporter, TASK_GROUP};

#[tokio::test]
async fn test_report_names_task_group() {
    let cloud = FakeCloud::default();
    let reporter = RecordingReporter::default();

    let report = widen_filesystem_access(
        &cloud,
        "vpc-0default",
        "fs-0abc",
        &reporter,
        FailurePolicy::FailOpen,
    )
    .await
    .expect("ingress");

    assert_eq!(report.task_security_group.as_deref(), Some(TASK_GROUP));
    assert_eq!(report.authorized, ["sg-0efs"]);
    assert!(reporter.successes.borrow().iter().any(|s| s.contains("sg-0efs")));
}

#[tokio::test]
async fn test_no_mount_targets_means_nothing_to_do() {
    let cloud = FakeCloud {
        mount_target_groups: Vec::new(),
        ..FakeCloud::default()
    };
    let reporter = RecordingReporter::default();

    let report = widen_filesystem_access(
        &cloud,
        "vpc-0default",
        "fs-0abc",
        &reporter,
        FailurePolicy::FailClosed,
    )
    .await
    .expect("ingress");

    assert_eq!(report.reachable(), 0);
    assert!(report.failed.is_empty());
    assert!(cloud.authorized.borrow().is_empty());
}

#[tokio::test]
async fn test_fail_closed_stops_at_first_failure() {
    let cloud = FakeCloud {
        mount_target_groups: vec!["sg-a".into(), "sg-b".into()],
        ingress_failures: [("sg-a".to_string(), "RequestLimitExceeded".to_string())].into(),
        ..FakeCloud::default()
    };
    let reporter = RecordingReporter::default();

    let err = widen_filesystem_access(
        &cloud,
        "vpc-0default",
        "fs-0abc",
        &reporter,
        FailurePolicy::FailClosed,
    )
    .await
    .expect_err("fail-closed");

    assert!(format!("{err:#}").contains("RequestLimitExceeded"));
    assert_eq!(cloud.ingress_targets(), ["sg-a"]);
}
