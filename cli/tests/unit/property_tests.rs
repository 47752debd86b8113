//! Property-based tests for reconcile decisions and snapshot parsing.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::collections::{BTreeMap, BTreeSet};

use devfleet_cli::domain::reconcile::decide;
use devfleet_common::{Decision, ResourceCategory, ResourceExport};
use proptest::prelude::*;

fn name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,20}"
}

proptest! {
    /// A repository is imported exactly when its name is in the snapshot.
    #[test]
    fn prop_registry_import_iff_present(
        existing in prop::collection::btree_set(name(), 0..8),
        wanted in name(),
    ) {
        let export = ResourceExport {
            ecr_repositories: existing.clone(),
            ..ResourceExport::default()
        };
        let decision = decide(ResourceCategory::Registry, &wanted, &export);
        prop_assert_eq!(decision.is_import(), existing.contains(&wanted));
    }

    /// An imported file system carries the id recorded under its name.
    #[test]
    fn prop_filesystem_import_carries_recorded_id(
        existing in prop::collection::btree_map(name(), "fs-[0-9a-f]{8}", 0..8),
        wanted in name(),
    ) {
        let export = ResourceExport {
            efs_filesystems: existing.clone(),
            ..ResourceExport::default()
        };
        let decision = decide(ResourceCategory::FileSystem, &wanted, &export);
        match existing.get(&wanted) {
            Some(id) => prop_assert_eq!(decision, Decision::Import(id.clone())),
            None => prop_assert_eq!(decision, Decision::Create),
        }
    }

    /// Categories do not leak into each other.
    #[test]
    fn prop_cluster_ignores_other_categories(
        repos in prop::collection::btree_set(name(), 0..8),
        wanted in name(),
    ) {
        let export = ResourceExport {
            ecr_repositories: repos,
            efs_filesystems: BTreeMap::from([(wanted.clone(), "fs-1".to_string())]),
            ecs_clusters: BTreeSet::new(),
        };
        prop_assert_eq!(
            decide(ResourceCategory::Cluster, &wanted, &export),
            Decision::Create
        );
    }

    /// Written snapshots read back identically.
    #[test]
    fn prop_snapshot_survives_json(
        repos in prop::collection::btree_set(name(), 0..5),
        filesystems in prop::collection::btree_map(name(), "fs-[0-9a-f]{8}", 0..5),
        clusters in prop::collection::btree_set(name(), 0..5),
    ) {
        let export = ResourceExport {
            ecr_repositories: repos,
            efs_filesystems: filesystems,
            ecs_clusters: clusters,
        };
        let json = export.to_json_pretty().unwrap();
        prop_assert_eq!(ResourceExport::from_json(&json).unwrap(), export);
    }

    /// Arbitrary text never panics the lenient reader.
    #[test]
    fn prop_snapshot_parse_never_panics(input in ".{0,200}") {
        let _ = ResourceExport::from_json(&input);
    }
}
