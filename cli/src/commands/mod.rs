//! Command implementations

pub mod config;
pub mod lookup;
pub mod plan;
pub mod synth;
pub mod version;

use std::path::PathBuf;

use clap::Args;

use crate::domain::config::DevFleetConfig;
use crate::domain::policy::FailurePolicy;
use crate::infra::snapshot::JsonSnapshotStore;

/// Snapshot and failure-policy overrides shared by lookup, synth and plan.
#[derive(Args, Debug, Default)]
pub struct SnapshotArgs {
    /// Snapshot file [default: snapshot.path from config]
    #[arg(long, value_name = "PATH")]
    pub snapshot: Option<PathBuf>,

    /// How recoverable AWS and snapshot errors are handled: fail-open or fail-closed
    #[arg(long, value_name = "POLICY")]
    pub policy: Option<FailurePolicy>,
}

impl SnapshotArgs {
    #[must_use]
    pub fn store(&self, config: &DevFleetConfig) -> JsonSnapshotStore {
        let path = self
            .snapshot
            .clone()
            .unwrap_or_else(|| PathBuf::from(&config.snapshot.path));
        JsonSnapshotStore::with_path(path)
    }

    #[must_use]
    pub fn policy(&self, config: &DevFleetConfig) -> FailurePolicy {
        self.policy.unwrap_or(config.policy.failure)
    }
}
