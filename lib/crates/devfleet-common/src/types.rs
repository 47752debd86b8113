//! Report types shared by the CLI renderers and the `--json` output.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The three resource categories tracked by the Resource Export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceCategory {
    Registry,
    FileSystem,
    Cluster,
}

impl ResourceCategory {
    pub const ALL: [Self; 3] = [Self::Registry, Self::FileSystem, Self::Cluster];

    /// Human-readable label, e.g. `"ECR repository"`.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Registry => "ECR repository",
            Self::FileSystem => "EFS file system",
            Self::Cluster => "ECS cluster",
        }
    }

    /// Top-level key of this category in the snapshot document.
    #[must_use]
    pub fn export_key(self) -> &'static str {
        match self {
            Self::Registry => "ecr_repositories",
            Self::FileSystem => "efs_filesystems",
            Self::Cluster => "ecs_clusters",
        }
    }
}

impl fmt::Display for ResourceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Import-or-create outcome for one resource.
///
/// `Import` carries the physical identifier used to reference the existing
/// resource: the repository or cluster name, or the file-system id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "id", rename_all = "snake_case")]
pub enum Decision {
    Import(String),
    Create,
}

impl Decision {
    #[must_use]
    pub fn is_import(&self) -> bool {
        matches!(self, Self::Import(_))
    }

    #[must_use]
    pub fn imported_id(&self) -> Option<&str> {
        match self {
            Self::Import(id) => Some(id),
            Self::Create => None,
        }
    }
}

/// One line of `devfleet plan` / `devfleet synth` output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanEntry {
    pub category: ResourceCategory,
    pub name: String,
    pub decision: Decision,
}

/// Result of `devfleet plan`: decisions only, no control-plane calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanReport {
    pub snapshot_path: String,
    /// `false` when the snapshot was missing or unreadable and the empty
    /// export was assumed.
    pub snapshot_found: bool,
    pub entries: Vec<PlanEntry>,
}

/// Summary of a `devfleet lookup` run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupReport {
    pub snapshot_path: String,
    pub ecr_repositories: usize,
    pub efs_filesystems: usize,
    pub ecs_clusters: usize,
    /// Categories whose listing failed and were recorded as empty.
    pub degraded: Vec<ResourceCategory>,
}

/// A stack output as printed after synthesis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputLine {
    pub key: String,
    pub description: String,
    pub value: String,
}

/// Summary of a `devfleet synth` run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthReport {
    pub stack_name: String,
    pub template_path: String,
    pub synthesized_at: String,
    pub plan: Vec<PlanEntry>,
    pub https_enabled: bool,
    /// Present only when an imported file system needed its ingress widened.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingress: Option<IngressReport>,
    pub outputs: Vec<OutputLine>,
}

/// Outcome of widening NFS ingress for an imported file system.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngressReport {
    /// `None` when the task security group does not exist yet.
    pub task_security_group: Option<String>,
    pub authorized: Vec<String>,
    pub already_present: Vec<String>,
    pub failed: Vec<String>,
}

impl IngressReport {
    /// Mount-target security groups that now admit the task group.
    #[must_use]
    pub fn reachable(&self) -> usize {
        self.authorized.len() + self.already_present.len()
    }
}
