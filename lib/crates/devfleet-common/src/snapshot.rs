//! Resource Export snapshot exchanged between `devfleet lookup` and
//! `devfleet synth`.
//!
//! The document is a point-in-time record with no version or timestamp.
//! Readers treat it as advisory: a missing key, or a key whose value does
//! not have the expected shape, reads as an empty collection.

use std::collections::{BTreeMap, BTreeSet};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// File name used when no snapshot path is configured.
pub const DEFAULT_SNAPSHOT_FILE: &str = "resource_exports.json";

/// Names of cloud resources that already exist, grouped by category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceExport {
    /// Existing ECR repository names.
    #[serde(deserialize_with = "lenient")]
    pub ecr_repositories: BTreeSet<String>,
    /// Existing EFS file systems, keyed by their `Name` tag.
    #[serde(deserialize_with = "lenient")]
    pub efs_filesystems: BTreeMap<String, String>,
    /// Existing ECS cluster names.
    #[serde(deserialize_with = "lenient")]
    pub ecs_clusters: BTreeSet<String>,
}

impl ResourceExport {
    /// The "assume nothing exists" export.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn has_repository(&self, name: &str) -> bool {
        self.ecr_repositories.contains(name)
    }

    /// File-system id recorded for `name`, if any.
    #[must_use]
    pub fn filesystem_id(&self, name: &str) -> Option<&str> {
        self.efs_filesystems.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn has_cluster(&self, name: &str) -> bool {
        self.ecs_clusters.contains(name)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ecr_repositories.is_empty()
            && self.efs_filesystems.is_empty()
            && self.ecs_clusters.is_empty()
    }

    /// Parse a snapshot document.
    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }

    /// Render the snapshot with two-space indentation and sorted entries.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}
