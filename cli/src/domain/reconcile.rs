//! Import-or-create dispatch against the Resource Export.
//!
//! Pure lookup-table decisions: no I/O, no async. The side effects that
//! follow from each branch live in the application layer.

use devfleet_common::{Decision, PlanEntry, ResourceCategory, ResourceExport};

use crate::domain::config::DevFleetConfig;

/// The names the stack wants for each reconciled category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceNames {
    pub repository: String,
    pub filesystem: String,
    pub cluster: String,
}

impl ResourceNames {
    #[must_use]
    pub fn from_config(config: &DevFleetConfig) -> Self {
        Self {
            repository: config.registry.repository_name.clone(),
            filesystem: config.storage.filesystem_name.clone(),
            cluster: config.cluster.name.clone(),
        }
    }

    #[must_use]
    pub fn name_of(&self, category: ResourceCategory) -> &str {
        match category {
            ResourceCategory::Registry => &self.repository,
            ResourceCategory::FileSystem => &self.filesystem,
            ResourceCategory::Cluster => &self.cluster,
        }
    }
}

/// Decide import vs create for one category.
#[must_use]
pub fn decide(category: ResourceCategory, name: &str, export: &ResourceExport) -> Decision {
    let existing = match category {
        ResourceCategory::Registry => export.has_repository(name).then(|| name.to_string()),
        ResourceCategory::FileSystem => export.filesystem_id(name).map(str::to_string),
        ResourceCategory::Cluster => export.has_cluster(name).then(|| name.to_string()),
    };
    existing.map_or(Decision::Create, Decision::Import)
}

/// Decisions for all three categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcilePlan {
    pub registry: Decision,
    pub filesystem: Decision,
    pub cluster: Decision,
}

impl ReconcilePlan {
    #[must_use]
    pub fn decision(&self, category: ResourceCategory) -> &Decision {
        match category {
            ResourceCategory::Registry => &self.registry,
            ResourceCategory::FileSystem => &self.filesystem,
            ResourceCategory::Cluster => &self.cluster,
        }
    }

    /// Flatten into report entries, in category order.
    #[must_use]
    pub fn entries(&self, names: &ResourceNames) -> Vec<PlanEntry> {
        ResourceCategory::ALL
            .into_iter()
            .map(|category| PlanEntry {
                category,
                name: names.name_of(category).to_string(),
                decision: self.decision(category).clone(),
            })
            .collect()
    }
}

/// Build the full plan for the given names.
#[must_use]
pub fn plan(names: &ResourceNames, export: &ResourceExport) -> ReconcilePlan {
    ReconcilePlan {
        registry: decide(ResourceCategory::Registry, &names.repository, export),
        filesystem: decide(ResourceCategory::FileSystem, &names.filesystem, export),
        cluster: decide(ResourceCategory::Cluster, &names.cluster, export),
    }
}
