//! Infrastructure implementation of the `SnapshotStore` port.
//!
//! `JsonSnapshotStore` provides async load/save using
//! `tokio::task::spawn_blocking` with atomic write (temp file + rename), so a
//! concurrent reader sees either the old or the new document.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use devfleet_common::ResourceExport;

use crate::application::ports::SnapshotStore;

pub struct JsonSnapshotStore {
    path: PathBuf,
}

impl JsonSnapshotStore {
    #[must_use]
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    fn load_sync(path: &Path) -> Result<Option<ResourceExport>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading snapshot {}", path.display()))?;
        let export = ResourceExport::from_json(&content)
            .with_context(|| format!("parsing snapshot {}", path.display()))?;
        Ok(Some(export))
    }

    fn save_sync(path: &Path, export: &ResourceExport) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating directory {}", parent.display()))?;
        }
        let content = export.to_json_pretty().context("serializing snapshot")?;

        let temp_path = path.with_extension("json.tmp");
        std::fs::write(&temp_path, content)
            .with_context(|| format!("writing temp file {}", temp_path.display()))?;
        std::fs::rename(&temp_path, path)
            .with_context(|| format!("finalizing snapshot {}", path.display()))?;
        Ok(())
    }
}

impl SnapshotStore for JsonSnapshotStore {
    async fn load(&self) -> Result<Option<ResourceExport>> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || Self::load_sync(&path))
            .await
            .context("snapshot load task panicked")?
    }

    async fn save(&self, export: &ResourceExport) -> Result<()> {
        let path = self.path.clone();
        let export = export.clone();
        tokio::task::spawn_blocking(move || Self::save_sync(&path, &export))
            .await
            .context("snapshot save task panicked")?
    }

    fn path(&self) -> &Path {
        &self.path
    }
}
