//! Infrastructure implementation of the `TemplateSink` port.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::application::ports::TemplateSink;
use crate::domain::template::Template;

/// Writes `<dir>/<stack>.template.json`.
pub struct TemplateWriter {
    dir: PathBuf,
}

impl TemplateWriter {
    #[must_use]
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    #[must_use]
    pub fn path_for(&self, stack_name: &str) -> PathBuf {
        self.dir.join(format!("{stack_name}.template.json"))
    }
}

impl TemplateSink for TemplateWriter {
    async fn write(&self, stack_name: &str, template: &Template) -> Result<PathBuf> {
        let path = self.path_for(stack_name);
        let content = serde_json::to_string_pretty(template).context("serializing template")?;
        let dir = self.dir.clone();
        let target = path.clone();
        tokio::task::spawn_blocking(move || -> Result<()> {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("creating directory {}", dir.display()))?;
            std::fs::write(&target, content)
                .with_context(|| format!("writing template {}", target.display()))
        })
        .await
        .context("template write task panicked")??;
        Ok(path)
    }
}
