use anyhow::{Context, Result};

use crate::application::ports::{FileSystemCatalog, Page};
use crate::domain::network::FileSystemSummary;

use super::{AwsControlPlane, continuation};

impl FileSystemCatalog for AwsControlPlane {
    async fn file_system_page(&self, token: Option<String>) -> Result<Page<FileSystemSummary>> {
        let out = self
            .efs
            .describe_file_systems()
            .set_marker(token)
            .send()
            .await
            .context("elasticfilesystem:DescribeFileSystems")?;
        Ok(Page {
            items: out
                .file_systems()
                .iter()
                .map(|fs| FileSystemSummary {
                    name: fs.name().map(str::to_string),
                    file_system_id: fs.file_system_id().to_string(),
                })
                .collect(),
            next_token: continuation(out.next_marker()),
        })
    }

    async fn mount_target_security_groups(&self, file_system_id: &str) -> Result<Vec<String>> {
        let mut mount_targets = Vec::new();
        let mut marker = None;
        loop {
            let out = self
                .efs
                .describe_mount_targets()
                .file_system_id(file_system_id)
                .set_marker(marker.take())
                .send()
                .await
                .with_context(|| {
                    format!("elasticfilesystem:DescribeMountTargets for {file_system_id}")
                })?;
            mount_targets.extend(
                out.mount_targets()
                    .iter()
                    .map(|mt| mt.mount_target_id().to_string()),
            );
            marker = continuation(out.next_marker());
            if marker.is_none() {
                break;
            }
        }

        let mut groups = Vec::new();
        for mount_target_id in mount_targets {
            let out = self
                .efs
                .describe_mount_target_security_groups()
                .mount_target_id(&mount_target_id)
                .send()
                .await
                .with_context(|| {
                    format!("elasticfilesystem:DescribeMountTargetSecurityGroups for {mount_target_id}")
                })?;
            groups.extend(out.security_groups().iter().cloned());
        }
        Ok(groups)
    }
}
