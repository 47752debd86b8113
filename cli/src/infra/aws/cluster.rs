use anyhow::{Context, Result};

use crate::application::ports::{ClusterCatalog, Page};

use super::{AwsControlPlane, continuation};

impl ClusterCatalog for AwsControlPlane {
    async fn cluster_page(&self, token: Option<String>) -> Result<Page<String>> {
        let out = self
            .ecs
            .list_clusters()
            .set_next_token(token)
            .send()
            .await
            .context("ecs:ListClusters")?;
        Ok(Page {
            items: out.cluster_arns().to_vec(),
            next_token: continuation(out.next_token()),
        })
    }
}
