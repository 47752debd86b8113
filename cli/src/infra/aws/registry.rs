use anyhow::{Context, Result};

use crate::application::ports::{Page, RegistryCatalog};

use super::{AwsControlPlane, continuation};

impl RegistryCatalog for AwsControlPlane {
    async fn repository_page(&self, token: Option<String>) -> Result<Page<String>> {
        let out = self
            .ecr
            .describe_repositories()
            .set_next_token(token)
            .send()
            .await
            .context("ecr:DescribeRepositories")?;
        Ok(Page {
            items: out
                .repositories()
                .iter()
                .filter_map(|r| r.repository_name().map(str::to_string))
                .collect(),
            next_token: continuation(out.next_token()),
        })
    }
}
