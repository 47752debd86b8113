use anyhow::{Context, Result};
use aws_sdk_iam::operation::get_role::GetRoleError;

use crate::application::ports::IdentityDirectory;

use super::AwsControlPlane;

impl IdentityDirectory for AwsControlPlane {
    async fn role_arn(&self, name: &str) -> Result<Option<String>> {
        match self.iam.get_role().role_name(name).send().await {
            Ok(out) => Ok(out.role().map(|role| role.arn().to_string())),
            Err(e)
                if e.as_service_error()
                    .is_some_and(GetRoleError::is_no_such_entity_exception) =>
            {
                Ok(None)
            }
            Err(e) => Err(e).with_context(|| format!("iam:GetRole for {name}")),
        }
    }
}
