use anyhow::{Context, Result};
use aws_sdk_acm::types::CertificateStatus;

use crate::application::ports::CertificateDirectory;

use super::AwsControlPlane;

impl CertificateDirectory for AwsControlPlane {
    async fn certificate_issued(&self, arn: &str) -> Result<bool> {
        let out = self
            .acm
            .describe_certificate()
            .certificate_arn(arn)
            .send()
            .await
            .with_context(|| format!("acm:DescribeCertificate for {arn}"))?;
        let status = out.certificate().and_then(|c| c.status());
        tracing::debug!(%arn, ?status, "certificate status");
        Ok(status == Some(&CertificateStatus::Issued))
    }
}
