//! AWS SDK adapters for the control-plane ports.
//!
//! One client per service, built from a single shared `SdkConfig`. Each
//! submodule implements the port for one service. Adapters only translate:
//! pagination, policy and degradation live in the application layer.

mod certificate;
mod cluster;
mod dns;
mod filesystem;
mod identity;
mod network;
mod registry;

use aws_config::{BehaviorVersion, Region};

/// Production implementation of `ControlPlane`.
pub struct AwsControlPlane {
    region: String,
    ecr: aws_sdk_ecr::Client,
    efs: aws_sdk_efs::Client,
    ecs: aws_sdk_ecs::Client,
    ec2: aws_sdk_ec2::Client,
    iam: aws_sdk_iam::Client,
    acm: aws_sdk_acm::Client,
    route53: aws_sdk_route53::Client,
}

impl AwsControlPlane {
    /// Load credentials from the default provider chain and build clients
    /// for `region`.
    pub async fn connect(region: &str) -> Self {
        let shared = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .load()
            .await;
        tracing::debug!(region, "AWS clients configured");
        Self {
            region: region.to_string(),
            ecr: aws_sdk_ecr::Client::new(&shared),
            efs: aws_sdk_efs::Client::new(&shared),
            ecs: aws_sdk_ecs::Client::new(&shared),
            ec2: aws_sdk_ec2::Client::new(&shared),
            iam: aws_sdk_iam::Client::new(&shared),
            acm: aws_sdk_acm::Client::new(&shared),
            route53: aws_sdk_route53::Client::new(&shared),
        }
    }

    #[must_use]
    pub fn region(&self) -> &str {
        &self.region
    }
}

/// Empty continuation tokens mean "no more pages".
fn continuation(token: Option<&str>) -> Option<String> {
    token.filter(|t| !t.is_empty()).map(str::to_string)
}
