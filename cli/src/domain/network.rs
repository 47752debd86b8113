//! Network, DNS and identity facts discovered from the control plane, and
//! the pure helpers that interpret them.

use std::collections::BTreeSet;

/// NFS port used by EFS mount targets.
pub const EFS_PORT: u16 = 2049;

/// Name of the security group attached to the fleet's Fargate tasks.
pub const TASK_SECURITY_GROUP_NAME: &str = "dev-fleet-service-sg";

/// EC2 error code returned when an identical ingress rule already exists.
pub const DUPLICATE_RULE_CODE: &str = "InvalidPermission.Duplicate";

/// Role assumed by the ECS agent to pull images and ship logs.
pub const EXECUTION_ROLE_NAME: &str = "ecsTaskExecutionRole";

/// Role assumed by the dev-environment container itself.
pub const TASK_ROLE_NAME: &str = "devFleetTaskRole";

/// A subnet of the default VPC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubnetInfo {
    pub subnet_id: String,
    pub availability_zone: String,
    pub public: bool,
}

/// The default VPC and its subnets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VpcInfo {
    pub vpc_id: String,
    pub subnets: Vec<SubnetInfo>,
}

impl VpcInfo {
    /// Ids of subnets that map public IPs on launch, in discovery order.
    #[must_use]
    pub fn public_subnet_ids(&self) -> Vec<String> {
        self.subnets
            .iter()
            .filter(|s| s.public)
            .map(|s| s.subnet_id.clone())
            .collect()
    }

    /// First public subnet per availability zone.
    ///
    /// EFS accepts at most one mount target per zone.
    #[must_use]
    pub fn mount_target_subnet_ids(&self) -> Vec<String> {
        let mut seen = BTreeSet::new();
        self.subnets
            .iter()
            .filter(|s| s.public && seen.insert(s.availability_zone.as_str()))
            .map(|s| s.subnet_id.clone())
            .collect()
    }
}

/// A summary row from the EFS listing API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSystemSummary {
    pub name: Option<String>,
    pub file_system_id: String,
}

/// Single-port TCP ingress from one security group to another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngressRule {
    pub group_id: String,
    pub source_group_id: String,
    pub port: u16,
    pub description: String,
}

impl IngressRule {
    /// NFS access from the task security group to an EFS security group.
    #[must_use]
    pub fn nfs_from(source_group_id: &str, group_id: &str) -> Self {
        Self {
            group_id: group_id.to_string(),
            source_group_id: source_group_id.to_string(),
            port: EFS_PORT,
            description: "Allow NFS access from dev fleet tasks".to_string(),
        }
    }
}

/// Result of a successful ingress mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngressOutcome {
    Added,
    AlreadyPresent,
}

/// Whether an EC2 error code means the rule is already in place.
#[must_use]
pub fn is_duplicate_rule_code(code: Option<&str>) -> bool {
    code == Some(DUPLICATE_RULE_CODE)
}

/// Cluster name from an ECS cluster ARN (`arn:...:cluster/<name>`).
#[must_use]
pub fn cluster_name_from_arn(arn: &str) -> &str {
    arn.rsplit('/').next().unwrap_or(arn)
}

/// Leftmost label of a domain, e.g. `qdev` for `qdev.ngdegtm.com`.
#[must_use]
pub fn subdomain_label(domain: &str) -> &str {
    domain.split('.').next().unwrap_or(domain)
}

/// Route53 returns ids as `/hostedzone/Z123`; templates want `Z123`.
#[must_use]
pub fn bare_hosted_zone_id(id: &str) -> &str {
    id.trim_start_matches("/hostedzone/")
}

/// Route53 zone names carry a trailing dot.
#[must_use]
pub fn zone_name_matches(zone_name: &str, wanted: &str) -> bool {
    zone_name.trim_end_matches('.') == wanted.trim_end_matches('.')
}
