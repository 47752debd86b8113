use anyhow::{Context, Result};
use aws_sdk_ec2::error::ProvideErrorMetadata;
use aws_sdk_ec2::types::{Filter, IpPermission, UserIdGroupPair};

use crate::application::ports::NetworkDirectory;
use crate::domain::network::{
    IngressOutcome, IngressRule, SubnetInfo, VpcInfo, is_duplicate_rule_code,
};

use super::{AwsControlPlane, continuation};

fn filter(name: &str, value: &str) -> Filter {
    Filter::builder().name(name).values(value).build()
}

impl AwsControlPlane {
    async fn subnets_of(&self, vpc_id: &str) -> Result<Vec<SubnetInfo>> {
        let mut subnets = Vec::new();
        let mut token = None;
        loop {
            let out = self
                .ec2
                .describe_subnets()
                .filters(filter("vpc-id", vpc_id))
                .set_next_token(token.take())
                .send()
                .await
                .with_context(|| format!("ec2:DescribeSubnets for {vpc_id}"))?;
            subnets.extend(out.subnets().iter().filter_map(|s| {
                Some(SubnetInfo {
                    subnet_id: s.subnet_id()?.to_string(),
                    availability_zone: s.availability_zone().unwrap_or_default().to_string(),
                    public: s.map_public_ip_on_launch().unwrap_or(false),
                })
            }));
            token = continuation(out.next_token());
            if token.is_none() {
                break;
            }
        }
        // Stable order: by zone, then id.
        subnets.sort_by(|a, b| {
            (&a.availability_zone, &a.subnet_id).cmp(&(&b.availability_zone, &b.subnet_id))
        });
        Ok(subnets)
    }
}

impl NetworkDirectory for AwsControlPlane {
    async fn default_vpc(&self) -> Result<Option<VpcInfo>> {
        let out = self
            .ec2
            .describe_vpcs()
            .filters(filter("is-default", "true"))
            .send()
            .await
            .context("ec2:DescribeVpcs")?;
        let Some(vpc_id) = out.vpcs().iter().find_map(|v| v.vpc_id()) else {
            return Ok(None);
        };
        let subnets = self.subnets_of(vpc_id).await?;
        Ok(Some(VpcInfo {
            vpc_id: vpc_id.to_string(),
            subnets,
        }))
    }

    async fn find_security_group(&self, vpc_id: &str, name: &str) -> Result<Option<String>> {
        let out = self
            .ec2
            .describe_security_groups()
            .filters(filter("vpc-id", vpc_id))
            .filters(filter("group-name", name))
            .send()
            .await
            .with_context(|| format!("ec2:DescribeSecurityGroups for {name}"))?;
        Ok(out
            .security_groups()
            .iter()
            .find_map(|g| g.group_id().map(str::to_string)))
    }

    async fn authorize_ingress(&self, rule: &IngressRule) -> Result<IngressOutcome> {
        let permission = IpPermission::builder()
            .ip_protocol("tcp")
            .from_port(i32::from(rule.port))
            .to_port(i32::from(rule.port))
            .user_id_group_pairs(
                UserIdGroupPair::builder()
                    .group_id(&rule.source_group_id)
                    .description(&rule.description)
                    .build(),
            )
            .build();
        match self
            .ec2
            .authorize_security_group_ingress()
            .group_id(&rule.group_id)
            .ip_permissions(permission)
            .send()
            .await
        {
            Ok(_) => Ok(IngressOutcome::Added),
            Err(e) if is_duplicate_rule_code(e.code()) => Ok(IngressOutcome::AlreadyPresent),
            Err(e) => Err(e).with_context(|| {
                format!(
                    "ec2:AuthorizeSecurityGroupIngress on {} from {}",
                    rule.group_id, rule.source_group_id
                )
            }),
        }
    }
}
