//! Container registry, shared file system and log group.

use devfleet_common::Decision;
use serde_json::{Value, json};

use crate::domain::network::{EFS_PORT, VpcInfo};
use crate::domain::template::{RemovalPolicy, Resource, Template, get_att, reference, sub};

use super::ids;

/// Images kept by the repository lifecycle rule.
pub const MAX_IMAGE_COUNT: u32 = 10;

/// Log retention for the dev-environment log group.
pub const LOG_RETENTION_DAYS: u32 = 30;

pub const LOG_GROUP_NAME: &str = "/ecs/dev-environment";

/// Lifecycle policy text keeping only the newest images.
#[must_use]
pub fn lifecycle_policy_text() -> String {
    json!({
        "rules": [{
            "rulePriority": 1,
            "description": format!("Keep only the last {MAX_IMAGE_COUNT} images"),
            "selection": {
                "tagStatus": "any",
                "countType": "imageCountMoreThan",
                "countNumber": MAX_IMAGE_COUNT
            },
            "action": { "type": "expire" }
        }]
    })
    .to_string()
}

/// Declare or reference the ECR repository; returns its URI.
pub(super) fn registry(template: &mut Template, name: &str, decision: &Decision) -> Value {
    match decision {
        Decision::Import(existing) => sub(&format!(
            "${{AWS::AccountId}}.dkr.ecr.${{AWS::Region}}.${{AWS::URLSuffix}}/{existing}"
        )),
        Decision::Create => {
            template.add(
                ids::REPOSITORY,
                Resource::new(
                    "AWS::ECR::Repository",
                    json!({
                        "RepositoryName": name,
                        "ImageScanningConfiguration": { "ScanOnPush": true },
                        "LifecyclePolicy": { "LifecyclePolicyText": lifecycle_policy_text() }
                    }),
                )
                .removal(RemovalPolicy::Retain),
            );
            get_att(ids::REPOSITORY, "RepositoryUri")
        }
    }
}

/// Declare or reference the EFS file system; returns its id.
///
/// The create branch also declares the file system's security group, one
/// mount target per availability zone, and NFS ingress from the task group.
/// Ingress for an imported file system is handled outside the template.
pub(super) fn filesystem(
    template: &mut Template,
    name: &str,
    decision: &Decision,
    vpc: &VpcInfo,
    task_group_id: &Value,
) -> Value {
    if let Decision::Import(file_system_id) = decision {
        return json!(file_system_id);
    }

    template.add(
        ids::EFS_SECURITY_GROUP,
        Resource::new(
            "AWS::EC2::SecurityGroup",
            json!({
                "GroupDescription": "Security group for Dev Fleet EFS",
                "GroupName": format!("{name}-sg"),
                "VpcId": vpc.vpc_id
            }),
        ),
    );
    template.add(
        ids::EFS_INGRESS_FROM_TASKS,
        Resource::new(
            "AWS::EC2::SecurityGroupIngress",
            json!({
                "GroupId": get_att(ids::EFS_SECURITY_GROUP, "GroupId"),
                "IpProtocol": "tcp",
                "FromPort": EFS_PORT,
                "ToPort": EFS_PORT,
                "SourceSecurityGroupId": task_group_id,
                "Description": "Allow NFS access from dev fleet tasks"
            }),
        ),
    );
    let file_system_id = template.add(
        ids::FILE_SYSTEM,
        Resource::new(
            "AWS::EFS::FileSystem",
            json!({
                "Encrypted": true,
                "PerformanceMode": "generalPurpose",
                "ThroughputMode": "bursting",
                "LifecyclePolicies": [{ "TransitionToIA": "AFTER_14_DAYS" }],
                "FileSystemTags": [{ "Key": "Name", "Value": name }]
            }),
        )
        .removal(RemovalPolicy::Retain),
    );
    for (index, subnet_id) in vpc.mount_target_subnet_ids().iter().enumerate() {
        template.add(
            &format!("{}{}", ids::MOUNT_TARGET_PREFIX, index + 1),
            Resource::new(
                "AWS::EFS::MountTarget",
                json!({
                    "FileSystemId": reference(ids::FILE_SYSTEM),
                    "SubnetId": subnet_id,
                    "SecurityGroups": [get_att(ids::EFS_SECURITY_GROUP, "GroupId")]
                }),
            ),
        );
    }
    file_system_id
}

/// Declare the CloudWatch log group; returns its name.
pub(super) fn log_group(template: &mut Template) -> Value {
    template.add(
        ids::LOG_GROUP,
        Resource::new(
            "AWS::Logs::LogGroup",
            json!({
                "LogGroupName": LOG_GROUP_NAME,
                "RetentionInDays": LOG_RETENTION_DAYS
            }),
        )
        .removal(RemovalPolicy::Delete),
    )
}
