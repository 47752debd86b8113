//! ECS cluster, Fargate task definition and services.

use devfleet_common::Decision;
use serde_json::{Value, json};

use crate::domain::template::{Resource, Template, reference};

use super::ids;

pub const TASK_FAMILY: &str = "dev-environment";
pub const CONTAINER_NAME: &str = "dev-container";
pub const VOLUME_NAME: &str = "dev-workspace";
pub const WORKSPACE_PATH: &str = "/home/developer/workspace";
pub const TASK_CPU: &str = "1024";
pub const TASK_MEMORY_MIB: &str = "2048";
pub const SSH_PORT: u16 = 22;
pub const HTTP_PORT: u16 = 80;

const HEALTH_CHECK_COMMAND: &str =
    "curl -s http://localhost:80 > /dev/null && echo 'HTTP health check passed' || exit 1";

/// Declare or reference the ECS cluster; returns a value accepted by
/// `AWS::ECS::Service.Cluster`.
pub(super) fn cluster(template: &mut Template, name: &str, decision: &Decision) -> Value {
    match decision {
        Decision::Import(existing) => json!(existing),
        Decision::Create => template.add(
            ids::CLUSTER,
            Resource::new("AWS::ECS::Cluster", json!({ "ClusterName": name })),
        ),
    }
}

pub(super) struct TaskInputs {
    pub image: Value,
    pub execution_role_arn: Value,
    pub task_role_arn: Value,
    pub file_system_id: Value,
    pub log_group: Value,
}

pub(super) fn task_definition(template: &mut Template, inputs: TaskInputs) -> Value {
    template.add(
        ids::TASK_DEFINITION,
        Resource::new(
            "AWS::ECS::TaskDefinition",
            json!({
                "Family": TASK_FAMILY,
                "Cpu": TASK_CPU,
                "Memory": TASK_MEMORY_MIB,
                "NetworkMode": "awsvpc",
                "RequiresCompatibilities": ["FARGATE"],
                "ExecutionRoleArn": inputs.execution_role_arn,
                "TaskRoleArn": inputs.task_role_arn,
                "Volumes": [{
                    "Name": VOLUME_NAME,
                    "EFSVolumeConfiguration": {
                        "FilesystemId": inputs.file_system_id,
                        "TransitEncryption": "ENABLED",
                        "AuthorizationConfig": { "IAM": "ENABLED" }
                    }
                }],
                "ContainerDefinitions": [{
                    "Name": CONTAINER_NAME,
                    "Image": inputs.image,
                    "Essential": true,
                    "LogConfiguration": {
                        "LogDriver": "awslogs",
                        "Options": {
                            "awslogs-group": inputs.log_group,
                            "awslogs-stream-prefix": "ecs",
                            "awslogs-region": reference("AWS::Region")
                        }
                    },
                    "LinuxParameters": { "InitProcessEnabled": true },
                    "HealthCheck": {
                        "Command": ["CMD-SHELL", HEALTH_CHECK_COMMAND],
                        "Interval": 30,
                        "Timeout": 5,
                        "Retries": 3,
                        "StartPeriod": 60
                    },
                    "PortMappings": [
                        { "ContainerPort": SSH_PORT, "HostPort": SSH_PORT, "Protocol": "tcp" },
                        { "ContainerPort": HTTP_PORT, "HostPort": HTTP_PORT, "Protocol": "tcp" }
                    ],
                    "MountPoints": [{
                        "ContainerPath": WORKSPACE_PATH,
                        "SourceVolume": VOLUME_NAME,
                        "ReadOnly": false
                    }]
                }]
            }),
        ),
    )
}

pub(super) struct ServiceInputs<'a> {
    pub logical_id: &'a str,
    pub service_name: &'a str,
    pub cluster: &'a Value,
    pub task_definition: &'a Value,
    pub security_group: &'a Value,
    pub subnets: &'a [String],
    pub target_group: Value,
    pub container_port: u16,
    /// The listener must exist before the service registers targets.
    pub listener_id: &'a str,
}

pub(super) fn fargate_service(template: &mut Template, inputs: ServiceInputs<'_>) {
    template.add(
        inputs.logical_id,
        Resource::new(
            "AWS::ECS::Service",
            json!({
                "ServiceName": inputs.service_name,
                "Cluster": inputs.cluster,
                "TaskDefinition": inputs.task_definition,
                "DesiredCount": 1,
                "LaunchType": "FARGATE",
                "NetworkConfiguration": {
                    "AwsvpcConfiguration": {
                        "AssignPublicIp": "ENABLED",
                        "SecurityGroups": [inputs.security_group],
                        "Subnets": inputs.subnets
                    }
                },
                "LoadBalancers": [{
                    "ContainerName": CONTAINER_NAME,
                    "ContainerPort": inputs.container_port,
                    "TargetGroupArn": inputs.target_group
                }]
            }),
        )
        .depends_on(inputs.listener_id),
    );
}
