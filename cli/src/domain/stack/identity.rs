//! IAM roles for the Fargate task definition.

use serde_json::{Value, json};

use crate::domain::network::{EXECUTION_ROLE_NAME, TASK_ROLE_NAME};
use crate::domain::template::{Resource, Template, get_att, sub};

use super::ids;

/// Whether a role is referenced by ARN or declared by the stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleBinding {
    Existing { arn: String },
    New,
}

impl RoleBinding {
    #[must_use]
    pub fn is_existing(&self) -> bool {
        matches!(self, Self::Existing { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleBindings {
    pub execution: RoleBinding,
    pub task: RoleBinding,
}

impl Default for RoleBindings {
    fn default() -> Self {
        Self {
            execution: RoleBinding::New,
            task: RoleBinding::New,
        }
    }
}

pub(super) struct RoleArns {
    pub execution: Value,
    pub task: Value,
}

fn assume_by_ecs_tasks() -> Value {
    json!({
        "Version": "2012-10-17",
        "Statement": [{
            "Effect": "Allow",
            "Principal": { "Service": "ecs-tasks.amazonaws.com" },
            "Action": "sts:AssumeRole"
        }]
    })
}

/// Statement granting the container EFS client access.
#[must_use]
pub fn efs_access_statement() -> Value {
    json!({
        "Effect": "Allow",
        "Action": ["elasticfilesystem:ClientMount", "elasticfilesystem:ClientWrite"],
        "Resource": "*"
    })
}

pub(super) fn roles(template: &mut Template, bindings: &RoleBindings) -> RoleArns {
    let execution = match &bindings.execution {
        RoleBinding::Existing { arn } => json!(arn),
        RoleBinding::New => {
            template.add(
                ids::EXECUTION_ROLE,
                Resource::new(
                    "AWS::IAM::Role",
                    json!({
                        "RoleName": EXECUTION_ROLE_NAME,
                        "AssumeRolePolicyDocument": assume_by_ecs_tasks(),
                        "ManagedPolicyArns": [sub(
                            "arn:${AWS::Partition}:iam::aws:policy/service-role/AmazonECSTaskExecutionRolePolicy"
                        )]
                    }),
                ),
            );
            get_att(ids::EXECUTION_ROLE, "Arn")
        }
    };

    // An imported task role keeps whatever policies it already has.
    let task = match &bindings.task {
        RoleBinding::Existing { arn } => json!(arn),
        RoleBinding::New => {
            template.add(
                ids::TASK_ROLE,
                Resource::new(
                    "AWS::IAM::Role",
                    json!({
                        "RoleName": TASK_ROLE_NAME,
                        "AssumeRolePolicyDocument": assume_by_ecs_tasks(),
                        "Policies": [{
                            "PolicyName": "DevFleetTaskRoleDefaultPolicy",
                            "PolicyDocument": {
                                "Version": "2012-10-17",
                                "Statement": [efs_access_statement()]
                            }
                        }]
                    }),
                ),
            );
            get_att(ids::TASK_ROLE, "Arn")
        }
    };

    RoleArns { execution, task }
}
