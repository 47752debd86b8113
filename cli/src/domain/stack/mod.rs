//! Stack topology: turns the reconcile plan and discovered facts into a
//! CloudFormation template.
//!
//! Pure functions only. Every control-plane answer the topology depends on
//! arrives through [`StackInputs`].

mod compute;
mod identity;
mod routing;
mod storage;

pub use compute::{CONTAINER_NAME, TASK_FAMILY};
pub use identity::{RoleBinding, RoleBindings, efs_access_statement};
pub use storage::{LOG_GROUP_NAME, MAX_IMAGE_COUNT, lifecycle_policy_text};

use devfleet_common::OutputLine;
use serde_json::json;

use crate::domain::config::DevFleetConfig;
use crate::domain::network::{VpcInfo, subdomain_label};
use crate::domain::reconcile::ReconcilePlan;
use crate::domain::template::{Template, describe_value, get_att, join};

/// Logical ids used in the template.
pub mod ids {
    pub const REPOSITORY: &str = "DevFleetEcrRepository";
    pub const EXECUTION_ROLE: &str = "EcsTaskExecutionRole";
    pub const TASK_ROLE: &str = "DevFleetTaskRole";
    pub const FILE_SYSTEM: &str = "DevFleetEFS";
    pub const EFS_SECURITY_GROUP: &str = "EfsSecurityGroup";
    pub const EFS_INGRESS_FROM_TASKS: &str = "EfsSecurityGroupFromTasksNfs";
    pub const MOUNT_TARGET_PREFIX: &str = "DevFleetEFSMountTarget";
    pub const LOG_GROUP: &str = "DevEnvironmentLogGroup";
    pub const CLUSTER: &str = "DevFleetCluster";
    pub const LB_SECURITY_GROUP: &str = "LoadBalancerSecurityGroup";
    pub const TASK_SECURITY_GROUP: &str = "TaskSecurityGroup";
    pub const TASK_INGRESS_FROM_LB: &str = "TaskSecurityGroupFromLoadBalancerSsh";
    pub const TASK_DEFINITION: &str = "DevEnvironmentTaskDefinition";
    pub const NETWORK_LB: &str = "DevFleetLoadBalancer";
    pub const SSH_TARGET_GROUP: &str = "DevFleetTargetGroup";
    pub const SSH_LISTENER: &str = "DevFleetSshListener";
    pub const SSH_SERVICE: &str = "DevFleetService";
    pub const SSH_RECORD: &str = "DevFleetDnsRecord";
    pub const APP_LB: &str = "DevFleetAppLoadBalancer";
    pub const HTTP_TARGET_GROUP: &str = "DevFleetHttpTargetGroup";
    pub const HTTP_LISTENER: &str = "DevFleetHttpListener";
    pub const HTTPS_LISTENER: &str = "DevFleetHttpsListener";
    pub const HTTP_SERVICE: &str = "DevFleetHttpTargetRegistration";
    pub const HTTPS_RECORD: &str = "DevFleetHttpsDnsRecord";
}

/// Everything the topology needs, already looked up and decided.
pub struct StackInputs<'a> {
    pub config: &'a DevFleetConfig,
    pub vpc: &'a VpcInfo,
    pub hosted_zone_id: &'a str,
    pub plan: &'a ReconcilePlan,
    pub roles: &'a RoleBindings,
    /// Present only when the certificate probe found an issued certificate.
    pub certificate_arn: Option<&'a str>,
}

/// Build the full template.
#[must_use]
pub fn synthesize(inputs: &StackInputs<'_>) -> Template {
    let config = inputs.config;
    let subnets = inputs.vpc.public_subnet_ids();
    let mut template = Template::new("Shared developer-environment fleet (devfleet)");

    let repository_uri = storage::registry(
        &mut template,
        &config.registry.repository_name,
        &inputs.plan.registry,
    );
    let role_arns = identity::roles(&mut template, inputs.roles);
    let groups = routing::security_groups(&mut template, inputs.vpc);
    let file_system_id = storage::filesystem(
        &mut template,
        &config.storage.filesystem_name,
        &inputs.plan.filesystem,
        inputs.vpc,
        &groups.task,
    );
    let log_group = storage::log_group(&mut template);
    let cluster = compute::cluster(&mut template, &config.cluster.name, &inputs.plan.cluster);

    let image = join(vec![
        repository_uri.clone(),
        json!(format!(":{}", config.registry.image_tag)),
    ]);
    let task_definition = compute::task_definition(
        &mut template,
        compute::TaskInputs {
            image,
            execution_role_arn: role_arns.execution,
            task_role_arn: role_arns.task,
            file_system_id: file_system_id.clone(),
            log_group,
        },
    );

    let ssh_target_group = routing::network_load_balancer(&mut template, inputs.vpc, &subnets);
    compute::fargate_service(
        &mut template,
        compute::ServiceInputs {
            logical_id: ids::SSH_SERVICE,
            service_name: "dev-fleet-service",
            cluster: &cluster,
            task_definition: &task_definition,
            security_group: &groups.task,
            subnets: &subnets,
            target_group: ssh_target_group,
            container_port: compute::SSH_PORT,
            listener_id: ids::SSH_LISTENER,
        },
    );

    let zone = config.dns.hosted_zone_name.trim_end_matches('.');
    let subdomain = subdomain_label(&config.dns.domain_name);
    routing::alias_record(
        &mut template,
        ids::SSH_RECORD,
        inputs.hosted_zone_id,
        &format!("{subdomain}.{zone}"),
        ids::NETWORK_LB,
    );

    if let Some(certificate_arn) = inputs.certificate_arn {
        let http_target_group = routing::application_load_balancer(
            &mut template,
            inputs.vpc,
            &subnets,
            &groups.load_balancer,
            certificate_arn,
        );
        compute::fargate_service(
            &mut template,
            compute::ServiceInputs {
                logical_id: ids::HTTP_SERVICE,
                service_name: "dev-fleet-http-service",
                cluster: &cluster,
                task_definition: &task_definition,
                security_group: &groups.task,
                subnets: &subnets,
                target_group: http_target_group,
                container_port: compute::HTTP_PORT,
                listener_id: ids::HTTPS_LISTENER,
            },
        );
        routing::alias_record(
            &mut template,
            ids::HTTPS_RECORD,
            inputs.hosted_zone_id,
            &format!("web.{subdomain}.{zone}"),
            ids::APP_LB,
        );
    }

    let domain = &config.dns.domain_name;
    template.output(
        "LoadBalancerDnsName",
        "DNS name of the load balancer",
        get_att(ids::NETWORK_LB, "DNSName"),
    );
    template.output(
        "CustomDomainName",
        "Custom domain name for the development environment",
        json!(domain),
    );
    template.output("EfsId", "ID of the EFS file system", file_system_id);
    template.output("EcrRepositoryUri", "URI of the ECR repository", repository_uri);
    template.output(
        "ConnectionCommand",
        "Command to connect to the development environment",
        json!(format!("ssh -i ~/.ssh/your_key developer@{domain}")),
    );
    if inputs.certificate_arn.is_some() {
        template.output(
            "HttpsUrl",
            "HTTPS URL to check container health",
            json!(format!("https://web.{domain}/")),
        );
    }

    template
}

/// Outputs in presentation order, with deploy-time values as placeholders.
#[must_use]
pub fn output_lines(template: &Template) -> Vec<OutputLine> {
    const ORDER: &[&str] = &[
        "LoadBalancerDnsName",
        "CustomDomainName",
        "EfsId",
        "EcrRepositoryUri",
        "ConnectionCommand",
        "HttpsUrl",
    ];
    ORDER
        .iter()
        .filter_map(|key| {
            template.outputs.get(*key).map(|output| OutputLine {
                key: (*key).to_string(),
                description: output.description.clone(),
                value: describe_value(&output.value),
            })
        })
        .collect()
}
