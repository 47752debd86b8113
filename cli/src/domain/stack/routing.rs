//! Security groups, load balancers and DNS records.

use serde_json::{Value, json};

use crate::domain::network::{TASK_SECURITY_GROUP_NAME, VpcInfo};
use crate::domain::template::{Resource, Template, get_att};

use super::compute::{HTTP_PORT, SSH_PORT};
use super::ids;

pub const NETWORK_LB_NAME: &str = "dev-fleet-lb";
pub const SSH_TARGET_GROUP_NAME: &str = "dev-fleet-target-group";
pub const APP_LB_NAME: &str = "dev-fleet-app-lb";
pub const HTTP_TARGET_GROUP_NAME: &str = "dev-fleet-http-tg";
pub const LB_SECURITY_GROUP_NAME: &str = "dev-fleet-lb-sg";
pub const TLS_POLICY: &str = "ELBSecurityPolicy-TLS-1-2-2017-01";

pub(super) struct SecurityGroups {
    pub load_balancer: Value,
    pub task: Value,
}

fn open_tcp(port: u16, description: &str) -> Value {
    json!({
        "CidrIp": "0.0.0.0/0",
        "IpProtocol": "tcp",
        "FromPort": port,
        "ToPort": port,
        "Description": description
    })
}

pub(super) fn security_groups(template: &mut Template, vpc: &VpcInfo) -> SecurityGroups {
    template.add(
        ids::LB_SECURITY_GROUP,
        Resource::new(
            "AWS::EC2::SecurityGroup",
            json!({
                "GroupDescription": "Security group for Dev Fleet Load Balancer",
                "GroupName": LB_SECURITY_GROUP_NAME,
                "VpcId": vpc.vpc_id,
                "SecurityGroupIngress": [
                    open_tcp(22, "Allow SSH access"),
                    open_tcp(80, "Allow HTTP access"),
                    open_tcp(443, "Allow HTTPS access")
                ]
            }),
        ),
    );
    template.add(
        ids::TASK_SECURITY_GROUP,
        Resource::new(
            "AWS::EC2::SecurityGroup",
            json!({
                "GroupDescription": "Security group for Dev Fleet ECS Tasks",
                "GroupName": TASK_SECURITY_GROUP_NAME,
                "VpcId": vpc.vpc_id,
                "SecurityGroupIngress": [open_tcp(80, "Allow HTTP access for health checks")]
            }),
        ),
    );
    let load_balancer = get_att(ids::LB_SECURITY_GROUP, "GroupId");
    let task = get_att(ids::TASK_SECURITY_GROUP, "GroupId");
    template.add(
        ids::TASK_INGRESS_FROM_LB,
        Resource::new(
            "AWS::EC2::SecurityGroupIngress",
            json!({
                "GroupId": task,
                "IpProtocol": "tcp",
                "FromPort": SSH_PORT,
                "ToPort": SSH_PORT,
                "SourceSecurityGroupId": load_balancer,
                "Description": "Allow SSH access from load balancer"
            }),
        ),
    );
    SecurityGroups {
        load_balancer,
        task,
    }
}

/// Network load balancer with a TCP/22 listener; returns the target group.
pub(super) fn network_load_balancer(
    template: &mut Template,
    vpc: &VpcInfo,
    subnets: &[String],
) -> Value {
    let load_balancer = template.add(
        ids::NETWORK_LB,
        Resource::new(
            "AWS::ElasticLoadBalancingV2::LoadBalancer",
            json!({
                "Name": NETWORK_LB_NAME,
                "Type": "network",
                "Scheme": "internet-facing",
                "Subnets": subnets
            }),
        ),
    );
    let target_group = template.add(
        ids::SSH_TARGET_GROUP,
        Resource::new(
            "AWS::ElasticLoadBalancingV2::TargetGroup",
            json!({
                "Name": SSH_TARGET_GROUP_NAME,
                "Port": SSH_PORT,
                "Protocol": "TCP",
                "TargetType": "ip",
                "VpcId": vpc.vpc_id,
                "HealthCheckProtocol": "HTTP",
                "HealthCheckPort": HTTP_PORT.to_string(),
                "HealthCheckPath": "/",
                "HealthCheckIntervalSeconds": 30,
                "HealthyThresholdCount": 3,
                "UnhealthyThresholdCount": 3
            }),
        ),
    );
    template.add(
        ids::SSH_LISTENER,
        Resource::new(
            "AWS::ElasticLoadBalancingV2::Listener",
            json!({
                "LoadBalancerArn": load_balancer,
                "Port": SSH_PORT,
                "Protocol": "TCP",
                "DefaultActions": [{ "Type": "forward", "TargetGroupArn": target_group }]
            }),
        ),
    );
    target_group
}

/// Application load balancer redirecting HTTP to HTTPS; returns the
/// target group behind the HTTPS listener.
pub(super) fn application_load_balancer(
    template: &mut Template,
    vpc: &VpcInfo,
    subnets: &[String],
    security_group: &Value,
    certificate_arn: &str,
) -> Value {
    let load_balancer = template.add(
        ids::APP_LB,
        Resource::new(
            "AWS::ElasticLoadBalancingV2::LoadBalancer",
            json!({
                "Name": APP_LB_NAME,
                "Type": "application",
                "Scheme": "internet-facing",
                "Subnets": subnets,
                "SecurityGroups": [security_group]
            }),
        ),
    );
    let target_group = template.add(
        ids::HTTP_TARGET_GROUP,
        Resource::new(
            "AWS::ElasticLoadBalancingV2::TargetGroup",
            json!({
                "Name": HTTP_TARGET_GROUP_NAME,
                "Port": HTTP_PORT,
                "Protocol": "HTTP",
                "TargetType": "ip",
                "VpcId": vpc.vpc_id,
                "HealthCheckPath": "/",
                "HealthCheckIntervalSeconds": 30,
                "HealthyThresholdCount": 3,
                "UnhealthyThresholdCount": 3
            }),
        ),
    );
    template.add(
        ids::HTTP_LISTENER,
        Resource::new(
            "AWS::ElasticLoadBalancingV2::Listener",
            json!({
                "LoadBalancerArn": load_balancer,
                "Port": 80,
                "Protocol": "HTTP",
                "DefaultActions": [{
                    "Type": "redirect",
                    "RedirectConfig": {
                        "Protocol": "HTTPS",
                        "Port": "443",
                        "Host": "#{host}",
                        "Path": "/#{path}",
                        "Query": "#{query}",
                        "StatusCode": "HTTP_301"
                    }
                }]
            }),
        ),
    );
    template.add(
        ids::HTTPS_LISTENER,
        Resource::new(
            "AWS::ElasticLoadBalancingV2::Listener",
            json!({
                "LoadBalancerArn": load_balancer,
                "Port": 443,
                "Protocol": "HTTPS",
                "Certificates": [{ "CertificateArn": certificate_arn }],
                "SslPolicy": TLS_POLICY,
                "DefaultActions": [{ "Type": "forward", "TargetGroupArn": target_group }]
            }),
        ),
    );
    target_group
}

/// Alias A record pointing `record_name` at a load balancer.
pub(super) fn alias_record(
    template: &mut Template,
    logical_id: &str,
    hosted_zone_id: &str,
    record_name: &str,
    load_balancer_id: &str,
) {
    template.add(
        logical_id,
        Resource::new(
            "AWS::Route53::RecordSet",
            json!({
                "HostedZoneId": hosted_zone_id,
                "Name": format!("{record_name}."),
                "Type": "A",
                "AliasTarget": {
                    "DNSName": get_att(load_balancer_id, "DNSName"),
                    "HostedZoneId": get_att(load_balancer_id, "CanonicalHostedZoneID")
                }
            }),
        ),
    );
}
