//! Domain types and validators for devfleet configuration.
//!
//! Pure functions only — no I/O, no async, no filesystem access.

use std::sync::LazyLock;

use anyhow::Result;
use devfleet_common::DEFAULT_SNAPSHOT_FILE;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;
use crate::domain::policy::{FailurePolicy, VALID_FAILURE_POLICIES};

// ── Constants ────────────────────────────────────────────────────────────────

pub const VALID_CONFIG_KEYS: &[&str] = &[
    "stack.name",
    "stack.region",
    "dns.domain_name",
    "dns.hosted_zone_name",
    "dns.wildcard_certificate_arn",
    "registry.repository_name",
    "registry.image_tag",
    "cluster.name",
    "storage.filesystem_name",
    "snapshot.path",
    "output.dir",
    "policy.failure",
];

/// Region used when neither the config nor the environment names one.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Environment variables consulted for the region, in order.
pub const REGION_ENV_VARS: &[&str] = &["CDK_DEFAULT_REGION", "AWS_REGION"];

#[allow(clippy::expect_used)]
static STACK_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9-]{0,127}$").expect("valid regex"));

#[allow(clippy::expect_used)]
static REGION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z]{2}(-[a-z]+)+-\d$").expect("valid regex"));

#[allow(clippy::expect_used)]
static DNS_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-z0-9]([a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,63}$").expect("valid regex")
});

#[allow(clippy::expect_used)]
static CERTIFICATE_ARN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^arn:aws[a-z-]*:acm:[a-z0-9-]+:\d{12}:certificate/[A-Za-z0-9-]+$")
        .expect("valid regex")
});

#[allow(clippy::expect_used)]
static REPOSITORY_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]+(?:[._-][a-z0-9]+)*(?:/[a-z0-9]+(?:[._-][a-z0-9]+)*)*$")
        .expect("valid regex")
});

#[allow(clippy::expect_used)]
static IMAGE_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_.-]{0,127}$").expect("valid regex"));

#[allow(clippy::expect_used)]
static CLUSTER_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{1,255}$").expect("valid regex"));

// EFS names feed the `<name>-sg` security group name, so stay within its charset.
#[allow(clippy::expect_used)]
static FILESYSTEM_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9 ._:/=+@-]{1,250}$").expect("valid regex"));

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `devfleet.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DevFleetConfig {
    pub stack: StackConfig,
    pub dns: DnsConfig,
    pub registry: RegistryConfig,
    pub cluster: ClusterConfig,
    pub storage: StorageConfig,
    pub snapshot: SnapshotConfig,
    pub output: OutputConfig,
    pub policy: PolicyConfig,
}

/// Stack identity and target region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StackConfig {
    pub name: String,
    /// Falls back to `CDK_DEFAULT_REGION`, then `AWS_REGION`, then `us-east-1`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            name: "DevFleetStack".to_string(),
            region: None,
        }
    }
}

/// Public DNS names and the optional wildcard certificate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DnsConfig {
    pub domain_name: String,
    pub hosted_zone_name: String,
    /// Empty means no HTTPS path.
    pub wildcard_certificate_arn: String,
}

impl Default for DnsConfig {
    fn default() -> Self {
        Self {
            domain_name: "qdev.ngdegtm.com".to_string(),
            hosted_zone_name: "ngdegtm.com".to_string(),
            wildcard_certificate_arn: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub repository_name: String,
    pub image_tag: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            repository_name: "dev-fleet-containers".to_string(),
            image_tag: "base-dev-env".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    pub name: String,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            name: "dev-fleet-cluster".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub filesystem_name: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            filesystem_name: "dev-fleet-persistent-storage".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotConfig {
    pub path: String,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_SNAPSHOT_FILE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: "devfleet.out".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    pub failure: FailurePolicy,
}

impl DevFleetConfig {
    /// Current value of a whitelisted key, rendered as a string.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        let value = match key {
            "stack.name" => self.stack.name.clone(),
            "stack.region" => self.stack.region.clone().unwrap_or_default(),
            "dns.domain_name" => self.dns.domain_name.clone(),
            "dns.hosted_zone_name" => self.dns.hosted_zone_name.clone(),
            "dns.wildcard_certificate_arn" => self.dns.wildcard_certificate_arn.clone(),
            "registry.repository_name" => self.registry.repository_name.clone(),
            "registry.image_tag" => self.registry.image_tag.clone(),
            "cluster.name" => self.cluster.name.clone(),
            "storage.filesystem_name" => self.storage.filesystem_name.clone(),
            "snapshot.path" => self.snapshot.path.clone(),
            "output.dir" => self.output.dir.clone(),
            "policy.failure" => self.policy.failure.to_string(),
            _ => return None,
        };
        Some(value)
    }

    /// Validate and assign a whitelisted key.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value is invalid.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        validate_config_key(key)?;
        validate_config_value(key, value)?;
        let owned = value.to_string();
        match key {
            "stack.name" => self.stack.name = owned,
            "stack.region" => self.stack.region = (!value.is_empty()).then_some(owned),
            "dns.domain_name" => self.dns.domain_name = owned,
            "dns.hosted_zone_name" => self.dns.hosted_zone_name = owned,
            "dns.wildcard_certificate_arn" => self.dns.wildcard_certificate_arn = owned,
            "registry.repository_name" => self.registry.repository_name = owned,
            "registry.image_tag" => self.registry.image_tag = owned,
            "cluster.name" => self.cluster.name = owned,
            "storage.filesystem_name" => self.storage.filesystem_name = owned,
            "snapshot.path" => self.snapshot.path = owned,
            "output.dir" => self.output.dir = owned,
            "policy.failure" => {
                self.policy.failure = value
                    .parse()
                    .map_err(|rule| invalid(key, value, rule))?;
            }
            _ => anyhow::bail!("Unknown setting: {key}"),
        }
        Ok(())
    }

    /// All whitelisted keys with their current values, in display order.
    #[must_use]
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        VALID_CONFIG_KEYS
            .iter()
            .map(|key| (*key, self.get(key).unwrap_or_default()))
            .collect()
    }

    /// Cross-field checks that single-key validation cannot express.
    ///
    /// # Errors
    ///
    /// Returns an error if `dns.domain_name` is not inside `dns.hosted_zone_name`.
    pub fn check_consistency(&self) -> Result<()> {
        let zone = self.dns.hosted_zone_name.trim_end_matches('.');
        let domain = self.dns.domain_name.trim_end_matches('.');
        if !domain.ends_with(&format!(".{zone}")) {
            return Err(invalid(
                "dns.domain_name",
                domain,
                format!("must be a subdomain of dns.hosted_zone_name ({zone})"),
            )
            .into());
        }
        Ok(())
    }

    /// Whether an HTTPS path was requested at all.
    #[must_use]
    pub fn certificate_arn(&self) -> Option<&str> {
        let arn = self.dns.wildcard_certificate_arn.trim();
        (!arn.is_empty()).then_some(arn)
    }
}

/// Resolve the deployment region from config, then environment, then default.
#[must_use]
pub fn resolve_region(configured: Option<&str>, env: impl Fn(&str) -> Option<String>) -> String {
    if let Some(region) = configured.filter(|r| !r.is_empty()) {
        return region.to_string();
    }
    REGION_ENV_VARS
        .iter()
        .find_map(|var| env(var).filter(|v| !v.is_empty()))
        .unwrap_or_else(|| DEFAULT_REGION.to_string())
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates a configuration key against the whitelist.
///
/// # Errors
///
/// Returns an error if the key is not in the allowed list.
pub fn validate_config_key(key: &str) -> Result<()> {
    if !VALID_CONFIG_KEYS.contains(&key) {
        return Err(ConfigError::UnknownKey {
            key: key.to_string(),
            valid: VALID_CONFIG_KEYS.join(", "),
        }
        .into());
    }
    Ok(())
}

/// Validates a configuration value for the given key.
///
/// # Errors
///
/// Returns an error if the value is not valid for the key.
pub fn validate_config_value(key: &str, value: &str) -> Result<()> {
    let (ok, rule) = match key {
        "stack.name" => (
            STACK_NAME_RE.is_match(value),
            "Stack names start with a letter and contain only letters, digits and hyphens.",
        ),
        "stack.region" => (
            value.is_empty() || REGION_RE.is_match(value),
            "Expected an AWS region such as us-east-1 (empty to unset).",
        ),
        "dns.domain_name" | "dns.hosted_zone_name" => (
            DNS_NAME_RE.is_match(value.trim_end_matches('.')),
            "Expected a lowercase DNS name such as dev.example.com.",
        ),
        "dns.wildcard_certificate_arn" => (
            value.is_empty() || CERTIFICATE_ARN_RE.is_match(value),
            "Expected an ACM certificate ARN (empty to disable HTTPS).",
        ),
        "registry.repository_name" => (
            (2..=256).contains(&value.len()) && REPOSITORY_NAME_RE.is_match(value),
            "ECR repository names are 2-256 lowercase characters, digits, '.', '_', '-' or '/'.",
        ),
        "registry.image_tag" => (
            IMAGE_TAG_RE.is_match(value),
            "Image tags are up to 128 letters, digits, '_', '.' or '-'.",
        ),
        "cluster.name" => (
            CLUSTER_NAME_RE.is_match(value),
            "ECS cluster names are up to 255 letters, digits, '_' or '-'.",
        ),
        "storage.filesystem_name" => (
            FILESYSTEM_NAME_RE.is_match(value),
            "EFS names are up to 250 characters without control characters.",
        ),
        "snapshot.path" | "output.dir" => (!value.trim().is_empty(), "Path must not be empty."),
        "policy.failure" => (
            value.parse::<FailurePolicy>().is_ok(),
            "Expected fail-open or fail-closed.",
        ),
        _ => return validate_config_key(key),
    };
    if !ok {
        let rule = if key == "policy.failure" {
            format!("Valid values: {}", VALID_FAILURE_POLICIES.join(", "))
        } else {
            rule.to_string()
        };
        return Err(invalid(key, value, rule).into());
    }
    Ok(())
}

fn invalid(key: &str, value: &str, rule: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        rule: rule.into(),
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
