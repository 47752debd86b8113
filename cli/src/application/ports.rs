//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` — never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::{Path, PathBuf};

use anyhow::Result;
use devfleet_common::ResourceExport;

use crate::domain::config::DevFleetConfig;
use crate::domain::network::{FileSystemSummary, IngressOutcome, IngressRule, VpcInfo};
use crate::domain::template::Template;

// ── Value Types ───────────────────────────────────────────────────────────────

/// One page of a control-plane listing.
///
/// `next_token` is `None` on the last page. Adapters normalise empty tokens
/// to `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_token: Option<String>,
}

impl<T> Page<T> {
    /// A single, final page.
    #[must_use]
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_token: None,
        }
    }
}

// ── Resource Catalog Ports ────────────────────────────────────────────────────

/// Container registry listing.
#[allow(async_fn_in_trait)]
pub trait RegistryCatalog {
    /// One page of repository names.
    async fn repository_page(&self, token: Option<String>) -> Result<Page<String>>;
}

/// Shared file-system listing and mount-target inspection.
#[allow(async_fn_in_trait)]
pub trait FileSystemCatalog {
    /// One page of file systems, named or not.
    async fn file_system_page(&self, token: Option<String>) -> Result<Page<FileSystemSummary>>;
    /// Security groups attached to every mount target of a file system.
    async fn mount_target_security_groups(&self, file_system_id: &str) -> Result<Vec<String>>;
}

/// Container cluster listing.
#[allow(async_fn_in_trait)]
pub trait ClusterCatalog {
    /// One page of cluster ARNs.
    async fn cluster_page(&self, token: Option<String>) -> Result<Page<String>>;
}

/// Composite trait — the three categories tracked by the Resource Export.
pub trait ResourceCatalog: RegistryCatalog + FileSystemCatalog + ClusterCatalog {}

impl<T> ResourceCatalog for T where T: RegistryCatalog + FileSystemCatalog + ClusterCatalog {}

// ── Discovery Ports ───────────────────────────────────────────────────────────

/// VPC, subnet and security-group operations.
#[allow(async_fn_in_trait)]
pub trait NetworkDirectory {
    /// The account's default VPC with its subnets, or `None` if there is none.
    async fn default_vpc(&self) -> Result<Option<VpcInfo>>;
    /// Id of the security group named `name` in `vpc_id`.
    async fn find_security_group(&self, vpc_id: &str, name: &str) -> Result<Option<String>>;
    /// Add an ingress rule. An identical existing rule is `AlreadyPresent`,
    /// not an error.
    async fn authorize_ingress(&self, rule: &IngressRule) -> Result<IngressOutcome>;
}

/// IAM role lookup.
#[allow(async_fn_in_trait)]
pub trait IdentityDirectory {
    /// ARN of the role named `name`, or `None` if it does not exist.
    async fn role_arn(&self, name: &str) -> Result<Option<String>>;
}

/// ACM certificate lookup.
#[allow(async_fn_in_trait)]
pub trait CertificateDirectory {
    /// Whether the certificate exists and has status `ISSUED`.
    async fn certificate_issued(&self, arn: &str) -> Result<bool>;
}

/// Route53 hosted-zone lookup.
#[allow(async_fn_in_trait)]
pub trait DnsDirectory {
    /// Bare id (no `/hostedzone/` prefix) of the public zone named `name`.
    async fn hosted_zone_id(&self, name: &str) -> Result<Option<String>>;
}

/// Composite trait — everything stack assembly reads from the control plane.
pub trait ControlPlane:
    ResourceCatalog + NetworkDirectory + IdentityDirectory + CertificateDirectory + DnsDirectory
{
}

impl<T> ControlPlane for T where
    T: ResourceCatalog + NetworkDirectory + IdentityDirectory + CertificateDirectory + DnsDirectory
{
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait — no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

// ── Persistence Ports ─────────────────────────────────────────────────────────

/// Abstracts snapshot persistence (load/save).
#[allow(async_fn_in_trait)]
pub trait SnapshotStore {
    /// Load the snapshot, returning `None` if no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    async fn load(&self) -> Result<Option<ResourceExport>>;
    /// Replace the snapshot with `export`.
    async fn save(&self, export: &ResourceExport) -> Result<()>;
    /// Location of the snapshot file.
    fn path(&self) -> &Path;
}

/// Abstracts where synthesized templates are written.
#[allow(async_fn_in_trait)]
pub trait TemplateSink {
    /// Write the template for `stack_name` and return the file path.
    async fn write(&self, stack_name: &str, template: &Template) -> Result<PathBuf>;
}

/// Abstracts configuration persistence.
pub trait ConfigStore {
    /// Load the configuration, returning defaults if no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    fn load(&self) -> Result<DevFleetConfig>;
    /// Persist the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    fn save(&self, config: &DevFleetConfig) -> Result<()>;
    /// Location of the configuration file.
    fn path(&self) -> PathBuf;
}
