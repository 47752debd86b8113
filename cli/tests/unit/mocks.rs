//! Shared mock infrastructure for unit tests.
//!
//! `FakeCloud` implements every control-plane port from canned data and
//! records the mutations it is asked to make. The in-memory stores and the
//! recording reporter stand in for the filesystem and terminal.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use anyhow::Result;
use devfleet_common::ResourceExport;

use devfleet_cli::application::ports::{
    CertificateDirectory, ClusterCatalog, DnsDirectory, FileSystemCatalog, IdentityDirectory,
    NetworkDirectory, Page, ProgressReporter, RegistryCatalog, SnapshotStore, TemplateSink,
};
use devfleet_cli::domain::network::{
    FileSystemSummary, IngressOutcome, IngressRule, SubnetInfo, VpcInfo,
};
use devfleet_cli::domain::template::Template;

pub const TASK_GROUP: &str = "sg-0task";
pub const HOSTED_ZONE: &str = "Z0123456789";

/// Serve `pages[n]` for token `n`; the first request has no token.
fn serve<T: Clone>(pages: &[Vec<T>], token: Option<String>) -> Result<Page<T>> {
    let index = match token {
        Some(t) => t.parse::<usize>()?,
        None => 0,
    };
    let items = pages.get(index).cloned().unwrap_or_default();
    let next_token = (index + 1 < pages.len()).then(|| (index + 1).to_string());
    Ok(Page { items, next_token })
}

pub fn default_vpc() -> VpcInfo {
    VpcInfo {
        vpc_id: "vpc-0default".into(),
        subnets: vec![
            SubnetInfo {
                subnet_id: "subnet-a1".into(),
                availability_zone: "us-east-1a".into(),
                public: true,
            },
            SubnetInfo {
                subnet_id: "subnet-a2".into(),
                availability_zone: "us-east-1a".into(),
                public: true,
            },
            SubnetInfo {
                subnet_id: "subnet-b1".into(),
                availability_zone: "us-east-1b".into(),
                public: true,
            },
            SubnetInfo {
                subnet_id: "subnet-private".into(),
                availability_zone: "us-east-1c".into(),
                public: false,
            },
        ],
    }
}

// ── Mock: control plane ───────────────────────────────────────────────────────

pub struct FakeCloud {
    pub repository_pages: Vec<Vec<String>>,
    pub file_system_pages: Vec<Vec<FileSystemSummary>>,
    pub cluster_pages: Vec<Vec<String>>,
    pub fail_registry: bool,
    pub fail_filesystems: bool,
    pub fail_clusters: bool,
    /// Role name → ARN for roles that exist.
    pub roles: HashMap<String, String>,
    pub fail_roles: bool,
    pub certificate_issued: Result<bool, String>,
    pub vpc: Option<VpcInfo>,
    pub hosted_zone: Option<String>,
    pub task_group: Option<String>,
    pub mount_target_groups: Vec<String>,
    /// Groups that already admit NFS from the task group.
    pub duplicate_groups: HashSet<String>,
    /// Group → error message for ingress calls that fail outright.
    pub ingress_failures: HashMap<String, String>,
    pub authorized: RefCell<Vec<IngressRule>>,
    pub registry_requests: RefCell<Vec<Option<String>>>,
}

impl Default for FakeCloud {
    fn default() -> Self {
        Self {
            repository_pages: Vec::new(),
            file_system_pages: Vec::new(),
            cluster_pages: Vec::new(),
            fail_registry: false,
            fail_filesystems: false,
            fail_clusters: false,
            roles: HashMap::new(),
            fail_roles: false,
            certificate_issued: Ok(true),
            vpc: Some(default_vpc()),
            hosted_zone: Some(format!("/hostedzone/{HOSTED_ZONE}")),
            task_group: Some(TASK_GROUP.into()),
            mount_target_groups: vec!["sg-0efs".into()],
            duplicate_groups: HashSet::new(),
            ingress_failures: HashMap::new(),
            authorized: RefCell::new(Vec::new()),
            registry_requests: RefCell::new(Vec::new()),
        }
    }
}

impl FakeCloud {
    /// Groups an ingress call was made for, in call order.
    pub fn ingress_targets(&self) -> Vec<String> {
        self.authorized
            .borrow()
            .iter()
            .map(|r| r.group_id.clone())
            .collect()
    }
}

impl RegistryCatalog for FakeCloud {
    async fn repository_page(&self, token: Option<String>) -> Result<Page<String>> {
        self.registry_requests.borrow_mut().push(token.clone());
        if self.fail_registry {
            anyhow::bail!("AccessDeniedException: ecr:DescribeRepositories");
        }
        serve(&self.repository_pages, token)
    }
}

impl FileSystemCatalog for FakeCloud {
    async fn file_system_page(&self, token: Option<String>) -> Result<Page<FileSystemSummary>> {
        if self.fail_filesystems {
            anyhow::bail!("ThrottlingException: elasticfilesystem:DescribeFileSystems");
        }
        serve(&self.file_system_pages, token)
    }

    async fn mount_target_security_groups(&self, _file_system_id: &str) -> Result<Vec<String>> {
        Ok(self.mount_target_groups.clone())
    }
}

impl ClusterCatalog for FakeCloud {
    async fn cluster_page(&self, token: Option<String>) -> Result<Page<String>> {
        if self.fail_clusters {
            anyhow::bail!("ServerException: ecs:ListClusters");
        }
        serve(&self.cluster_pages, token)
    }
}

impl NetworkDirectory for FakeCloud {
    async fn default_vpc(&self) -> Result<Option<VpcInfo>> {
        Ok(self.vpc.clone())
    }

    async fn find_security_group(&self, _vpc_id: &str, _name: &str) -> Result<Option<String>> {
        Ok(self.task_group.clone())
    }

    async fn authorize_ingress(&self, rule: &IngressRule) -> Result<IngressOutcome> {
        self.authorized.borrow_mut().push(rule.clone());
        if let Some(message) = self.ingress_failures.get(&rule.group_id) {
            anyhow::bail!("{message}");
        }
        if self.duplicate_groups.contains(&rule.group_id) {
            return Ok(IngressOutcome::AlreadyPresent);
        }
        Ok(IngressOutcome::Added)
    }
}

impl IdentityDirectory for FakeCloud {
    async fn role_arn(&self, name: &str) -> Result<Option<String>> {
        if self.fail_roles {
            anyhow::bail!("AccessDenied: iam:GetRole");
        }
        Ok(self.roles.get(name).cloned())
    }
}

impl CertificateDirectory for FakeCloud {
    async fn certificate_issued(&self, _arn: &str) -> Result<bool> {
        self.certificate_issued
            .clone()
            .map_err(|e| anyhow::anyhow!(e))
    }
}

impl DnsDirectory for FakeCloud {
    async fn hosted_zone_id(&self, _name: &str) -> Result<Option<String>> {
        Ok(self.hosted_zone.clone())
    }
}

// ── Mock: snapshot store ──────────────────────────────────────────────────────

pub struct MemorySnapshotStore {
    pub path: PathBuf,
    pub stored: RefCell<Option<ResourceExport>>,
    pub unreadable: bool,
    pub saves: RefCell<usize>,
}

impl MemorySnapshotStore {
    pub fn empty() -> Self {
        Self {
            path: PathBuf::from("resource_exports.json"),
            stored: RefCell::new(None),
            unreadable: false,
            saves: RefCell::new(0),
        }
    }

    pub fn with(export: ResourceExport) -> Self {
        let store = Self::empty();
        *store.stored.borrow_mut() = Some(export);
        store
    }

    pub fn unreadable() -> Self {
        Self {
            unreadable: true,
            ..Self::empty()
        }
    }

    pub fn from_json(json: &str) -> Self {
        Self::with(ResourceExport::from_json(json).expect("valid snapshot"))
    }
}

impl SnapshotStore for MemorySnapshotStore {
    async fn load(&self) -> Result<Option<ResourceExport>> {
        if self.unreadable {
            anyhow::bail!("parsing snapshot resource_exports.json: expected value at line 1");
        }
        Ok(self.stored.borrow().clone())
    }

    async fn save(&self, export: &ResourceExport) -> Result<()> {
        *self.saves.borrow_mut() += 1;
        *self.stored.borrow_mut() = Some(export.clone());
        Ok(())
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

// ── Mock: template sink ───────────────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryTemplateSink {
    pub written: RefCell<Vec<(String, Template)>>,
}

impl TemplateSink for MemoryTemplateSink {
    async fn write(&self, stack_name: &str, template: &Template) -> Result<PathBuf> {
        self.written
            .borrow_mut()
            .push((stack_name.to_string(), template.clone()));
        Ok(PathBuf::from(format!("out/{stack_name}.template.json")))
    }
}

// ── Mock: reporter ────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingReporter {
    pub steps: RefCell<Vec<String>>,
    pub successes: RefCell<Vec<String>>,
    pub warnings: RefCell<Vec<String>>,
}

impl RecordingReporter {
    pub fn warned_about(&self, needle: &str) -> bool {
        self.warnings.borrow().iter().any(|w| w.contains(needle))
    }
}

impl ProgressReporter for RecordingReporter {
    fn step(&self, message: &str) {
        self.steps.borrow_mut().push(message.to_string());
    }

    fn success(&self, message: &str) {
        self.successes.borrow_mut().push(message.to_string());
    }

    fn warn(&self, message: &str) {
        self.warnings.borrow_mut().push(message.to_string());
    }
}
