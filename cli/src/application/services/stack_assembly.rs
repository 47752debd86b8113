//! Application service — stack assembly use-case.
//!
//! Loads the snapshot, decides import-or-create per category, probes roles
//! and the certificate, discovers the network and hosted zone, widens NFS
//! ingress for an imported file system, and synthesizes the template.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use anyhow::{Context, Result};
use chrono::Utc;
use devfleet_common::{Decision, IngressReport, PlanReport, ResourceExport, SynthReport};

use crate::application::ports::{
    CertificateDirectory, ControlPlane, DnsDirectory, IdentityDirectory, NetworkDirectory,
    ProgressReporter, ResourceCatalog, SnapshotStore, TemplateSink,
};
use crate::application::services::filesystem_access::widen_filesystem_access;
use crate::application::services::recovery::absorb;
use crate::application::services::resource_lookup::lookup_resources;
use crate::domain::config::DevFleetConfig;
use crate::domain::error::DiscoveryError;
use crate::domain::network::{EXECUTION_ROLE_NAME, TASK_ROLE_NAME, VpcInfo, bare_hosted_zone_id};
use crate::domain::policy::FailurePolicy;
use crate::domain::reconcile::{ReconcilePlan, ResourceNames, plan};
use crate::domain::stack::{RoleBinding, RoleBindings, StackInputs, output_lines, synthesize};
use crate::domain::template::Template;

pub struct AssemblyOptions<'a, R: ProgressReporter> {
    pub reporter: &'a R,
    pub config: &'a DevFleetConfig,
    pub region: &'a str,
    pub policy: FailurePolicy,
}

/// Everything decided and built during one assembly.
#[derive(Debug)]
pub struct Assembly {
    pub template: Template,
    pub names: ResourceNames,
    pub plan: ReconcilePlan,
    pub roles: RoleBindings,
    /// Issued certificate in use, if the HTTPS path is enabled.
    pub certificate_arn: Option<String>,
    /// Set only on the import-filesystem branch.
    pub ingress: Option<IngressReport>,
}

// ── Snapshot ──────────────────────────────────────────────────────────────────

/// Load the snapshot, treating a missing file as the empty export.
///
/// # Errors
///
/// Returns an error if the snapshot is unreadable and `policy` is fail-closed.
pub async fn load_snapshot(
    store: &impl SnapshotStore,
    reporter: &impl ProgressReporter,
    policy: FailurePolicy,
) -> Result<ResourceExport> {
    let loaded = absorb(
        policy,
        reporter,
        &format!("reading snapshot {}", store.path().display()),
        store.load().await,
    )?;
    match loaded {
        Some(export) => Ok(export),
        None => {
            tracing::info!(
                path = %store.path().display(),
                "no usable snapshot; assuming nothing exists"
            );
            Ok(ResourceExport::empty())
        }
    }
}

/// Decide import-or-create from the snapshot alone.
///
/// # Errors
///
/// Returns an error if the snapshot is unreadable and `policy` is fail-closed.
pub async fn preview_plan(
    store: &impl SnapshotStore,
    config: &DevFleetConfig,
    reporter: &impl ProgressReporter,
    policy: FailurePolicy,
) -> Result<PlanReport> {
    let loaded = absorb(
        policy,
        reporter,
        &format!("reading snapshot {}", store.path().display()),
        store.load().await,
    )?;
    let snapshot_found = loaded.is_some();
    let export = loaded.unwrap_or_default();
    let names = ResourceNames::from_config(config);
    Ok(PlanReport {
        snapshot_path: store.path().display().to_string(),
        snapshot_found,
        entries: plan(&names, &export).entries(&names),
    })
}

/// Best-effort lookup before assembly. Never fails.
pub async fn refresh_snapshot(
    catalog: &impl ResourceCatalog,
    store: &impl SnapshotStore,
    reporter: &impl ProgressReporter,
) {
    if let Err(e) = lookup_resources(catalog, store, reporter, FailurePolicy::FailOpen).await {
        tracing::warn!(error = %format!("{e:#}"), "resource lookup failed; using existing snapshot");
        reporter.warn(&format!("resource lookup failed: {e:#}"));
    }
}

// ── Probes ────────────────────────────────────────────────────────────────────

/// Probe both task roles by name.
///
/// # Errors
///
/// Returns the first probe error when `policy` is fail-closed.
pub async fn probe_roles(
    identity: &impl IdentityDirectory,
    reporter: &impl ProgressReporter,
    policy: FailurePolicy,
) -> Result<RoleBindings> {
    let execution = probe_role(identity, EXECUTION_ROLE_NAME, reporter, policy).await?;
    let task = probe_role(identity, TASK_ROLE_NAME, reporter, policy).await?;
    if task.is_existing() {
        tracing::info!(
            role = TASK_ROLE_NAME,
            "imported task role keeps its own policies; EFS client access is not appended"
        );
    }
    Ok(RoleBindings { execution, task })
}

async fn probe_role(
    identity: &impl IdentityDirectory,
    name: &str,
    reporter: &impl ProgressReporter,
    policy: FailurePolicy,
) -> Result<RoleBinding> {
    let arn = absorb(
        policy,
        reporter,
        &format!("IAM role probe for {name}"),
        identity.role_arn(name).await,
    )?;
    Ok(match arn {
        Some(arn) => {
            tracing::debug!(role = name, %arn, "using existing role");
            RoleBinding::Existing { arn }
        }
        None => {
            tracing::debug!(role = name, "role not found; it will be created");
            RoleBinding::New
        }
    })
}

/// The certificate ARN to use, or `None` when it is not issued.
///
/// # Errors
///
/// Returns the probe error when `policy` is fail-closed.
pub async fn probe_certificate(
    certificates: &impl CertificateDirectory,
    arn: &str,
    reporter: &impl ProgressReporter,
    policy: FailurePolicy,
) -> Result<Option<String>> {
    let issued = absorb(
        policy,
        reporter,
        "certificate probe",
        certificates.certificate_issued(arn).await,
    )?;
    if issued {
        Ok(Some(arn.to_string()))
    } else {
        tracing::warn!(%arn, "certificate is not issued; HTTPS resources skipped");
        reporter.warn("certificate is not issued; skipping HTTPS load balancer");
        Ok(None)
    }
}

// ── Discovery ─────────────────────────────────────────────────────────────────

/// The default VPC with at least one public subnet.
///
/// # Errors
///
/// Returns an error if there is no default VPC or it has no public subnets.
pub async fn discover_vpc(network: &impl NetworkDirectory, region: &str) -> Result<VpcInfo> {
    let vpc = network
        .default_vpc()
        .await
        .context("looking up the default VPC")?
        .ok_or_else(|| DiscoveryError::NoDefaultVpc {
            region: region.to_string(),
        })?;
    if vpc.public_subnet_ids().is_empty() {
        return Err(DiscoveryError::NoPublicSubnets { vpc_id: vpc.vpc_id }.into());
    }
    Ok(vpc)
}

/// Bare id of the hosted zone named `zone_name`.
///
/// # Errors
///
/// Returns an error if the zone cannot be found.
pub async fn discover_hosted_zone(dns: &impl DnsDirectory, zone_name: &str) -> Result<String> {
    let id = dns
        .hosted_zone_id(zone_name)
        .await
        .with_context(|| format!("looking up hosted zone {zone_name}"))?
        .ok_or_else(|| DiscoveryError::HostedZoneNotFound(zone_name.to_string()))?;
    Ok(bare_hosted_zone_id(&id).to_string())
}

// ── Assembly ──────────────────────────────────────────────────────────────────

/// Build the template without writing it.
///
/// # Errors
///
/// Returns an error on inconsistent configuration, failed network or DNS
/// discovery, or any recoverable failure when `policy` is fail-closed.
pub async fn assemble_stack(
    control: &impl ControlPlane,
    store: &impl SnapshotStore,
    opts: &AssemblyOptions<'_, impl ProgressReporter>,
) -> Result<Assembly> {
    let AssemblyOptions {
        reporter,
        config,
        region,
        policy,
    } = *opts;
    config.check_consistency()?;

    let export = load_snapshot(store, reporter, policy).await?;
    let names = ResourceNames::from_config(config);
    let plan = plan(&names, &export);
    for entry in plan.entries(&names) {
        tracing::info!(
            category = %entry.category,
            name = %entry.name,
            import = entry.decision.is_import(),
            "reconciled"
        );
    }

    reporter.step("probing IAM roles...");
    let roles = probe_roles(control, reporter, policy).await?;

    let certificate_arn = match config.certificate_arn() {
        Some(arn) => {
            reporter.step("checking certificate...");
            probe_certificate(control, arn, reporter, policy).await?
        }
        None => None,
    };

    reporter.step(&format!("discovering default VPC in {region}..."));
    let vpc = discover_vpc(control, region).await?;
    reporter.step("resolving hosted zone...");
    let hosted_zone_id = discover_hosted_zone(control, &config.dns.hosted_zone_name).await?;

    let ingress = match &plan.filesystem {
        Decision::Import(file_system_id) => {
            reporter.step(&format!("granting NFS access to {file_system_id}..."));
            Some(
                widen_filesystem_access(control, &vpc.vpc_id, file_system_id, reporter, policy)
                    .await?,
            )
        }
        Decision::Create => None,
    };

    let template = synthesize(&StackInputs {
        config,
        vpc: &vpc,
        hosted_zone_id: &hosted_zone_id,
        plan: &plan,
        roles: &roles,
        certificate_arn: certificate_arn.as_deref(),
    });
    tracing::debug!(resources = template.resources.len(), "template synthesized");

    Ok(Assembly {
        template,
        names,
        plan,
        roles,
        certificate_arn,
        ingress,
    })
}

/// Assemble the stack and write the template.
///
/// # Errors
///
/// Returns an error if assembly fails or the template cannot be written.
pub async fn synth_stack(
    control: &impl ControlPlane,
    store: &impl SnapshotStore,
    sink: &impl TemplateSink,
    opts: &AssemblyOptions<'_, impl ProgressReporter>,
) -> Result<SynthReport> {
    let assembly = assemble_stack(control, store, opts).await?;
    let stack_name = &opts.config.stack.name;
    let path = sink
        .write(stack_name, &assembly.template)
        .await
        .context("writing template")?;
    opts.reporter
        .success(&format!("template written to {}", path.display()));

    Ok(SynthReport {
        stack_name: stack_name.clone(),
        template_path: path.display().to_string(),
        synthesized_at: Utc::now().to_rfc3339(),
        plan: assembly.plan.entries(&assembly.names),
        https_enabled: assembly.certificate_arn.is_some(),
        ingress: assembly.ingress,
        outputs: output_lines(&assembly.template),
    })
}
