//! Human-readable terminal renderer.

use devfleet_common::{Decision, IngressReport, LookupReport, PlanEntry, PlanReport, SynthReport};
use owo_colors::OwoColorize as _;

use crate::domain::config::DevFleetConfig;
use crate::output::OutputContext;

/// Renders domain types as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render the CLI version information.
    pub fn render_version(&self, version: &str) {
        println!("devfleet {version}");
    }

    /// Render a lookup summary.
    pub fn render_lookup(&self, report: &LookupReport) {
        if self.ctx.quiet {
            return;
        }
        println!();
        self.ctx
            .header(&format!("Resource snapshot ({})", report.snapshot_path));
        self.ctx
            .kv("ECR repositories:", &report.ecr_repositories.to_string());
        self.ctx
            .kv("EFS file systems:", &report.efs_filesystems.to_string());
        self.ctx.kv("ECS clusters:", &report.ecs_clusters.to_string());
        for category in &report.degraded {
            self.ctx
                .warn(&format!("{category} lookup failed; recorded as empty"));
        }
    }

    /// Render import/create decisions.
    pub fn render_plan(&self, report: &PlanReport) {
        if self.ctx.quiet {
            return;
        }
        if !report.snapshot_found {
            self.ctx.info(&format!(
                "No snapshot at {}; assuming nothing exists. Run: devfleet lookup",
                report.snapshot_path
            ));
        }
        println!();
        self.ctx.header("Plan:");
        self.print_entries(&report.entries);
    }

    /// Render a synthesis summary with stack outputs.
    pub fn render_synth(&self, report: &SynthReport) {
        if self.ctx.quiet {
            return;
        }
        println!();
        self.ctx.header(&format!("Stack {}", report.stack_name));
        self.print_entries(&report.plan);
        if let Some(ingress) = &report.ingress {
            self.print_ingress(ingress);
        }
        if !report.https_enabled {
            self.ctx.info("HTTPS disabled (no issued certificate)");
        }

        println!();
        self.ctx.header("Outputs:");
        let width = report.outputs.iter().map(|o| o.key.len()).max().unwrap_or(0);
        for output in &report.outputs {
            println!(
                "  {}  {}",
                format!("{:<width$}", output.key).style(self.ctx.styles.dim),
                output.value
            );
        }
        println!();
        println!(
            "  Deploy with: aws cloudformation deploy --template-file {} --stack-name {} --capabilities CAPABILITY_NAMED_IAM",
            report.template_path, report.stack_name
        );
    }

    /// Render the current configuration.
    pub fn render_config(&self, config: &DevFleetConfig, path: &std::path::Path) {
        println!();
        println!(
            "  {}",
            format!("Configuration ({})", path.display()).style(self.ctx.styles.header)
        );
        println!();
        for (key, value) in config.entries() {
            let shown = if value.is_empty() { "(not set)" } else { &value };
            println!("  {:<30} {shown}", format!("{key}:"));
        }
        println!();
        println!("  {}", "Environment:".style(self.ctx.styles.bold));
        for var in ["DEVFLEET_CONFIG", "CDK_DEFAULT_REGION", "AWS_REGION", "NO_COLOR"] {
            println!(
                "    {:<20} {}",
                format!("{var}:"),
                std::env::var(var).unwrap_or_else(|_| "(not set)".to_string())
            );
        }
    }

    fn print_entries(&self, entries: &[PlanEntry]) {
        for entry in entries {
            let style = match &entry.decision {
                Decision::Import(_) => self.ctx.styles.import,
                Decision::Create => self.ctx.styles.create,
            };
            println!(
                "  {:<16} {:<32} {}",
                entry.category.label(),
                entry.name,
                format_decision(&entry.decision).style(style)
            );
        }
    }

    fn print_ingress(&self, ingress: &IngressReport) {
        match &ingress.task_security_group {
            None => self
                .ctx
                .warn("NFS ingress skipped: task security group not found"),
            Some(group) => {
                if ingress.failed.is_empty() {
                    self.ctx.success(&format!(
                        "NFS ingress from {group}: {} mount-target group(s) ready",
                        ingress.reachable()
                    ));
                } else {
                    self.ctx.warn(&format!(
                        "NFS ingress from {group} failed on: {}",
                        ingress.failed.join(", ")
                    ));
                }
            }
        }
    }
}

/// `import <id>` or `create`.
#[must_use]
pub fn format_decision(decision: &Decision) -> String {
    match decision {
        Decision::Import(id) => format!("import {id}"),
        Decision::Create => "create".to_string(),
    }
}
