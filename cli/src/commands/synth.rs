//! `devfleet synth` — assemble the stack and write the template.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::stack_assembly::{
    AssemblyOptions, refresh_snapshot, synth_stack,
};
use crate::commands::SnapshotArgs;
use crate::infra::aws::AwsControlPlane;
use crate::infra::template::TemplateWriter;
use crate::output::TerminalReporter;

#[derive(Args, Debug, Default)]
pub struct SynthArgs {
    #[command(flatten)]
    pub snapshot: SnapshotArgs,

    /// AWS region [default: stack.region, CDK_DEFAULT_REGION, AWS_REGION, us-east-1]
    #[arg(long)]
    pub region: Option<String>,

    /// Use the existing snapshot instead of running a lookup first
    #[arg(long)]
    pub skip_lookup: bool,

    /// Template directory [default: output.dir from config]
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

/// Run the synth command.
///
/// A failed pre-synthesis lookup never changes the exit code.
///
/// # Errors
///
/// Returns an error on configuration or discovery failures, template write
/// failures, or any recoverable failure under fail-closed.
pub async fn run(app: &AppContext, args: &SynthArgs) -> Result<ExitCode> {
    let config = app.load_config()?;
    let region = app.region(args.region.as_deref(), &config);
    let store = args.snapshot.store(&config);
    let policy = args.snapshot.policy(&config);
    let sink = TemplateWriter::new(
        args.output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(&config.output.dir)),
    );
    tracing::info!(%region, %policy, stack = %config.stack.name, "starting synthesis");

    let control = AwsControlPlane::connect(&region).await;
    let reporter = TerminalReporter::with_spinner(&app.output, "synthesizing stack...");

    if !args.skip_lookup {
        refresh_snapshot(&control, &store, &reporter).await;
    }

    let opts = AssemblyOptions {
        reporter: &reporter,
        config: &config,
        region: &region,
        policy,
    };
    let report = match synth_stack(&control, &store, &sink, &opts).await {
        Ok(report) => {
            reporter.finish(&format!("{} synthesized", config.stack.name));
            report
        }
        Err(e) => {
            reporter.abandon();
            return Err(e);
        }
    };

    app.renderer().render_synth(&report)?;
    Ok(ExitCode::SUCCESS)
}
