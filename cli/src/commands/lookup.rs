//! `devfleet lookup` — snapshot the resources that already exist.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::resource_lookup::lookup_resources;
use crate::commands::SnapshotArgs;
use crate::infra::aws::AwsControlPlane;
use crate::output::TerminalReporter;

#[derive(Args, Debug, Default)]
pub struct LookupArgs {
    #[command(flatten)]
    pub snapshot: SnapshotArgs,

    /// AWS region [default: stack.region, CDK_DEFAULT_REGION, AWS_REGION, us-east-1]
    #[arg(long)]
    pub region: Option<String>,
}

/// Run the lookup command.
///
/// Exits 0 even when every category degraded to empty under fail-open.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded, the snapshot cannot be
/// written, or a listing fails under fail-closed.
pub async fn run(app: &AppContext, args: &LookupArgs) -> Result<ExitCode> {
    let config = app.load_config()?;
    let region = app.region(args.region.as_deref(), &config);
    let store = args.snapshot.store(&config);
    let policy = args.snapshot.policy(&config);
    tracing::info!(%region, %policy, "starting resource lookup");

    let control = AwsControlPlane::connect(&region).await;
    let reporter = TerminalReporter::with_spinner(&app.output, "looking up existing resources...");
    let report = match lookup_resources(&control, &store, &reporter, policy).await {
        Ok(report) => {
            reporter.finish("lookup complete");
            report
        }
        Err(e) => {
            reporter.abandon();
            return Err(e);
        }
    };

    app.renderer().render_lookup(&report)?;
    Ok(ExitCode::SUCCESS)
}
