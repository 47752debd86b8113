//! `devfleet plan` — preview import/create decisions from the snapshot.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::stack_assembly::preview_plan;
use crate::commands::SnapshotArgs;
use crate::output::TerminalReporter;

#[derive(Args, Debug, Default)]
pub struct PlanArgs {
    #[command(flatten)]
    pub snapshot: SnapshotArgs,
}

/// Run the plan command. Makes no AWS calls.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded, or the snapshot is
/// unreadable under fail-closed.
pub async fn run(app: &AppContext, args: &PlanArgs) -> Result<ExitCode> {
    let config = app.load_config()?;
    let store = args.snapshot.store(&config);
    let policy = args.snapshot.policy(&config);
    let reporter = TerminalReporter::new(&app.output);

    let report = preview_plan(&store, &config, &reporter, policy).await?;
    app.renderer().render_plan(&report)?;
    Ok(ExitCode::SUCCESS)
}
