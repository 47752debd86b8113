//! CLI argument parsing with clap derive

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags};
use crate::commands;
use crate::infra::logging;

/// Provision a shared developer-environment fleet on AWS
#[derive(Parser)]
#[command(
    name = "devfleet",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Debug-level diagnostic logging on stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Record which ECR repositories, EFS file systems and ECS clusters exist
    Lookup(commands::lookup::LookupArgs),

    /// Build the CloudFormation template for the fleet
    Synth(commands::synth::SynthArgs),

    /// Show import/create decisions from the snapshot (no AWS calls)
    Plan(commands::plan::PlanArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self) -> Result<ExitCode> {
        let Cli {
            json,
            quiet,
            no_color,
            verbose,
            command,
        } = self;
        logging::init(verbose);
        let app = AppContext::new(&AppFlags {
            no_color,
            quiet,
            json,
            verbose,
        });

        match command {
            Command::Lookup(args) => commands::lookup::run(&app, &args).await,
            Command::Synth(args) => commands::synth::run(&app, &args).await,
            Command::Plan(args) => commands::plan::run(&app, &args).await,
            Command::Config(cmd) => commands::config::run(&app, cmd),
            Command::Version => commands::version::run(&app),
        }
    }
}
