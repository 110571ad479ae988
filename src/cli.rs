//! CLI argument parsing with clap derive

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::command_runner::TokioCommandRunner;
use crate::commands;
use crate::layout::Layout;
use crate::output::OutputContext;
use crate::registry::Registry;

/// Compose generation and lifecycle control for telemetry service groups
#[derive(Parser)]
#[command(
    name = "jfit",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR", value_parser = clap::builder::FalseyValueParser::new())]
    pub no_color: bool,

    /// jFit home directory (templates, images, group output)
    #[arg(long, global = true, env = "JFIT_HOME")]
    pub home: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Install host dependencies and load packaged images
    Install,

    /// Parse an input data model and assemble compose documents per group
    Parse(commands::parse::ParseArgs),

    /// Start all services of a group, or one service
    Start(commands::GroupArgs),

    /// Stop all services of a group, or one service
    Stop(commands::GroupArgs),

    /// Restart all services of a group, or one service
    Restart(commands::GroupArgs),

    /// Remove containers and anonymous volumes of a group, or one service
    Remove(commands::GroupArgs),

    /// Open an interactive shell inside a running service
    Cli(commands::ServiceArgs),

    /// Open the log file of a running service
    Logs(commands::ServiceArgs),

    /// Manage the rule-authoring helper container
    Mgd(commands::mgd::MgdArgs),
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails; engine invocation failures
    /// carry the engine's exit code.
    pub async fn run(self) -> Result<ExitCode> {
        let Cli { quiet, no_color, home, command } = self;
        let ctx = OutputContext::new(no_color, quiet);
        let layout = Layout::discover(home)?;
        let registry = Registry::new(layout.output_root());
        let runner = TokioCommandRunner::new(crate::command_runner::DEFAULT_CMD_TIMEOUT);

        match command {
            Command::Install => commands::install::run(&ctx, &layout, &runner).await,
            Command::Parse(args) => commands::parse::run(&ctx, &layout, &registry, &runner, &args).await,
            Command::Start(args) => commands::start::run(&ctx, &registry, &runner, &args).await,
            Command::Stop(args) => commands::stop::run(&ctx, &registry, &runner, &args).await,
            Command::Restart(args) => commands::restart::run(&ctx, &registry, &runner, &args).await,
            Command::Remove(args) => commands::remove::run(&ctx, &registry, &runner, &args).await,
            Command::Cli(args) => commands::shell::run(&ctx, &registry, &runner, &args).await,
            Command::Logs(args) => commands::logs::run(&ctx, &registry, &runner, &args).await,
            Command::Mgd(args) => commands::mgd::run(&ctx, &layout, &runner, &args).await,
        }
    }
}
