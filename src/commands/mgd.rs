//! `jfit mgd <start|stop|cli>`: manage the rule-authoring helper
//! container. A single named container, outside any group.

use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, ValueEnum};

use crate::command_runner::CommandRunner;
use crate::engine::{self, DOCKER_PROGRAM};
use crate::image;
use crate::layout::{Layout, MGD_IMAGE};
use crate::output::OutputContext;

/// Name of the helper container.
const MGD_CONTAINER: &str = "jfit_mgd_cli";

/// Arguments for the mgd command.
#[derive(Args)]
pub struct MgdArgs {
    /// Operation on the helper container
    #[arg(value_enum)]
    pub command: MgdCommand,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MgdCommand {
    /// Start a fresh helper container and drop into its CLI
    Start,
    /// Stop the helper container
    Stop,
    /// Attach to the running helper container's CLI
    Cli,
}

/// Run `jfit mgd`.
///
/// # Errors
///
/// Returns an error if the engine invocation fails.
pub async fn run<R: CommandRunner>(
    ctx: &OutputContext,
    layout: &Layout,
    runner: &R,
    args: &MgdArgs,
) -> Result<ExitCode> {
    match args.command {
        MgdCommand::Start => start(ctx, layout, runner).await,
        MgdCommand::Stop => {
            engine::docker(runner, ctx, &["stop", MGD_CONTAINER]).await?;
            ctx.success("Stopped the mgd container");
            Ok(ExitCode::SUCCESS)
        }
        MgdCommand::Cli => attach(ctx, runner).await,
    }
}

async fn start<R: CommandRunner>(
    ctx: &OutputContext,
    layout: &Layout,
    runner: &R,
) -> Result<ExitCode> {
    // Best-effort removal of a previous instance; absence is not an error.
    let rm_args = ["rm", "-f", MGD_CONTAINER];
    ctx.command(DOCKER_PROGRAM, &rm_args);
    let previous = runner.run(DOCKER_PROGRAM, &rm_args, None).await?;
    if previous.status.success() {
        ctx.warn("Removed already running container, starting a new one");
    }

    let mgd = image::resolve(&layout.images_dir().join(MGD_IMAGE))?;
    let tag = mgd.tag();
    let config_mount = format!("{}:/config/", layout.config_dir().display());
    engine::docker(
        runner,
        ctx,
        &["run", "-v", config_mount.as_str(), "--name", MGD_CONTAINER, "-d", tag.as_str()],
    )
    .await?;

    attach(ctx, runner).await
}

async fn attach<R: CommandRunner>(ctx: &OutputContext, runner: &R) -> Result<ExitCode> {
    engine::docker_interactive(runner, ctx, &["exec", "-it", MGD_CONTAINER, "/usr/sbin/cli"])
        .await?;
    Ok(ExitCode::SUCCESS)
}
