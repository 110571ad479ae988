//! `jfit cli <group> <service>`: interactive shell inside a running
//! service instance. Thin pass-through to the engine's exec.

use std::process::ExitCode;

use anyhow::Result;

use crate::command_runner::CommandRunner;
use crate::commands::ServiceArgs;
use crate::engine;
use crate::output::OutputContext;
use crate::registry::Registry;

/// Run `jfit cli`.
///
/// # Errors
///
/// Returns an error if the group is invalid or unassembled, or if the
/// engine invocation fails; the shell's exit code is surfaced unchanged.
pub async fn run<R: CommandRunner>(
    ctx: &OutputContext,
    registry: &Registry,
    runner: &R,
    args: &ServiceArgs,
) -> Result<ExitCode> {
    let group = registry.assembled(&args.group_name)?;
    engine::compose_interactive(runner, ctx, &group, &["exec", &args.service, "sh"]).await?;
    Ok(ExitCode::SUCCESS)
}
