//! `jfit stop <group> [-s service]`: stop a group or one service.

use std::process::ExitCode;

use anyhow::Result;

use crate::command_runner::CommandRunner;
use crate::commands::GroupArgs;
use crate::engine;
use crate::output::OutputContext;
use crate::registry::Registry;

/// Run `jfit stop`.
///
/// # Errors
///
/// Returns an error if the group is invalid or unassembled, or if the
/// engine invocation fails.
pub async fn run<R: CommandRunner>(
    ctx: &OutputContext,
    registry: &Registry,
    runner: &R,
    args: &GroupArgs,
) -> Result<ExitCode> {
    let group = registry.assembled(&args.group_name)?;

    let mut trailing = vec!["stop"];
    if let Some(service) = args.service.as_deref() {
        trailing.push(service);
    }
    let output = engine::compose(runner, ctx, &group, &trailing).await?;
    if !output.is_empty() {
        ctx.info(&output);
    }

    match args.service.as_deref() {
        Some(service) => ctx.success(&format!("Stopped service '{service}' of group '{}'", group.name)),
        None => ctx.success(&format!("Stopped group '{}'", group.name)),
    }
    Ok(ExitCode::SUCCESS)
}
