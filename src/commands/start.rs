//! `jfit start <group> [-s service]`: bring a group up, or start one
//! already-defined service.

use std::process::ExitCode;

use anyhow::Result;

use crate::command_runner::CommandRunner;
use crate::commands::GroupArgs;
use crate::engine;
use crate::output::OutputContext;
use crate::registry::Registry;

/// Run `jfit start`.
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

    let output = match args.service.as_deref() {
        // A named service is started in place; it is not created here.
        Some(service) => engine::compose(runner, ctx, &group, &["start", service]).await?,
        None => engine::compose(runner, ctx, &group, &["up", "-d"]).await?,
    };
    if !output.is_empty() {
        ctx.info(&output);
    }

    match args.service.as_deref() {
        Some(service) => ctx.success(&format!("Started service '{service}' of group '{}'", group.name)),
        None => ctx.success(&format!("Started group '{}'", group.name)),
    }
    Ok(ExitCode::SUCCESS)
}
