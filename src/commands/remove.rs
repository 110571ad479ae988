//! `jfit remove <group> [-s service]`: force-stop and delete containers
//! and anonymous volumes. The group directory itself is left alone.

use std::process::ExitCode;

use anyhow::Result;

use crate::command_runner::CommandRunner;
use crate::commands::GroupArgs;
use crate::engine;
use crate::output::OutputContext;
use crate::registry::Registry;

/// Run `jfit remove`.
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

    let mut trailing = vec!["rm", "--force", "--stop", "-v"];
    if let Some(service) = args.service.as_deref() {
        trailing.push(service);
    }
    let output = engine::compose(runner, ctx, &group, &trailing).await?;
    if !output.is_empty() {
        ctx.info(&output);
    }

    match args.service.as_deref() {
        Some(service) => ctx.success(&format!("Removed service '{service}' of group '{}'", group.name)),
        None => ctx.success(&format!("Removed group '{}'", group.name)),
    }
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command_runner::test_support::MockRunner;

    #[tokio::test]
    async fn remove_forces_stop_and_drops_volumes() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let group = dir.path().join("g1");
        std::fs::create_dir_all(&group).expect("group dir");
        std::fs::write(group.join("jfit_db.yaml"), "services: {}\n").expect("doc");
        let registry = Registry::new(dir.path().to_path_buf());
        let runner = MockRunner::default();
        let ctx = OutputContext::plain();
        let args = GroupArgs { group_name: "g1".into(), service: None };

        run(&ctx, &registry, &runner, &args).await.expect("run");

        let calls = runner.recorded();
        let tail: Vec<_> = calls[0].args.iter().rev().take(4).rev().cloned().collect();
        assert_eq!(tail, vec!["rm", "--force", "--stop", "-v"]);
    }
}
