//! `jfit logs <group> <service>`: locate the running instance's log file
//! through the engine and open it for viewing.

use std::process::ExitCode;

use anyhow::Result;

use crate::command_runner::CommandRunner;
use crate::commands::ServiceArgs;
use crate::engine;
use crate::errors::EngineError;
use crate::output::OutputContext;
use crate::registry::Registry;

/// Viewer opened on the reported log path.
const VIEWER: &str = "vi";

/// Run `jfit logs`.
///
/// # Errors
///
/// Returns an error if the group is invalid or unassembled, if the engine
/// cannot report the log path, or if the viewer exits non-zero.
pub async fn run<R: CommandRunner>(
    ctx: &OutputContext,
    registry: &Registry,
    runner: &R,
    args: &ServiceArgs,
) -> Result<ExitCode> {
    let group = registry.assembled(&args.group_name)?;

    // Compose names containers <project>_<service>_1 with the project
    // lowercased.
    let container = format!("{}_{}_1", group.name.to_lowercase(), args.service);
    let log_path = engine::docker(
        runner,
        ctx,
        &["inspect", "--format={{.LogPath}}", &container],
    )
    .await?;

    ctx.command(VIEWER, &[log_path.as_str()]);
    let status = runner.run_status(VIEWER, &[log_path.as_str()], None).await?;
    if !status.success() {
        return Err(EngineError::Invocation {
            program: VIEWER.to_string(),
            code: status.code().unwrap_or(1),
        }
        .into());
    }
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command_runner::test_support::{MockRunner, Response};

    #[tokio::test]
    async fn inspects_the_compose_container_then_opens_the_viewer() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let group = dir.path().join("G1");
        std::fs::create_dir_all(&group).expect("group dir");
        std::fs::write(group.join("jfit_re.yaml"), "services: {}\n").expect("doc");
        let registry = Registry::new(dir.path().to_path_buf());
        let runner = MockRunner::with_script(vec![
            Response::ok("/var/lib/docker/containers/abc/abc-json.log"),
            Response::ok(""),
        ]);
        let ctx = OutputContext::plain();
        let args = ServiceArgs { group_name: "G1".into(), service: "jfit_re".into() };

        run(&ctx, &registry, &runner, &args).await.expect("run");

        let calls = runner.recorded();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].program, "docker");
        // The project name is lowercased in the container name.
        assert!(calls[0].args.contains(&"g1_jfit_re_1".to_string()));
        assert_eq!(calls[1].program, "vi");
        assert_eq!(calls[1].args, vec!["/var/lib/docker/containers/abc/abc-json.log"]);
    }
}
