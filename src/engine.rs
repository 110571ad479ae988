//! Container engine invocation.
//!
//! Every lifecycle operation is one external-process invocation built from
//! the group's full document set; success or failure is the process exit
//! status, nothing is retried, and a non-zero code is surfaced unchanged
//! as [`EngineError::Invocation`].

use std::time::Duration;

use anyhow::Result;

use crate::command_runner::{COMPOSE_TIMEOUT, CommandRunner};
use crate::errors::EngineError;
use crate::output::OutputContext;
use crate::registry::AssembledGroup;

/// The compose front end of the container engine.
pub const COMPOSE_PROGRAM: &str = "docker-compose";

/// The container engine itself, for single-container operations.
pub const DOCKER_PROGRAM: &str = "docker";

/// Interval between status polls of the parser helper container.
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Build the full compose argument list for a group: project scope, every
/// rendered document in document order, then the operation verb and its
/// arguments.
#[must_use]
pub fn compose_args(group: &AssembledGroup, trailing: &[&str]) -> Vec<String> {
    let mut args = vec!["-p".to_string(), group.name.clone()];
    for document in &group.documents {
        args.push("-f".to_string());
        args.push(document.display().to_string());
    }
    args.extend(trailing.iter().map(|s| (*s).to_string()));
    args
}

/// Run a compose operation for a group, capturing output.
///
/// # Errors
///
/// Returns [`EngineError::Invocation`] carrying the engine's exit code.
pub async fn compose<R: CommandRunner>(
    runner: &R,
    ctx: &OutputContext,
    group: &AssembledGroup,
    trailing: &[&str],
) -> Result<String> {
    let args = compose_args(group, trailing);
    let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
    ctx.command(COMPOSE_PROGRAM, &arg_refs);
    let output = runner
        .run_with_timeout(COMPOSE_PROGRAM, &arg_refs, Some(&group.dir), COMPOSE_TIMEOUT)
        .await?;
    if !output.status.success() {
        ctx.error(String::from_utf8_lossy(&output.stderr).trim());
        return Err(invocation(COMPOSE_PROGRAM, output.status.code()).into());
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Run a compose operation with inherited stdio (interactive shells).
///
/// # Errors
///
/// Returns [`EngineError::Invocation`] carrying the engine's exit code.
pub async fn compose_interactive<R: CommandRunner>(
    runner: &R,
    ctx: &OutputContext,
    group: &AssembledGroup,
    trailing: &[&str],
) -> Result<()> {
    let args = compose_args(group, trailing);
    let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
    ctx.command(COMPOSE_PROGRAM, &arg_refs);
    let status = runner
        .run_status(COMPOSE_PROGRAM, &arg_refs, Some(&group.dir))
        .await?;
    if !status.success() {
        return Err(invocation(COMPOSE_PROGRAM, status.code()).into());
    }
    Ok(())
}

/// Run a docker command, capturing trimmed stdout.
///
/// # Errors
///
/// Returns [`EngineError::Invocation`] carrying the engine's exit code.
pub async fn docker<R: CommandRunner>(
    runner: &R,
    ctx: &OutputContext,
    args: &[&str],
) -> Result<String> {
    ctx.command(DOCKER_PROGRAM, args);
    let output = runner.run(DOCKER_PROGRAM, args, None).await?;
    if !output.status.success() {
        ctx.error(String::from_utf8_lossy(&output.stderr).trim());
        return Err(invocation(DOCKER_PROGRAM, output.status.code()).into());
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Run a docker command with inherited stdio (interactive shells, editors).
///
/// # Errors
///
/// Returns [`EngineError::Invocation`] carrying the engine's exit code.
pub async fn docker_interactive<R: CommandRunner>(
    runner: &R,
    ctx: &OutputContext,
    args: &[&str],
) -> Result<()> {
    ctx.command(DOCKER_PROGRAM, args);
    let status = runner.run_status(DOCKER_PROGRAM, args, None).await?;
    if !status.success() {
        return Err(invocation(DOCKER_PROGRAM, status.code()).into());
    }
    Ok(())
}

/// Poll a container's reported status until it reaches the terminal
/// `exited` state.
///
/// The poll itself blocks the operation, as the parse flow requires, but
/// the loop is bounded: exceeding `timeout` yields [`EngineError::Timeout`]
/// instead of spinning forever.
///
/// # Errors
///
/// Returns [`EngineError::Timeout`] when the bound elapses, or the inspect
/// invocation's own error.
pub async fn wait_until_exited<R: CommandRunner>(
    runner: &R,
    ctx: &OutputContext,
    container: &str,
    interval: Duration,
    timeout: Duration,
) -> Result<()> {
    let started = tokio::time::Instant::now();
    loop {
        let status = docker(
            runner,
            ctx,
            &["inspect", "--format={{.State.Status}}", container],
        )
        .await?;
        if status == "exited" {
            return Ok(());
        }
        if started.elapsed() >= timeout {
            return Err(EngineError::Timeout {
                container: container.to_string(),
                seconds: timeout.as_secs(),
            }
            .into());
        }
        tokio::time::sleep(interval).await;
    }
}

fn invocation(program: &str, code: Option<i32>) -> EngineError {
    EngineError::Invocation { program: program.to_string(), code: code.unwrap_or(1) }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::command_runner::test_support::{MockRunner, Response};

    fn group(docs: &[&str]) -> AssembledGroup {
        AssembledGroup {
            name: "g1".to_string(),
            dir: PathBuf::from("/out/g1"),
            documents: docs.iter().map(|d| PathBuf::from("/out/g1").join(d)).collect(),
        }
    }

    #[test]
    fn compose_args_lists_every_document_in_order() {
        let group = group(&["jfit_db.yaml", "jfit_re.yaml"]);
        let args = compose_args(&group, &["up", "-d"]);
        let expected = [
            "-p", "g1",
            "-f", "/out/g1/jfit_db.yaml",
            "-f", "/out/g1/jfit_re.yaml",
            "up", "-d",
        ];
        assert_eq!(args, expected.map(String::from));
    }

    #[test]
    fn compose_args_appends_service_scope_last() {
        let group = group(&["jfit_db.yaml"]);
        let args = compose_args(&group, &["start", "jfit_db"]);
        assert_eq!(args.last().map(String::as_str), Some("jfit_db"));
    }

    #[tokio::test]
    async fn compose_runs_in_the_group_directory() {
        let runner = MockRunner::default();
        let ctx = OutputContext::plain();
        let group = group(&["jfit_db.yaml"]);

        compose(&runner, &ctx, &group, &["stop"]).await.expect("compose");

        let calls = runner.recorded();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].program, "docker-compose");
        assert_eq!(calls[0].cwd, Some(PathBuf::from("/out/g1")));
    }

    #[tokio::test]
    async fn non_zero_exit_surfaces_the_engine_code() {
        let runner = MockRunner::with_script(vec![Response::fail(7)]);
        let ctx = OutputContext::plain();
        let group = group(&["jfit_db.yaml"]);

        let err = compose(&runner, &ctx, &group, &["stop"]).await.expect_err("expected Err");
        let engine = err.downcast_ref::<EngineError>().expect("engine error");
        assert!(matches!(engine, EngineError::Invocation { code: 7, .. }));
    }

    #[tokio::test]
    async fn wait_until_exited_polls_to_terminal_state() {
        let runner = MockRunner::with_script(vec![
            Response::ok("running"),
            Response::ok("running"),
            Response::ok("exited"),
        ]);
        let ctx = OutputContext::plain();

        wait_until_exited(&runner, &ctx, "abc123", Duration::from_millis(1), Duration::from_secs(5))
            .await
            .expect("wait");
        assert_eq!(runner.recorded().len(), 3);
    }

    #[tokio::test]
    async fn wait_until_exited_times_out() {
        // The default scripted answer is success with empty stdout, which
        // never reads as `exited`.
        let runner = MockRunner::default();
        let ctx = OutputContext::plain();

        let err = wait_until_exited(
            &runner,
            &ctx,
            "abc123",
            Duration::from_millis(1),
            Duration::from_millis(10),
        )
        .await
        .expect_err("expected timeout");
        let engine = err.downcast_ref::<EngineError>().expect("engine error");
        assert!(matches!(engine, EngineError::Timeout { .. }));
    }
}
