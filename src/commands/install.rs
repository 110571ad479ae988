//! `jfit install`: run the dependency installer, load every packaged
//! image into the engine, and link the binary into the PATH.
//!
//! The installer script and the image loads are external collaborators;
//! this command only sequences them and stops at the first failure.

use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::command_runner::CommandRunner;
use crate::engine::DOCKER_PROGRAM;
use crate::errors::EngineError;
use crate::layout::{DEP_SCRIPT, Layout};
use crate::output::OutputContext;

/// Image loads unpack multi-hundred-megabyte archives.
const LOAD_TIMEOUT: Duration = Duration::from_secs(600);

/// Run `jfit install`.
///
/// # Errors
///
/// Returns an error carrying the failing step's exit code.
pub async fn run<R: CommandRunner>(
    ctx: &OutputContext,
    layout: &Layout,
    runner: &R,
) -> Result<ExitCode> {
    ctx.command("bash", &[DEP_SCRIPT]);
    let status = runner.run_status("bash", &[DEP_SCRIPT], Some(layout.root())).await?;
    if !status.success() {
        ctx.error("Failure: dependency install");
        return Err(EngineError::Invocation {
            program: "bash".to_string(),
            code: status.code().unwrap_or(1),
        }
        .into());
    }
    ctx.success("Dependency install");

    for archive in layout.image_archives()? {
        let archive = archive.display().to_string();
        let args = ["docker", "load", "--input", archive.as_str()];
        ctx.command("sudo", &args);
        let output = runner
            .run_with_timeout("sudo", &args, None, LOAD_TIMEOUT)
            .await?;
        if !output.status.success() {
            ctx.error(&format!("Failure: loading {archive}"));
            return Err(EngineError::Invocation {
                program: DOCKER_PROGRAM.to_string(),
                code: output.status.code().unwrap_or(1),
            }
            .into());
        }
        ctx.success(&format!("Loaded {archive}"));
    }

    let exe = std::env::current_exe().context("locating the running executable")?;
    let exe = exe.display().to_string();
    let args = ["-sf", exe.as_str(), "/usr/local/bin/jfit"];
    ctx.command("ln", &args);
    let status = runner.run_status("ln", &args, None).await?;
    if !status.success() {
        ctx.error("Unable to link jfit into /usr/local/bin");
        return Err(EngineError::Invocation {
            program: "ln".to_string(),
            code: status.code().unwrap_or(1),
        }
        .into());
    }

    ctx.success("Install complete");
    Ok(ExitCode::SUCCESS)
}
