//! `jfit parse <input-model> <group>`: run the external parser container
//! over a JSON device model, then assemble compose documents for every
//! group directory it produced.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Args;

use crate::assemble;
use crate::command_runner::CommandRunner;
use crate::engine::{self, POLL_INTERVAL};
use crate::image;
use crate::layout::{CORE_IMAGE, Layout};
use crate::output::OutputContext;
use crate::registry::Registry;

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Path of the input data model (JSON)
    pub input_file_path: PathBuf,

    /// Device group name handed to the parser
    pub device_group: String,

    /// Data directory mounted into the parser (udf and iagent files);
    /// defaults to <home>/input
    #[arg(short, long)]
    pub input_dir: Option<PathBuf>,

    /// Seconds to wait for the parser container to exit
    #[arg(long, default_value_t = 900)]
    pub timeout: u64,
}

/// Run `jfit parse`.
///
/// # Errors
///
/// Returns an error if the input paths are invalid, the parser container
/// fails or times out, or any group fails to assemble.
pub async fn run<R: CommandRunner>(
    ctx: &OutputContext,
    layout: &Layout,
    registry: &Registry,
    runner: &R,
    args: &ParseArgs,
) -> Result<ExitCode> {
    let input_file = locate(&args.input_file_path, layout.root(), Path::is_file)
        .with_context(|| format!("cannot locate input model {}", args.input_file_path.display()))?;
    let input_dir = match &args.input_dir {
        Some(dir) => locate(dir, layout.root(), Path::is_dir)
            .with_context(|| format!("invalid input directory {}", dir.display()))?,
        None => layout.input_dir(),
    };

    let output_root = layout.output_root();
    if output_root.is_dir() {
        std::fs::remove_dir_all(&output_root)
            .with_context(|| format!("clearing output root {}", output_root.display()))?;
    }
    std::fs::create_dir_all(&output_root)
        .with_context(|| format!("creating output root {}", output_root.display()))?;

    run_parser_container(ctx, layout, runner, &input_file, &input_dir, args).await?;

    assemble_groups(ctx, layout, registry)
}

/// Assemble every group directory under the output root, each
/// independently; report per group, fail if any failed.
pub fn assemble_groups(
    ctx: &OutputContext,
    layout: &Layout,
    registry: &Registry,
) -> Result<ExitCode> {
    let group_dirs = registry.group_dirs();
    if group_dirs.is_empty() {
        bail!("unable to parse the input configuration: no groups were produced");
    }

    let mut failures = 0_u32;
    for (dir, result) in assemble::assemble_all(layout, &group_dirs) {
        let group = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| dir.display().to_string());
        match result {
            Ok(documents) => {
                ctx.success(&format!("Assembled group '{group}' ({} services)", documents.len()));
            }
            Err(e) => {
                ctx.error(&format!("group '{group}': {e:#}"));
                failures += 1;
            }
        }
    }
    if failures > 0 {
        bail!("assembly failed for {failures} group(s)");
    }
    Ok(ExitCode::SUCCESS)
}

/// Resolve a user-supplied path: as given first, then relative to the
/// layout root.
fn locate(path: &Path, root: &Path, probe: fn(&Path) -> bool) -> Result<PathBuf> {
    if probe(path) {
        return Ok(path.to_path_buf());
    }
    let fallback = root.join(path);
    if probe(&fallback) {
        return Ok(fallback);
    }
    bail!("{} not found", path.display())
}

/// Launch the parser container, block until it reports the terminal
/// `exited` state (bounded by `--timeout`), then remove it.
async fn run_parser_container<R: CommandRunner>(
    ctx: &OutputContext,
    layout: &Layout,
    runner: &R,
    input_file: &Path,
    input_dir: &Path,
    args: &ParseArgs,
) -> Result<()> {
    let core = image::resolve(&layout.images_dir().join(CORE_IMAGE))
        .context("resolving the parser image")?;

    // The parser clears the output directory it is given, and a mount
    // point cannot be deleted from inside the container. Mount the parent
    // and point the parser at the subdirectory instead.
    let output_mount = layout.etc_dir();

    let tag = core.tag();
    let model_mount = format!("{}:/input.json", input_file.display());
    let etc_mount = format!("{}:/output/", output_mount.display());
    let data_mount = format!("{}:/input/", input_dir.display());
    let run_args = [
        "run", "-i", "-d",
        "-v", model_mount.as_str(),
        "-v", etc_mount.as_str(),
        "-v", data_mount.as_str(),
        tag.as_str(),
        "python", "/jfit/jfit.py",
        "--config", "/input.json",
        "--device-group", args.device_group.as_str(),
        "--output-dir", "/output/core_output",
        "--data-base-path", "/input",
    ];
    let container_id = engine::docker(runner, ctx, &run_args).await?;

    engine::wait_until_exited(
        runner,
        ctx,
        &container_id,
        POLL_INTERVAL,
        Duration::from_secs(args.timeout),
    )
    .await?;

    engine::docker(runner, ctx, &["rm", "-f", &container_id]).await?;
    Ok(())
}
