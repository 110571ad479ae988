//! jFit CLI - compose generation and lifecycle control for telemetry service groups

#![cfg_attr(test, allow(clippy::expect_used))]

use std::process::ExitCode;

use clap::Parser;

use jfit_cli::cli::Cli;
use jfit_cli::errors::EngineError;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match cli.run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            exit_code_for(&e)
        }
    }
}

/// Map an error to the process exit code: engine invocation failures
/// propagate the engine's own exit code, everything else exits 1.
fn exit_code_for(err: &anyhow::Error) -> ExitCode {
    if let Some(EngineError::Invocation { code, .. }) = err.downcast_ref::<EngineError>() {
        return ExitCode::from(u8::try_from(*code).unwrap_or(1));
    }
    ExitCode::FAILURE
}
