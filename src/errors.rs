//! Typed domain error enums.
//!
//! All error types implement `thiserror::Error` and convert to
//! `anyhow::Error` via the `?` operator at the command layer.

use std::path::PathBuf;

use thiserror::Error;

use crate::roles::Role;

/// Errors validating a group against its on-disk directory.
#[derive(Debug, Error)]
pub enum GroupError {
    /// The group directory does not exist, meaning the name was never produced by
    /// a `parse` run.
    #[error("group '{0}' does not exist. Run 'jfit parse' first.")]
    InvalidGroup(String),

    /// The group directory exists but holds no rendered compose documents.
    #[error("no compose documents found for group '{0}'. Run 'jfit parse' first.")]
    NoDocumentsFound(String),
}

/// Errors extracting the (name, version) tag from a packaged image archive.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("cannot read image archive {path}")]
    Archive {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("image archive {0} contains no manifest")]
    ManifestMissing(PathBuf),

    #[error("malformed repo tag '{tag}' in {path}: expected name:version")]
    MalformedTag { tag: String, path: PathBuf },
}

/// Errors assembling one group's compose documents. The first failing role
/// aborts the remaining roles of that group.
#[derive(Debug, Error)]
pub enum AssembleError {
    #[error("environment manifest {0} is missing")]
    ManifestMissing(PathBuf),

    #[error("missing image archive for role {role}: {path}")]
    ImageMissing { role: Role, path: PathBuf },

    #[error("cannot resolve image tag for role {role}")]
    TagResolution {
        role: Role,
        #[source]
        source: ResolveError,
    },

    #[error("compose template {0} is missing")]
    TemplateMissing(PathBuf),

    #[error("compose template {0} is empty")]
    TemplateEmpty(PathBuf),

    #[error("rendering compose template for role {role}")]
    Render {
        role: Role,
        #[source]
        source: tera::Error,
    },

    #[error("writing compose document {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from the external container engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine process exited non-zero. The code is surfaced unchanged
    /// as the process exit status.
    #[error("{program} exited with code {code}")]
    Invocation { program: String, code: i32 },

    /// The parser helper container did not reach the `exited` state in time.
    #[error("container {container} did not exit within {seconds}s")]
    Timeout { container: String, seconds: u64 },
}
