//! Image tag resolution from packaged `.tar.gz` archives.
//!
//! Each archive embeds a `manifest.json` whose first entry's first
//! `RepoTags` value is `name:version`. The metadata file is unpacked into a
//! scoped temporary directory that is removed on every path, success or
//! failure; the archive itself is never mutated.

use std::path::Path;

use flate2::read::GzDecoder;
use serde::Deserialize;

use crate::errors::ResolveError;

/// Metadata file name inside every image archive.
const IMAGE_MANIFEST: &str = "manifest.json";

/// The concrete (name, version) implementation resolved for a role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedImage {
    pub name: String,
    pub version: String,
}

impl ResolvedImage {
    /// The `name:version` form used by the container engine.
    #[must_use]
    pub fn tag(&self) -> String {
        format!("{}:{}", self.name, self.version)
    }
}

#[derive(Deserialize)]
struct ManifestEntry {
    #[serde(rename = "RepoTags", default)]
    repo_tags: Vec<String>,
}

/// Extract the canonical repository name and version tag from an image
/// archive.
///
/// Deterministic for a given archive; leaves no temporary files behind.
///
/// # Errors
///
/// Returns [`ResolveError`] if the archive cannot be read, contains no
/// manifest, or the tag is not exactly `name:version` with both sides
/// non-empty after trimming.
pub fn resolve(archive: &Path) -> Result<ResolvedImage, ResolveError> {
    let io_err = |source| ResolveError::Archive { path: archive.to_path_buf(), source };

    let file = std::fs::File::open(archive).map_err(io_err)?;
    let mut tar = tar::Archive::new(GzDecoder::new(file));

    // Scoped acquisition: the directory and the extracted metadata file are
    // removed when the guard drops, on success and on every error path.
    let scratch = tempfile::TempDir::new().map_err(io_err)?;

    let mut manifest_path = None;
    for entry in tar.entries().map_err(io_err)? {
        let mut entry = entry.map_err(io_err)?;
        let is_manifest =
            entry.path().map_err(io_err)?.as_ref() == Path::new(IMAGE_MANIFEST);
        if is_manifest {
            let target = scratch.path().join(IMAGE_MANIFEST);
            entry.unpack(&target).map_err(io_err)?;
            manifest_path = Some(target);
            break;
        }
    }
    let Some(manifest_path) = manifest_path else {
        return Err(ResolveError::ManifestMissing(archive.to_path_buf()));
    };

    let content = std::fs::read_to_string(&manifest_path).map_err(io_err)?;
    let entries: Vec<ManifestEntry> = serde_json::from_str(&content)
        .map_err(|_| ResolveError::ManifestMissing(archive.to_path_buf()))?;
    let tag = entries
        .first()
        .and_then(|e| e.repo_tags.first())
        .ok_or_else(|| ResolveError::ManifestMissing(archive.to_path_buf()))?;

    parse_tag(tag, archive)
}

/// Split a `name:version` tag, trimming both sides. An empty result on
/// either side is an error, not a default.
fn parse_tag(tag: &str, archive: &Path) -> Result<ResolvedImage, ResolveError> {
    let malformed = || ResolveError::MalformedTag {
        tag: tag.to_string(),
        path: archive.to_path_buf(),
    };
    let (name, version) = tag.split_once(':').ok_or_else(malformed)?;
    let (name, version) = (name.trim(), version.trim());
    if name.is_empty() || version.is_empty() || version.contains(':') {
        return Err(malformed());
    }
    Ok(ResolvedImage { name: name.to_string(), version: version.to_string() })
}
