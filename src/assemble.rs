//! Group assembly: manifest → resolved images → rendered compose documents.
//!
//! Assembly is fail-fast within a group: the first failing role aborts the
//! remaining roles, and the error names that role. Documents rendered
//! before the failure stay on disk; there is no rollback. Separate groups
//! are always assembled independently of each other.

use std::io::Write as _;
use std::path::{Path, PathBuf};

use crate::errors::AssembleError;
use crate::image;
use crate::layout::Layout;
use crate::manifest::Manifest;
use crate::template;

/// Assemble one group directory: load its manifest, resolve every named
/// role's image, render each compose document into the group directory.
///
/// Returns the written document paths in role-processing order.
///
/// # Errors
///
/// Returns the first role-level [`AssembleError`]; earlier roles' documents
/// are left in place.
pub fn assemble_group(layout: &Layout, group_dir: &Path) -> Result<Vec<PathBuf>, AssembleError> {
    let mut manifest = Manifest::load(group_dir)?;

    // Injected path keys, available to every template.
    manifest.insert("JFIT_ETC_PATH", layout.etc_dir().display().to_string());
    manifest.insert("JFIT_OUTPUT_PATH", layout.output_root().display().to_string());

    let mut written = Vec::new();
    for (role, implementation) in manifest.roles() {
        let archive = layout.image_archive(&implementation);
        if !archive.is_file() {
            return Err(AssembleError::ImageMissing { role, path: archive });
        }
        let image = image::resolve(&archive)
            .map_err(|source| AssembleError::TagResolution { role, source })?;

        let conf_file = template::conf_path(group_dir, role, &image.name);
        let rendered = template::render(
            role,
            &image,
            manifest.values(),
            &conf_file,
            &layout.templates_dir(),
        )?;

        let document = group_dir.join(format!("{}.yaml", image.name));
        write_atomic(&document, &rendered)
            .map_err(|source| AssembleError::Write { path: document.clone(), source })?;
        written.push(document);
    }
    Ok(written)
}

/// Assemble several group directories independently; one group's failure
/// never prevents attempting the others.
#[must_use]
pub fn assemble_all(
    layout: &Layout,
    group_dirs: &[PathBuf],
) -> Vec<(PathBuf, Result<Vec<PathBuf>, AssembleError>)> {
    group_dirs
        .iter()
        .map(|dir| (dir.clone(), assemble_group(layout, dir)))
        .collect()
}

/// Write through a named temp file in the target directory, then rename,
/// so a reader never observes a half-written document.
fn write_atomic(path: &Path, content: &str) -> std::io::Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
