//! On-disk layout of the jFit home directory.

use std::path::{Path, PathBuf};

use anyhow::Result;

/// Fixed prefix carried by every packaged image name.
pub const IMAGE_PREFIX: &str = "jfit_";

/// Archive holding the parser container image.
pub const CORE_IMAGE: &str = "jfit_core.tar.gz";

/// Archive holding the rule-authoring helper image.
pub const MGD_IMAGE: &str = "jfit_mgd.tar.gz";

/// Dependency installer script, run by `jfit install`.
pub const DEP_SCRIPT: &str = "install_dep.sh";

/// Resolved jFit home directory and its well-known subdirectories.
///
/// Rooted at `--home`, `$JFIT_HOME`, or `~/.jfit`.
pub struct Layout {
    root: PathBuf,
}

impl Layout {
    /// Resolve the layout root from an explicit flag or the default
    /// home-rooted location.
    ///
    /// # Errors
    ///
    /// Returns an error if no flag is given and the home directory cannot
    /// be determined.
    pub fn discover(home: Option<PathBuf>) -> Result<Self> {
        if let Some(root) = home {
            return Ok(Self { root });
        }
        let home =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
        Ok(Self { root: home.join(".jfit") })
    }

    /// Build a layout rooted at an explicit path (used in tests).
    #[must_use]
    pub fn with_root(root: PathBuf) -> Self {
        Self { root }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Template/config root, injected into templates as `JFIT_ETC_PATH`.
    #[must_use]
    pub fn etc_dir(&self) -> PathBuf {
        self.root.join("etc")
    }

    /// Output root holding one subdirectory per parsed group, injected as
    /// `JFIT_OUTPUT_PATH`.
    #[must_use]
    pub fn output_root(&self) -> PathBuf {
        self.etc_dir().join("core_output")
    }

    /// Directory of compose templates (`<name>.yaml.j2`).
    #[must_use]
    pub fn templates_dir(&self) -> PathBuf {
        self.root.join("compose_files")
    }

    /// Directory of packaged image archives.
    #[must_use]
    pub fn images_dir(&self) -> PathBuf {
        self.root.join("docker_images")
    }

    /// Default data directory mounted into the parser container.
    #[must_use]
    pub fn input_dir(&self) -> PathBuf {
        self.root.join("input")
    }

    /// Configuration directory mounted into the mgd helper container.
    #[must_use]
    pub fn config_dir(&self) -> PathBuf {
        self.root.join("config")
    }

    /// Expected archive path for a role implementation named in the
    /// environment manifest.
    #[must_use]
    pub fn image_archive(&self, implementation: &str) -> PathBuf {
        self.images_dir().join(format!("{IMAGE_PREFIX}{implementation}.tar.gz"))
    }

    /// All packaged image archives present in the images directory, sorted
    /// by file name.
    ///
    /// # Errors
    ///
    /// Returns an error if the images directory cannot be read.
    pub fn image_archives(&self) -> Result<Vec<PathBuf>> {
        let dir = self.images_dir();
        let mut archives = Vec::new();
        for entry in std::fs::read_dir(&dir)
            .map_err(|e| anyhow::anyhow!("cannot read images directory {}: {e}", dir.display()))?
        {
            let path = entry?.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if name.starts_with(IMAGE_PREFIX) && name.ends_with(".tar.gz") {
                archives.push(path);
            }
        }
        archives.sort();
        Ok(archives)
    }
}
