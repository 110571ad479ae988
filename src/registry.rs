//! Group directory registry.
//!
//! Maps a group name to its directory under the output root and decides,
//! in one place, whether the group is assembled. Every lifecycle command
//! goes through [`Registry::assembled`]; the [`AssembledGroup`] it returns
//! is the proof token carrying the document set in stable order.

use std::path::{Path, PathBuf};

use crate::errors::GroupError;

/// Explicit two-state group lifecycle. A group directory either holds
/// rendered compose documents or it does not; nothing else is persisted.
#[derive(Debug)]
pub enum GroupState {
    /// The directory exists but assembly has not produced documents yet.
    Unassembled,
    /// Assembly ran; the documents are listed in sorted file-name order.
    Assembled(Vec<PathBuf>),
}

/// A validated, assembled group ready for lifecycle operations.
#[derive(Debug, Clone)]
pub struct AssembledGroup {
    pub name: String,
    pub dir: PathBuf,
    /// Rendered compose documents, sorted by file name. This order is the
    /// document order of every engine invocation.
    pub documents: Vec<PathBuf>,
}

/// Registry over the parser's output root (one subdirectory per group).
pub struct Registry {
    output_root: PathBuf,
}

impl Registry {
    #[must_use]
    pub fn new(output_root: PathBuf) -> Self {
        Self { output_root }
    }

    #[must_use]
    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    #[must_use]
    pub fn group_dir(&self, group: &str) -> PathBuf {
        self.output_root.join(group)
    }

    /// Determine a group's lifecycle state.
    ///
    /// # Errors
    ///
    /// Returns [`GroupError::InvalidGroup`] if the group directory does not
    /// exist.
    pub fn state(&self, group: &str) -> Result<GroupState, GroupError> {
        let dir = self.group_dir(group);
        if !dir.is_dir() {
            return Err(GroupError::InvalidGroup(group.to_string()));
        }
        let documents = list_documents(&dir);
        if documents.is_empty() {
            Ok(GroupState::Unassembled)
        } else {
            Ok(GroupState::Assembled(documents))
        }
    }

    /// Validate that a group exists and is assembled.
    ///
    /// # Errors
    ///
    /// Returns [`GroupError::InvalidGroup`] for a nonexistent directory and
    /// [`GroupError::NoDocumentsFound`] for an existing but unassembled one.
    pub fn assembled(&self, group: &str) -> Result<AssembledGroup, GroupError> {
        match self.state(group)? {
            GroupState::Unassembled => Err(GroupError::NoDocumentsFound(group.to_string())),
            GroupState::Assembled(documents) => Ok(AssembledGroup {
                name: group.to_string(),
                dir: self.group_dir(group),
                documents,
            }),
        }
    }

    /// All group directories under the output root, sorted by name. Hidden
    /// entries and plain files are skipped.
    #[must_use]
    pub fn group_dirs(&self) -> Vec<PathBuf> {
        let Ok(entries) = std::fs::read_dir(&self.output_root) else {
            return Vec::new();
        };
        let mut dirs: Vec<PathBuf> = entries
            .flatten()
            .map(|e| e.path())
            .filter(|p| {
                p.is_dir()
                    && p.file_name()
                        .and_then(|n| n.to_str())
                        .is_some_and(|n| !n.starts_with('.'))
            })
            .collect();
        dirs.sort();
        dirs
    }
}

/// Rendered compose documents in a group directory, sorted by file name.
fn list_documents(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut documents: Vec<PathBuf> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| {
            p.is_file()
                && p.extension().is_some_and(|ext| ext == "yaml")
        })
        .collect();
    documents.sort();
    documents
}
