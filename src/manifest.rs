//! Group environment manifest (`source.env`) parsing.
//!
//! Plain `key=value` lines. Keys ending `_LIST` hold bracketed
//! comma-separated lists and are parsed into ordered string sequences;
//! every other value stays a scalar.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;

use crate::errors::AssembleError;
use crate::roles::Role;

/// Manifest file name inside each group directory.
pub const MANIFEST_FILE: &str = "source.env";

/// Key suffix marking a bracketed comma-separated list value.
const LIST_SUFFIX: &str = "_LIST";

/// A manifest value: a scalar string, or an ordered list for `_LIST` keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Scalar(String),
    List(Vec<String>),
}

/// Parsed environment manifest for one group.
#[derive(Debug, Default)]
pub struct Manifest {
    values: BTreeMap<String, Value>,
}

impl Manifest {
    /// Load and parse a group's manifest file.
    ///
    /// # Errors
    ///
    /// Returns [`AssembleError::ManifestMissing`] if the file is absent or
    /// unreadable.
    pub fn load(group_dir: &Path) -> Result<Self, AssembleError> {
        let path = group_dir.join(MANIFEST_FILE);
        let content = std::fs::read_to_string(&path)
            .map_err(|_| AssembleError::ManifestMissing(path.clone()))?;
        Ok(Self::parse(&content))
    }

    /// Parse manifest text. Blank lines, comments, and lines without `=`
    /// are skipped.
    #[must_use]
    pub fn parse(content: &str) -> Self {
        let mut values = BTreeMap::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, raw)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let raw = raw.trim();
            let value = if key.ends_with(LIST_SUFFIX) {
                Value::List(parse_list(raw))
            } else {
                Value::Scalar(raw.to_string())
            };
            values.insert(key.to_string(), value);
        }
        Self { values }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Insert or overwrite a scalar entry (used for the injected path keys).
    pub fn insert(&mut self, key: &str, value: String) {
        self.values.insert(key.to_string(), Value::Scalar(value));
    }

    /// Roles named by this manifest, paired with their implementation name,
    /// in fixed role order.
    #[must_use]
    pub fn roles(&self) -> Vec<(Role, String)> {
        Role::ALL
            .into_iter()
            .filter_map(|role| match self.values.get(role.manifest_key()) {
                Some(Value::Scalar(implementation)) => Some((role, implementation.clone())),
                _ => None,
            })
            .collect()
    }

    /// The full parameter map handed to templates.
    #[must_use]
    pub fn values(&self) -> &BTreeMap<String, Value> {
        &self.values
    }
}

/// Strip the literal bracket delimiters and split on commas, preserving
/// order.
fn parse_list(raw: &str) -> Vec<String> {
    let inner = raw
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .unwrap_or(raw);
    inner.split(',').map(|s| s.trim().to_string()).collect()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Bracketed comma-separated items always come back in order.
        #[test]
        fn prop_list_parsing_preserves_order(
            items in proptest::collection::vec("[a-z0-9]{1,8}", 1..6)
        ) {
            let raw = format!("X_LIST=[{}]", items.join(","));
            let m = Manifest::parse(&raw);
            prop_assert_eq!(m.get("X_LIST"), Some(&Value::List(items)));
        }

        /// Keys without the list suffix stay scalar regardless of commas.
        #[test]
        fn prop_scalar_keys_never_split(value in "[a-z0-9,]{0,16}") {
            let raw = format!("PLAIN={value}");
            let m = Manifest::parse(&raw);
            prop_assert_eq!(m.get("PLAIN"), Some(&Value::Scalar(value)));
        }
    }
}
