//! The closed enumeration of deployable service roles.
//!
//! Manifest keys outside this enumeration never drive role resolution; they
//! pass through to templates as plain parameters.

use std::fmt;

/// A logical function within a device group. Each role maps to at most one
/// resolved container image per group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    CollectorNative,
    CollectorOpenConfig,
    RuleEngine,
    TrainingEngine,
    CommandRpc,
    Database,
}

impl Role {
    /// All roles, in the fixed order assembly processes them.
    pub const ALL: [Role; 6] = [
        Role::CollectorNative,
        Role::CollectorOpenConfig,
        Role::RuleEngine,
        Role::TrainingEngine,
        Role::CommandRpc,
        Role::Database,
    ];

    /// The environment-manifest key that selects an implementation for
    /// this role.
    #[must_use]
    pub fn manifest_key(self) -> &'static str {
        match self {
            Role::CollectorNative => "JTI_NATIVE_COLLECTOR",
            Role::CollectorOpenConfig => "JTI_OC_COLLECTOR",
            Role::RuleEngine => "RULE_ENGINE",
            Role::TrainingEngine => "TRAINING_ENGINE",
            Role::CommandRpc => "COMMAND_RPC",
            Role::Database => "DATABASE",
        }
    }

    /// Match a manifest key against the enumeration. Unknown keys return
    /// `None` and are never mistaken for roles.
    #[must_use]
    pub fn from_manifest_key(key: &str) -> Option<Role> {
        Role::ALL.into_iter().find(|r| r.manifest_key() == key)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::CollectorNative => "collector-native",
            Role::CollectorOpenConfig => "collector-open-config",
            Role::RuleEngine => "rule-engine",
            Role::TrainingEngine => "training-engine",
            Role::CommandRpc => "command-rpc",
            Role::Database => "database",
        };
        f.write_str(name)
    }
}
