//! Command implementations

pub mod install;
pub mod logs;
pub mod mgd;
pub mod parse;
pub mod remove;
pub mod restart;
pub mod shell;
pub mod start;
pub mod stop;

use clap::Args;

/// Arguments shared by the group lifecycle commands.
#[derive(Args)]
pub struct GroupArgs {
    /// Group name
    pub group_name: String,

    /// Scope the operation to one service; otherwise the whole group
    #[arg(short, long)]
    pub service: Option<String>,
}

/// Arguments for commands that address exactly one running service.
#[derive(Args)]
pub struct ServiceArgs {
    /// Group name
    pub group_name: String,

    /// Service name
    pub service: String,
}
