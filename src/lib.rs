//! jFit CLI - compose generation and lifecycle control for telemetry service
//! groups.
//!
//! A group is a directory of rendered docker-compose documents, one per
//! service role, produced by [`assemble`] from the group's environment
//! manifest. Lifecycle commands validate the group through [`registry`] and
//! drive `docker-compose` through [`engine`].

pub mod assemble;
pub mod cli;
pub mod command_runner;
pub mod commands;
pub mod engine;
pub mod errors;
pub mod image;
pub mod layout;
pub mod manifest;
pub mod output;
pub mod registry;
pub mod roles;
pub mod template;
