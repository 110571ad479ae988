//! Integration tests for the jfit CLI
//!
//! These tests spawn the actual binary against an isolated `JFIT_HOME`
//! and never touch a real container engine.

mod cli_tests;
