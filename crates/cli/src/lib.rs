//! CLI tool for inspecting cluster topology reports.
//!
//! Provides commands for:
//! - Grouping saved report sets into equivalence classes
//! - Replaying consensus resolution with a chosen strategy

pub mod commands;
pub mod config;

pub use commands::{Command, CommandResult};
pub use config::CliConfig;
