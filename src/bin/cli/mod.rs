//! CLI module organization.
//!
//! - args: argument structures and enums
//! - commands: command execution logic
//! - output: report rendering for the terminal

pub mod args;
pub mod commands;
pub mod output;

pub use args::{Cli, Commands};
pub use commands::{
    bake_command, init_config, print_default_config, resolve_command, validate_config,
};
