//! CLI module for sweepr - command-line interface.
//!
//! Flags map onto the config file keys and override them.

pub mod commands;

pub use commands::{Cli, OutputFormat};
