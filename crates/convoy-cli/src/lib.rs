//! Convoy CLI library
//!
//! This library provides the command-line surface for Convoy,
//! exposing modules for argument parsing, configuration, and the
//! individual subcommands.

pub mod cli;
pub mod commands;
pub mod config;
pub mod output;
