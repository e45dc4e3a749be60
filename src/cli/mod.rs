//! CLI module - Command-line interface for Doramas
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;
pub mod session;

use clap::{Parser, Subcommand};

/// Doramas - Personal drama tracker
/// Record, rate and filter the dramas you watch
#[derive(Parser)]
#[command(name = "doramas")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive tracking session (default)
    #[command(alias = "sh")]
    Shell,

    /// Serve the JSON API for a browser front end
    Web {
        /// Port to listen on (overrides config)
        #[arg(long)]
        port: Option<u16>,
        /// Address to bind (overrides config)
        #[arg(long)]
        bind: Option<String>,
    },

    /// Create default config file
    Init,
}

pub use commands::*;
