// src/cli.rs
//! CLI definitions for ksintent
//!
//! This module contains all command-line interface definitions using clap.
//! The actual command implementations are in the `commands` module.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ksintent")]
#[command(author = "ksintent Contributors")]
#[command(version)]
#[command(about = "Validate kickstart files and render them in canonical form", long_about = None)]
pub struct Cli {
    /// Syntax version to use (overrides the config file)
    #[arg(short, long, global = true)]
    pub syntax: Option<String>,

    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Platform label written at the top of rendered output
    #[arg(short, long, global = true)]
    pub platform: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse a kickstart file and print it in canonical form
    Render {
        /// Path to the kickstart file
        file: PathBuf,
    },

    /// Parse a kickstart file and report problems without printing it
    Check {
        /// Path to the kickstart file
        file: PathBuf,

        /// Treat deprecation warnings as errors
        #[arg(long)]
        strict: bool,
    },

    /// List syntax versions and the directive changes each one makes
    Versions,
}
