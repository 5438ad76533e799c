// src/main.rs

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use commands::GlobalOptions;

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let opts = GlobalOptions {
        syntax: cli.syntax,
        config: cli.config,
        platform: cli.platform,
    };

    match cli.command {
        Commands::Render { file } => {
            let config = commands::resolve_config(&opts)?;
            commands::cmd_render(&config, &file)
        }
        Commands::Check { file, strict } => {
            let config = commands::resolve_config(&opts)?;
            commands::cmd_check(&config, &file, strict)
        }
        Commands::Versions => commands::cmd_versions(),
    }
}
