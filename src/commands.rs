// src/commands.rs
//! Command handlers for the ksintent CLI

use anyhow::{Context, Result};
use ksintent::reader;
use ksintent::version::{descriptor, SyntaxVersion};
use ksintent::{EngineConfig, Registry};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Options shared by every command
pub struct GlobalOptions {
    pub syntax: Option<String>,
    pub config: Option<PathBuf>,
    pub platform: Option<String>,
}

/// Resolve the engine configuration: file values first, then flags
pub fn resolve_config(opts: &GlobalOptions) -> Result<EngineConfig> {
    let mut config = match &opts.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("Failed to load configuration {}", path.display()))?,
        None => EngineConfig::default(),
    };

    if let Some(syntax) = &opts.syntax {
        config.version = SyntaxVersion::parse(syntax)?;
    }
    if let Some(platform) = &opts.platform {
        config.platform = Some(platform.clone());
    }

    debug!("Using syntax version {}", config.version);
    Ok(config)
}

/// Read a kickstart file into a fresh registry
fn load(config: &EngineConfig, file: &Path) -> Result<Registry> {
    let mut registry = config.build_registry();
    reader::read_file(&mut registry, file)
        .with_context(|| format!("Failed to process {}", file.display()))?;
    Ok(registry)
}

/// Print a kickstart file in canonical form
pub fn cmd_render(config: &EngineConfig, file: &Path) -> Result<()> {
    info!("Rendering {} with syntax {}", file.display(), config.version);
    let registry = load(config, file)?;
    print!("{}", registry.render());
    Ok(())
}

/// Validate a kickstart file
pub fn cmd_check(config: &EngineConfig, file: &Path, strict: bool) -> Result<()> {
    let registry = load(config, file)?;
    let warnings = registry.warnings();

    for warning in warnings {
        eprintln!("warning: {}", warning);
    }
    if strict && !warnings.is_empty() {
        anyhow::bail!(
            "{} deprecated command(s) in {}",
            warnings.len(),
            file.display()
        );
    }

    println!("{}: OK ({})", file.display(), config.version);
    Ok(())
}

/// Print every syntax version with its base and changes
pub fn cmd_versions() -> Result<()> {
    for version in SyntaxVersion::all() {
        let desc = descriptor(version);
        match desc.base {
            Some(base) => println!("{} (based on {})", version, base),
            None => println!("{}", version),
        }
        for change in desc.changes {
            println!("  {}", change);
        }
    }
    Ok(())
}
