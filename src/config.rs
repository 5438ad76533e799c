// src/config.rs

//! Engine configuration
//!
//! Optional TOML file selecting the syntax version and platform label:
//!
//! ```toml
//! version = "F23"
//! platform = "x86, AMD64, or Intel EM64T"
//! ```
//!
//! Unknown keys are rejected. Command-line flags override file values.

use crate::error::{Error, Result};
use crate::registry::Registry;
use crate::version::SyntaxVersion;
use serde::Deserialize;
use std::path::Path;

/// Settings for building a registry
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Syntax version to build (latest when omitted)
    #[serde(default)]
    pub version: SyntaxVersion,
    /// Hardware platform written at the top of rendered output
    #[serde(default)]
    pub platform: Option<String>,
}

impl EngineConfig {
    /// Parse configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Build a registry for the configured version and platform
    pub fn build_registry(&self) -> Registry {
        let mut registry = Registry::for_version(self.version);
        registry.set_platform(self.platform.clone());
        registry
    }
}
