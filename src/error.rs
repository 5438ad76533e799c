// src/error.rs

//! Error types for kickstart processing
//!
//! Structural faults (unknown directive, malformed token stream) and semantic
//! faults (illegal option combinations, duplicate definitions) are both fatal
//! to a parse session and carry the directive name and line number that
//! triggered them. Deprecation notices are not errors; see
//! [`DeprecatedDirectiveWarning`].

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for kickstart operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while parsing or rendering kickstart input
#[derive(Debug, Error)]
pub enum Error {
    /// No directive is bound to the given name in this syntax version
    #[error("line {line}: unknown command: {name}")]
    UnknownDirective { name: String, line: usize },

    /// A directive rejected its options
    #[error("line {line}: {name}: {message}")]
    Validation {
        name: String,
        line: usize,
        message: String,
    },

    /// A sub-entity with an identical definition was already recorded
    #[error("line {line}: {name}: {message}")]
    DuplicateDefinition {
        name: String,
        line: usize,
        message: String,
    },

    /// The input text could not be split into directives
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },

    /// Unknown syntax version name
    #[error("unknown syntax version: {0}")]
    UnknownVersion(String),

    /// Failed to read an input or configuration file
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file could not be deserialized
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
}

impl Error {
    /// Line number the fault was raised on, if it is tied to input text
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::UnknownDirective { line, .. }
            | Self::Validation { line, .. }
            | Self::DuplicateDefinition { line, .. }
            | Self::Syntax { line, .. } => Some(*line),
            _ => None,
        }
    }

    /// Create a syntax error for the reader
    pub fn syntax(line: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            line,
            message: message.into(),
        }
    }
}

/// Non-fatal notice emitted when a removed or deprecated directive is used
///
/// Dispatching such a directive never changes intent state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeprecatedDirectiveWarning {
    /// Name the directive was invoked with
    pub name: String,
    /// Line the directive appeared on
    pub line: usize,
}

impl fmt::Display for DeprecatedDirectiveWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Ignoring deprecated command on line {}: The {} command has been deprecated and no \
             longer has any effect. It may be removed from future releases, which will result \
             in a fatal error from kickstart. Please modify your kickstart file to remove this \
             command.",
            self.line, self.name
        )
    }
}
