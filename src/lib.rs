// src/lib.rs

//! ksintent: versioned kickstart directive engine
//!
//! Parses kickstart installer configuration into typed intent state and
//! renders it back as canonical text.
//!
//! # Architecture
//!
//! - Directives: one instance per statement type, bound to one or more names
//! - Registries: name bindings, instances and write order for one syntax version
//! - Versions: each syntax version is a base plus a list of directive changes
//! - Records: repeatable sub-entities (btrfs volumes) with duplicate detection
//! - Rendering: directives by write priority, then scripts, then packages
//!
//! ```
//! use ksintent::{reader, Registry, SyntaxVersion};
//!
//! let mut registry = Registry::for_version(SyntaxVersion::F23);
//! reader::read_str(&mut registry, "btrfs / --data=1 --label=ROOT part.01 part.02\n").unwrap();
//! assert_eq!(
//!     registry.render(),
//!     "btrfs / --label=ROOT --data=raid1 part.01 part.02\n"
//! );
//! ```

pub mod config;
pub mod directive;
mod error;
pub mod reader;
pub mod registry;
pub mod sections;
pub mod version;

pub use config::EngineConfig;
pub use directive::{
    BtrfsDirective, BtrfsVolume, Directive, DirectiveTag, DispatchContext, RaidLevel, Record,
    RecordList, RecordTag, VolumeConfig,
};
pub use error::{DeprecatedDirectiveWarning, Error, Result};
pub use registry::{Binding, Registry, WriteOrder};
pub use sections::{Packages, Script, ScriptKind};
pub use version::{SyntaxVersion, VersionChange, VersionDescriptor};
