// src/version/mod.rs

//! Kickstart syntax versions
//!
//! Each syntax version is described by a [`VersionDescriptor`]: the version it
//! builds on and an ordered list of changes (directives added, replaced,
//! deprecated, removed). A version's registry is built by building its base
//! and applying the changes in order, so the full history of any directive can
//! be read straight off the descriptor table.
//!
//! | Version | Base  | Changes                                            |
//! |---------|-------|----------------------------------------------------|
//! | FC3     |       | initial directive set                              |
//! | F7      | FC3   | deprecates `langsupport`, `mouse`                  |
//! | F14     | F7    | deprecates `interactive`                           |
//! | F17     | F14   | adds `btrfs`; removes `langsupport`, `mouse`       |
//! | F23     | F17   | replaces `btrfs` (adds `--mkfsoptions`)            |
//! | RHEL7   | F23   | none                                               |

use crate::directive::{
    Authconfig, Autostep, BtrfsDirective, BtrfsSyntax, Deprecated, Directive, DirectiveTag,
    FlagDirective, LangSupport, Mouse, ValueDirective, DEFAULT_PRIORITY,
};
use crate::error::{Error, Result};
use crate::registry::Registry;
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;
use strum::IntoEnumIterator;
use strum_macros::{EnumIter, EnumString, IntoStaticStr};
use tracing::debug;

/// Write priority of `zerombr` (before any partitioning directive)
const ZEROMBR_PRIORITY: i32 = 110;

/// A named revision of the kickstart language
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, EnumString, IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
pub enum SyntaxVersion {
    #[strum(serialize = "FC3")]
    Fc3,
    #[strum(serialize = "F7")]
    F7,
    #[strum(serialize = "F14")]
    F14,
    #[strum(serialize = "F17")]
    F17,
    #[strum(serialize = "F23")]
    F23,
    #[strum(serialize = "RHEL7")]
    Rhel7,
}

impl SyntaxVersion {
    /// Most recent version
    pub const DEVEL: SyntaxVersion = SyntaxVersion::Rhel7;

    /// Get the version name
    pub fn as_str(&self) -> &'static str {
        self.into()
    }

    /// Parse a version name, case-insensitively
    pub fn parse(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("devel") {
            return Ok(Self::DEVEL);
        }
        Self::from_str(s).map_err(|_| Error::UnknownVersion(s.to_string()))
    }

    /// All versions, oldest first
    pub fn all() -> impl Iterator<Item = SyntaxVersion> {
        Self::iter()
    }
}

impl Default for SyntaxVersion {
    fn default() -> Self {
        Self::DEVEL
    }
}

impl fmt::Display for SyntaxVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SyntaxVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// One step in a version's history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionChange {
    /// New directive, bound to the given names
    Added(DirectiveTag, &'static [&'static str]),
    /// New implementation of an existing directive
    Replaced(DirectiveTag),
    /// Directive kept for compatibility but ignored with a warning
    Deprecated(DirectiveTag),
    /// Directive no longer accepted at all
    Removed(DirectiveTag),
}

impl VersionChange {
    /// Tag the change applies to
    pub fn tag(&self) -> DirectiveTag {
        match self {
            Self::Added(tag, _) | Self::Replaced(tag) | Self::Deprecated(tag) | Self::Removed(tag) => {
                *tag
            }
        }
    }
}

impl fmt::Display for VersionChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Added(tag, names) => write!(f, "added {} ({})", tag, names.join(", ")),
            Self::Replaced(tag) => write!(f, "replaced {}", tag),
            Self::Deprecated(tag) => write!(f, "deprecated {}", tag),
            Self::Removed(tag) => write!(f, "removed {}", tag),
        }
    }
}

/// How a syntax version differs from the one it builds on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionDescriptor {
    pub version: SyntaxVersion,
    pub base: Option<SyntaxVersion>,
    pub changes: &'static [VersionChange],
}

const FC3_CHANGES: &[VersionChange] = &[
    VersionChange::Added(DirectiveTag::Authconfig, &["auth", "authconfig"]),
    VersionChange::Added(DirectiveTag::Autostep, &["autostep"]),
    VersionChange::Added(DirectiveTag::Interactive, &["interactive"]),
    VersionChange::Added(DirectiveTag::Keyboard, &["keyboard"]),
    VersionChange::Added(DirectiveTag::Lang, &["lang"]),
    VersionChange::Added(DirectiveTag::LangSupport, &["langsupport"]),
    VersionChange::Added(DirectiveTag::Mouse, &["mouse"]),
    VersionChange::Added(DirectiveTag::SkipX, &["skipx"]),
    VersionChange::Added(DirectiveTag::Zerombr, &["zerombr"]),
];

const F7_CHANGES: &[VersionChange] = &[
    VersionChange::Deprecated(DirectiveTag::LangSupport),
    VersionChange::Deprecated(DirectiveTag::Mouse),
];

const F14_CHANGES: &[VersionChange] = &[VersionChange::Deprecated(DirectiveTag::Interactive)];

const F17_CHANGES: &[VersionChange] = &[
    VersionChange::Added(DirectiveTag::Btrfs, &["btrfs"]),
    VersionChange::Removed(DirectiveTag::LangSupport),
    VersionChange::Removed(DirectiveTag::Mouse),
];

const F23_CHANGES: &[VersionChange] = &[VersionChange::Replaced(DirectiveTag::Btrfs)];

const RHEL7_CHANGES: &[VersionChange] = &[];

/// Descriptor for a syntax version
pub fn descriptor(version: SyntaxVersion) -> VersionDescriptor {
    let (base, changes) = match version {
        SyntaxVersion::Fc3 => (None, FC3_CHANGES),
        SyntaxVersion::F7 => (Some(SyntaxVersion::Fc3), F7_CHANGES),
        SyntaxVersion::F14 => (Some(SyntaxVersion::F7), F14_CHANGES),
        SyntaxVersion::F17 => (Some(SyntaxVersion::F14), F17_CHANGES),
        SyntaxVersion::F23 => (Some(SyntaxVersion::F17), F23_CHANGES),
        SyntaxVersion::Rhel7 => (Some(SyntaxVersion::F23), RHEL7_CHANGES),
    };
    VersionDescriptor {
        version,
        base,
        changes,
    }
}

/// Descriptors from the oldest ancestor up to `version`
pub fn lineage(version: SyntaxVersion) -> Vec<VersionDescriptor> {
    let mut chain = Vec::new();
    let mut current = Some(version);
    while let Some(v) = current {
        let desc = descriptor(v);
        current = desc.base;
        chain.push(desc);
    }
    chain.reverse();
    chain
}

/// Create the implementation of a directive as of a syntax version
pub fn instantiate(tag: DirectiveTag, version: SyntaxVersion) -> Box<dyn Directive> {
    let priority = Some(DEFAULT_PRIORITY);
    match tag {
        DirectiveTag::Authconfig => Box::new(Authconfig::new(priority)),
        DirectiveTag::Autostep => Box::new(Autostep::new(priority)),
        DirectiveTag::Btrfs => {
            let syntax = if version >= SyntaxVersion::F23 {
                BtrfsSyntax::F23
            } else {
                BtrfsSyntax::F17
            };
            Box::new(BtrfsDirective::new(syntax))
        }
        DirectiveTag::Interactive => {
            Box::new(FlagDirective::new(tag, "interactive", priority))
        }
        DirectiveTag::Keyboard => Box::new(ValueDirective::new(tag, "keyboard", priority)),
        DirectiveTag::Lang => Box::new(ValueDirective::new(tag, "lang", priority)),
        DirectiveTag::LangSupport => Box::new(LangSupport::new(priority)),
        DirectiveTag::Mouse => Box::new(Mouse::new(priority)),
        DirectiveTag::SkipX => Box::new(FlagDirective::new(tag, "skipx", priority)),
        DirectiveTag::Zerombr => {
            Box::new(FlagDirective::new(tag, "zerombr", Some(ZEROMBR_PRIORITY)))
        }
    }
}

/// Build the registry for a syntax version from its descriptor chain
pub fn build_registry(version: SyntaxVersion) -> Registry {
    let mut registry = Registry::new();
    for desc in lineage(version) {
        apply(&mut registry, &desc);
    }
    registry.set_version(version);
    registry
}

fn apply(registry: &mut Registry, desc: &VersionDescriptor) {
    debug!("Applying {} changes for {}", desc.changes.len(), desc.version);
    for change in desc.changes {
        match *change {
            VersionChange::Added(tag, names) => {
                registry.register(instantiate(tag, desc.version), names);
            }
            VersionChange::Replaced(tag) => {
                registry.override_directive(instantiate(tag, desc.version));
            }
            VersionChange::Deprecated(tag) => {
                registry.override_directive(Box::new(Deprecated::new(tag)));
            }
            VersionChange::Removed(tag) => {
                registry.unregister(tag);
            }
        }
    }
}
