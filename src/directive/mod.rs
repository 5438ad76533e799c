// src/directive/mod.rs

//! Directive contract
//!
//! A directive is one kickstart statement type (`lang`, `btrfs`, ...). Each
//! registry owns exactly one instance per directive type, identified by its
//! [`DirectiveTag`]. The registry stamps every instance with the name and line
//! it was invoked with before calling [`Directive::parse`], and concatenates
//! [`Directive::render`] output in write-priority order.
//!
//! The trait is sealed: directive types are defined by this crate only, and
//! there is no base type to construct directly.
//!
//! # Contract
//!
//! - `parse` validates every option before mutating state, so a rejected line
//!   leaves the directive untouched.
//! - `render` is a pure function of state and returns an empty string when the
//!   directive was never used.
//! - Re-parsing rendered text reproduces equivalent state.

pub mod btrfs;
mod deprecated;
pub(crate) mod options;
pub mod record;
mod simple;

pub use btrfs::{BtrfsDirective, BtrfsSyntax, BtrfsVolume, RaidLevel, VolumeConfig};
pub use deprecated::Deprecated;
pub use record::{Record, RecordList, RecordTag};
pub use simple::{Authconfig, Autostep, FlagDirective, LangSupport, Mouse, ValueDirective};

use crate::error::{Error, Result};
use std::any::Any;
use std::cmp::Ordering;
use std::fmt;
use strum_macros::{EnumIter, EnumString, IntoStaticStr};

/// Write priority used by most directives
pub const DEFAULT_PRIORITY: i32 = 0;

/// Stable identifier of a directive type
///
/// Tags replace type-name comparisons: override, unregister and write-order
/// collisions all match on the tag. Tags order by their string form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DirectiveTag {
    Authconfig,
    Autostep,
    Btrfs,
    Interactive,
    Keyboard,
    Lang,
    LangSupport,
    Mouse,
    SkipX,
    Zerombr,
}

impl DirectiveTag {
    /// Get the string form of the tag
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

impl fmt::Display for DirectiveTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PartialOrd for DirectiveTag {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DirectiveTag {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

/// Name and line a directive was last invoked with
///
/// Only used to annotate faults; parsed state never depends on it, so every
/// alias of a directive yields the same result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchContext {
    /// Name used in the input (may be an alias)
    pub name: String,
    /// 1-based input line, 0 when invoked outside a parse session
    pub line: usize,
}

impl DispatchContext {
    /// Create a new dispatch context
    pub fn new(name: impl Into<String>, line: usize) -> Self {
        Self {
            name: name.into(),
            line,
        }
    }

    /// Name to report in diagnostics, falling back to the canonical keyword
    pub fn display_name<'a>(&'a self, keyword: &'a str) -> &'a str {
        if self.name.is_empty() {
            keyword
        } else {
            &self.name
        }
    }

    /// Build a validation fault annotated with this context
    pub fn validation(&self, keyword: &str, message: impl Into<String>) -> Error {
        Error::Validation {
            name: self.display_name(keyword).to_string(),
            line: self.line,
            message: message.into(),
        }
    }

    /// Build a duplicate-definition fault annotated with this context
    pub fn duplicate(&self, keyword: &str, message: impl Into<String>) -> Error {
        Error::DuplicateDefinition {
            name: self.display_name(keyword).to_string(),
            line: self.line,
            message: message.into(),
        }
    }
}

/// State every directive carries regardless of its options
#[derive(Debug, Clone, Default)]
pub struct DirectiveBase {
    /// Output position; `None` means the directive is never written
    pub write_priority: Option<i32>,
    /// Invocation context stamped by the registry
    pub context: DispatchContext,
}

impl DirectiveBase {
    /// Create a base with the given write priority
    pub fn new(write_priority: Option<i32>) -> Self {
        Self {
            write_priority,
            context: DispatchContext::default(),
        }
    }
}

mod sealed {
    pub trait Sealed {}
}

pub(crate) use sealed::Sealed;

/// One kickstart statement type
pub trait Directive: Sealed + Any + fmt::Debug {
    /// Stable type tag
    fn tag(&self) -> DirectiveTag;

    /// Shared directive state
    fn base(&self) -> &DirectiveBase;

    /// Mutable shared directive state
    fn base_mut(&mut self) -> &mut DirectiveBase;

    /// Parse the tokens following the directive name and update state
    fn parse(&mut self, tokens: &[String]) -> Result<()>;

    /// Render current state as canonical kickstart text
    fn render(&self) -> String;

    /// Position in rendered output
    fn write_priority(&self) -> Option<i32> {
        self.base().write_priority
    }

    /// Context of the most recent dispatch
    fn context(&self) -> &DispatchContext {
        &self.base().context
    }

    /// Record the name and line this directive is being invoked with
    fn set_context(&mut self, context: DispatchContext) {
        self.base_mut().context = context;
    }

    /// Whether this instance stands in for a directive that no longer works
    fn is_removed(&self) -> bool {
        false
    }
}

/// Downcast a directive to its concrete type
pub fn downcast_ref<T: Directive>(directive: &dyn Directive) -> Option<&T> {
    let any: &dyn Any = directive;
    any.downcast_ref::<T>()
}

/// Mutably downcast a directive to its concrete type
pub fn downcast_mut<T: Directive>(directive: &mut dyn Directive) -> Option<&mut T> {
    let any: &mut dyn Any = directive;
    any.downcast_mut::<T>()
}
