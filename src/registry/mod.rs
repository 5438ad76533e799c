// src/registry/mod.rs

//! Directive registry
//!
//! A registry holds everything one syntax version knows about: which names map
//! to which directive, one instance per directive type, the order directives
//! are written in, and the script and package sections of the file being
//! processed. Input lines are fed in through [`Registry::dispatch`] and the
//! canonical file comes back out of [`Registry::render`].
//!
//! # Invariants
//!
//! - A name binds to at most one directive; there is one instance per
//!   [`DirectiveTag`].
//! - Overriding a directive keeps every alias and its write-order slot.
//! - A directive that is removed or deprecated renders nothing, and using it
//!   only records a [`DeprecatedDirectiveWarning`].
//! - Faults raised by a directive propagate unchanged; earlier successful
//!   dispatches are not rolled back.

pub mod write_order;

pub use write_order::WriteOrder;

use crate::directive::{downcast_mut, downcast_ref, Directive, DirectiveTag, DispatchContext};
use crate::error::{DeprecatedDirectiveWarning, Error, Result};
use crate::sections::{Packages, Script};
use crate::version::SyntaxVersion;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// What a directive name currently resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    /// Dispatches to the directive with this tag
    Bound(DirectiveTag),
    /// Accepted but ignored with a warning
    Removed,
}

/// Per-version container of directives, bindings and output sections
#[derive(Debug, Default)]
pub struct Registry {
    version: Option<SyntaxVersion>,
    bindings: BTreeMap<String, Binding>,
    directives: BTreeMap<DirectiveTag, Box<dyn Directive>>,
    write_order: WriteOrder,
    scripts: Vec<Script>,
    packages: Packages,
    platform: Option<String>,
    warnings: Vec<DeprecatedDirectiveWarning>,
}

impl Registry {
    /// Create an empty registry with no directives
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the registry for a syntax version
    pub fn for_version(version: SyntaxVersion) -> Self {
        crate::version::build_registry(version)
    }

    /// Syntax version this registry was built for
    pub fn version(&self) -> Option<SyntaxVersion> {
        self.version
    }

    pub(crate) fn set_version(&mut self, version: SyntaxVersion) {
        self.version = Some(version);
    }

    /// Bind every name in `names` to `directive`
    ///
    /// Replaces any existing instance with the same tag.
    pub fn register(&mut self, directive: Box<dyn Directive>, names: &[&str]) {
        let tag = directive.tag();
        for name in names {
            self.bindings.insert(name.to_string(), Binding::Bound(tag));
        }
        self.place(tag, directive.write_priority());
        debug!("Registered {} as {:?}", tag, names);
        self.directives.insert(tag, directive);
    }

    /// Replace the directive sharing `directive`'s tag
    ///
    /// All aliases of the old directive dispatch to the new one and it keeps
    /// the old write-order slot. Returns `false`, changing nothing, when no
    /// name is bound to that tag.
    pub fn override_directive(&mut self, directive: Box<dyn Directive>) -> bool {
        let tag = directive.tag();
        if !self.bindings.values().any(|b| *b == Binding::Bound(tag)) {
            debug!("Ignoring override of {}: no name is bound to it", tag);
            return false;
        }
        self.place(tag, directive.write_priority());
        debug!("Overrode {}", tag);
        self.directives.insert(tag, directive);
        true
    }

    /// Remove a directive, its names and its write-order entry
    pub fn unregister(&mut self, tag: DirectiveTag) -> Option<Box<dyn Directive>> {
        self.bindings.retain(|_, b| *b != Binding::Bound(tag));
        self.write_order.remove(tag);
        debug!("Unregistered {}", tag);
        self.directives.remove(&tag)
    }

    /// Turn every known name into an ignored one and stop writing directives
    pub fn disable_all(&mut self) {
        for binding in self.bindings.values_mut() {
            *binding = Binding::Removed;
        }
        self.write_order.clear();
    }

    fn place(&mut self, tag: DirectiveTag, priority: Option<i32>) {
        match priority {
            Some(priority) => self.write_order.insert(tag, priority),
            None => {
                self.write_order.remove(tag);
            }
        }
    }

    /// Route one input line to its directive
    pub fn dispatch(&mut self, name: &str, tokens: &[String], line: usize) -> Result<()> {
        let binding = self
            .bindings
            .get(name)
            .copied()
            .ok_or_else(|| Error::UnknownDirective {
                name: name.to_string(),
                line,
            })?;

        let tag = match binding {
            Binding::Bound(tag) => tag,
            Binding::Removed => {
                self.warn_removed(name, line);
                return Ok(());
            }
        };

        let directive = self
            .directives
            .get_mut(&tag)
            .ok_or_else(|| Error::UnknownDirective {
                name: name.to_string(),
                line,
            })?;
        directive.set_context(DispatchContext::new(name, line));

        if directive.is_removed() {
            self.warn_removed(name, line);
            return Ok(());
        }
        directive.parse(tokens)
    }

    fn warn_removed(&mut self, name: &str, line: usize) {
        let warning = DeprecatedDirectiveWarning {
            name: name.to_string(),
            line,
        };
        warn!("{}", warning);
        self.warnings.push(warning);
    }

    /// Render the whole file in canonical form
    pub fn render(&self) -> String {
        let mut retval = String::new();

        if let Some(platform) = &self.platform {
            retval.push_str(&format!("#platform={}\n", platform));
        }

        for tag in self.write_order.iter() {
            if let Some(directive) = self.directives.get(&tag) {
                retval.push_str(&directive.render());
            }
        }

        for script in &self.scripts {
            retval.push_str(&script.to_string());
        }

        retval.push_str(&self.packages.to_string());
        retval
    }

    /// Check whether a name is known (bound or ignored)
    pub fn has_directive(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// What a name resolves to
    pub fn binding(&self, name: &str) -> Option<Binding> {
        self.bindings.get(name).copied()
    }

    /// Names bound to a tag, sorted
    pub fn names_for(&self, tag: DirectiveTag) -> Vec<&str> {
        self.bindings
            .iter()
            .filter(|(_, b)| **b == Binding::Bound(tag))
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// All known names, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }

    /// Directive instance for a tag
    pub fn directive(&self, tag: DirectiveTag) -> Option<&dyn Directive> {
        self.directives.get(&tag).map(|d| d.as_ref())
    }

    /// Directive instance for a tag, as its concrete type
    pub fn get<T: Directive>(&self, tag: DirectiveTag) -> Option<&T> {
        self.directives
            .get(&tag)
            .and_then(|d| downcast_ref::<T>(d.as_ref()))
    }

    /// Mutable directive instance for a tag, as its concrete type
    pub fn get_mut<T: Directive>(&mut self, tag: DirectiveTag) -> Option<&mut T> {
        self.directives
            .get_mut(&tag)
            .and_then(|d| downcast_mut::<T>(d.as_mut()))
    }

    /// Output ordering table
    pub fn write_order(&self) -> &WriteOrder {
        &self.write_order
    }

    /// Append a script section
    pub fn add_script(&mut self, script: Script) {
        self.scripts.push(script);
    }

    pub fn scripts(&self) -> &[Script] {
        &self.scripts
    }

    pub fn packages(&self) -> &Packages {
        &self.packages
    }

    pub fn packages_mut(&mut self) -> &mut Packages {
        &mut self.packages
    }

    pub fn platform(&self) -> Option<&str> {
        self.platform.as_deref()
    }

    /// Set the hardware platform written as the first line
    pub fn set_platform(&mut self, platform: Option<String>) {
        self.platform = platform.filter(|p| !p.is_empty());
    }

    /// Deprecation notices collected so far
    pub fn warnings(&self) -> &[DeprecatedDirectiveWarning] {
        &self.warnings
    }

    /// Take and clear the collected deprecation notices
    pub fn take_warnings(&mut self) -> Vec<DeprecatedDirectiveWarning> {
        std::mem::take(&mut self.warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directive::{
        Authconfig, BtrfsDirective, BtrfsSyntax, Deprecated, FlagDirective, ValueDirective,
    };

    fn tokens(s: &str) -> Vec<String> {
        s.split_whitespace().map(String::from).collect()
    }

    fn small_registry() -> Registry {
        let mut registry = Registry::new();
        registry.register(
            Box::new(FlagDirective::new(DirectiveTag::Zerombr, "zerombr", Some(110))),
            &["zerombr"],
        );
        registry.register(
            Box::new(ValueDirective::new(DirectiveTag::Lang, "lang", Some(0))),
            &["lang"],
        );
        registry.register(Box::new(Authconfig::new(Some(0))), &["auth", "authconfig"]);
        registry
    }

    #[test]
    fn test_dispatch_unknown() {
        let mut registry = small_registry();
        let err = registry.dispatch("bogus", &[], 12).unwrap_err();
        match err {
            Error::UnknownDirective { name, line } => {
                assert_eq!(name, "bogus");
                assert_eq!(line, 12);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_dispatch_stamps_context() {
        let mut registry = small_registry();
        registry.dispatch("authconfig", &tokens("--useshadow"), 3).unwrap();
        let auth = registry.directive(DirectiveTag::Authconfig).unwrap();
        assert_eq!(auth.context(), &DispatchContext::new("authconfig", 3));
    }

    #[test]
    fn test_render_order_and_sections() {
        let mut registry = small_registry();
        registry.set_platform(Some("x86_64".to_string()));
        registry.dispatch("zerombr", &[], 1).unwrap();
        registry.dispatch("lang", &tokens("en_US"), 2).unwrap();
        registry.dispatch("auth", &tokens("--useshadow"), 3).unwrap();
        registry.add_script(Script::new(crate::sections::ScriptKind::Post, "echo done"));
        registry.packages_mut().add(["@core"]);

        assert_eq!(
            registry.render(),
            "#platform=x86_64\nauth --useshadow\nlang en_US\nzerombr\n\n%post\necho done\n%end\n\n%packages\n@core\n%end\n"
        );
    }

    #[test]
    fn test_render_is_repeatable() {
        let mut registry = small_registry();
        registry.dispatch("lang", &tokens("cs_CZ"), 1).unwrap();
        assert_eq!(registry.render(), registry.render());
    }

    #[test]
    fn test_override_keeps_aliases_and_slot() {
        let mut registry = small_registry();
        let before: Vec<DirectiveTag> = registry.write_order().iter().collect();

        let mut replacement = Authconfig::new(Some(0));
        replacement.authconfig = "--enablemd5".to_string();
        assert!(registry.override_directive(Box::new(replacement)));

        assert_eq!(registry.names_for(DirectiveTag::Authconfig), vec!["auth", "authconfig"]);
        assert_eq!(registry.write_order().iter().collect::<Vec<_>>(), before);
        assert_eq!(
            registry
                .get::<Authconfig>(DirectiveTag::Authconfig)
                .unwrap()
                .authconfig,
            "--enablemd5"
        );
    }

    #[test]
    fn test_override_without_binding_is_noop() {
        let mut registry = small_registry();
        assert!(!registry.override_directive(Box::new(BtrfsDirective::new(BtrfsSyntax::F23))));
        assert!(registry.directive(DirectiveTag::Btrfs).is_none());
        assert!(registry.write_order().priority_of(DirectiveTag::Btrfs).is_none());
    }

    #[test]
    fn test_unregister() {
        let mut registry = small_registry();
        assert!(registry.unregister(DirectiveTag::Zerombr).is_some());
        assert!(!registry.has_directive("zerombr"));
        assert!(registry.write_order().slot(110).is_none());
        assert!(matches!(
            registry.dispatch("zerombr", &[], 1),
            Err(Error::UnknownDirective { .. })
        ));
    }

    #[test]
    fn test_deprecated_dispatch_warns() {
        let mut registry = small_registry();
        registry.dispatch("lang", &tokens("en_US"), 1).unwrap();
        assert!(registry.override_directive(Box::new(Deprecated::new(DirectiveTag::Lang))));

        registry.dispatch("lang", &tokens("de_DE"), 2).unwrap();
        assert_eq!(
            registry.warnings(),
            &[DeprecatedDirectiveWarning {
                name: "lang".to_string(),
                line: 2
            }]
        );
        assert!(registry.write_order().priority_of(DirectiveTag::Lang).is_none());
        assert!(!registry.render().contains("lang"));
    }

    #[test]
    fn test_disable_all() {
        let mut registry = small_registry();
        registry.disable_all();
        assert!(registry.write_order().is_empty());
        assert_eq!(registry.binding("auth"), Some(Binding::Removed));

        registry.dispatch("auth", &tokens("--useshadow"), 4).unwrap();
        assert_eq!(registry.take_warnings().len(), 1);
        assert!(registry.warnings().is_empty());
        assert_eq!(registry.render(), "");

        // Nothing is bound any more, so there is nothing to override
        assert!(!registry.override_directive(Box::new(Authconfig::new(Some(0)))));
    }

    #[test]
    fn test_get_wrong_type() {
        let registry = small_registry();
        assert!(registry.get::<ValueDirective>(DirectiveTag::Lang).is_some());
        assert!(registry.get::<Authconfig>(DirectiveTag::Lang).is_none());
    }
}
