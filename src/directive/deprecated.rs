// src/directive/deprecated.rs

//! Stand-in for directives that no longer have any effect

use super::{Directive, DirectiveBase, DirectiveTag, Sealed};
use crate::error::Result;

/// A deprecated directive
///
/// Takes over the tag (and therefore every name) of the directive it
/// replaces. It is never written and the registry reports its use as a
/// [`crate::DeprecatedDirectiveWarning`] instead of parsing.
#[derive(Debug)]
pub struct Deprecated {
    base: DirectiveBase,
    tag: DirectiveTag,
}

impl Deprecated {
    pub fn new(tag: DirectiveTag) -> Self {
        Self {
            base: DirectiveBase::new(None),
            tag,
        }
    }
}

impl Sealed for Deprecated {}

impl Directive for Deprecated {
    fn tag(&self) -> DirectiveTag {
        self.tag
    }

    fn base(&self) -> &DirectiveBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut DirectiveBase {
        &mut self.base
    }

    fn parse(&mut self, _tokens: &[String]) -> Result<()> {
        Ok(())
    }

    fn render(&self) -> String {
        String::new()
    }

    fn is_removed(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deprecated_is_inert() {
        let mut mouse = Deprecated::new(DirectiveTag::Mouse);
        assert!(mouse.is_removed());
        assert_eq!(mouse.write_priority(), None);
        mouse.parse(&["--device=ttyS0".to_string()]).unwrap();
        assert_eq!(mouse.render(), "");
    }
}
