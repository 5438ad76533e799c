// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use ksintent::reader;
use ksintent::{Error, Registry, SyntaxVersion};
use pretty_assertions::assert_eq;

/// Every syntax version that knows the `btrfs` directive.
pub const BTRFS_VERSIONS: &[SyntaxVersion] =
    &[SyntaxVersion::F17, SyntaxVersion::F23, SyntaxVersion::Rhel7];

/// Parse `input` into a fresh registry for `version`.
pub fn parse(version: SyntaxVersion, input: &str) -> Result<Registry, Error> {
    let mut registry = Registry::for_version(version);
    reader::read_str(&mut registry, input)?;
    Ok(registry)
}

/// Parse `input`, check the rendered text, and check that re-parsing the
/// rendered text renders it unchanged.
///
/// Returns the registry holding the parsed input.
pub fn assert_parse(version: SyntaxVersion, input: &str, expected: &str) -> Registry {
    let registry = parse(version, input)
        .unwrap_or_else(|e| panic!("{} failed to parse {:?}: {}", version, input, e));
    let rendered = registry.render();
    assert_eq!(rendered, expected, "{} rendering of {:?}", version, input);

    let reparsed = parse(version, &rendered)
        .unwrap_or_else(|e| panic!("{} failed to re-parse {:?}: {}", version, rendered, e));
    assert_eq!(reparsed.render(), rendered, "{} re-rendering of {:?}", version, input);

    registry
}

/// Parse `input` and return the fault it raises.
pub fn assert_parse_error(version: SyntaxVersion, input: &str) -> Error {
    match parse(version, input) {
        Ok(registry) => panic!(
            "{} accepted {:?}, rendering {:?}",
            version,
            input,
            registry.render()
        ),
        Err(e) => e,
    }
}
