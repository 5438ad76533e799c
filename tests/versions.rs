// tests/versions.rs

//! Syntax version tests: descriptor composition, directive availability per
//! version, and configuration-driven registry construction.

mod common;

use common::{assert_parse, assert_parse_error, parse};
use ksintent::directive::{BtrfsDirective, BtrfsSyntax, LangSupport, Mouse};
use ksintent::version::{descriptor, lineage};
use ksintent::{Binding, DirectiveTag, EngineConfig, Error, Registry, SyntaxVersion, VersionChange};
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_every_version_builds() {
    for version in SyntaxVersion::all() {
        let registry = Registry::for_version(version);
        assert_eq!(registry.version(), Some(version));
        assert!(registry.has_directive("auth"));
        assert!(registry.has_directive("lang"));
        assert_eq!(registry.render(), "");
    }
}

#[test]
fn test_lineage_ends_at_version() {
    let chain = lineage(SyntaxVersion::Rhel7);
    let versions: Vec<SyntaxVersion> = chain.iter().map(|d| d.version).collect();
    assert_eq!(versions, SyntaxVersion::all().collect::<Vec<_>>());
    assert_eq!(chain[0].base, None);
    for pair in chain.windows(2) {
        assert_eq!(pair[1].base, Some(pair[0].version));
    }
}

#[test]
fn test_fc3_directives() {
    let registry = parse(
        SyntaxVersion::Fc3,
        "langsupport --default=en_US fr_FR de_DE\nmouse --device=ttyS0 --emulthree genericps/2\ninteractive\n",
    )
    .unwrap();
    assert!(registry.warnings().is_empty());

    let langsupport = registry.get::<LangSupport>(DirectiveTag::LangSupport).unwrap();
    assert_eq!(langsupport.default.as_deref(), Some("en_US"));
    assert_eq!(langsupport.supported, vec!["fr_FR", "de_DE"]);

    let mouse = registry.get::<Mouse>(DirectiveTag::Mouse).unwrap();
    assert_eq!(mouse.device.as_deref(), Some("ttyS0"));
    assert!(mouse.emulthree);
    assert_eq!(mouse.mouse.as_deref(), Some("genericps/2"));
}

#[test]
fn test_f7_deprecations() {
    let registry = parse(SyntaxVersion::F7, "langsupport fr_FR\nmouse\ninteractive\n").unwrap();
    let names: Vec<&str> = registry.warnings().iter().map(|w| w.name.as_str()).collect();
    assert_eq!(names, vec!["langsupport", "mouse"]);
    assert_eq!(registry.render(), "interactive\n");
}

#[test]
fn test_f17_removals() {
    for input in ["langsupport fr_FR", "mouse"] {
        let err = assert_parse_error(SyntaxVersion::F17, input);
        assert!(matches!(err, Error::UnknownDirective { .. }), "{input}: {err:?}");
    }

    // Still accepted with a warning
    let registry = parse(SyntaxVersion::F17, "interactive\n").unwrap();
    assert_eq!(registry.warnings().len(), 1);
    assert_eq!(registry.binding("interactive"), Some(Binding::Bound(DirectiveTag::Interactive)));
}

#[test]
fn test_f23_replaces_btrfs() {
    let f17 = Registry::for_version(SyntaxVersion::F17);
    let f23 = Registry::for_version(SyntaxVersion::F23);
    assert_eq!(
        f17.get::<BtrfsDirective>(DirectiveTag::Btrfs).unwrap().syntax(),
        BtrfsSyntax::F17
    );
    assert_eq!(
        f23.get::<BtrfsDirective>(DirectiveTag::Btrfs).unwrap().syntax(),
        BtrfsSyntax::F23
    );
    assert_eq!(
        f17.write_order().priority_of(DirectiveTag::Btrfs),
        f23.write_order().priority_of(DirectiveTag::Btrfs)
    );
    assert_eq!(descriptor(SyntaxVersion::F23).changes, &[VersionChange::Replaced(DirectiveTag::Btrfs)]);
}

#[test]
fn test_version_names() {
    assert_eq!(SyntaxVersion::parse("rhel7").unwrap(), SyntaxVersion::Rhel7);
    assert_eq!(SyntaxVersion::parse("DEVEL").unwrap(), SyntaxVersion::DEVEL);
    assert!(matches!(SyntaxVersion::parse("F99"), Err(Error::UnknownVersion(_))));
}

#[test]
fn test_config_file_selects_version() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "version = \"F17\"\nplatform = \"x86_64\"").unwrap();

    let config = EngineConfig::load(file.path()).unwrap();
    let mut registry = config.build_registry();
    ksintent::reader::read_str(&mut registry, "btrfs / part.01\n").unwrap();
    assert_eq!(registry.render(), "#platform=x86_64\nbtrfs / part.01\n");

    assert!(ksintent::reader::read_str(&mut registry, "btrfs /home --mkfsoptions=x part.02\n").is_err());
}

#[test]
fn test_kickstart_file_read() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "lang en_US\nzerombr\n").unwrap();

    let mut registry = Registry::for_version(SyntaxVersion::Rhel7);
    ksintent::reader::read_file(&mut registry, file.path()).unwrap();
    assert_eq!(registry.render(), "lang en_US\nzerombr\n");
}

#[test]
fn test_simple_directive_round_trip() {
    assert_parse(SyntaxVersion::Fc3, "mouse --emulthree --device=ttyS0", "mouse --device=ttyS0 --emulthree\n");
    assert_parse(SyntaxVersion::Fc3, "langsupport de_DE --default=de_DE", "langsupport --default=de_DE de_DE\n");
    assert_parse(SyntaxVersion::F23, "autostep", "autostep\n");
    assert_parse(SyntaxVersion::F23, "keyboard 'us intl'", "keyboard \"us intl\"\n");
}
