// src/directive/btrfs.rs

//! btrfs volume and subvolume definitions
//!
//! Syntax:
//!
//! ```text
//! btrfs <mntpoint> [--data=LEVEL] [--metadata=LEVEL] [--label=LABEL]
//!       [--noformat] [--useexisting] [--mkfsoptions=OPTS] <member> [<member>...]
//! btrfs <mntpoint> --subvol --name=NAME <parent>
//! ```
//!
//! Every occurrence adds one [`BtrfsVolume`] record. Redundancy levels accept
//! numeric and symbolic spellings and are stored in canonical lowercase form,
//! so `--data=1`, `--data=RAID1` and `--data=raid1` all render as
//! `--data=raid1`.

use super::options::{double_quote, parse_options, quote};
use super::record::{same_members, Record, RecordList, RecordTag};
use super::{Directive, DirectiveBase, DirectiveTag, DispatchContext, Sealed};
use crate::error::Result;
use clap::{Args, Parser};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Keyword btrfs records are written with
pub const KEYWORD: &str = "btrfs";

/// Write priority of btrfs definitions (after partitions and raid devices)
pub const WRITE_PRIORITY: i32 = 132;

/// btrfs data/metadata redundancy level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum RaidLevel {
    Raid0,
    Raid1,
    Raid10,
    Single,
}

impl RaidLevel {
    /// Get the canonical string form
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Raid0 => "raid0",
            Self::Raid1 => "raid1",
            Self::Raid10 => "raid10",
            Self::Single => "single",
        }
    }

    /// Parse a level from any accepted spelling
    ///
    /// Accepts `raidN`, bare `N` and `single`, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "raid0" | "0" => Some(Self::Raid0),
            "raid1" | "1" => Some(Self::Raid1),
            "raid10" | "10" => Some(Self::Raid10),
            "single" => Some(Self::Single),
            _ => None,
        }
    }
}

impl fmt::Display for RaidLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RaidLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid btrfs level {}", s))
    }
}

impl TryFrom<String> for RaidLevel {
    type Error = String;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        s.parse()
    }
}

/// Which revision of the btrfs syntax a directive accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BtrfsSyntax {
    /// Original syntax
    F17,
    /// Adds `--mkfsoptions`
    F23,
}

/// One btrfs volume or subvolume definition
#[derive(Debug, Clone)]
pub struct BtrfsVolume {
    pub mountpoint: String,
    pub devices: Vec<String>,
    /// Whether the volume gets a new filesystem
    pub format: bool,
    /// Reuse an existing volume
    pub preexist: bool,
    pub label: Option<String>,
    pub subvol: bool,
    /// Subvolume name, only meaningful with `subvol`
    pub name: Option<String>,
    pub data_level: Option<RaidLevel>,
    pub metadata_level: Option<RaidLevel>,
    pub mkfs_options: Option<String>,
}

impl Default for BtrfsVolume {
    fn default() -> Self {
        Self {
            mountpoint: String::new(),
            devices: Vec::new(),
            format: true,
            preexist: false,
            label: None,
            subvol: false,
            name: None,
            data_level: None,
            metadata_level: None,
            mkfs_options: None,
        }
    }
}

impl BtrfsVolume {
    /// Build a volume from typed configuration, applying parse-time rules
    pub fn from_config(config: VolumeConfig) -> std::result::Result<Self, String> {
        let volume = Self {
            mountpoint: config.mountpoint,
            devices: config.devices,
            format: !(config.noformat || config.useexisting),
            preexist: config.useexisting,
            label: config.label,
            subvol: config.subvol,
            name: config.name,
            data_level: config.data,
            metadata_level: config.metadata,
            mkfs_options: config.mkfsoptions,
        };
        volume.check()?;
        Ok(volume)
    }

    /// Validate option combinations
    fn check(&self) -> std::result::Result<(), String> {
        if self.mountpoint.is_empty() {
            return Err("btrfs must be given a mountpoint".to_string());
        }
        if self.devices.is_empty() {
            return Err(if self.subvol {
                "btrfs subvol requires specification of parent volume".to_string()
            } else {
                "btrfs must be given a list of partitions".to_string()
            });
        }
        if self.subvol {
            if self.name.is_none() {
                return Err("btrfs subvolume requires a name".to_string());
            }
            if self.devices.len() > 1 {
                return Err("btrfs subvolume must have exactly one parent volume".to_string());
            }
        } else if self.name.is_some() {
            return Err("--name is only valid together with --subvol".to_string());
        }
        if self.mkfs_options.is_some() && (self.preexist || !self.format) {
            return Err("--mkfsoptions with --noformat or --useexisting has no effect.".to_string());
        }
        Ok(())
    }

    /// Options in canonical order, without mountpoint and members
    fn options(&self) -> String {
        let mut retval = String::new();
        if !self.format {
            retval.push_str(" --noformat");
        }
        if self.preexist {
            retval.push_str(" --useexisting");
        }
        if self.subvol {
            if let Some(name) = &self.name {
                retval.push_str(&format!(" --subvol --name={}", quote(name)));
            }
        }
        if let Some(label) = &self.label {
            retval.push_str(&format!(" --label={}", quote(label)));
        }
        if let Some(level) = self.data_level {
            retval.push_str(&format!(" --data={}", level));
        }
        if let Some(level) = self.metadata_level {
            retval.push_str(&format!(" --metadata={}", level));
        }
        if let Some(opts) = &self.mkfs_options {
            retval.push_str(&format!(" --mkfsoptions={}", double_quote(opts)));
        }
        retval
    }
}

impl PartialEq for BtrfsVolume {
    fn eq(&self, other: &Self) -> bool {
        self.same_definition(other) && same_members(self.members(), other.members())
    }
}

impl fmt::Display for BtrfsVolume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let members: Vec<_> = self.members().iter().map(|m| quote(m)).collect();
        writeln!(
            f,
            "{} {}{} {}",
            KEYWORD,
            quote(&self.mountpoint),
            self.options(),
            members.join(" ")
        )
    }
}

impl Record for BtrfsVolume {
    fn tag(&self) -> RecordTag {
        RecordTag::BtrfsVolume
    }

    fn members(&self) -> &[String] {
        &self.devices
    }

    fn same_definition(&self, other: &Self) -> bool {
        self.mountpoint == other.mountpoint
            && self.format == other.format
            && self.preexist == other.preexist
            && self.label == other.label
            && self.subvol == other.subvol
            && self.name == other.name
            && self.data_level == other.data_level
            && self.metadata_level == other.metadata_level
            && self.mkfs_options == other.mkfs_options
    }
}

/// Typed construction input for a [`BtrfsVolume`]
///
/// Unknown fields are rejected at deserialization time.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VolumeConfig {
    pub mountpoint: String,
    #[serde(default)]
    pub devices: Vec<String>,
    #[serde(default)]
    pub noformat: bool,
    #[serde(default)]
    pub useexisting: bool,
    pub label: Option<String>,
    #[serde(default)]
    pub subvol: bool,
    pub name: Option<String>,
    pub data: Option<RaidLevel>,
    pub metadata: Option<RaidLevel>,
    pub mkfsoptions: Option<String>,
}

#[derive(Args, Debug)]
struct VolumeArgs {
    #[arg(long)]
    data: Option<String>,
    #[arg(long)]
    metadata: Option<String>,
    #[arg(long)]
    label: Option<String>,
    #[arg(long)]
    noformat: bool,
    #[arg(long)]
    useexisting: bool,
    #[arg(long)]
    subvol: bool,
    #[arg(long)]
    name: Option<String>,
    /// Mount point followed by member devices
    extra: Vec<String>,
}

#[derive(Parser, Debug)]
#[command(disable_help_flag = true, disable_version_flag = true, args_override_self = true)]
struct F17Args {
    #[command(flatten)]
    volume: VolumeArgs,
}

#[derive(Parser, Debug)]
#[command(disable_help_flag = true, disable_version_flag = true, args_override_self = true)]
struct F23Args {
    #[command(flatten)]
    volume: VolumeArgs,
    #[arg(long)]
    mkfsoptions: Option<String>,
}

/// The `btrfs` directive
#[derive(Debug)]
pub struct BtrfsDirective {
    base: DirectiveBase,
    syntax: BtrfsSyntax,
    volumes: RecordList<BtrfsVolume>,
}

impl BtrfsDirective {
    /// Create a directive accepting the given syntax revision
    pub fn new(syntax: BtrfsSyntax) -> Self {
        Self {
            base: DirectiveBase::new(Some(WRITE_PRIORITY)),
            syntax,
            volumes: RecordList::new(),
        }
    }

    /// Syntax revision this directive accepts
    pub fn syntax(&self) -> BtrfsSyntax {
        self.syntax
    }

    /// Volumes defined so far
    pub fn volumes(&self) -> &RecordList<BtrfsVolume> {
        &self.volumes
    }

    /// Add an already-validated volume, rejecting duplicates
    pub fn add_volume(&mut self, volume: BtrfsVolume) -> Result<()> {
        let context = self.base.context.clone();
        self.push(&context, volume)
    }

    fn push(&mut self, context: &DispatchContext, volume: BtrfsVolume) -> Result<()> {
        self.volumes.push_unique(volume).map_err(|dup| {
            context.duplicate(
                KEYWORD,
                format!(
                    "A btrfs volume with the mountpoint {} has already been defined.",
                    dup.mountpoint
                ),
            )
        })
    }

    /// Parse tokens into a volume without recording it
    fn volume_from_tokens(&self, context: &DispatchContext, tokens: &[String]) -> Result<BtrfsVolume> {
        let (args, mkfs_options) = match self.syntax {
            BtrfsSyntax::F17 => {
                let parsed: F17Args = parse_options(context, KEYWORD, tokens)?;
                (parsed.volume, None)
            }
            BtrfsSyntax::F23 => {
                let parsed: F23Args = parse_options(context, KEYWORD, tokens)?;
                (parsed.volume, parsed.mkfsoptions)
            }
        };

        let level = |value: Option<String>| -> Result<Option<RaidLevel>> {
            value
                .map(|v| v.parse::<RaidLevel>().map_err(|e| context.validation(KEYWORD, e)))
                .transpose()
        };

        let mut extra = args.extra.into_iter();
        let mountpoint = extra.next().unwrap_or_default();
        let devices: Vec<String> = extra.collect();

        let data_level = level(args.data)?;
        let metadata_level = level(args.metadata)?;

        let volume = BtrfsVolume {
            mountpoint,
            devices,
            format: !(args.noformat || args.useexisting),
            preexist: args.useexisting,
            label: args.label,
            subvol: args.subvol,
            name: args.name,
            data_level,
            metadata_level,
            mkfs_options,
        };
        volume
            .check()
            .map_err(|msg| context.validation(KEYWORD, msg))?;
        Ok(volume)
    }
}

impl PartialEq for BtrfsDirective {
    fn eq(&self, other: &Self) -> bool {
        self.volumes == other.volumes
    }
}

impl Sealed for BtrfsDirective {}

impl Directive for BtrfsDirective {
    fn tag(&self) -> DirectiveTag {
        DirectiveTag::Btrfs
    }

    fn base(&self) -> &DirectiveBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut DirectiveBase {
        &mut self.base
    }

    fn parse(&mut self, tokens: &[String]) -> Result<()> {
        let context = self.base.context.clone();
        let volume = self.volume_from_tokens(&context, tokens)?;
        self.push(&context, volume)
    }

    fn render(&self) -> String {
        self.volumes.to_string()
    }
}
