// src/directive/simple.rs

//! Directives that only coerce their arguments into plain values

use super::options::{expect_no_args, parse_options, quote};
use super::{Directive, DirectiveBase, DirectiveTag, Sealed};
use crate::error::Result;
use clap::Parser;

/// `auth` / `authconfig`: arguments are passed through to authconfig verbatim
#[derive(Debug)]
pub struct Authconfig {
    base: DirectiveBase,
    pub authconfig: String,
}

impl Authconfig {
    pub fn new(write_priority: Option<i32>) -> Self {
        Self {
            base: DirectiveBase::new(write_priority),
            authconfig: String::new(),
        }
    }
}

impl PartialEq for Authconfig {
    fn eq(&self, other: &Self) -> bool {
        self.authconfig == other.authconfig
    }
}

impl Sealed for Authconfig {}

impl Directive for Authconfig {
    fn tag(&self) -> DirectiveTag {
        DirectiveTag::Authconfig
    }

    fn base(&self) -> &DirectiveBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut DirectiveBase {
        &mut self.base
    }

    fn parse(&mut self, tokens: &[String]) -> Result<()> {
        self.authconfig = tokens.join(" ");
        Ok(())
    }

    fn render(&self) -> String {
        if self.authconfig.is_empty() {
            String::new()
        } else {
            format!("auth {}\n", self.authconfig)
        }
    }
}

#[derive(Parser, Debug)]
#[command(disable_help_flag = true, disable_version_flag = true, args_override_self = true)]
struct AutostepArgs {
    #[arg(long)]
    autoscreenshot: bool,
}

/// `autostep`: step through every installer screen
#[derive(Debug)]
pub struct Autostep {
    base: DirectiveBase,
    pub autostep: bool,
    pub autoscreenshot: bool,
}

impl Autostep {
    pub fn new(write_priority: Option<i32>) -> Self {
        Self {
            base: DirectiveBase::new(write_priority),
            autostep: false,
            autoscreenshot: false,
        }
    }
}

impl PartialEq for Autostep {
    fn eq(&self, other: &Self) -> bool {
        self.autostep == other.autostep && self.autoscreenshot == other.autoscreenshot
    }
}

impl Sealed for Autostep {}

impl Directive for Autostep {
    fn tag(&self) -> DirectiveTag {
        DirectiveTag::Autostep
    }

    fn base(&self) -> &DirectiveBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut DirectiveBase {
        &mut self.base
    }

    fn parse(&mut self, tokens: &[String]) -> Result<()> {
        let args: AutostepArgs = parse_options(&self.base.context, "autostep", tokens)?;
        self.autostep = true;
        self.autoscreenshot = args.autoscreenshot;
        Ok(())
    }

    fn render(&self) -> String {
        match (self.autostep, self.autoscreenshot) {
            (false, _) => String::new(),
            (true, false) => "autostep\n".to_string(),
            (true, true) => "autostep --autoscreenshot\n".to_string(),
        }
    }
}

/// A directive whose presence is its only value (`skipx`, `zerombr`, ...)
#[derive(Debug)]
pub struct FlagDirective {
    base: DirectiveBase,
    tag: DirectiveTag,
    keyword: &'static str,
    pub set: bool,
}

impl FlagDirective {
    pub fn new(tag: DirectiveTag, keyword: &'static str, write_priority: Option<i32>) -> Self {
        Self {
            base: DirectiveBase::new(write_priority),
            tag,
            keyword,
            set: false,
        }
    }
}

impl PartialEq for FlagDirective {
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag && self.set == other.set
    }
}

impl Sealed for FlagDirective {}

impl Directive for FlagDirective {
    fn tag(&self) -> DirectiveTag {
        self.tag
    }

    fn base(&self) -> &DirectiveBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut DirectiveBase {
        &mut self.base
    }

    fn parse(&mut self, tokens: &[String]) -> Result<()> {
        expect_no_args(&self.base.context, self.keyword, tokens)?;
        self.set = true;
        Ok(())
    }

    fn render(&self) -> String {
        if self.set {
            format!("{}\n", self.keyword)
        } else {
            String::new()
        }
    }
}

/// A directive taking exactly one argument (`lang`, `keyboard`)
#[derive(Debug)]
pub struct ValueDirective {
    base: DirectiveBase,
    tag: DirectiveTag,
    keyword: &'static str,
    pub value: Option<String>,
}

impl ValueDirective {
    pub fn new(tag: DirectiveTag, keyword: &'static str, write_priority: Option<i32>) -> Self {
        Self {
            base: DirectiveBase::new(write_priority),
            tag,
            keyword,
            value: None,
        }
    }
}

impl PartialEq for ValueDirective {
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag && self.value == other.value
    }
}

impl Sealed for ValueDirective {}

impl Directive for ValueDirective {
    fn tag(&self) -> DirectiveTag {
        self.tag
    }

    fn base(&self) -> &DirectiveBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut DirectiveBase {
        &mut self.base
    }

    fn parse(&mut self, tokens: &[String]) -> Result<()> {
        match tokens {
            [value] if !value.starts_with("--") => {
                self.value = Some(value.clone());
                Ok(())
            }
            _ => Err(self.base.context.validation(
                self.keyword,
                format!("Kickstart command {} requires one argument", self.keyword),
            )),
        }
    }

    fn render(&self) -> String {
        match &self.value {
            Some(value) => format!("{} {}\n", self.keyword, quote(value)),
            None => String::new(),
        }
    }
}

#[derive(Parser, Debug)]
#[command(disable_help_flag = true, disable_version_flag = true, args_override_self = true)]
struct LangSupportArgs {
    #[arg(long)]
    default: Option<String>,
    supported: Vec<String>,
}

/// `langsupport`: additional languages to install
#[derive(Debug)]
pub struct LangSupport {
    base: DirectiveBase,
    pub default: Option<String>,
    pub supported: Vec<String>,
}

impl LangSupport {
    pub fn new(write_priority: Option<i32>) -> Self {
        Self {
            base: DirectiveBase::new(write_priority),
            default: None,
            supported: Vec::new(),
        }
    }
}

impl PartialEq for LangSupport {
    fn eq(&self, other: &Self) -> bool {
        self.default == other.default && self.supported == other.supported
    }
}

impl Sealed for LangSupport {}

impl Directive for LangSupport {
    fn tag(&self) -> DirectiveTag {
        DirectiveTag::LangSupport
    }

    fn base(&self) -> &DirectiveBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut DirectiveBase {
        &mut self.base
    }

    fn parse(&mut self, tokens: &[String]) -> Result<()> {
        let args: LangSupportArgs = parse_options(&self.base.context, "langsupport", tokens)?;
        self.default = args.default;
        self.supported = args.supported;
        Ok(())
    }

    fn render(&self) -> String {
        if self.default.is_none() && self.supported.is_empty() {
            return String::new();
        }
        let mut retval = "langsupport".to_string();
        if let Some(default) = &self.default {
            retval.push_str(&format!(" --default={}", quote(default)));
        }
        for lang in &self.supported {
            retval.push(' ');
            retval.push_str(&quote(lang));
        }
        retval.push('\n');
        retval
    }
}

#[derive(Parser, Debug)]
#[command(disable_help_flag = true, disable_version_flag = true, args_override_self = true)]
struct MouseArgs {
    #[arg(long)]
    device: Option<String>,
    #[arg(long)]
    emulthree: bool,
    mouse: Option<String>,
}

/// `mouse`: pointer device configuration
#[derive(Debug)]
pub struct Mouse {
    base: DirectiveBase,
    pub mouse: Option<String>,
    pub device: Option<String>,
    pub emulthree: bool,
    seen: bool,
}

impl Mouse {
    pub fn new(write_priority: Option<i32>) -> Self {
        Self {
            base: DirectiveBase::new(write_priority),
            mouse: None,
            device: None,
            emulthree: false,
            seen: false,
        }
    }
}

impl PartialEq for Mouse {
    fn eq(&self, other: &Self) -> bool {
        self.seen == other.seen
            && self.mouse == other.mouse
            && self.device == other.device
            && self.emulthree == other.emulthree
    }
}

impl Sealed for Mouse {}

impl Directive for Mouse {
    fn tag(&self) -> DirectiveTag {
        DirectiveTag::Mouse
    }

    fn base(&self) -> &DirectiveBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut DirectiveBase {
        &mut self.base
    }

    fn parse(&mut self, tokens: &[String]) -> Result<()> {
        let args: MouseArgs = parse_options(&self.base.context, "mouse", tokens)?;
        self.mouse = args.mouse;
        self.device = args.device;
        self.emulthree = args.emulthree;
        self.seen = true;
        Ok(())
    }

    fn render(&self) -> String {
        if !self.seen {
            return String::new();
        }
        let mut retval = "mouse".to_string();
        if let Some(device) = &self.device {
            retval.push_str(&format!(" --device={}", quote(device)));
        }
        if self.emulthree {
            retval.push_str(" --emulthree");
        }
        if let Some(mouse) = &self.mouse {
            retval.push(' ');
            retval.push_str(&quote(mouse));
        }
        retval.push('\n');
        retval
    }
}
