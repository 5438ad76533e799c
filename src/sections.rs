// src/sections.rs

//! Auxiliary sections: scripts and package selection
//!
//! These are not directives. They are appended to the registry directly and
//! always render after every directive, scripts first in the order they were
//! added, then the package section.

use crate::directive::options::quote;
use std::fmt;

/// Default script interpreter
pub const DEFAULT_INTERPRETER: &str = "/bin/sh";

/// When a script runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptKind {
    /// Before partitioning
    Pre,
    /// After installation
    Post,
    /// When the installer crashes
    Traceback,
}

impl ScriptKind {
    /// Section header keyword including the `%`
    pub fn header(&self) -> &'static str {
        match self {
            Self::Pre => "%pre",
            Self::Post => "%post",
            Self::Traceback => "%traceback",
        }
    }

    /// Parse a section header keyword
    pub fn from_header(s: &str) -> Option<Self> {
        match s {
            "%pre" => Some(Self::Pre),
            "%post" => Some(Self::Post),
            "%traceback" => Some(Self::Traceback),
            _ => None,
        }
    }
}

/// One `%pre`, `%post` or `%traceback` section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    pub kind: ScriptKind,
    pub body: String,
    pub interpreter: String,
    /// Run inside the installed system (post only)
    pub in_chroot: bool,
    pub log_file: Option<String>,
    pub error_on_fail: bool,
    /// Line of the section header
    pub line: usize,
}

impl Script {
    /// Create a script with default options
    pub fn new(kind: ScriptKind, body: impl Into<String>) -> Self {
        Self {
            kind,
            body: body.into(),
            interpreter: DEFAULT_INTERPRETER.to_string(),
            in_chroot: true,
            log_file: None,
            error_on_fail: false,
            line: 0,
        }
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\n{}", self.kind.header())?;
        if !self.interpreter.is_empty() && self.interpreter != DEFAULT_INTERPRETER {
            write!(f, " --interpreter={}", quote(&self.interpreter))?;
        }
        if self.kind == ScriptKind::Post && !self.in_chroot {
            write!(f, " --nochroot")?;
        }
        if let Some(log) = &self.log_file {
            write!(f, " --log={}", quote(log))?;
        }
        if self.error_on_fail {
            write!(f, " --erroronfail")?;
        }
        if self.body.ends_with('\n') {
            write!(f, "\n{}%end\n", self.body)
        } else {
            write!(f, "\n{}\n%end\n", self.body)
        }
    }
}

/// The `%packages` section
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Packages {
    /// Install only the default package set
    pub default: bool,
    pub exclude_docs: bool,
    pub ignore_missing: bool,
    pub groups: Vec<String>,
    pub packages: Vec<String>,
    pub excluded: Vec<String>,
}

impl Packages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add package section lines
    ///
    /// `@name` selects a group, `-name` excludes a package (dropping an
    /// earlier selection of it), anything else selects a package. Blank lines
    /// and comments are ignored.
    pub fn add<'a>(&mut self, lines: impl IntoIterator<Item = &'a str>) {
        for line in lines {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(group) = line.strip_prefix('@') {
                push_unique(&mut self.groups, group.trim());
            } else if let Some(pkg) = line.strip_prefix('-') {
                let pkg = pkg.trim();
                self.packages.retain(|p| p != pkg);
                push_unique(&mut self.excluded, pkg);
            } else {
                self.excluded.retain(|p| p != line);
                push_unique(&mut self.packages, line);
            }
        }
    }

    /// Whether anything was selected or configured
    pub fn is_empty(&self) -> bool {
        !self.default
            && !self.exclude_docs
            && !self.ignore_missing
            && self.groups.is_empty()
            && self.packages.is_empty()
            && self.excluded.is_empty()
    }
}

fn push_unique(list: &mut Vec<String>, item: &str) {
    if !list.iter().any(|i| i == item) {
        list.push(item.to_string());
    }
}

impl fmt::Display for Packages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return Ok(());
        }

        write!(f, "\n%packages")?;
        if self.default {
            write!(f, " --default")?;
        }
        if self.exclude_docs {
            write!(f, " --excludedocs")?;
        }
        if self.ignore_missing {
            write!(f, " --ignoremissing")?;
        }
        writeln!(f)?;

        for group in &self.groups {
            writeln!(f, "@{}", group)?;
        }
        for pkg in &self.packages {
            writeln!(f, "{}", pkg)?;
        }
        for pkg in &self.excluded {
            writeln!(f, "-{}", pkg)?;
        }
        writeln!(f, "%end")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_render_defaults() {
        let script = Script::new(ScriptKind::Pre, "echo hi");
        assert_eq!(script.to_string(), "\n%pre\necho hi\n%end\n");
    }

    #[test]
    fn test_script_render_options() {
        let mut script = Script::new(ScriptKind::Post, "import os\n");
        script.interpreter = "/usr/bin/python3".to_string();
        script.in_chroot = false;
        script.log_file = Some("/root/ks-post.log".to_string());
        script.error_on_fail = true;
        assert_eq!(
            script.to_string(),
            "\n%post --interpreter=/usr/bin/python3 --nochroot --log=/root/ks-post.log --erroronfail\nimport os\n%end\n"
        );
    }

    #[test]
    fn test_script_quotes_option_values() {
        let mut script = Script::new(ScriptKind::Post, "true\n");
        script.log_file = Some("/root/post log.txt".to_string());
        assert_eq!(
            script.to_string(),
            "\n%post --log=\"/root/post log.txt\"\ntrue\n%end\n"
        );
    }

    #[test]
    fn test_nochroot_only_for_post() {
        let mut script = Script::new(ScriptKind::Pre, "true");
        script.in_chroot = false;
        assert_eq!(script.to_string(), "\n%pre\ntrue\n%end\n");
    }

    #[test]
    fn test_packages_empty_renders_nothing() {
        assert_eq!(Packages::new().to_string(), "");
    }

    #[test]
    fn test_packages_add_and_render() {
        let mut packages = Packages::new();
        packages.add(["@core", "vim", "", "# editors", "-emacs", "emacs", "-vim", "@core"]);
        assert_eq!(packages.groups, vec!["core"]);
        assert_eq!(packages.packages, vec!["emacs"]);
        assert_eq!(packages.excluded, vec!["vim"]);

        packages.ignore_missing = true;
        assert_eq!(
            packages.to_string(),
            "\n%packages --ignoremissing\n@core\nemacs\n-vim\n%end\n"
        );
    }
}
