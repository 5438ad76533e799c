// src/reader.rs

//! Kickstart file reader
//!
//! Splits kickstart text into directive lines and sections and feeds them to
//! a [`Registry`]. Directive lines are split with shell-like quoting; `%pre`,
//! `%post`, `%traceback` and `%packages` bodies are collected up to `%end`.
//! A `#platform=` comment sets the registry's platform label, other comments
//! and blank lines are skipped.

use crate::directive::options::parse_options;
use crate::directive::DispatchContext;
use crate::error::{Error, Result};
use crate::registry::Registry;
use crate::sections::{Script, ScriptKind};
use clap::Parser;
use std::path::Path;
use tracing::debug;

const PLATFORM_PREFIX: &str = "#platform=";

#[derive(Parser, Debug)]
#[command(disable_help_flag = true, disable_version_flag = true, args_override_self = true)]
struct ScriptArgs {
    #[arg(long)]
    interpreter: Option<String>,
    #[arg(long)]
    nochroot: bool,
    #[arg(long, alias = "logfile")]
    log: Option<String>,
    #[arg(long)]
    erroronfail: bool,
}

#[derive(Parser, Debug)]
#[command(disable_help_flag = true, disable_version_flag = true, args_override_self = true)]
struct PackagesArgs {
    #[arg(long)]
    default: bool,
    #[arg(long)]
    excludedocs: bool,
    #[arg(long)]
    ignoremissing: bool,
}

/// Split one line into tokens
///
/// Whitespace separates tokens; single quotes keep everything literal, double
/// quotes allow `\` escapes, and quotes may appear mid-token
/// (`--opt="a b"` yields `--opt=a b`). A `#` at the start of a token begins a
/// comment.
pub fn split_tokens(line: &str, lineno: usize) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            c if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            '#' if !in_token => break,
            '\'' => {
                in_token = true;
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(c) => current.push(c),
                        None => return Err(Error::syntax(lineno, "No closing quotation")),
                    }
                }
            }
            '"' => {
                in_token = true;
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some(c @ ('"' | '\\' | '$' | '`')) => current.push(c),
                            Some(c) => {
                                current.push('\\');
                                current.push(c);
                            }
                            None => return Err(Error::syntax(lineno, "No closing quotation")),
                        },
                        Some(c) => current.push(c),
                        None => return Err(Error::syntax(lineno, "No closing quotation")),
                    }
                }
            }
            '\\' => {
                in_token = true;
                match chars.next() {
                    Some(c) => current.push(c),
                    None => return Err(Error::syntax(lineno, "No escaped character")),
                }
            }
            c => {
                in_token = true;
                current.push(c);
            }
        }
    }

    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}

/// Body lines of a section, and the line number after its `%end`
fn collect_section<'a>(
    lines: &[(usize, &'a str)],
    header: &str,
    start: usize,
) -> Result<(Vec<&'a str>, usize)> {
    let mut body = Vec::new();
    for (idx, (_, line)) in lines.iter().enumerate().skip(start) {
        if line.trim() == "%end" {
            return Ok((body, idx + 1));
        }
        body.push(*line);
    }
    let lineno = lines.get(start.saturating_sub(1)).map(|(n, _)| *n).unwrap_or(0);
    Err(Error::syntax(
        lineno,
        format!("Section {} does not end with %end.", header),
    ))
}

/// Feed kickstart text into a registry
pub fn read_str(registry: &mut Registry, text: &str) -> Result<()> {
    let lines: Vec<(usize, &str)> = text.lines().enumerate().map(|(i, l)| (i + 1, l)).collect();
    let mut idx = 0;

    while idx < lines.len() {
        let (lineno, raw) = lines[idx];
        idx += 1;
        let line = raw.trim();

        if let Some(platform) = line.strip_prefix(PLATFORM_PREFIX) {
            registry.set_platform(Some(platform.trim().to_string()));
            continue;
        }

        let tokens = split_tokens(line, lineno)?;
        let Some((name, args)) = tokens.split_first() else {
            continue;
        };

        if !name.starts_with('%') {
            registry.dispatch(name, args, lineno)?;
            continue;
        }

        let context = DispatchContext::new(name.as_str(), lineno);
        if let Some(kind) = ScriptKind::from_header(name) {
            let opts: ScriptArgs = parse_options(&context, name, args)?;
            let (body, next) = collect_section(&lines, name, idx)?;
            idx = next;

            let mut script = Script::new(kind, body.iter().map(|l| format!("{}\n", l)).collect::<String>());
            if let Some(interpreter) = opts.interpreter {
                script.interpreter = interpreter;
            }
            script.in_chroot = !opts.nochroot;
            script.log_file = opts.log;
            script.error_on_fail = opts.erroronfail;
            script.line = lineno;
            debug!("Read {} section at line {}", name, lineno);
            registry.add_script(script);
        } else if name == "%packages" {
            let opts: PackagesArgs = parse_options(&context, name, args)?;
            let (body, next) = collect_section(&lines, name, idx)?;
            idx = next;

            let packages = registry.packages_mut();
            packages.default |= opts.default;
            packages.exclude_docs |= opts.excludedocs;
            packages.ignore_missing |= opts.ignoremissing;
            packages.add(body);
        } else {
            return Err(Error::syntax(
                lineno,
                format!("Unknown kickstart section: {}", name),
            ));
        }
    }

    Ok(())
}

/// Read a kickstart file into a registry
pub fn read_file(registry: &mut Registry, path: &Path) -> Result<()> {
    let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_str(registry, &text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::SyntaxVersion;

    #[test]
    fn test_split_plain() {
        assert_eq!(
            split_tokens("btrfs / --data=1 part.01", 1).unwrap(),
            vec!["btrfs", "/", "--data=1", "part.01"]
        );
        assert!(split_tokens("   ", 1).unwrap().is_empty());
    }

    #[test]
    fn test_split_quotes() {
        assert_eq!(
            split_tokens(r#"btrfs / --mkfsoptions="some, thing" 'a b' c\ d"#, 1).unwrap(),
            vec!["btrfs", "/", "--mkfsoptions=some, thing", "a b", "c d"]
        );
        assert_eq!(
            split_tokens(r#"x "say \"hi\"""#, 1).unwrap(),
            vec!["x", r#"say "hi""#]
        );
        assert_eq!(split_tokens(r#"x """#, 1).unwrap(), vec!["x", ""]);
    }

    #[test]
    fn test_split_comments() {
        assert_eq!(split_tokens("lang en_US # english", 1).unwrap(), vec!["lang", "en_US"]);
        assert_eq!(split_tokens("rootpw ab#c", 1).unwrap(), vec!["rootpw", "ab#c"]);
        assert!(split_tokens("# comment", 1).unwrap().is_empty());
    }

    #[test]
    fn test_split_unterminated() {
        let err = split_tokens("lang \"en_US", 4).unwrap_err();
        assert!(matches!(err, Error::Syntax { line: 4, .. }));
    }

    #[test]
    fn test_read_sections() {
        let mut registry = Registry::for_version(SyntaxVersion::F23);
        read_str(
            &mut registry,
            "lang en_US\n%post --nochroot --log=/tmp/post.log\necho one\n\necho two\n%end\n%packages --ignoremissing\n@core\n-vim\n%end\n",
        )
        .unwrap();

        let script = &registry.scripts()[0];
        assert_eq!(script.kind, ScriptKind::Post);
        assert_eq!(script.body, "echo one\n\necho two\n");
        assert!(!script.in_chroot);
        assert_eq!(script.log_file.as_deref(), Some("/tmp/post.log"));
        assert_eq!(script.line, 2);

        assert!(registry.packages().ignore_missing);
        assert_eq!(registry.packages().groups, vec!["core"]);
        assert_eq!(registry.packages().excluded, vec!["vim"]);
    }

    #[test]
    fn test_read_missing_end() {
        let mut registry = Registry::for_version(SyntaxVersion::F23);
        let err = read_str(&mut registry, "lang en_US\n%pre\necho hi\n").unwrap_err();
        assert!(matches!(err, Error::Syntax { line: 2, .. }));
    }

    #[test]
    fn test_read_unknown_section() {
        let mut registry = Registry::for_version(SyntaxVersion::F23);
        let err = read_str(&mut registry, "%addon com_example\n%end\n").unwrap_err();
        assert!(matches!(err, Error::Syntax { line: 1, .. }));
    }

    #[test]
    fn test_read_platform() {
        let mut registry = Registry::for_version(SyntaxVersion::F23);
        read_str(&mut registry, "#platform=x86, AMD64, or Intel EM64T\nskipx\n").unwrap();
        assert_eq!(registry.platform(), Some("x86, AMD64, or Intel EM64T"));
        assert_eq!(registry.render(), "#platform=x86, AMD64, or Intel EM64T\nskipx\n");
    }

    #[test]
    fn test_read_dispatch_line_numbers() {
        let mut registry = Registry::for_version(SyntaxVersion::F23);
        let err = read_str(&mut registry, "# header\n\nlang en_US\nbogus\n").unwrap_err();
        assert_eq!(err.line(), Some(4));
    }
}
