// src/directive/options.rs

//! Option parsing for directive arguments
//!
//! Directive options are declared as `clap` derive structs and parsed from the
//! tokens following the directive name. clap failures become validation faults
//! carrying the dispatch context.

use super::DispatchContext;
use crate::error::Result;
use clap::Parser;
use std::borrow::Cow;

/// Parse directive tokens into an option struct
pub(crate) fn parse_options<A: Parser>(
    context: &DispatchContext,
    keyword: &str,
    tokens: &[String],
) -> Result<A> {
    let bin = context.display_name(keyword);
    A::try_parse_from(std::iter::once(bin).chain(tokens.iter().map(String::as_str)))
        .map_err(|e| context.validation(keyword, clap_message(&e)))
}

/// First line of a clap error without its `error:` prefix
fn clap_message(err: &clap::Error) -> String {
    let rendered = err.to_string();
    let first = rendered.lines().next().unwrap_or_default();
    first.strip_prefix("error: ").unwrap_or(first).trim().to_string()
}

/// Require that a directive received no arguments
pub(crate) fn expect_no_args(
    context: &DispatchContext,
    keyword: &str,
    tokens: &[String],
) -> Result<()> {
    if tokens.is_empty() {
        Ok(())
    } else {
        Err(context.validation(
            keyword,
            format!("{} does not take any arguments", keyword),
        ))
    }
}

/// Wrap a value in double quotes, escaping what the reader unescapes
pub(crate) fn double_quote(value: &str) -> String {
    let mut retval = String::with_capacity(value.len() + 2);
    retval.push('"');
    for c in value.chars() {
        if matches!(c, '"' | '\\' | '$' | '`') {
            retval.push('\\');
        }
        retval.push(c);
    }
    retval.push('"');
    retval
}

/// Quote a rendered value only when it would not read back as one token
pub(crate) fn quote(value: &str) -> Cow<'_, str> {
    let needs_quotes = value.is_empty()
        || value.starts_with('#')
        || value
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '\\'));
    if needs_quotes {
        Cow::Owned(double_quote(value))
    } else {
        Cow::Borrowed(value)
    }
}
