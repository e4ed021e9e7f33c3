//! The template engine: a pure, stateless textual formatter (§4.1).
//!
//! `format` joins source-text fragments with newlines, interpolating
//! `${NAME}` / `${NAME|FILTER}` placeholders against a variable mapping and
//! re-indenting any multi-line substitution to match the indentation of the
//! line it landed on. It never touches the filesystem and never looks at
//! AST nodes, every emission function in [`crate::emit`] is built on top
//! of it.

use crate::error::{EmitError, EmitResult};
use std::collections::HashMap;

/// A variable mapping handed to [`format`]. Keys are placeholder names;
/// values are the (already-rendered) text to splice in.
pub type Vars<'a> = HashMap<&'a str, String>;

/// Builds a [`Vars`] map from an array of `(name, value)` pairs.
#[must_use]
pub fn vars<'a, const N: usize>(pairs: [(&'a str, String); N]) -> Vars<'a> {
    HashMap::from(pairs)
}

/// Joins `parts` with `"\n"`, interpolating `${NAME}` / `${NAME|FILTER}`
/// placeholders against `vars` and re-indenting multi-line substitutions.
///
/// # Errors
///
/// Returns [`EmitError::UndefinedVariable`] if a placeholder name has no
/// entry in `vars`, or [`EmitError::UnrecognizedFilter`] if a filter other
/// than `string` is used.
pub fn format(parts: &[&str], vars: &Vars<'_>) -> EmitResult<String> {
    let mut rendered = Vec::with_capacity(parts.len());
    for part in parts {
        rendered.push(render_part(part, vars)?);
    }
    Ok(rendered.join("\n"))
}

fn render_part(part: &str, vars: &Vars<'_>) -> EmitResult<String> {
    let substituted = interpolate(part, vars)?;
    Ok(reindent(&substituted))
}

/// Replaces every `${NAME}` / `${NAME|FILTER}` placeholder in `text`.
fn interpolate(text: &str, vars: &Vars<'_>) -> EmitResult<String> {
    let mut out = String::with_capacity(text.len());
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'$' && bytes.get(i + 1) == Some(&b'{') {
            if let Some(end) = text[i + 2..].find('}') {
                let inner = &text[i + 2..i + 2 + end];
                out.push_str(&resolve_placeholder(inner, vars)?);
                i += 2 + end + 1;
                continue;
            }
        }
        // Push one UTF-8 scalar at a time to stay char-boundary safe.
        let ch = text[i..].chars().next().expect("non-empty remainder");
        out.push(ch);
        i += ch.len_utf8();
    }
    Ok(out)
}

fn resolve_placeholder(inner: &str, vars: &Vars<'_>) -> EmitResult<String> {
    let (name, filter) = match inner.split_once('|') {
        Some((name, filter)) => (name, Some(filter)),
        None => (inner, None),
    };

    let value = vars
        .get(name)
        .ok_or_else(|| EmitError::UndefinedVariable(name.to_string()))?;

    match filter {
        None => Ok(value.clone()),
        Some("string") => Ok(quote(value)),
        Some(other) => Err(EmitError::UnrecognizedFilter(other.to_string())),
    }
}

/// If `text` contains a newline, prepends the leading whitespace of its
/// first line to every subsequent line (§4.1 "Multi-line re-indentation").
fn reindent(text: &str) -> String {
    if !text.contains('\n') {
        return text.to_string();
    }
    let mut lines = text.split('\n');
    let first = lines.next().unwrap_or_default();
    let prefix_len = first
        .char_indices()
        .find(|(_, c)| !c.is_whitespace())
        .map_or(first.len(), |(idx, _)| idx);
    let prefix = &first[..prefix_len];

    let mut out = String::with_capacity(text.len() + prefix.len() * 4);
    out.push_str(first);
    for line in lines {
        out.push('\n');
        out.push_str(prefix);
        out.push_str(line);
    }
    out
}

/// Escapes `value` per the string-escape rules (§4.1) without surrounding
/// quotes.
///
/// Escaping walks UTF-16 code units rather than Unicode scalar values, as
/// the emitted program's host language represents strings that way: a
/// character outside the Basic Multilingual Plane becomes a surrogate
/// pair, and each half is escaped independently as `\uHHHH`.
#[must_use]
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for unit in value.encode_utf16() {
        match unit {
            0x5C => out.push_str("\\\\"),
            0x22 => out.push_str("\\\""),
            0x0D => out.push_str("\\r"),
            0x0A => out.push_str("\\n"),
            code if code >= 0x80 => {
                if code <= 0xFF {
                    out.push_str(&format!("\\x{code:02X}"));
                } else {
                    out.push_str(&format!("\\u{code:04X}"));
                }
            }
            code => out.push(char::from_u32(u32::from(code)).unwrap_or('\u{FFFD}')),
        }
    }
    out
}

/// Wraps `value` in double quotes, escaped per [`escape`].
#[must_use]
pub fn quote(value: &str) -> String {
    format!("\"{}\"", escape(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_plain_parts() {
        assert_eq!(format(&["a", "b"], &Vars::new()).unwrap(), "a\nb");
    }

    #[test]
    fn interpolates_plain_variable() {
        let v = vars([("x", "b".to_string())]);
        assert_eq!(format(&["a", "${x}"], &v).unwrap(), "a\nb");
    }

    #[test]
    fn undefined_variable_is_an_error() {
        assert_eq!(
            format(&["a", "${x}"], &Vars::new()),
            Err(EmitError::UndefinedVariable("x".to_string()))
        );
    }

    #[test]
    fn string_filter_quotes_the_value() {
        let v = vars([("x", "b".to_string())]);
        assert_eq!(format(&["a", "${x|string}"], &v).unwrap(), "a\n\"b\"");
    }

    #[test]
    fn unrecognized_filter_is_an_error() {
        let v = vars([("x", "b".to_string())]);
        assert_eq!(
            format(&["a", "${x|nope}"], &v),
            Err(EmitError::UnrecognizedFilter("nope".to_string()))
        );
    }

    #[test]
    fn multiline_substitution_inherits_indentation() {
        let v = vars([("x", "  b\nc".to_string())]);
        assert_eq!(format(&["a", "${x}"], &v).unwrap(), "a\n  b\n  c");
    }

    #[test]
    fn escape_handles_control_and_wide_characters() {
        assert_eq!(escape("a\"b\nc"), "a\\\"b\\nc");
        assert_eq!(escape("\u{e9}"), "\\xE9");
        // Above the BMP: encoded as a UTF-16 surrogate pair, each half escaped.
        assert_eq!(escape("\u{1f600}"), "\\uD83D\\uDE00");
    }
}
