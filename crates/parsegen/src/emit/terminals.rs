//! Leaf emission functions: `rule_ref`, `literal`, `any`, `class`
//! (§4.4.15-4.4.18). None of these recurse, so none of them need an
//! [`crate::emit::EmitContext`].

use crate::ast::ClassPart;
use crate::error::EmitResult;
use crate::template::{escape, format, quote, vars};

/// §4.4.15 `rule_ref`: invokes another rule's parse function. Failure
/// reporting is the referenced rule's own responsibility.
pub fn emit_rule_ref(name: &str, result_var: &str) -> EmitResult<String> {
    format(
        &["${result} = parse_${name}();"],
        &vars([("result", result_var.to_string()), ("name", name.to_string())]),
    )
}

/// §4.4.16 `literal`: matches an exact string. The reported expectation is
/// the *quoted* literal text (`"abc"`, including the quote marks), distinct
/// from the bare matched value assigned to `result_var` on success, so the
/// aggregated "expected" set can tell a literal's expectation apart from an
/// unquoted `displayName`/`"any character"`/class `rawText` entry.
pub fn emit_literal(value: &str, result_var: &str) -> EmitResult<String> {
    let quoted = quote(value);
    let expected = quote(&format!("\"{}\"", escape(value)));
    format(
        &[
            "if (input.substr(pos, ${len}) === ${quoted}) {",
            "  ${result} = ${quoted};",
            "  pos += ${len};",
            "} else {",
            "  ${result} = null;",
            "  if (reportMatchFailures) {",
            "    matchFailed(${expected});",
            "  }",
            "}",
        ],
        &vars([
            ("result", result_var.to_string()),
            ("quoted", quoted.clone()),
            ("expected", expected),
            ("len", utf16_len(value).to_string()),
        ]),
    )
}

/// §4.4.17 `any`: matches any single character.
pub fn emit_any(result_var: &str) -> EmitResult<String> {
    format(
        &[
            "if (pos < input.length) {",
            "  ${result} = input.charAt(pos);",
            "  pos++;",
            "} else {",
            "  ${result} = null;",
            "  if (reportMatchFailures) {",
            r#"    matchFailed("any character");"#,
            "  }",
            "}",
        ],
        &vars([("result", result_var.to_string())]),
    )
}

/// §4.4.18 `class`: matches a character class via an anchored regular
/// expression built from `parts`.
pub fn emit_class(
    parts: &[ClassPart],
    inverted: bool,
    raw_text: &str,
    result_var: &str,
) -> EmitResult<String> {
    let regex = class_regex_source(parts, inverted);
    format(
        &[
            "if (${regex}.test(input.charAt(pos))) {",
            "  ${result} = input.charAt(pos);",
            "  pos++;",
            "} else {",
            "  ${result} = null;",
            "  if (reportMatchFailures) {",
            "    matchFailed(${rawText});",
            "  }",
            "}",
        ],
        &vars([
            ("result", result_var.to_string()),
            ("regex", regex),
            ("rawText", quote(raw_text)),
        ]),
    )
}

/// Builds the anchored `/^[...]/` regex literal source for a character
/// class. The two empty-class workarounds (§4.4.18) exist because some
/// target-language regex dialects reject bare `[]` / `[^]`.
fn class_regex_source(parts: &[ClassPart], inverted: bool) -> String {
    if parts.is_empty() {
        return if inverted {
            "/^[\\s\\S]/".to_string()
        } else {
            "/^[^\\s\\S]/".to_string()
        };
    }

    let mut body = String::new();
    if inverted {
        body.push('^');
    }
    for part in parts {
        match part {
            ClassPart::Char(c) => body.push_str(&escape_class_char(*c)),
            ClassPart::Range(lo, hi) => {
                body.push_str(&escape_class_char(*lo));
                body.push('-');
                body.push_str(&escape_class_char(*hi));
            }
        }
    }
    format!("/^[{body}]/")
}

/// Escapes a character for use inside a `[...]` regex character class:
/// backslash, `]`, `^`, `-`, `/`, and the same control/wide-character rules
/// as [`crate::template::escape`], so the class body stays a valid regex
/// literal regardless of what the grammar author wrote. `/` needs escaping
/// here (unlike in a plain string) because [`class_regex_source`] embeds
/// the class body directly inside a `/^[...]/ ` regex *literal*, where an
/// unescaped `/` would terminate the literal early.
fn escape_class_char(c: char) -> String {
    match c {
        '\\' => "\\\\".to_string(),
        ']' => "\\]".to_string(),
        '^' => "\\^".to_string(),
        '-' => "\\-".to_string(),
        '/' => "\\/".to_string(),
        '\r' => "\\r".to_string(),
        '\n' => "\\n".to_string(),
        c if (c as u32) >= 0x80 => crate::template::escape(&c.to_string()),
        c => c.to_string(),
    }
}

/// Length of `value` in UTF-16 code units, matching the host language's
/// `string.length` used by the emitted `input.substr(pos, len)` check.
fn utf16_len(value: &str) -> usize {
    value.encode_utf16().count()
}
