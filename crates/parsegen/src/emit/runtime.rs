//! The runtime helpers inlined into every emitted parser (§4.4,
//! "Emitted-parser helpers").
//!
//! Unlike the operator emitters, these bodies carry no grammar-specific
//! data: the same text is inlined by every `grammar` emission, so they
//! are kept as `const` blocks rather than rebuilt through
//! [`crate::template`] on every call. There is nothing here to
//! interpolate.

/// `padLeft(input, padding, length)`: left-pads a string to `length` by
/// prepending `padding` repeatedly. Used by `escape` to zero-pad hex
/// digits.
pub const PAD_LEFT: &str = r#"function padLeft(input, padding, length) {
  var result = input;

  var padLength = length - input.length;
  for (var i = 0; i < padLength; i++) {
    result = padding + result;
  }

  return result;
}"#;

/// `escape(ch)`: renders a single character as `\xHH` or `\uHHHH`,
/// depending on whether its code unit fits in a byte.
pub const ESCAPE: &str = r#"function escape(ch) {
  var charCode = ch.charCodeAt(0);
  var escapeChar, length;

  if (charCode <= 0xFF) {
    escapeChar = "x";
    length = 2;
  } else {
    escapeChar = "u";
    length = 4;
  }

  return "\\" + escapeChar + padLeft(charCode.toString(16).toUpperCase(), "0", length);
}"#;

/// `quote(s)`: wraps `s` in double quotes, applying the string-escape
/// rules (§4.1) to its contents.
pub const QUOTE: &str = r#"function quote(s) {
  return "\""
    + s
        .replace(/\\/g, "\\\\")
        .replace(/"/g, "\\\"")
        .replace(/\r/g, "\\r")
        .replace(/\n/g, "\\n")
        .replace(/[\x80-\uFFFF]/g, escape)
    + "\"";
}"#;

/// `matchFailed(failure)`: records a failure at the rightmost position
/// reached so far, discarding anything strictly to its left (§7).
pub const MATCH_FAILED: &str = r#"function matchFailed(failure) {
  if (pos < rightmostMatchFailuresPos) {
    return;
  }

  if (pos > rightmostMatchFailuresPos) {
    rightmostMatchFailuresPos = pos;
    rightmostMatchFailuresExpected = [];
  }

  rightmostMatchFailuresExpected.push(failure);
}"#;

/// `buildErrorMessage()`: sorts and de-duplicates the rightmost expected
/// set and composes the final `SyntaxError` message text.
pub const BUILD_ERROR_MESSAGE: &str = r#"function buildErrorMessage() {
  function buildExpected(expectedSet) {
    var expected = expectedSet.slice(0);
    var deduped = [];
    var i;

    expected.sort();

    for (i = 0; i < expected.length; i++) {
      if (i === 0 || expected[i] !== expected[i - 1]) {
        deduped.push(expected[i]);
      }
    }

    switch (deduped.length) {
      case 0:
        return "end of input";
      case 1:
        return deduped[0];
      default:
        return deduped.slice(0, -1).join(", ") + " or " + deduped[deduped.length - 1];
    }
  }

  var actualPos = Math.max(pos, rightmostMatchFailuresPos);
  var actual = actualPos < input.length
    ? quote(input.charAt(actualPos))
    : "end of input";

  return "Expected " + buildExpected(rightmostMatchFailuresExpected) + " but " + actual + " found.";
}"#;

/// `computeErrorPosition()`: a linear scan from the start of the input to
/// the rightmost failure position, counting lines and columns. `\r\n` is
/// treated as a single line break.
pub const COMPUTE_ERROR_POSITION: &str = r#"function computeErrorPosition() {
  var line = 1;
  var column = 1;
  var seenCR = false;
  var i, ch;

  for (i = 0; i < rightmostMatchFailuresPos; i++) {
    ch = input.charAt(i);
    if (ch === "\n") {
      if (!seenCR) { line++; }
      column = 1;
      seenCR = false;
    } else if (ch === "\r" || ch === "\u2028" || ch === "\u2029") {
      line++;
      column = 1;
      seenCR = true;
    } else {
      column++;
      seenCR = false;
    }
  }

  return { line: line, column: column };
}"#;

/// All six helpers, in the order §4.4.1 lists them, joined with a blank
/// line between each.
#[must_use]
pub fn helpers_block() -> String {
    [
        PAD_LEFT,
        ESCAPE,
        QUOTE,
        MATCH_FAILED,
        BUILD_ERROR_MESSAGE,
        COMPUTE_ERROR_POSITION,
    ]
    .join("\n\n")
}

/// The `SyntaxError` constructor and its prototype wiring (§4.4.1).
pub const SYNTAX_ERROR: &str = r#"function SyntaxError(message, line, column) {
  this.name = "SyntaxError";
  this.message = message;
  this.line = line;
  this.column = column;
}

SyntaxError.prototype = Error.prototype;"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helpers_block_contains_every_helper() {
        let block = helpers_block();
        for name in [
            "function padLeft",
            "function escape",
            "function quote",
            "function matchFailed",
            "function buildErrorMessage",
            "function computeErrorPosition",
        ] {
            assert!(block.contains(name), "missing {name}");
        }
    }
}
