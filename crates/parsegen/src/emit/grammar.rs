//! Top-level assembly (§4.4.1-4.4.3): `grammar`, `initializer`, `rule`.
//!
//! These three functions compose everything else in [`crate::emit`] and
//! [`crate::dispatch`] into the single self-contained module the emitted
//! parser text reads as.

use crate::ast::{Grammar, Rule};
use crate::dispatch::emit_expression;
use crate::emit::runtime;
use crate::emit::{EmitContext, EmitOptions};
use crate::error::EmitResult;
use crate::template::{format, quote, vars};

/// §4.4.1 `grammar`, with the default [`EmitOptions`]. See
/// [`emit_grammar_with_options`] for the full entry point.
pub fn emit_grammar(grammar: &Grammar) -> EmitResult<String> {
    emit_grammar_with_options(grammar, &EmitOptions::default())
}

/// §4.4.1 `grammar`: the full generated parser source. An IIFE returning an
/// object with `parse(input, startRule)` and `toSource()`.
///
/// Only the `SyntaxError` constructor lives outside `parse()`; it carries
/// no per-invocation state. Everything else (`pos`, the match-failure
/// cache, the runtime helpers, the rule functions, the initializer) is
/// declared inside `parse()` so repeated calls never share mutable state.
pub fn emit_grammar_with_options(grammar: &Grammar, options: &EmitOptions) -> EmitResult<String> {
    let mut names: Vec<&String> = grammar.rules.keys().collect();
    names.sort();

    let table = names
        .iter()
        .map(|name| format!("{}: parse_{name}", quote(name)))
        .collect::<Vec<_>>()
        .join(",\n");

    let mut ctx = EmitContext::new();
    let mut rule_functions = Vec::with_capacity(names.len());
    for name in &names {
        let rule = &grammar.rules[*name];
        ctx.reset_idents();
        rule_functions.push(emit_rule_with_options(rule, &mut ctx, options)?);
    }
    let rule_functions = rule_functions.join("\n\n");

    let initializer = emit_initializer(&grammar.initializer)?;
    let helpers = runtime::helpers_block();
    let source_expr = grammar
        .source
        .as_ref()
        .map_or_else(|| "undefined".to_string(), |src| quote(src));

    format(
        &[
            "(function() {",
            "  ${syntaxError}",
            "",
            "  function parse(input, startRule) {",
            "    var parseFunctions = {",
            "      ${table}",
            "    };",
            "",
            "    if (startRule !== undefined) {",
            "      if (!(startRule in parseFunctions)) {",
            r#"        throw new Error("Invalid rule name: " + quote(startRule) + ".");"#,
            "      }",
            "    } else {",
            "      startRule = ${defaultStartRule};",
            "    }",
            "",
            "    var pos = 0;",
            "    var reportMatchFailures = true;",
            "    var rightmostMatchFailuresPos = 0;",
            "    var rightmostMatchFailuresExpected = [];",
            "    var cache = {};",
            "",
            "    ${helpers}",
            "",
            "    ${ruleFunctions}",
            "",
            "    ${initializer}",
            "",
            "    var result = parseFunctions[startRule]();",
            "",
            "    if (result === null || pos !== input.length) {",
            "      var errorPosition = computeErrorPosition();",
            "      throw new SyntaxError(",
            "        buildErrorMessage(),",
            "        errorPosition.line,",
            "        errorPosition.column",
            "      );",
            "    }",
            "",
            "    return result;",
            "  }",
            "",
            "  return {",
            "    parse: parse,",
            "    toSource: function() { return ${sourceExpr}; }",
            "  };",
            "})()",
        ],
        &vars([
            ("syntaxError", runtime::SYNTAX_ERROR.to_string()),
            ("table", table),
            ("defaultStartRule", quote(&grammar.start_rule)),
            ("helpers", helpers),
            ("ruleFunctions", rule_functions),
            ("initializer", initializer),
            ("sourceExpr", source_expr),
        ]),
    )
}

/// §4.4.2 `initializer`: user code run once per `parse()` invocation,
/// before the start rule. Emitted verbatim; an absent initializer
/// contributes nothing.
pub fn emit_initializer(initializer: &Option<String>) -> EmitResult<String> {
    Ok(initializer.clone().unwrap_or_default())
}

/// §4.4.3 `rule`, with the default [`EmitOptions`]. See
/// [`emit_rule_with_options`] for the full entry point.
pub fn emit_rule(rule: &Rule, ctx: &mut EmitContext) -> EmitResult<String> {
    emit_rule_with_options(rule, ctx, &EmitOptions::default())
}

/// §4.4.3 `rule`: wraps a rule's body in the packrat cache protocol and,
/// for rules with a `display_name`, replaces its internal failure
/// expectations with a single synthesized one.
pub fn emit_rule_with_options(
    rule: &Rule,
    ctx: &mut EmitContext,
    options: &EmitOptions,
) -> EmitResult<String> {
    let result_var = ctx.next("result");
    let body = emit_expression(&rule.expression, &result_var, ctx)?;

    let named = rule.display_name.is_some();
    let saved_reports_var = if named {
        Some(ctx.next("savedReportMatchFailures"))
    } else {
        None
    };

    let mut parts = vec![
        "function parse_${name}() {".to_string(),
        r#"  var cacheKey = "${name}@" + pos;"#.to_string(),
        "  var cachedResult = cache[cacheKey];".to_string(),
        "  if (cachedResult) {".to_string(),
        "    pos = cachedResult.nextPos;".to_string(),
        "    return cachedResult.result;".to_string(),
        "  }".to_string(),
        String::new(),
    ];
    if !options.trust_mode {
        parts.push("  // cache miss, fall through and match".to_string());
    }
    if let Some(saved) = &saved_reports_var {
        parts.push(format!("  var {saved} = reportMatchFailures;"));
        parts.push("  reportMatchFailures = false;".to_string());
        parts.push(String::new());
    }
    parts.push("  ${body}".to_string());
    parts.push(String::new());
    if let Some(saved) = &saved_reports_var {
        parts.push(format!("  reportMatchFailures = {saved};"));
        parts.push(format!(
            "  if (reportMatchFailures && {result_var} === null) {{"
        ));
        parts.push("    matchFailed(${displayName});".to_string());
        parts.push("  }".to_string());
        parts.push(String::new());
    }
    parts.push(format!(
        "  cache[cacheKey] = {{ nextPos: pos, result: {result_var} }};"
    ));
    parts.push(format!("  return {result_var};"));
    parts.push("}".to_string());

    let part_refs: Vec<&str> = parts.iter().map(String::as_str).collect();
    let mut rule_vars = vars([
        ("name", rule.name.clone()),
        ("body", body),
    ]);
    if let Some(display_name) = &rule.display_name {
        rule_vars.insert("displayName", quote(display_name));
    }

    format(&part_refs, &rule_vars)
}
