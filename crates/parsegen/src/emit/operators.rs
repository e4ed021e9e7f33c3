//! Emission functions for the composite PEG operators (§4.4.4-4.4.13):
//! `choice`, `sequence`, `simple_and`, `simple_not`, `semantic_and`,
//! `semantic_not`, `optional`, `zero_or_more`, `one_or_more`, `action`.
//!
//! Every function here returns a fragment obeying the Fragment Contract: on
//! success it leaves `pos` past what it consumed and binds a non-null
//! result to `result_var`; on failure it restores `pos` to where it was
//! called and binds `null`. Composite operators get this for free from
//! their sub-expressions and only need to add their own save/restore where
//! the contract doesn't already cover it (`sequence`, the lookaheads).

use crate::ast::Expression;
use crate::dispatch::emit_expression;
use crate::emit::EmitContext;
use crate::error::EmitResult;
use crate::template::{format, vars};

/// §4.4.4 `choice`: the first alternative whose fragment yields a non-null
/// result wins; each alternative already resets `pos` to the choice's
/// entry position on its own failure, so no extra bookkeeping is needed
/// between attempts.
pub fn emit_choice(
    alternatives: &[Expression],
    result_var: &str,
    ctx: &mut EmitContext,
) -> EmitResult<String> {
    if alternatives.is_empty() {
        return format(&["${result} = null;"], &vars([("result", result_var.to_string())]));
    }

    let alt_vars: Vec<String> = alternatives.iter().map(|_| ctx.next("result")).collect();
    let mut fragments = Vec::with_capacity(alternatives.len());
    for (alt, var) in alternatives.iter().zip(&alt_vars) {
        fragments.push(emit_expression(alt, var, ctx)?);
    }
    build_choice_step(0, &alt_vars, &fragments, result_var)
}

fn build_choice_step(
    idx: usize,
    alt_vars: &[String],
    fragments: &[String],
    result_var: &str,
) -> EmitResult<String> {
    if idx == fragments.len() {
        return format(&["${result} = null;"], &vars([("result", result_var.to_string())]));
    }
    let rest = build_choice_step(idx + 1, alt_vars, fragments, result_var)?;
    format(
        &[
            "${fragment}",
            "if (${var} !== null) {",
            "  ${result} = ${var};",
            "} else {",
            "  ${rest}",
            "}",
        ],
        &vars([
            ("fragment", fragments[idx].clone()),
            ("var", alt_vars[idx].clone()),
            ("result", result_var.to_string()),
            ("rest", rest),
        ]),
    )
}

/// §4.4.5 `sequence`: every element must match in order; failure at any
/// element rewinds `pos` to the sequence's own entry position, not just
/// the failing element's (earlier elements already consumed input).
pub fn emit_sequence(
    elements: &[Expression],
    result_var: &str,
    ctx: &mut EmitContext,
) -> EmitResult<String> {
    if elements.is_empty() {
        return format(&["${result} = [];"], &vars([("result", result_var.to_string())]));
    }

    let saved_pos = ctx.next("savedPos");
    let elt_vars: Vec<String> = elements.iter().map(|_| ctx.next("result")).collect();
    let mut fragments = Vec::with_capacity(elements.len());
    for (elt, var) in elements.iter().zip(&elt_vars) {
        fragments.push(emit_expression(elt, var, ctx)?);
    }
    let body = build_sequence_step(0, &elt_vars, &fragments, &saved_pos, result_var)?;
    format(
        &["var ${savedPos} = pos;", "${body}"],
        &vars([("savedPos", saved_pos.clone()), ("body", body)]),
    )
}

fn build_sequence_step(
    idx: usize,
    elt_vars: &[String],
    fragments: &[String],
    saved_pos: &str,
    result_var: &str,
) -> EmitResult<String> {
    if idx == fragments.len() {
        let elements_list = elt_vars.join(", ");
        return format(
            &["${result} = [${list}];"],
            &vars([("result", result_var.to_string()), ("list", elements_list)]),
        );
    }
    let rest = build_sequence_step(idx + 1, elt_vars, fragments, saved_pos, result_var)?;
    format(
        &[
            "${fragment}",
            "if (${var} !== null) {",
            "  ${rest}",
            "} else {",
            "  ${result} = null;",
            "  pos = ${savedPos};",
            "}",
        ],
        &vars([
            ("fragment", fragments[idx].clone()),
            ("var", elt_vars[idx].clone()),
            ("rest", rest),
            ("result", result_var.to_string()),
            ("savedPos", saved_pos.to_string()),
        ]),
    )
}

/// §4.4.7 `simple_and` (`&e`): tests `expression` without consuming.
/// Match-failure reporting is suppressed while probing, a failed
/// lookahead is not itself something the caller should be told is
/// "expected"; the rule or sequence around the predicate reports its own
/// failure if the overall match still fails.
pub fn emit_simple_and(
    expression: &Expression,
    result_var: &str,
    ctx: &mut EmitContext,
) -> EmitResult<String> {
    emit_predicate(expression, result_var, ctx, false)
}

/// §4.4.8 `simple_not` (`!e`): succeeds iff `expression` fails. Same
/// non-consuming, failure-suppressed probe as `simple_and`, with the
/// success/failure outcome inverted.
pub fn emit_simple_not(
    expression: &Expression,
    result_var: &str,
    ctx: &mut EmitContext,
) -> EmitResult<String> {
    emit_predicate(expression, result_var, ctx, true)
}

fn emit_predicate(
    expression: &Expression,
    result_var: &str,
    ctx: &mut EmitContext,
    invert: bool,
) -> EmitResult<String> {
    let saved_pos = ctx.next("savedPos");
    let saved_reports = ctx.next("savedReportMatchFailures");
    let tmp = ctx.next("result");
    let fragment = emit_expression(expression, &tmp, ctx)?;

    let (success_value, failure_value) = if invert {
        ("null", "\"\"")
    } else {
        ("\"\"", "null")
    };

    format(
        &[
            "var ${savedPos} = pos;",
            "var ${savedReports} = reportMatchFailures;",
            "reportMatchFailures = false;",
            "${fragment}",
            "reportMatchFailures = ${savedReports};",
            "pos = ${savedPos};",
            "if (${tmp} !== null) {",
            "  ${result} = ${successValue};",
            "} else {",
            "  ${result} = ${failureValue};",
            "}",
        ],
        &vars([
            ("savedPos", saved_pos),
            ("savedReports", saved_reports),
            ("fragment", fragment),
            ("tmp", tmp),
            ("result", result_var.to_string()),
            ("successValue", success_value.to_string()),
            ("failureValue", failure_value.to_string()),
        ]),
    )
}

/// §4.4.9 `semantic_and`: user `code` decides success by its truthiness.
pub fn emit_semantic_and(code: &str, result_var: &str) -> EmitResult<String> {
    emit_semantic_predicate(code, result_var, false)
}

/// §4.4.10 `semantic_not`: user `code` decides failure; truthy inverts to
/// a failed match.
pub fn emit_semantic_not(code: &str, result_var: &str) -> EmitResult<String> {
    emit_semantic_predicate(code, result_var, true)
}

fn emit_semantic_predicate(code: &str, result_var: &str, invert: bool) -> EmitResult<String> {
    let (success_value, failure_value) = if invert {
        ("null", "\"\"")
    } else {
        ("\"\"", "null")
    };
    format(
        &[
            "if ((function() {",
            "  ${code}",
            "})()) {",
            "  ${result} = ${successValue};",
            "} else {",
            "  ${result} = ${failureValue};",
            "}",
        ],
        &vars([
            ("code", code.to_string()),
            ("result", result_var.to_string()),
            ("successValue", success_value.to_string()),
            ("failureValue", failure_value.to_string()),
        ]),
    )
}

/// §4.4.11 `optional` (`e?`): always succeeds; yields `expression`'s
/// result when it matches, `""` otherwise. Needs no position bookkeeping
/// of its own since a failing sub-expression already restores `pos`.
pub fn emit_optional(
    expression: &Expression,
    result_var: &str,
    ctx: &mut EmitContext,
) -> EmitResult<String> {
    let tmp = ctx.next("result");
    let fragment = emit_expression(expression, &tmp, ctx)?;
    format(
        &[
            "${fragment}",
            "if (${tmp} !== null) {",
            "  ${result} = ${tmp};",
            "} else {",
            "  ${result} = \"\";",
            "}",
        ],
        &vars([
            ("fragment", fragment),
            ("tmp", tmp),
            ("result", result_var.to_string()),
        ]),
    )
}

/// §4.4.12 `zero_or_more` (`e*`): always succeeds, collecting as many
/// matches as possible.
pub fn emit_zero_or_more(
    expression: &Expression,
    result_var: &str,
    ctx: &mut EmitContext,
) -> EmitResult<String> {
    let tmp = ctx.next("result");
    let fragment = emit_expression(expression, &tmp, ctx)?;
    format(
        &[
            "${result} = [];",
            "${fragment}",
            "while (${tmp} !== null) {",
            "  ${result}.push(${tmp});",
            "  ${fragment}",
            "}",
        ],
        &vars([
            ("result", result_var.to_string()),
            ("fragment", fragment),
            ("tmp", tmp),
        ]),
    )
}

/// §4.4.13 `one_or_more` (`e+`): fails iff the first iteration fails.
pub fn emit_one_or_more(
    expression: &Expression,
    result_var: &str,
    ctx: &mut EmitContext,
) -> EmitResult<String> {
    let tmp = ctx.next("result");
    let fragment = emit_expression(expression, &tmp, ctx)?;
    format(
        &[
            "${fragment}",
            "if (${tmp} !== null) {",
            "  ${result} = [];",
            "  while (${tmp} !== null) {",
            "    ${result}.push(${tmp});",
            "    ${fragment}",
            "  }",
            "} else {",
            "  ${result} = null;",
            "}",
        ],
        &vars([
            ("fragment", fragment),
            ("tmp", tmp),
            ("result", result_var.to_string()),
        ]),
    )
}

/// §4.4.6 `action`: runs `expression`, and on success binds its direct
/// labels (see [`collect_direct_labels`]) as local variables before
/// evaluating `code` in their scope.
pub fn emit_action(
    expression: &Expression,
    code: &str,
    result_var: &str,
    ctx: &mut EmitContext,
) -> EmitResult<String> {
    let sub_var = ctx.next("result");
    let fragment = emit_expression(expression, &sub_var, ctx)?;

    let bindings = collect_direct_labels(expression)
        .into_iter()
        .map(|(name, index)| match index {
            Some(i) => format!("var {name} = {sub_var}[{i}];"),
            None => format!("var {name} = {sub_var};"),
        })
        .collect::<Vec<_>>()
        .join("\n");

    let mut parts = vec!["${fragment}".to_string(), "if (${sub} !== null) {".to_string()];
    if !bindings.is_empty() {
        parts.push("  ${bindings}".to_string());
    }
    parts.push("  ${result} = (function() {".to_string());
    parts.push("    ${code}".to_string());
    parts.push("  })();".to_string());
    parts.push("} else {".to_string());
    parts.push("  ${result} = null;".to_string());
    parts.push("}".to_string());

    let part_refs: Vec<&str> = parts.iter().map(String::as_str).collect();
    format(
        &part_refs,
        &vars([
            ("fragment", fragment),
            ("sub", sub_var),
            ("bindings", bindings),
            ("result", result_var.to_string()),
            ("code", code.to_string()),
        ]),
    )
}

/// Collects the labels an enclosing [`Expression::Action`] can see: the
/// expression itself if it is directly [`Expression::Labeled`], or each
/// labeled element of a direct [`Expression::Sequence`] paired with its
/// position in the resulting array. Labels nested inside a choice, a
/// repetition, or a deeper sequence are not in scope for the action,
/// exactly as the label itself is only ever a formal parameter of its
/// immediately enclosing action.
fn collect_direct_labels(expression: &Expression) -> Vec<(String, Option<usize>)> {
    match expression {
        Expression::Labeled { label, .. } => vec![(label.clone(), None)],
        Expression::Sequence { elements } => elements
            .iter()
            .enumerate()
            .filter_map(|(i, elt)| match elt {
                Expression::Labeled { label, .. } => Some((label.clone(), Some(i))),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Expression;

    fn lit(value: &str) -> Expression {
        Expression::Literal { value: value.to_string() }
    }

    // Every emit_* function is always invoked with a result_var already
    // handed out by ctx.next("result") (by the rule emitter, or by the
    // enclosing sequence/choice for one of its elements) - never a raw
    // literal against a counter that hasn't seen it yet. Tests follow that
    // same convention so allocated temporaries never alias result_var.

    #[test]
    fn choice_tries_alternatives_in_order() {
        let mut ctx = EmitContext::new();
        let result_var = ctx.next("result");
        let alts = vec![lit("a"), lit("b")];
        let code = emit_choice(&alts, &result_var, &mut ctx).unwrap();
        assert!(code.contains(r#"=== "a""#));
        assert!(code.contains(r#"=== "b""#));
        assert!(code.contains("result0 = null;"));
    }

    #[test]
    fn sequence_saves_and_restores_pos_on_failure() {
        let mut ctx = EmitContext::new();
        let result_var = ctx.next("result");
        let elements = vec![lit("a"), lit("b")];
        let code = emit_sequence(&elements, &result_var, &mut ctx).unwrap();
        assert!(code.contains("var savedPos0 = pos;"));
        assert!(code.contains("pos = savedPos0;"));
        assert!(code.contains("result0 = [result1, result2];"));
    }

    #[test]
    fn empty_sequence_matches_trivially() {
        let mut ctx = EmitContext::new();
        let result_var = ctx.next("result");
        let code = emit_sequence(&[], &result_var, &mut ctx).unwrap();
        assert_eq!(code, "result0 = [];");
    }

    #[test]
    fn simple_and_never_consumes() {
        let mut ctx = EmitContext::new();
        let result_var = ctx.next("result");
        let code = emit_simple_and(&lit("a"), &result_var, &mut ctx).unwrap();
        assert!(code.contains("pos = savedPos0;"));
        assert!(code.contains("reportMatchFailures = false;"));
        assert!(code.contains(r#"result0 = "";"#));
    }

    #[test]
    fn simple_not_inverts_outcome() {
        let mut ctx = EmitContext::new();
        let result_var = ctx.next("result");
        let code = emit_simple_not(&lit("a"), &result_var, &mut ctx).unwrap();
        assert!(code.contains("if (result1 !== null) {\n  result0 = null;"));
    }

    #[test]
    fn semantic_and_wraps_code_as_condition() {
        let code = emit_semantic_and("return x > 0;", "result0").unwrap();
        assert!(code.contains("return x > 0;"));
        assert!(code.contains(r#"result0 = "";"#));
    }

    #[test]
    fn optional_always_succeeds() {
        let mut ctx = EmitContext::new();
        let result_var = ctx.next("result");
        let code = emit_optional(&lit("a"), &result_var, &mut ctx).unwrap();
        assert!(code.contains(r#"result0 = "";"#));
        assert!(!code.contains("pos ="));
    }

    #[test]
    fn zero_or_more_collects_into_array() {
        let mut ctx = EmitContext::new();
        let result_var = ctx.next("result");
        let code = emit_zero_or_more(&lit("a"), &result_var, &mut ctx).unwrap();
        assert!(code.contains("result0 = [];"));
        assert!(code.contains("while (result1 !== null) {"));
    }

    #[test]
    fn one_or_more_fails_when_first_iteration_fails() {
        let mut ctx = EmitContext::new();
        let result_var = ctx.next("result");
        let code = emit_one_or_more(&lit("a"), &result_var, &mut ctx).unwrap();
        assert!(code.contains("if (result1 !== null) {"));
        assert!(code.contains("result0 = null;"));
    }

    #[test]
    fn action_binds_sequence_labels_by_position() {
        let mut ctx = EmitContext::new();
        let result_var = ctx.next("result");
        let expr = Expression::Sequence {
            elements: vec![
                Expression::Labeled {
                    label: "a".to_string(),
                    expression: Box::new(lit("x")),
                },
                Expression::Labeled {
                    label: "b".to_string(),
                    expression: Box::new(lit("y")),
                },
            ],
        };
        let code = emit_action(&expr, "return a + b;", &result_var, &mut ctx).unwrap();
        assert!(code.contains("var a = result1[0];"));
        assert!(code.contains("var b = result1[1];"));
        assert!(code.contains("return a + b;"));
    }

    #[test]
    fn action_binds_single_label_directly() {
        let mut ctx = EmitContext::new();
        let result_var = ctx.next("result");
        let expr = Expression::Labeled {
            label: "value".to_string(),
            expression: Box::new(lit("x")),
        };
        let code = emit_action(&expr, "return value;", &result_var, &mut ctx).unwrap();
        assert!(code.contains("var value = result1;"));
    }
}
