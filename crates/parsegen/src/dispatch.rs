//! AST visitor dispatch (§4.3).
//!
//! `emit_expression` is the dispatcher: it reads an [`Expression`]'s kind
//! and forwards to the matching emission function in [`crate::emit`]. Since
//! [`Expression`] is a closed Rust sum type, the dispatch itself is an
//! exhaustive `match` and can never encounter an unrecognized kind: the
//! compiler enforces that every variant added to the AST gets an emitter.
//!
//! [`ensure_known_kind`] exists for the one place an unrecognized kind can
//! still show up at the boundary: a raw `type` tag read from untyped input
//! (e.g. before `facet_json` has decoded it into an [`Expression`]).

use crate::ast::Expression;
use crate::emit::{operators, terminals, EmitContext};
use crate::error::{EmitError, EmitResult};

/// Every node kind name recognized by the emitter, in the order §2 lists
/// the emission functions.
pub const KNOWN_KINDS: &[&str] = &[
    "choice",
    "sequence",
    "labeled",
    "simple_and",
    "simple_not",
    "semantic_and",
    "semantic_not",
    "optional",
    "zero_or_more",
    "one_or_more",
    "action",
    "rule_ref",
    "literal",
    "any",
    "class",
];

/// Fails with [`EmitError::UnknownNodeKind`] unless `kind` is one of
/// [`KNOWN_KINDS`].
pub fn ensure_known_kind(kind: &str) -> EmitResult<()> {
    if KNOWN_KINDS.contains(&kind) {
        Ok(())
    } else {
        Err(EmitError::UnknownNodeKind(kind.to_string()))
    }
}

/// Emits the fragment for `expr`, binding its result to `result_var`, per
/// the Fragment Contract (§4.4).
pub fn emit_expression(
    expr: &Expression,
    result_var: &str,
    ctx: &mut EmitContext,
) -> EmitResult<String> {
    match expr {
        Expression::Choice { alternatives } => {
            operators::emit_choice(alternatives, result_var, ctx)
        }
        Expression::Sequence { elements } => operators::emit_sequence(elements, result_var, ctx),
        // A label is consumed by the enclosing `action` emitter (§4.4.6); on
        // its own it is a transparent pass-through to its sub-expression.
        Expression::Labeled { expression, .. } => emit_expression(expression, result_var, ctx),
        Expression::SimpleAnd { expression } => {
            operators::emit_simple_and(expression, result_var, ctx)
        }
        Expression::SimpleNot { expression } => {
            operators::emit_simple_not(expression, result_var, ctx)
        }
        Expression::SemanticAnd { code } => operators::emit_semantic_and(code, result_var),
        Expression::SemanticNot { code } => operators::emit_semantic_not(code, result_var),
        Expression::Optional { expression } => operators::emit_optional(expression, result_var, ctx),
        Expression::ZeroOrMore { expression } => {
            operators::emit_zero_or_more(expression, result_var, ctx)
        }
        Expression::OneOrMore { expression } => {
            operators::emit_one_or_more(expression, result_var, ctx)
        }
        Expression::Action { expression, code } => {
            operators::emit_action(expression, code, result_var, ctx)
        }
        Expression::RuleRef { name } => terminals::emit_rule_ref(name, result_var),
        Expression::Literal { value } => terminals::emit_literal(value, result_var),
        Expression::Any => terminals::emit_any(result_var),
        Expression::Class {
            parts,
            inverted,
            raw_text,
        } => terminals::emit_class(parts, *inverted, raw_text, result_var),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_every_documented_kind() {
        for kind in KNOWN_KINDS {
            assert!(ensure_known_kind(kind).is_ok());
        }
    }

    #[test]
    fn rejects_unknown_kind() {
        assert_eq!(
            ensure_known_kind("frobnicate"),
            Err(EmitError::UnknownNodeKind("frobnicate".to_string()))
        );
    }
}
