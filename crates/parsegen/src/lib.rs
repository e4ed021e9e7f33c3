//! Emits a self-contained recursive-descent packrat parser from a
//! validated PEG grammar AST.
//!
//! `parsegen` does not parse grammar source text itself; it consumes a
//! [`Grammar`] (typically deserialized from JSON via [`facet_json`], see
//! [`ast`]) and produces the full source text of a parser for that
//! grammar, as a target-language program embedding its own packrat cache,
//! rightmost-failure-tracking error reporter, and the handful of runtime
//! helpers ([`emit::runtime`]) every emitted parser needs. Grammar
//! parsing and validation are a separate concern upstream of this crate.
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::multiple_crate_versions)]

/// The grammar AST this crate emits parsers from.
pub mod ast;

/// AST visitor dispatch: the exhaustive match from [`ast::Expression`]
/// kind to emission function.
pub mod dispatch;

/// Per-rule emission functions, the template engine's output composed
/// into the generated parser's rule bodies and top-level structure.
pub mod emit;

/// Fresh local-identifier allocation, reset per rule.
pub mod ident;

/// The textual template engine emission is built on.
pub mod template;

/// Emitter-internal error types.
pub mod error;

pub use ast::{ClassPart, Expression, Grammar, Rule};
pub use emit::EmitOptions;
pub use error::{EmitError, EmitResult};

/// Emits the full source text of a recursive-descent packrat parser for
/// `grammar`.
///
/// This is the crate's single entry point: everything else in [`emit`]
/// and [`dispatch`] exists to support this one call.
///
/// # Errors
///
/// Returns an [`EmitError`] if `grammar` contains an expression the
/// dispatcher has no emission function for, or if a template referenced
/// a variable or filter the emitter itself failed to provide (both
/// indicate a bug in this crate rather than a malformed grammar).
pub fn emit(grammar: &Grammar) -> EmitResult<String> {
    emit::grammar::emit_grammar(grammar)
}

/// Like [`emit`], but with explicit [`EmitOptions`] for the orthogonal
/// output choices it exposes.
///
/// # Errors
///
/// Same failure modes as [`emit`].
pub fn emit_with_options(grammar: &Grammar, options: &EmitOptions) -> EmitResult<String> {
    emit::grammar::emit_grammar_with_options(grammar, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn emits_a_minimal_grammar() {
        let mut rules = HashMap::new();
        rules.insert(
            "start".to_string(),
            Rule {
                name: "start".to_string(),
                display_name: None,
                expression: Expression::Literal { value: "ok".to_string() },
            },
        );
        let grammar = Grammar {
            initializer: None,
            start_rule: "start".to_string(),
            rules,
            source: None,
        };

        let source = emit(&grammar).unwrap();
        assert!(source.contains("function parse_start()"));
        assert!(source.contains("function computeErrorPosition()"));
    }
}
