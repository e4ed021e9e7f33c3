//! The grammar AST consumed by the emitter.
//!
//! This module defines the internal representation of a validated PEG
//! grammar, as produced by an external grammar parser/validator (out of
//! scope for this crate, see [`crate`]). It uses [`facet_json`] for
//! deserialization so a grammar AST can be handed to `parsegen` as JSON,
//! and provides the small set of accessors the emitter needs to walk it.
//!
//! `Grammar` is the root artifact the emitter consumes. Unlike a
//! Tree-sitter-style grammar, a PEG grammar's rule bodies are modeled as a
//! proper sum type ([`Expression`]) rather than a single flat struct with
//! optional fields for every shape: each operator carries exactly the
//! payload it needs, and the emitter dispatches on it with an exhaustive
//! `match` (see [`crate::dispatch`]).

use facet::Facet;
use std::collections::HashMap;

/// A full PEG grammar: an optional one-time initializer, a default entry
/// rule, and the mapping from rule name to rule body.
///
/// Iteration order of `rules` is not meaningful, the emitter sorts rule
/// names lexicographically wherever output order matters (§4.4.1).
#[derive(Debug, Clone, Facet)]
pub struct Grammar {
    /// User code executed once, before any rule is invoked. Emitted
    /// verbatim by [`crate::emit::grammar::emit_initializer`].
    #[facet(default)]
    pub initializer: Option<String>,

    /// Name of the rule `parse()` invokes when no `startRule` override is
    /// passed at runtime.
    pub start_rule: String,

    /// All rules in the grammar, keyed by name.
    pub rules: HashMap<String, Rule>,

    /// The grammar's own source text, if the caller has it available.
    /// Returned verbatim by the emitted parser's `toSource()` method; when
    /// absent, `toSource()` returns `undefined` (this crate does not
    /// re-serialize the AST back into grammar source).
    #[facet(default)]
    pub source: Option<String>,
}

/// A single named rule.
///
/// `display_name`, when present, makes the rule "opaque" to failure
/// reporting: a failed match inside the rule is reported as "expected
/// `display_name`" rather than as the union of its internal expectations
/// (§4.4.3, §9 open question on the `reportMatchFailures` asymmetry, see
/// `DESIGN.md`).
#[derive(Debug, Clone, Facet)]
pub struct Rule {
    /// The rule's identifier; becomes `parse_<name>` in the emitted source.
    pub name: String,

    /// Optional human-readable label used for "expected X" reporting.
    #[facet(default)]
    pub display_name: Option<String>,

    /// The rule body.
    pub expression: Expression,
}

/// One element of a character class: a single character or an inclusive
/// range. Mirrors the ordered `parts` list in §3.
#[derive(Debug, Clone, Facet)]
#[repr(u8)]
pub enum ClassPart {
    /// A single literal character.
    Char(char),
    /// An inclusive `[lo, hi]` range.
    Range(char, char),
}

/// A PEG operator node.
///
/// Each variant is one of the kinds enumerated in §3: `choice`,
/// `sequence`, `labeled`, `simple_and`, `simple_not`, `semantic_and`,
/// `semantic_not`, `optional`, `zero_or_more`, `one_or_more`, `action`,
/// `rule_ref`, `literal`, `any`, `class`. The `type` tag used by the JSON
/// encoding matches the lowercase kind name used throughout the spec.
#[derive(Debug, Clone, Facet)]
#[facet(tag = "type")]
#[repr(u8)]
pub enum Expression {
    /// Ordered choice: the first alternative that matches wins.
    #[facet(rename = "choice")]
    Choice {
        /// Alternatives, tried left to right.
        alternatives: Vec<Expression>,
    },

    /// All elements must match in order.
    #[facet(rename = "sequence")]
    Sequence {
        /// Sequence elements, in order.
        elements: Vec<Expression>,
    },

    /// Binds the sub-result to a name for use by an enclosing [`Expression::Action`].
    #[facet(rename = "labeled")]
    Labeled {
        /// The label the enclosing action sees as a formal parameter.
        label: String,
        /// The labeled sub-expression.
        expression: Box<Expression>,
    },

    /// Positive syntactic lookahead (`&e`): succeeds without consuming.
    #[facet(rename = "simple_and")]
    SimpleAnd {
        /// The sub-expression being tested.
        expression: Box<Expression>,
    },

    /// Negative syntactic lookahead (`!e`): succeeds iff `expression` fails.
    #[facet(rename = "simple_not")]
    SimpleNot {
        /// The sub-expression being tested.
        expression: Box<Expression>,
    },

    /// Positive semantic predicate: user code decides success.
    #[facet(rename = "semantic_and")]
    SemanticAnd {
        /// User code, evaluated for truthiness.
        code: String,
    },

    /// Negative semantic predicate: user code decides failure.
    #[facet(rename = "semantic_not")]
    SemanticNot {
        /// User code, evaluated for truthiness and inverted.
        code: String,
    },

    /// `e?`, always succeeds.
    #[facet(rename = "optional")]
    Optional {
        /// The optional sub-expression.
        expression: Box<Expression>,
    },

    /// `e*`, always succeeds, greedy.
    #[facet(rename = "zero_or_more")]
    ZeroOrMore {
        /// The repeated sub-expression.
        expression: Box<Expression>,
    },

    /// `e+`, fails iff the first iteration fails.
    #[facet(rename = "one_or_more")]
    OneOrMore {
        /// The repeated sub-expression.
        expression: Box<Expression>,
    },

    /// Succeeds iff `expression` does; transforms the result with user code.
    #[facet(rename = "action")]
    Action {
        /// The sub-expression that must succeed first.
        expression: Box<Expression>,
        /// User code, run with the sub-expression's labeled bindings in scope.
        code: String,
    },

    /// Invokes another rule's parse function.
    #[facet(rename = "rule_ref")]
    RuleRef {
        /// The referenced rule's name.
        name: String,
    },

    /// Matches an exact string.
    #[facet(rename = "literal")]
    Literal {
        /// The literal text to match.
        value: String,
    },

    /// Matches any single character.
    #[facet(rename = "any")]
    Any,

    /// A character class.
    #[facet(rename = "class")]
    Class {
        /// Ordered class members (characters or ranges).
        parts: Vec<ClassPart>,
        /// Whether the class is negated (`[^...]`).
        inverted: bool,
        /// The original source text, used verbatim in "expected" messages.
        raw_text: String,
    },
}

impl Expression {
    /// Canonical kind tag, as used by [`crate::dispatch`] and in error
    /// messages naming an unrecognized node.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Expression::Choice { .. } => "choice",
            Expression::Sequence { .. } => "sequence",
            Expression::Labeled { .. } => "labeled",
            Expression::SimpleAnd { .. } => "simple_and",
            Expression::SimpleNot { .. } => "simple_not",
            Expression::SemanticAnd { .. } => "semantic_and",
            Expression::SemanticNot { .. } => "semantic_not",
            Expression::Optional { .. } => "optional",
            Expression::ZeroOrMore { .. } => "zero_or_more",
            Expression::OneOrMore { .. } => "one_or_more",
            Expression::Action { .. } => "action",
            Expression::RuleRef { .. } => "rule_ref",
            Expression::Literal { .. } => "literal",
            Expression::Any => "any",
            Expression::Class { .. } => "class",
        }
    }

    /// Walks the subtree collecting the names referenced by [`Expression::RuleRef`]
    /// nodes, in first-encountered order with duplicates removed.
    ///
    /// Used only by the CLI to report rules referenced but not defined; it
    /// is a diagnostic aid, not a validation gate (the emitter still emits
    /// regardless, see `SPEC_FULL.md`, "why no `validate` module survives").
    #[must_use]
    pub fn references(&self) -> Vec<String> {
        let mut seen = Vec::new();
        self.collect_references(&mut seen);
        seen
    }

    fn collect_references(&self, seen: &mut Vec<String>) {
        match self {
            Expression::RuleRef { name } => {
                if !seen.contains(name) {
                    seen.push(name.clone());
                }
            }
            Expression::Choice { alternatives } => {
                for alt in alternatives {
                    alt.collect_references(seen);
                }
            }
            Expression::Sequence { elements } => {
                for elem in elements {
                    elem.collect_references(seen);
                }
            }
            Expression::Labeled { expression, .. }
            | Expression::SimpleAnd { expression }
            | Expression::SimpleNot { expression }
            | Expression::Optional { expression }
            | Expression::ZeroOrMore { expression }
            | Expression::OneOrMore { expression }
            | Expression::Action { expression, .. } => expression.collect_references(seen),
            Expression::SemanticAnd { .. }
            | Expression::SemanticNot { .. }
            | Expression::Literal { .. }
            | Expression::Any
            | Expression::Class { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_grammar() {
        let json = r#"{
            "start_rule": "start",
            "rules": {
                "start": {
                    "name": "start",
                    "expression": {
                        "type": "literal",
                        "value": "abc"
                    }
                }
            }
        }"#;

        let grammar: Grammar = facet_json::from_str(json).unwrap();
        assert_eq!(grammar.start_rule, "start");
        assert_eq!(grammar.rules.len(), 1);
    }

    #[test]
    fn references_deduplicates_and_preserves_order() {
        let expr = Expression::Sequence {
            elements: vec![
                Expression::RuleRef { name: "b".into() },
                Expression::RuleRef { name: "a".into() },
                Expression::RuleRef { name: "b".into() },
            ],
        };
        assert_eq!(expr.references(), vec!["b".to_string(), "a".to_string()]);
    }

    #[test]
    fn kind_matches_json_tag() {
        assert_eq!(Expression::Any.kind(), "any");
        assert_eq!(
            Expression::Literal { value: "x".into() }.kind(),
            "literal"
        );
    }
}
