//! Emission functions (§4.4): one per AST node kind, composed via the
//! template engine and threaded through a per-rule [`EmitContext`].

pub mod grammar;
pub mod operators;
pub mod runtime;
pub mod terminals;

use crate::ident::Allocator;

/// Per-rule emission state.
///
/// Wraps the [`Allocator`] used to hand out fresh local identifiers. Reset
/// at the start of every `rule` emission (§4.2) so editing one rule never
/// perturbs the identifiers of an unrelated one.
#[derive(Debug, Default)]
pub struct EmitContext {
    ids: Allocator,
}

impl EmitContext {
    /// Creates a fresh context with all identifier counters at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates the next fresh identifier with the given prefix.
    pub fn next(&mut self, prefix: &str) -> String {
        self.ids.next(prefix)
    }

    /// Clears all identifier counters. Called at the start of each rule.
    pub fn reset_idents(&mut self) {
        self.ids.reset();
    }
}

/// Options threaded through [`grammar::emit_grammar`] that are orthogonal
/// to grammar semantics: nothing here changes what the emitted parser
/// matches or how it matches it.
#[derive(Debug, Clone, Default)]
pub struct EmitOptions {
    /// Overrides the start rule name used only in the debug-facing
    /// `note:` line a caller may print alongside the emitted source; the
    /// grammar's own `start_rule` still governs what `parse()` invokes by
    /// default.
    pub debug_start_rule: Option<String>,

    /// Skips the `// cache miss` comment each rule emits above its body.
    /// Sets nothing about matching semantics, only output verbosity.
    pub trust_mode: bool,
}
