//! Emitter-internal error types.
//!
//! These represent bugs in the emitter or in the AST it was handed: a
//! template referencing an unsatisfied variable, an unrecognized filter, or
//! an AST node kind the dispatcher doesn't know about (§7). They are
//! distinct from the *runtime* failures the emitted parser itself raises
//! (`SyntaxError`, `Invalid rule name: ...`), which are never Rust values,
//! they are textual templates the emitter writes into its output (§6).

/// A fatal error raised while generating parser source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmitError {
    /// A `${name}` placeholder had no corresponding entry in the variable
    /// mapping passed to [`crate::template::format`].
    UndefinedVariable(String),

    /// A `${name|filter}` placeholder used a filter other than `string`.
    UnrecognizedFilter(String),

    /// [`crate::dispatch`] was asked to emit a node kind it has no
    /// emission function for.
    UnknownNodeKind(String),
}

impl std::fmt::Display for EmitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmitError::UndefinedVariable(name) => {
                write!(f, "undefined template variable '{name}'")
            }
            EmitError::UnrecognizedFilter(name) => {
                write!(f, "unrecognized template filter '{name}'")
            }
            EmitError::UnknownNodeKind(kind) => {
                write!(f, "unknown AST node kind '{kind}'")
            }
        }
    }
}

impl std::error::Error for EmitError {}

/// Convenience alias for emitter operations.
pub type EmitResult<T> = Result<T, EmitError>;
