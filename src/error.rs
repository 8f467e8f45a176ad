//! Compile and configuration errors.
//!
//! Every expression failure is detected while compiling; evaluation has no
//! error path. Each compile error carries the full source expression so a
//! host can report which configured formula was rejected.

use thiserror::Error;

/// Compile result type alias.
pub type Result<T> = std::result::Result<T, CompileError>;

/// Errors raised while turning an expression into a program.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// Token is not an operator, not a known input and not a numeric literal.
    #[error("unknown/misformatted token <{token}> in <{expr}>")]
    UnknownToken { token: String, expr: String },

    /// An operator would consume more values than the stack holds.
    #[error("stack underflow on token <{token}> in <{expr}>")]
    StackUnderflow { token: String, expr: String },

    /// A `)` or `,` was found with an empty operator stack.
    #[error("stack underflow during infix parsing of <{expr}>")]
    InfixUnderflow { expr: String },

    /// The program leaves a number of values other than one on the stack.
    #[error("stack count {depth} different to one on <{expr}>")]
    Imbalanced { expr: String, depth: usize },

    /// The program needs more stack slots than the evaluator provides.
    #[error("expression <{expr}> needs {depth} stack slots, capacity is {capacity}")]
    StackOverflow {
        expr: String,
        depth: usize,
        capacity: usize,
    },
}

/// Errors raised while loading function specs from configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid function spec: {0}")]
    Json(#[from] serde_json::Error),

    /// A named function was requested that the spec set does not define.
    #[error("no function named {0}")]
    UnknownName(String),

    /// The spec set holds several functions and none was selected.
    #[error("spec set defines {0} functions, select one by name")]
    Ambiguous(usize),

    #[error(transparent)]
    Compile(#[from] CompileError),
}

impl CompileError {
    /// The full expression that failed to compile.
    pub fn expression(&self) -> &str {
        match self {
            CompileError::UnknownToken { expr, .. }
            | CompileError::StackUnderflow { expr, .. }
            | CompileError::InfixUnderflow { expr }
            | CompileError::Imbalanced { expr, .. }
            | CompileError::StackOverflow { expr, .. } => expr,
        }
    }

    /// The offending token, for errors tied to a single token.
    pub fn token(&self) -> Option<&str> {
        match self {
            CompileError::UnknownToken { token, .. } | CompileError::StackUnderflow { token, .. } => {
                Some(token)
            }
            _ => None,
        }
    }
}
