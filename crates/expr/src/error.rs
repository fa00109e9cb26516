//! Errors for the GASM expression compiler.

use thiserror::Error;

/// Errors produced while compiling an infix expression.
///
/// Positions are zero-based byte columns into the source expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExprError {
    /// A character with no role in the expression grammar.
    #[error("column {pos}: unexpected character '{ch}'")]
    UnexpectedCharacter { pos: usize, ch: char },

    /// A numeric literal that does not fit in 64 bits.
    #[error("column {pos}: invalid number '{text}'")]
    InvalidNumber { pos: usize, text: String },

    /// `@` not followed by a cell index.
    #[error("column {pos}: '@' must be followed by a cell index")]
    MissingCellIndex { pos: usize },

    /// `-` in unary position. Values are unsigned; there is no negate-and-
    /// push instruction.
    #[error("column {pos}: '-' cannot be used as a unary operator")]
    UnaryMinus { pos: usize },

    /// `~` or `!` in binary position.
    #[error("column {pos}: '{op}' cannot be used as a binary operator")]
    UnaryInBinaryPosition { pos: usize, op: char },

    /// Unbalanced parentheses, in either direction.
    #[error("mismatched parentheses")]
    MismatchedParens,

    /// An operator was left without enough operands.
    #[error("malformed expression")]
    MalformedExpression,
}
