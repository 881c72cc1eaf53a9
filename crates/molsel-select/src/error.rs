//! Error types for selection parsing
//!
//! Parse failures never escape the parser: the facade stores them in the tree
//! as a terminal error state, and every predicate built from that state
//! selects nothing.

use thiserror::Error;

/// Errors that can occur during selection parsing
///
/// The offending text is kept for diagnostics; the display strings are the
/// short messages users see.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Model suffix after `/` is not an integer
    #[error("model must be an integer")]
    InvalidModel(String),

    /// Atom name suffix after `.` is longer than four characters
    #[error("atomname must be one to four characters")]
    InvalidAtomName(String),

    /// Residue number is not an integer
    #[error("resi must be an integer")]
    InvalidResno(String),

    /// Residue range with more than one separator
    #[error("resi range must contain one '-'")]
    InvalidResnoRange(String),

    /// Entry of an `@` index list is not a non-negative integer
    #[error("atomindex must be a comma-separated list of integers")]
    InvalidAtomIndex(String),

    /// Address shorthand without any populated part (e.g. `:` or `/`)
    #[error("empty selection chunk")]
    EmptyChunk(String),

    /// `)` without a matching `(`
    #[error("unmatched ')'")]
    UnmatchedClose,

    /// `(` still open at the end of input
    #[error("unclosed '('")]
    UnclosedGroup,

    /// A parenthesised or negated group without any rule (e.g. `a and not`)
    #[error("empty selection group")]
    EmptyGroup,

    /// Non-empty input made only of operators
    #[error("selection has no rules")]
    NoRules,
}

/// Result type for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;
