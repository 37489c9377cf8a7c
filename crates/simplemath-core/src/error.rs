//! Error taxonomy for parsing and evaluating equations.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MathError {
    #[error("no equation")]
    EmptyEquation,
    #[error("cannot parse token '{token}'")]
    UnknownToken { token: String },
    #[error("invalid number literal '{literal}'")]
    InvalidNumber { literal: String },
    #[error("unexpected token '{token}'")]
    UnexpectedToken { token: String },
    #[error("parenthesis mismatch")]
    MismatchedParentheses,
    #[error("function {function}() must be followed by '('")]
    MissingArguments { function: &'static str },
    #[error("function {function}() takes {expected} argument(s), found {found}")]
    ArityMismatch {
        function: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("',' outside of a function call")]
    MisplacedComma,
    #[error("malformed expression")]
    MalformedExpression,
    #[error("variable name '{name}' is reserved")]
    ReservedVariable { name: String },
    #[error("variable name '{name}' is not an identifier")]
    InvalidVariable { name: String },
    #[error("variable '{name}' declared more than once")]
    DuplicateVariable { name: String },
    #[error("values vector must be the same length as variables vector (expected {expected}, found {found})")]
    ValueCountMismatch { expected: usize, found: usize },
    #[error("function mod() requires integer values")]
    ModRequiresIntegers,
    #[error("function mod() divisor is zero")]
    ModByZero,
    #[error("no equation with id {id}")]
    UnknownEquation { id: usize },
}
