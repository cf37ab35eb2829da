use crate::{comparison::ComparisonOperator, lexer::LexicalError, record::ValueKind};
use thiserror::Error;

/// The errors the rule engine can surface to its caller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuleError {
    #[error("malformed input: {0}")]
    MalformedInput(String),
    #[error("rule refers to attribute '{0}' which is missing from the record")]
    UnresolvedAttribute(String),
    #[error("cannot compare {left} {operator} {right}")]
    TypeMismatch {
        operator: ComparisonOperator,
        left: ValueKind,
        right: ValueKind,
    },
    #[error("invalid connective '{0}', expected AND or OR")]
    InvalidConnective(String),
}

impl From<LexicalError> for RuleError {
    fn from(error: LexicalError) -> Self {
        Self::MalformedInput(format!("failed to lex the expression with {error}"))
    }
}
