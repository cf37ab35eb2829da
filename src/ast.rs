use crate::{comparison::Comparison, error::RuleError, evaluation, record::Record};
use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

pub type TreeNode = Box<Node>;

/// A rule, as a binary tree of boolean connectives over comparison clauses.
///
/// Both children of an operator are owned by it, so a tree never shares a subtree.
/// Trees are never mutated once built.
#[derive(PartialEq, Eq, Clone, Debug)]
pub enum Node {
    Operator(Connective, TreeNode, TreeNode),
    Operand(String),
}

#[derive(Debug, Default, Hash, Clone, Copy, Eq, PartialEq)]
pub enum Connective {
    #[default]
    And,
    Or,
}

impl Connective {
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

impl FromStr for Connective {
    type Err = RuleError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "AND" => Ok(Self::And),
            "OR" => Ok(Self::Or),
            other => Err(RuleError::InvalidConnective(other.to_string())),
        }
    }
}

impl Display for Connective {
    fn fmt(&self, formatter: &mut Formatter) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl Node {
    #[inline]
    pub fn operator(connective: Connective, left: Node, right: Node) -> Self {
        Self::Operator(connective, Box::new(left), Box::new(right))
    }

    /// Create a leaf out of a single comparison clause.
    ///
    /// The clause is trimmed and must be a valid comparison, otherwise
    /// [`RuleError::MalformedInput`] is returned.
    pub fn operand(expression: &str) -> Result<Self, RuleError> {
        let expression = expression.trim();
        Comparison::parse(expression)?;
        Ok(Self::Operand(expression.to_owned()))
    }

    /// The number of operator levels above the deepest leaf; a single leaf has a height of 0.
    pub fn height(&self) -> usize {
        match self {
            Self::Operator(_, left, right) => 1 + std::cmp::max(left.height(), right.height()),
            Self::Operand(_) => 0,
        }
    }

    /// Evaluate the rule against the record.
    ///
    /// See [`crate::evaluate`].
    #[inline]
    pub fn evaluate(&self, record: &Record) -> Result<bool, RuleError> {
        evaluation::evaluate(self, record)
    }
}

/// Renders the tree back into a rule string by joining the clauses with their connectives.
///
/// Since rule strings have no parentheses, parsing the rendered string only gives back the
/// same tree when the tree has the shape the parser produces.
impl Display for Node {
    fn fmt(&self, formatter: &mut Formatter) -> std::fmt::Result {
        match self {
            Self::Operator(connective, left, right) => {
                write!(formatter, "{left} {connective} {right}")
            }
            Self::Operand(expression) => formatter.write_str(expression),
        }
    }
}
