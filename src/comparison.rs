use crate::{
    error::RuleError,
    lexer::{Lexer, Token},
    record::{Record, Value, ValueKind},
};
use itertools::Itertools;
use rust_decimal::Decimal;
use std::{
    cmp::Ordering,
    fmt::{Display, Formatter},
};

/// A single comparison clause of a rule such as `age > 30` or `18 <= age < 65`.
///
/// The grammar only knows about attribute names, literals and the six relational
/// operators:
///
/// ```text
/// comparison := term (operator term)*
/// term       := identifier | integer | float | string | boolean
/// operator   := '<' | '<=' | '>' | '>=' | '==' | '!='
/// ```
///
/// A chain `a < b <= c` holds when every adjacent pair holds. A lone term is only accepted
/// when it evaluates to a boolean.
#[derive(Clone, Debug, PartialEq)]
pub struct Comparison {
    terms: Vec<Term>,
    operators: Vec<ComparisonOperator>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Term {
    Attribute(String),
    Literal(Value),
}

impl Display for Term {
    fn fmt(&self, formatter: &mut Formatter) -> std::fmt::Result {
        match self {
            Self::Attribute(name) => write!(formatter, "{name}"),
            Self::Literal(value) => write!(formatter, "{value}"),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ComparisonOperator {
    LessThan,
    LessThanEqual,
    GreaterThan,
    GreaterThanEqual,
    Equal,
    NotEqual,
}

impl ComparisonOperator {
    fn from_token(token: &Token) -> Option<Self> {
        match token {
            Token::LessThan => Some(Self::LessThan),
            Token::LessThanEqual => Some(Self::LessThanEqual),
            Token::GreaterThan => Some(Self::GreaterThan),
            Token::GreaterThanEqual => Some(Self::GreaterThanEqual),
            Token::Equal => Some(Self::Equal),
            Token::NotEqual => Some(Self::NotEqual),
            _ => None,
        }
    }

    #[inline]
    fn is_equality(&self) -> bool {
        matches!(self, Self::Equal | Self::NotEqual)
    }

    pub fn evaluate(&self, left: &Value, right: &Value) -> Result<bool, RuleError> {
        match (left, right) {
            (Value::Integer(a), Value::Integer(b)) => Ok(self.apply(a.cmp(b))),
            (Value::Float(a), Value::Float(b)) => Ok(self.apply(a.cmp(b))),
            (Value::Integer(a), Value::Float(b)) => Ok(self.apply(Decimal::from(*a).cmp(b))),
            (Value::Float(a), Value::Integer(b)) => Ok(self.apply(a.cmp(&Decimal::from(*b)))),
            (Value::String(a), Value::String(b)) => Ok(self.apply(a.cmp(b))),
            (Value::Boolean(a), Value::Boolean(b)) if self.is_equality() => {
                Ok(self.apply(a.cmp(b)))
            }
            (a, b) => Err(RuleError::TypeMismatch {
                operator: *self,
                left: a.kind(),
                right: b.kind(),
            }),
        }
    }

    #[inline]
    fn apply(&self, ordering: Ordering) -> bool {
        match self {
            Self::LessThan => ordering.is_lt(),
            Self::LessThanEqual => ordering.is_le(),
            Self::GreaterThan => ordering.is_gt(),
            Self::GreaterThanEqual => ordering.is_ge(),
            Self::Equal => ordering.is_eq(),
            Self::NotEqual => ordering.is_ne(),
        }
    }
}

impl Display for ComparisonOperator {
    fn fmt(&self, formatter: &mut Formatter) -> std::fmt::Result {
        match self {
            Self::LessThan => write!(formatter, "<"),
            Self::LessThanEqual => write!(formatter, "<="),
            Self::GreaterThan => write!(formatter, ">"),
            Self::GreaterThanEqual => write!(formatter, ">="),
            Self::Equal => write!(formatter, "=="),
            Self::NotEqual => write!(formatter, "!="),
        }
    }
}

impl Comparison {
    pub fn parse(expression: &str) -> Result<Self, RuleError> {
        let mut tokens = Lexer::new(expression);
        let mut terms = vec![parse_term(&mut tokens, expression)?];
        let mut operators = vec![];
        while let Some(spanned) = tokens.next() {
            let (start, token, _) = spanned?;
            let operator = ComparisonOperator::from_token(&token).ok_or_else(|| {
                RuleError::MalformedInput(format!(
                    "expected a comparison operator at {start} in '{expression}', found {token}"
                ))
            })?;
            operators.push(operator);
            terms.push(parse_term(&mut tokens, expression)?);
        }

        Ok(Self { terms, operators })
    }

    /// The attribute names referenced by the clause, in order of appearance.
    pub fn attributes(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().filter_map(|term| match term {
            Term::Attribute(name) => Some(name.as_str()),
            Term::Literal(_) => None,
        })
    }

    /// Evaluate the clause against the record.
    ///
    /// Every referenced attribute is resolved and every link of a chain is compared, so a
    /// missing attribute or a type mismatch is always reported, even when an earlier link
    /// already failed.
    pub fn evaluate(&self, record: &Record) -> Result<bool, RuleError> {
        let values = self.resolve(record)?;
        if let [value] = values.as_slice() {
            return match value {
                Value::Boolean(value) => Ok(*value),
                other => Err(RuleError::TypeMismatch {
                    operator: ComparisonOperator::Equal,
                    left: other.kind(),
                    right: ValueKind::Boolean,
                }),
            };
        }

        values
            .iter()
            .tuple_windows()
            .zip(&self.operators)
            .map(|((left, right), operator)| operator.evaluate(left, right))
            .fold_ok(true, |holds, link| holds && link)
    }

    /// Render the clause with every attribute replaced by the literal form of its value.
    ///
    /// The result only contains literals and parses back into a clause that evaluates to
    /// the same result.
    pub fn substitute(&self, record: &Record) -> Result<String, RuleError> {
        let values = self.resolve(record)?;
        let mut rendered = values[0].to_string();
        for (operator, value) in self.operators.iter().zip(&values[1..]) {
            rendered.push_str(&format!(" {operator} {value}"));
        }
        Ok(rendered)
    }

    fn resolve<'a>(&'a self, record: &'a Record) -> Result<Vec<&'a Value>, RuleError> {
        self.terms
            .iter()
            .map(|term| match term {
                Term::Literal(value) => Ok(value),
                Term::Attribute(name) => record
                    .get(name)
                    .ok_or_else(|| RuleError::UnresolvedAttribute(name.clone())),
            })
            .collect()
    }
}

impl Display for Comparison {
    fn fmt(&self, formatter: &mut Formatter) -> std::fmt::Result {
        write!(formatter, "{}", self.terms[0])?;
        for (operator, term) in self.operators.iter().zip(&self.terms[1..]) {
            write!(formatter, " {operator} {term}")?;
        }
        Ok(())
    }
}

fn parse_term(tokens: &mut Lexer, expression: &str) -> Result<Term, RuleError> {
    let (start, token, _) = tokens.next().ok_or_else(|| {
        RuleError::MalformedInput(format!(
            "expected an attribute or a literal at the end of '{expression}'"
        ))
    })??;
    match token {
        Token::Identifier(name) => Ok(Term::Attribute(name.to_owned())),
        Token::IntegerLiteral(value) => Ok(Term::Literal(Value::Integer(value))),
        Token::FloatLiteral(value) => Ok(Term::Literal(Value::Float(value))),
        Token::StringLiteral(value) => Ok(Term::Literal(Value::String(value))),
        Token::BooleanLiteral(value) => Ok(Term::Literal(Value::Boolean(value))),
        other => Err(RuleError::MalformedInput(format!(
            "expected an attribute or a literal at {start} in '{expression}', found {other}"
        ))),
    }
}
