use crate::error::RuleError;
use logos::{Logos, SpannedIter};
use rust_decimal::Decimal;
use std::{num::ParseIntError, str::FromStr};
use thiserror::Error;

#[derive(Default, Error, Debug, Clone, PartialEq)]
pub enum LexicalError {
    #[default]
    #[error("invalid token")]
    InvalidToken,
    #[error("failed to parse integer: {0}")]
    Integer(ParseIntError),
    #[error("failed to parse float: {0}")]
    Float(rust_decimal::Error),
}

/// The tokens of a single comparison clause.
///
/// Anything that is not listed here (parentheses, calls, assignments, attribute access...)
/// is rejected as an invalid token.
#[derive(Clone, Debug, Logos, PartialEq)]
#[logos(skip r"[ \t\n\f\r]+", error = LexicalError)]
pub enum Token<'source> {
    #[token("<")]
    LessThan,
    #[token("<=")]
    LessThanEqual,
    #[token(">")]
    GreaterThan,
    #[token(">=")]
    GreaterThanEqual,
    #[token("==")]
    Equal,
    #[token("!=")]
    NotEqual,
    #[regex(r"-?[0-9]+", |lex| lex.slice().parse::<i64>().map_err(LexicalError::Integer))]
    IntegerLiteral(i64),
    #[regex(r"-?[0-9]+\.[0-9]*", |lex| Decimal::from_str(lex.slice()).map_err(LexicalError::Float))]
    FloatLiteral(Decimal),
    #[regex(r#"(\"(\\.|[^"\\])*\"|\'(\\.|[^'\\])*\')"#, |lex| unescape(lex.slice()))]
    StringLiteral(String),
    #[token("true", |_| true)]
    #[token("True", |_| true)]
    #[token("false", |_| false)]
    #[token("False", |_| false)]
    BooleanLiteral(bool),
    #[regex("[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice())]
    Identifier(&'source str),
}

impl std::fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

// The regex guarantees the slice is quoted and that every backslash is followed by a
// character.
fn unescape(quoted: &str) -> String {
    let inner = &quoted[1..quoted.len() - 1];
    let mut unescaped = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            unescaped.push(c);
            continue;
        }

        match chars.next() {
            Some('n') => unescaped.push('\n'),
            Some('t') => unescaped.push('\t'),
            Some('r') => unescaped.push('\r'),
            Some(other) => unescaped.push(other),
            None => unescaped.push('\\'),
        }
    }
    unescaped
}

pub type Spanned<Tok, Location, Error> = Result<(Location, Tok, Location), Error>;

pub struct Lexer<'input> {
    token_stream: SpannedIter<'input, Token<'input>>,
}

impl<'input> Lexer<'input> {
    pub fn new(input: &'input str) -> Self {
        Self {
            token_stream: Token::lexer(input).spanned(),
        }
    }
}

impl<'input> Iterator for Lexer<'input> {
    type Item = Spanned<Token<'input>, usize, RuleError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.token_stream
            .next()
            .map(|(token, span)| Ok((span.start, token.map_err(RuleError::from)?, span.end)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex_tokens(input: &str) -> Result<Vec<Token<'_>>, RuleError> {
        Lexer::new(input)
            .map(|value| value.map(|(_, token, _)| token))
            .collect()
    }

    #[test]
    fn can_lex_less_than() {
        let actual = lex_tokens("<").unwrap();
        assert_eq!(vec![Token::LessThan], actual);
    }

    #[test]
    fn can_lex_less_than_equal() {
        let actual = lex_tokens("<=").unwrap();
        assert_eq!(vec![Token::LessThanEqual], actual);
    }

    #[test]
    fn can_lex_greater_than() {
        let actual = lex_tokens(">").unwrap();
        assert_eq!(vec![Token::GreaterThan], actual);
    }

    #[test]
    fn can_lex_greater_than_equal() {
        let actual = lex_tokens(">=").unwrap();
        assert_eq!(vec![Token::GreaterThanEqual], actual);
    }

    #[test]
    fn can_lex_equal() {
        let actual = lex_tokens("==").unwrap();
        assert_eq!(vec![Token::Equal], actual);
    }

    #[test]
    fn can_lex_not_equal() {
        let actual = lex_tokens("!=").unwrap();
        assert_eq!(vec![Token::NotEqual], actual);
    }

    #[test]
    fn can_lex_integer() {
        let actual = lex_tokens("123").unwrap();
        assert_eq!(vec![Token::IntegerLiteral(123)], actual);
    }

    #[test]
    fn can_lex_negative_integer() {
        let actual = lex_tokens("-123").unwrap();
        assert_eq!(vec![Token::IntegerLiteral(-123)], actual);
    }

    #[test]
    fn can_lex_float() {
        let actual = lex_tokens("123.123").unwrap();
        let other = lex_tokens("123.").unwrap();
        let negative = lex_tokens("-0.5").unwrap();
        assert_eq!(vec![Token::FloatLiteral(Decimal::new(123123, 3))], actual);
        assert_eq!(vec![Token::FloatLiteral(Decimal::new(123, 0))], other);
        assert_eq!(vec![Token::FloatLiteral(Decimal::new(-5, 1))], negative);
    }

    #[test]
    fn can_lex_boolean() {
        assert_eq!(vec![Token::BooleanLiteral(true)], lex_tokens("true").unwrap());
        assert_eq!(vec![Token::BooleanLiteral(false)], lex_tokens("false").unwrap());
        assert_eq!(vec![Token::BooleanLiteral(true)], lex_tokens("True").unwrap());
        assert_eq!(vec![Token::BooleanLiteral(false)], lex_tokens("False").unwrap());
    }

    #[test]
    fn can_lex_identifier() {
        let actual = lex_tokens("department").unwrap();
        assert_eq!(vec![Token::Identifier("department")], actual);
    }

    #[test]
    fn lex_identifiers_that_start_with_a_keyword_as_identifiers() {
        let actual = lex_tokens("true_flag").unwrap();
        assert_eq!(vec![Token::Identifier("true_flag")], actual);
    }

    #[test]
    fn can_lex_empty_string() {
        let actual = lex_tokens("\"\"").unwrap();
        assert_eq!(vec![Token::StringLiteral(String::new())], actual);
        let actual = lex_tokens("''").unwrap();
        assert_eq!(vec![Token::StringLiteral(String::new())], actual);
    }

    #[test]
    fn can_lex_string() {
        let actual = lex_tokens("\"Sales\"").unwrap();
        assert_eq!(vec![Token::StringLiteral("Sales".to_string())], actual);
        let actual = lex_tokens("'Sales'").unwrap();
        assert_eq!(vec![Token::StringLiteral("Sales".to_string())], actual);
    }

    #[test]
    fn unescape_quotes_inside_strings() {
        let actual = lex_tokens(r#""say \"hi\"""#).unwrap();
        assert_eq!(vec![Token::StringLiteral("say \"hi\"".to_string())], actual);
        let actual = lex_tokens(r"'O\'Brien'").unwrap();
        assert_eq!(vec![Token::StringLiteral("O'Brien".to_string())], actual);
    }

    #[test]
    fn unescape_backslashes_and_control_characters() {
        let actual = lex_tokens(r"'a\\b\nc\td'").unwrap();
        assert_eq!(
            vec![Token::StringLiteral("a\\b\nc\td".to_string())],
            actual
        );
    }

    #[test]
    fn can_lex_a_comparison() {
        let actual = lex_tokens("age >= 30");

        assert_eq!(
            Ok(vec![
                Token::Identifier("age"),
                Token::GreaterThanEqual,
                Token::IntegerLiteral(30),
            ]),
            actual
        );
    }

    #[test]
    fn can_lex_a_chained_comparison() {
        let actual = lex_tokens("18 <= age < 65.5");

        assert_eq!(
            Ok(vec![
                Token::IntegerLiteral(18),
                Token::LessThanEqual,
                Token::Identifier("age"),
                Token::LessThan,
                Token::FloatLiteral(Decimal::new(655, 1)),
            ]),
            actual
        );
    }

    #[test]
    fn return_an_error_on_call_syntax() {
        let actual = lex_tokens("__import__('os').system('ls')");

        assert!(matches!(actual, Err(RuleError::MalformedInput(_))));
    }

    #[test]
    fn return_an_error_on_assignment() {
        let actual = lex_tokens("age = 30");

        assert!(matches!(actual, Err(RuleError::MalformedInput(_))));
    }

    #[test]
    fn return_an_error_on_an_integer_overflow() {
        let actual = lex_tokens("99999999999999999999999");

        assert!(matches!(actual, Err(RuleError::MalformedInput(_))));
    }
}
