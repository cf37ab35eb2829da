use crate::error::RuleError;
use rust_decimal::Decimal;
use std::{
    collections::HashMap,
    fmt::{Display, Formatter},
    str::FromStr,
};

/// A value held by a [`Record`] attribute or written as a literal inside a rule.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Boolean(bool),
    Integer(i64),
    Float(Decimal),
    String(String),
}

impl Value {
    #[inline]
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Boolean(_) => ValueKind::Boolean,
            Self::Integer(_) => ValueKind::Integer,
            Self::Float(_) => ValueKind::Float,
            Self::String(_) => ValueKind::String,
        }
    }
}

/// Renders the value as a rule literal: numbers are bare, strings are single-quoted with
/// their quotes and backslashes escaped, booleans are keywords.
impl Display for Value {
    fn fmt(&self, formatter: &mut Formatter) -> std::fmt::Result {
        match self {
            Self::Boolean(value) => write!(formatter, "{value}"),
            Self::Integer(value) => write!(formatter, "{value}"),
            Self::Float(value) => write!(formatter, "{value}"),
            Self::String(value) => {
                write!(formatter, "'")?;
                for c in value.chars() {
                    match c {
                        '\\' => write!(formatter, "\\\\")?,
                        '\'' => write!(formatter, "\\'")?,
                        c => write!(formatter, "{c}")?,
                    }
                }
                write!(formatter, "'")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<Decimal> for Value {
    fn from(value: Decimal) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ValueKind {
    Boolean,
    Integer,
    Float,
    String,
}

impl Display for ValueKind {
    fn fmt(&self, formatter: &mut Formatter) -> std::fmt::Result {
        match self {
            Self::Boolean => write!(formatter, "boolean"),
            Self::Integer => write!(formatter, "integer"),
            Self::Float => write!(formatter, "float"),
            Self::String => write!(formatter, "string"),
        }
    }
}

/// The data a rule is evaluated against.
///
/// # Examples
///
/// ```rust
/// use rule_tree::{Record, Value};
///
/// let record: Record = [("age", Value::Integer(35)), ("department", Value::from("Sales"))]
///     .into_iter()
///     .collect();
/// assert!(record.get("age").is_some());
/// assert!(record.get("salary").is_none());
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record(HashMap<String, Value>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the attribute, replacing any previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.0.insert(name.into(), value.into());
        self
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        )
    }
}

/// Build a record out of a JSON object.
///
/// Numbers that fit in an `i64` become integers, other numbers become decimals. Nested
/// objects, arrays and `null` cannot be compared by a rule and are rejected.
impl TryFrom<&serde_json::Value> for Record {
    type Error = RuleError;

    fn try_from(json: &serde_json::Value) -> Result<Self, Self::Error> {
        let object = json.as_object().ok_or_else(|| {
            RuleError::MalformedInput("a data record must be a JSON object".to_string())
        })?;

        object
            .iter()
            .map(|(name, value)| Ok((name.as_str(), json_to_value(name, value)?)))
            .collect()
    }
}

fn json_to_value(name: &str, json: &serde_json::Value) -> Result<Value, RuleError> {
    use serde_json::Value as Json;

    match json {
        Json::Bool(value) => Ok(Value::Boolean(*value)),
        Json::String(value) => Ok(Value::String(value.clone())),
        Json::Number(number) => match number.as_i64() {
            Some(integer) => Ok(Value::Integer(integer)),
            None => json_to_decimal(number)
                .map(|value| Value::Float(value.normalize()))
                .ok_or_else(|| {
                    RuleError::MalformedInput(format!(
                        "attribute '{name}' holds a number that cannot be represented: {number}"
                    ))
                }),
        },
        other => Err(RuleError::MalformedInput(format!(
            "attribute '{name}' must be a number, a string or a boolean, found {other}"
        ))),
    }
}

// Read from the shortest decimal text of the number, not its binary value, so `0.1` in a
// record equals the `0.1` literal of a rule.
fn json_to_decimal(number: &serde_json::Number) -> Option<Decimal> {
    let text = number.to_string();
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn can_create_an_empty_record() {
        let record = Record::new();

        assert!(record.is_empty());
        assert_eq!(None, record.get("age"));
    }

    #[test]
    fn can_insert_values_of_every_kind() {
        let mut record = Record::new();
        record
            .insert("age", 35_i64)
            .insert("salary", Decimal::new(505, 1))
            .insert("department", "Sales")
            .insert("active", true);

        assert_eq!(4, record.len());
        assert_eq!(Some(&Value::Integer(35)), record.get("age"));
        assert_eq!(Some(&Value::Float(Decimal::new(505, 1))), record.get("salary"));
        assert_eq!(
            Some(&Value::String("Sales".to_string())),
            record.get("department")
        );
        assert_eq!(Some(&Value::Boolean(true)), record.get("active"));
    }

    #[test]
    fn render_numbers_as_bare_literals() {
        assert_eq!("35", Value::Integer(35).to_string());
        assert_eq!("-2.50", Value::Float(Decimal::new(-250, 2)).to_string());
    }

    #[test]
    fn render_strings_as_quoted_literals() {
        assert_eq!("'Sales'", Value::from("Sales").to_string());
        assert_eq!(r"'O\'Brien'", Value::from("O'Brien").to_string());
        assert_eq!(r"'C:\\dir'", Value::from("C:\\dir").to_string());
    }

    #[test]
    fn render_booleans_as_keywords() {
        assert_eq!("true", Value::Boolean(true).to_string());
        assert_eq!("false", Value::Boolean(false).to_string());
    }

    #[test]
    fn can_convert_a_json_object() {
        let record = Record::try_from(&json!({
            "age": 35,
            "salary": 5000.5,
            "department": "Sales",
            "active": false
        }))
        .unwrap();

        assert_eq!(Some(&Value::Integer(35)), record.get("age"));
        assert_eq!(Some(&Value::Float(Decimal::new(50005, 1))), record.get("salary"));
        assert_eq!(Some(&Value::from("Sales")), record.get("department"));
        assert_eq!(Some(&Value::Boolean(false)), record.get("active"));
    }

    #[test]
    fn keep_the_decimal_text_of_json_floats() {
        let record = Record::try_from(&json!({
            "score": 0.1,
            "ratio": 2.675,
            "huge": 1.5e20,
            "unsigned": u64::MAX
        }))
        .unwrap();

        assert_eq!(Some(&Value::Float(Decimal::new(1, 1))), record.get("score"));
        assert_eq!(Some(&Value::Float(Decimal::new(2675, 3))), record.get("ratio"));
        assert_eq!(
            Some(&Value::Float(Decimal::from_str("150000000000000000000").unwrap())),
            record.get("huge")
        );
        assert_eq!(Some(&Value::Float(Decimal::from(u64::MAX))), record.get("unsigned"));
    }

    #[test]
    fn return_an_error_on_a_json_number_out_of_decimal_range() {
        let result = Record::try_from(&json!({"distance": 1e300}));

        assert!(matches!(result, Err(RuleError::MalformedInput(_))));
    }

    #[test]
    fn return_an_error_when_json_is_not_an_object() {
        let result = Record::try_from(&json!([1, 2, 3]));

        assert!(matches!(result, Err(RuleError::MalformedInput(_))));
    }

    #[test]
    fn return_an_error_on_nested_json_values() {
        assert!(Record::try_from(&json!({"tags": ["a"]})).is_err());
        assert!(Record::try_from(&json!({"profile": {"age": 3}})).is_err());
        assert!(Record::try_from(&json!({"age": null})).is_err());
    }
}
