//! Conversion between trees and their serialized form.
//!
//! A tree is stored as nested JSON objects:
//!
//! ```json
//! {
//!   "type": "operator",
//!   "value": "AND",
//!   "left": { "type": "operand", "value": "age > 30", "left": null, "right": null },
//!   "right": { "type": "operand", "value": "department == 'Sales'", "left": null, "right": null }
//! }
//! ```
//!
//! and "no rule" is stored as `null`.
use crate::{
    ast::{Connective, Node},
    config::ParserOptions,
    error::RuleError,
};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Map, Value};

const TYPE: &str = "type";
const LEFT: &str = "left";
const RIGHT: &str = "right";
const VALUE: &str = "value";

const OPERATOR: &str = "operator";
const OPERAND: &str = "operand";

/// Convert a tree into its serialized form; `None` becomes `null`.
pub fn to_map(node: Option<&Node>) -> Value {
    match node {
        None => Value::Null,
        Some(Node::Operator(connective, left, right)) => json!({
            TYPE: OPERATOR,
            LEFT: to_map(Some(left.as_ref())),
            RIGHT: to_map(Some(right.as_ref())),
            VALUE: connective.as_str(),
        }),
        Some(Node::Operand(expression)) => json!({
            TYPE: OPERAND,
            LEFT: Value::Null,
            RIGHT: Value::Null,
            VALUE: expression,
        }),
    }
}

/// Rebuild a tree out of its serialized form; `null` gives `None`.
///
/// Missing `left` and `right` keys are read as `null`. Anything else that does not
/// describe a valid tree is rejected:
///
/// * a missing or unknown `type`, a missing `value`, an operator missing one of its
///   children or an operand with children give [`RuleError::MalformedInput`];
/// * an operator whose `value` is neither `AND` nor `OR` gives
///   [`RuleError::InvalidConnective`];
/// * trees nesting more than [`ParserOptions::DEFAULT_MAX_DEPTH`] connectives give
///   [`RuleError::MalformedInput`].
///
/// Operand expressions are kept verbatim; a clause that is not a comparison is only
/// reported when the tree is evaluated.
pub fn from_map(map: &Value) -> Result<Option<Node>, RuleError> {
    from_map_within(map, ParserOptions::DEFAULT_MAX_DEPTH)
}

/// Same as [`from_map`], rejecting trees that nest more than `max_depth` connectives.
pub fn from_map_within(map: &Value, max_depth: usize) -> Result<Option<Node>, RuleError> {
    read_node(map, 0, max_depth)
}

fn read_node(map: &Value, depth: usize, max_depth: usize) -> Result<Option<Node>, RuleError> {
    let object = match map {
        Value::Null => return Ok(None),
        Value::Object(object) => object,
        other => {
            return Err(RuleError::MalformedInput(format!(
                "expected a node object or null, found {other}"
            )))
        }
    };

    let kind = object
        .get(TYPE)
        .ok_or_else(|| missing_key(TYPE))?
        .as_str()
        .ok_or_else(|| RuleError::MalformedInput(format!("'{TYPE}' must be a string")))?;
    let value = object
        .get(VALUE)
        .and_then(Value::as_str)
        .ok_or_else(|| missing_key(VALUE))?;
    if kind == OPERATOR && depth >= max_depth {
        return Err(RuleError::MalformedInput(format!(
            "tree nests more than {max_depth} connectives"
        )));
    }
    let left = child(object, LEFT, depth + 1, max_depth)?;
    let right = child(object, RIGHT, depth + 1, max_depth)?;

    match (kind, left, right) {
        (OPERATOR, Some(left), Some(right)) => {
            let connective = value.parse::<Connective>()?;
            Ok(Some(Node::operator(connective, left, right)))
        }
        (OPERATOR, _, _) => Err(RuleError::MalformedInput(format!(
            "an {OPERATOR} node needs both a '{LEFT}' and a '{RIGHT}' child"
        ))),
        (OPERAND, None, None) => Ok(Some(Node::Operand(value.to_owned()))),
        (OPERAND, _, _) => Err(RuleError::MalformedInput(format!(
            "an {OPERAND} node cannot have children"
        ))),
        (other, _, _) => Err(RuleError::MalformedInput(format!(
            "unknown node type '{other}', expected '{OPERATOR}' or '{OPERAND}'"
        ))),
    }
}

#[inline]
fn child(
    object: &Map<String, Value>,
    key: &str,
    depth: usize,
    max_depth: usize,
) -> Result<Option<Node>, RuleError> {
    object
        .get(key)
        .map_or(Ok(None), |child| read_node(child, depth, max_depth))
}

#[inline]
fn missing_key(key: &str) -> RuleError {
    RuleError::MalformedInput(format!("node is missing its '{key}' key"))
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        to_map(Some(self)).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = Value::deserialize(deserializer)?;
        from_map(&map)
            .map_err(de::Error::custom)?
            .ok_or_else(|| de::Error::custom("expected a node, found null"))
    }
}
