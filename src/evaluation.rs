use crate::{
    ast::{Connective, Node},
    comparison::Comparison,
    error::RuleError,
    record::Record,
};
use tracing::{enabled, trace, Level};

/// Evaluate the rule against the record.
///
/// Operators short-circuit: the right child is only evaluated when the left one does not
/// already decide the result. Each leaf is parsed with the restricted comparison grammar
/// and its attributes are looked up in the record; nothing in a rule or in a record is
/// ever executed.
///
/// # Examples
///
/// ```rust
/// use rule_tree::{evaluate, parse, Record, RuleError};
///
/// let rule = parse("age > 30 AND department == 'Sales'").unwrap();
/// let mut record = Record::new();
/// record.insert("age", 35_i64).insert("department", "Sales");
/// assert_eq!(Ok(true), evaluate(&rule, &record));
///
/// record.insert("age", 25_i64);
/// assert_eq!(Ok(false), evaluate(&rule, &record));
///
/// let rule = parse("country == 'CA'").unwrap();
/// assert_eq!(
///     Err(RuleError::UnresolvedAttribute("country".to_string())),
///     evaluate(&rule, &record)
/// );
/// ```
pub fn evaluate(node: &Node, record: &Record) -> Result<bool, RuleError> {
    match node {
        Node::Operator(Connective::And, left, right) => {
            Ok(evaluate(left, record)? && evaluate(right, record)?)
        }
        Node::Operator(Connective::Or, left, right) => {
            Ok(evaluate(left, record)? || evaluate(right, record)?)
        }
        Node::Operand(expression) => evaluate_operand(expression, record),
    }
}

fn evaluate_operand(expression: &str, record: &Record) -> Result<bool, RuleError> {
    let comparison = Comparison::parse(expression)?;
    let result = comparison.evaluate(record)?;
    if enabled!(Level::TRACE) {
        let substituted = comparison.substitute(record)?;
        trace!(expression, %substituted, result, "evaluated operand");
    }
    Ok(result)
}
