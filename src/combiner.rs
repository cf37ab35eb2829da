use crate::{
    ast::{Connective, Node},
    error::RuleError,
};
use tracing::debug;

/// Join the rules with the connective, folding from the left.
///
/// `[r1, r2, r3]` becomes `(r1 ∘ r2) ∘ r3`. A single rule is returned as is and no rule at
/// all gives `None`; deciding what an empty rule set means is up to the caller.
///
/// Combining `n` rules gives a tree at least `n - 1` levels deep and trees are walked
/// recursively. Use [`combine_within`] when the number of rules is not under control.
///
/// # Examples
///
/// ```rust
/// use rule_tree::{combine, parse, Connective};
///
/// let rules = vec![
///     parse("age > 30").unwrap(),
///     parse("department == 'Sales'").unwrap(),
/// ];
/// let combined = combine(rules, Connective::Or).unwrap();
/// assert_eq!("age > 30 OR department == 'Sales'", combined.to_string());
///
/// assert_eq!(None, combine(vec![], Connective::And));
/// ```
pub fn combine<I>(rules: I, connective: Connective) -> Option<Node>
where
    I: IntoIterator<Item = Node>,
{
    let mut count = 0usize;
    let combined = rules
        .into_iter()
        .inspect(|_| count += 1)
        .reduce(|accumulated, rule| Node::operator(connective, accumulated, rule));
    debug!(count, %connective, "combined rules");
    combined
}

/// Same as [`combine`], rejecting the rules with [`RuleError::MalformedInput`] when the
/// combined tree would nest more than `max_depth` connectives.
///
/// # Examples
///
/// ```rust
/// use rule_tree::{combine_within, parse, Connective, RuleError};
///
/// let rules = (0..4).map(|i| parse(&format!("a == {i}")).unwrap());
/// assert!(matches!(
///     combine_within(rules, Connective::And, 2),
///     Err(RuleError::MalformedInput(_))
/// ));
/// ```
pub fn combine_within<I>(
    rules: I,
    connective: Connective,
    max_depth: usize,
) -> Result<Option<Node>, RuleError>
where
    I: IntoIterator<Item = Node>,
{
    let mut rules = rules.into_iter();
    let Some(first) = rules.next() else {
        return Ok(None);
    };
    let height = first.height();
    check_depth(height, max_depth)?;

    let (combined, height) = rules.try_fold((first, height), |(accumulated, height), rule| {
        let height = 1 + height.max(rule.height());
        check_depth(height, max_depth)?;
        Ok::<_, RuleError>((Node::operator(connective, accumulated, rule), height))
    })?;
    debug!(height, %connective, "combined rules");
    Ok(Some(combined))
}

#[inline]
fn check_depth(height: usize, max_depth: usize) -> Result<(), RuleError> {
    if height > max_depth {
        return Err(RuleError::MalformedInput(format!(
            "combined rule nests more than {max_depth} connectives"
        )));
    }
    Ok(())
}
