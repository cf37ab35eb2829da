use crate::{
    ast::{Connective, Node},
    config::ParserOptions,
    error::RuleError,
};
use tracing::trace;

/// Parse a rule string into a [`Node`] using the default [`ParserOptions`].
///
/// See [`RuleParser::parse`] for the rule syntax.
#[inline]
pub fn parse(rule: &str) -> Result<Node, RuleError> {
    RuleParser::default().parse(rule)
}

/// Turns rule strings into trees.
#[derive(Clone, Debug, Default)]
pub struct RuleParser {
    options: ParserOptions,
}

impl RuleParser {
    const CONNECTIVES: [Connective; 2] = [Connective::And, Connective::Or];

    pub fn new(options: ParserOptions) -> Self {
        Self { options }
    }

    #[inline]
    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Parse a rule string such as `age > 30 AND department == 'Sales'`.
    ///
    /// The rule is split on the first `" AND "`; when there is none, on the first `" OR "`.
    /// Both halves are parsed recursively and whatever contains no connective is a single
    /// comparison clause. The split is purely textual:
    ///
    /// * parentheses are not supported;
    /// * `AND` is always split before `OR`, so `a OR b AND c` reads as `(a OR b) AND c`;
    /// * connectives must be upper case and surrounded by single spaces;
    /// * a quoted literal containing `" AND "` or `" OR "` gets split as well, which leaves
    ///   an unterminated string and fails with [`RuleError::MalformedInput`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rule_tree::{parse, Connective, Node};
    ///
    /// let rule = parse("age > 30 AND department == 'Sales'").unwrap();
    /// assert_eq!(
    ///     Node::operator(
    ///         Connective::And,
    ///         Node::operand("age > 30").unwrap(),
    ///         Node::operand("department == 'Sales'").unwrap(),
    ///     ),
    ///     rule
    /// );
    /// ```
    ///
    /// Empty rules, dangling connectives and clauses that are not comparisons are errors:
    ///
    /// ```rust
    /// use rule_tree::{parse, RuleError};
    ///
    /// assert!(matches!(parse(""), Err(RuleError::MalformedInput(_))));
    /// assert!(matches!(parse("age > 30 AND "), Err(RuleError::MalformedInput(_))));
    /// assert!(matches!(parse("exec('ls')"), Err(RuleError::MalformedInput(_))));
    /// ```
    pub fn parse(&self, rule: &str) -> Result<Node, RuleError> {
        if rule.len() > self.options.max_rule_length {
            return Err(RuleError::MalformedInput(format!(
                "rule is {} bytes long, the limit is {}",
                rule.len(),
                self.options.max_rule_length
            )));
        }

        self.parse_at_depth(rule, 0)
    }

    fn parse_at_depth(&self, rule: &str, depth: usize) -> Result<Node, RuleError> {
        for connective in Self::CONNECTIVES {
            let Some((left, right)) = rule.split_once(separator(connective)) else {
                continue;
            };

            if depth >= self.options.max_depth {
                return Err(RuleError::MalformedInput(format!(
                    "rule nests more than {} connectives",
                    self.options.max_depth
                )));
            }

            let left = self.parse_at_depth(left, depth + 1)?;
            let right = self.parse_at_depth(right, depth + 1)?;
            return Ok(Node::operator(connective, left, right));
        }

        let expression = rule.trim();
        if expression.is_empty() {
            return Err(RuleError::MalformedInput(
                "expected a comparison, found an empty operand".to_string(),
            ));
        }

        trace!(expression, depth, "parsed operand");
        Node::operand(expression)
    }
}

#[inline]
const fn separator(connective: Connective) -> &'static str {
    match connective {
        Connective::And => " AND ",
        Connective::Or => " OR ",
    }
}
