use serde::{Deserialize, Serialize};

/// Limits applied by [`crate::RuleParser`] to untrusted rule strings.
///
/// Missing fields fall back to their defaults so the options can be embedded in a host's
/// own configuration file.
///
/// ```rust
/// use rule_tree::ParserOptions;
///
/// let options: ParserOptions = serde_json::from_str(r#"{"max_depth": 8}"#).unwrap();
/// assert_eq!(8, options.max_depth);
/// assert_eq!(ParserOptions::DEFAULT_MAX_RULE_LENGTH, options.max_rule_length);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserOptions {
    /// The maximum length of a rule string, in bytes.
    pub max_rule_length: usize,
    /// The maximum number of nested connectives.
    pub max_depth: usize,
}

impl ParserOptions {
    pub const DEFAULT_MAX_RULE_LENGTH: usize = 16 * 1024;
    pub const DEFAULT_MAX_DEPTH: usize = 256;
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            max_rule_length: Self::DEFAULT_MAX_RULE_LENGTH,
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }
}
