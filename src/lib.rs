//! Boolean eligibility rules over attribute comparisons.
//!
//! A rule such as `age > 30 AND department == 'Sales'` is parsed into a binary tree whose
//! inner nodes are `AND`/`OR` connectives and whose leaves are comparisons. Trees can be
//! combined, serialized to JSON for storage and evaluated against a record of attribute
//! values.
//!
//! # Examples
//!
//! ```
//! use rule_tree::{combine, evaluate, from_map, parse, to_map, Connective, Record};
//!
//! // Parse two rules and join them
//! let first = parse("age > 30 AND department == 'Sales'").unwrap();
//! let second = parse("salary >= 50000").unwrap();
//! let combined = combine(vec![first, second], Connective::Or).unwrap();
//!
//! // Store the tree and read it back
//! let map = to_map(Some(&combined));
//! let restored = from_map(&map).unwrap().unwrap();
//! assert_eq!(combined, restored);
//!
//! // Evaluate it against a record
//! let mut record = Record::new();
//! record
//!     .insert("age", 25_i64)
//!     .insert("department", "Marketing")
//!     .insert("salary", 60000_i64);
//! assert_eq!(Ok(true), evaluate(&restored, &record));
//! ```
//!
//! # Rule syntax
//!
//! A rule is made of clauses joined by ` AND ` or ` OR ` (uppercase, surrounded by single
//! spaces). Each clause is a comparison:
//!
//! * Terms: attribute names (`[a-zA-Z_][a-zA-Z0-9_]*`), integers, decimals, strings between
//!   single or double quotes and the booleans `true`/`false` (or `True`/`False`);
//! * Operators: `<`, `<=`, `>`, `>=`, `==` and `!=`. Comparisons can be chained
//!   (`18 <= age < 65`) and a lone boolean term is a valid clause;
//! * Integers and decimals compare with each other, strings compare lexicographically and
//!   booleans only support `==` and `!=`.
//!
//! Nothing in a rule or in a record is ever executed: a clause that is not a comparison is
//! rejected with [`RuleError::MalformedInput`].
//!
//! # Limitations
//!
//! Rules are split on the first ` AND `, then on the first ` OR `, without any notion of
//! precedence, parentheses or quoting. `A AND B OR C` therefore gives `A AND (B OR C)` and a
//! string literal holding ` AND ` or ` OR ` cannot be parsed. Build the tree with [`Node`]
//! and [`combine`] when a different shape is needed.
mod ast;
mod combiner;
mod comparison;
mod config;
mod error;
mod evaluation;
mod lexer;
mod parser;
mod record;
mod serialization;
mod service;
mod store;
#[cfg(test)]
mod test_utils;

pub use crate::{
    ast::{Connective, Node, TreeNode},
    combiner::{combine, combine_within},
    comparison::{Comparison, ComparisonOperator, Term},
    config::ParserOptions,
    error::RuleError,
    evaluation::evaluate,
    lexer::LexicalError,
    parser::{parse, RuleParser},
    record::{Record, Value, ValueKind},
    serialization::{from_map, from_map_within, to_map},
    service::{
        CombineRulesRequest, CombineRulesResponse, CreateRuleRequest, CreateRuleResponse,
        EvaluateRuleRequest, EvaluateRuleResponse, EvaluateStoredRuleRequest, RuleService,
        RuleSummary, ServiceError, UpdateRuleRequest, UpdateRuleResponse,
    },
    store::{MemoryRuleStore, RuleId, RuleStore, StoreError, StoredRule},
};
