//! Persistence of rules.
//!
//! A stored rule keeps the rule string it was parsed from, its tree in serialized form and
//! when it was created and last modified. [`MemoryRuleStore`] keeps everything in memory;
//! other backends implement [`RuleStore`].
use crate::{
    ast::Node,
    error::RuleError,
    serialization::{from_map, to_map},
};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

pub type RuleId = u64;

#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    #[error("rule {0} does not exist")]
    NotFound(RuleId),
    #[error("stored rule is invalid: {0}")]
    Rule(#[from] RuleError),
}

/// A rule as read back from a [`RuleStore`].
#[derive(Clone, Debug, PartialEq)]
pub struct StoredRule {
    pub id: RuleId,
    pub source: String,
    pub ast: Option<Node>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

/// Where rules are kept between requests.
pub trait RuleStore: Send + Sync {
    /// Store a new rule and return its identifier.
    fn insert(&self, source: &str, ast: Option<&Node>) -> Result<RuleId, StoreError>;

    fn get(&self, id: RuleId) -> Result<Option<StoredRule>, StoreError>;

    /// Replace the rule string and tree of an existing rule, bumping its modification time.
    fn update(&self, id: RuleId, source: &str, ast: Option<&Node>) -> Result<(), StoreError>;

    /// All the stored rules, ordered by identifier.
    fn list(&self) -> Result<Vec<StoredRule>, StoreError>;
}

#[derive(Clone, Debug)]
struct Row {
    source: String,
    ast: serde_json::Value,
    created_at: DateTime<Utc>,
    modified_at: DateTime<Utc>,
}

impl Row {
    fn to_stored_rule(&self, id: RuleId) -> Result<StoredRule, StoreError> {
        Ok(StoredRule {
            id,
            source: self.source.clone(),
            ast: from_map(&self.ast)?,
            created_at: self.created_at,
            modified_at: self.modified_at,
        })
    }
}

#[derive(Debug, Default)]
struct Rows {
    by_ids: BTreeMap<RuleId, Row>,
    last_id: RuleId,
}

/// A [`RuleStore`] keeping the serialized rules in memory.
///
/// Identifiers start at 1 and are never reused.
#[derive(Debug, Default)]
pub struct MemoryRuleStore {
    rows: RwLock<Rows>,
}

impl MemoryRuleStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.read().by_ids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.read().by_ids.is_empty()
    }
}

impl RuleStore for MemoryRuleStore {
    #[instrument(skip(self, ast))]
    fn insert(&self, source: &str, ast: Option<&Node>) -> Result<RuleId, StoreError> {
        let now = Utc::now();
        let row = Row {
            source: source.to_owned(),
            ast: to_map(ast),
            created_at: now,
            modified_at: now,
        };

        let mut rows = self.rows.write();
        rows.last_id += 1;
        let id = rows.last_id;
        rows.by_ids.insert(id, row);
        info!(id, "stored rule");
        Ok(id)
    }

    #[instrument(skip(self))]
    fn get(&self, id: RuleId) -> Result<Option<StoredRule>, StoreError> {
        let rows = self.rows.read();
        let Some(row) = rows.by_ids.get(&id) else {
            debug!("rule not found");
            return Ok(None);
        };
        row.to_stored_rule(id).map(Some)
    }

    #[instrument(skip(self, ast))]
    fn update(&self, id: RuleId, source: &str, ast: Option<&Node>) -> Result<(), StoreError> {
        let mut rows = self.rows.write();
        let Some(row) = rows.by_ids.get_mut(&id) else {
            warn!("cannot update a rule that does not exist");
            return Err(StoreError::NotFound(id));
        };

        row.source = source.to_owned();
        row.ast = to_map(ast);
        row.modified_at = Utc::now();
        info!("updated rule");
        Ok(())
    }

    fn list(&self) -> Result<Vec<StoredRule>, StoreError> {
        self.rows
            .read()
            .by_ids
            .iter()
            .map(|(id, row)| row.to_stored_rule(*id))
            .collect()
    }
}
