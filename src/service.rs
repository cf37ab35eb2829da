//! Transport agnostic request handling.
//!
//! [`RuleService`] takes the decoded bodies of the rule management requests, checks that
//! they carry what the engine needs, and calls the engine and the store. Wiring it to an
//! actual transport (HTTP, queue, CLI...) is left to the host.
use crate::{
    ast::Connective,
    combiner::combine_within,
    evaluation::evaluate,
    parser::RuleParser,
    record::Record,
    serialization::{from_map_within, to_map},
    store::{RuleId, RuleStore, StoreError},
    RuleError,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, instrument};

#[derive(Debug, Error, PartialEq)]
pub enum ServiceError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error(transparent)]
    Rule(#[from] RuleError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct CreateRuleRequest {
    pub rule: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateRuleResponse {
    pub rule_id: RuleId,
    pub rule_ast: Value,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct CombineRulesRequest {
    pub rules: Option<Vec<String>>,
    /// `AND` or `OR`, `AND` when absent.
    pub connective: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombineRulesResponse {
    pub combined_ast: Value,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct EvaluateRuleRequest {
    pub rule_ast: Option<Value>,
    pub user_data: Option<Value>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct EvaluateStoredRuleRequest {
    pub user_data: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EvaluateRuleResponse {
    pub result: bool,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct UpdateRuleRequest {
    pub rule: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UpdateRuleResponse {
    pub rule_id: RuleId,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleSummary {
    pub rule_id: RuleId,
    pub rule: String,
    pub rule_ast: Value,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

/// Handles the rule management requests on top of a [`RuleStore`].
///
/// # Examples
///
/// ```rust
/// use rule_tree::{CreateRuleRequest, EvaluateStoredRuleRequest, MemoryRuleStore, RuleService};
/// use serde_json::json;
///
/// let service = RuleService::new(MemoryRuleStore::new());
/// let created = service
///     .create_rule(CreateRuleRequest {
///         rule: Some("age > 30 AND department == 'Sales'".to_string()),
///     })
///     .unwrap();
///
/// let response = service
///     .evaluate_stored_rule(
///         created.rule_id,
///         EvaluateStoredRuleRequest {
///             user_data: Some(json!({"age": 35, "department": "Sales"})),
///         },
///     )
///     .unwrap();
/// assert!(response.result);
/// ```
#[derive(Debug)]
pub struct RuleService<S> {
    store: S,
    parser: RuleParser,
}

impl<S: RuleStore> RuleService<S> {
    pub fn new(store: S) -> Self {
        Self::with_parser(store, RuleParser::default())
    }

    pub fn with_parser(store: S, parser: RuleParser) -> Self {
        Self { store, parser }
    }

    #[inline]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Parse and store a rule.
    #[instrument(skip_all)]
    pub fn create_rule(
        &self,
        request: CreateRuleRequest,
    ) -> Result<CreateRuleResponse, ServiceError> {
        let rule = required_rule(request.rule)?;
        let ast = self.parser.parse(&rule)?;
        let rule_id = self.store.insert(&rule, Some(&ast))?;
        info!(rule_id, "created rule");
        Ok(CreateRuleResponse {
            rule_id,
            rule_ast: to_map(Some(&ast)),
        })
    }

    /// Parse every rule and join them with the requested connective.
    ///
    /// The combined tree is held to the parser's depth limit.
    #[instrument(skip_all)]
    pub fn combine_rules(
        &self,
        request: CombineRulesRequest,
    ) -> Result<CombineRulesResponse, ServiceError> {
        let rules = request
            .rules
            .filter(|rules| !rules.is_empty())
            .ok_or(ServiceError::MissingField("rules"))?;
        let connective = request
            .connective
            .as_deref()
            .map(str::parse::<Connective>)
            .transpose()?
            .unwrap_or_default();

        let asts = rules
            .iter()
            .map(|rule| self.parser.parse(rule))
            .collect::<Result<Vec<_>, _>>()?;
        let combined = combine_within(asts, connective, self.parser.options().max_depth)?;
        Ok(CombineRulesResponse {
            combined_ast: to_map(combined.as_ref()),
        })
    }

    /// Evaluate a serialized rule against the data record.
    #[instrument(skip_all)]
    pub fn evaluate_rule(
        &self,
        request: EvaluateRuleRequest,
    ) -> Result<EvaluateRuleResponse, ServiceError> {
        let rule_ast = request
            .rule_ast
            .filter(|ast| !ast.is_null())
            .ok_or(ServiceError::MissingField("rule_ast"))?;
        let record = required_record(request.user_data)?;

        let ast = from_map_within(&rule_ast, self.parser.options().max_depth)?
            .ok_or(ServiceError::MissingField("rule_ast"))?;
        let result = evaluate(&ast, &record)?;
        debug!(result, "evaluated rule");
        Ok(EvaluateRuleResponse { result })
    }

    /// Evaluate a stored rule against the data record.
    #[instrument(skip(self, request))]
    pub fn evaluate_stored_rule(
        &self,
        rule_id: RuleId,
        request: EvaluateStoredRuleRequest,
    ) -> Result<EvaluateRuleResponse, ServiceError> {
        let record = required_record(request.user_data)?;
        let stored = self
            .store
            .get(rule_id)?
            .ok_or(StoreError::NotFound(rule_id))?;
        let ast = stored.ast.ok_or(StoreError::NotFound(rule_id))?;

        let result = evaluate(&ast, &record)?;
        debug!(result, "evaluated stored rule");
        Ok(EvaluateRuleResponse { result })
    }

    /// Replace a stored rule with a new rule string.
    #[instrument(skip(self, request))]
    pub fn update_rule(
        &self,
        rule_id: RuleId,
        request: UpdateRuleRequest,
    ) -> Result<UpdateRuleResponse, ServiceError> {
        let rule = required_rule(request.rule)?;
        let ast = self.parser.parse(&rule)?;
        self.store.update(rule_id, &rule, Some(&ast))?;
        Ok(UpdateRuleResponse { rule_id })
    }

    pub fn list_rules(&self) -> Result<Vec<RuleSummary>, ServiceError> {
        Ok(self
            .store
            .list()?
            .into_iter()
            .map(|stored| RuleSummary {
                rule_id: stored.id,
                rule_ast: to_map(stored.ast.as_ref()),
                rule: stored.source,
                created_at: stored.created_at,
                modified_at: stored.modified_at,
            })
            .collect())
    }
}

fn required_rule(rule: Option<String>) -> Result<String, ServiceError> {
    rule.filter(|rule| !rule.trim().is_empty())
        .ok_or(ServiceError::MissingField("rule"))
}

fn required_record(user_data: Option<Value>) -> Result<Record, ServiceError> {
    let user_data = user_data
        .filter(|data| data.as_object().is_some_and(|object| !object.is_empty()))
        .ok_or(ServiceError::MissingField("user_data"))?;
    Ok(Record::try_from(&user_data)?)
}
