use rule_tree::{
    CombineRulesRequest, CreateRuleRequest, EvaluateRuleRequest, EvaluateStoredRuleRequest,
    MemoryRuleStore, RuleService,
};
use serde_json::json;
use tracing_subscriber::EnvFilter;

const FIRST_RULE: &str = "age > 30 AND department == 'Sales'";
const SECOND_RULE: &str = "age < 25 AND department == 'Marketing'";
const THIRD_RULE: &str = "salary >= 50000 AND experience > 5";

fn main() {
    // RUST_LOG=rule_tree=trace shows every substituted comparison
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let service = RuleService::new(MemoryRuleStore::new());

    // Store the rules
    let ids = [FIRST_RULE, SECOND_RULE, THIRD_RULE]
        .iter()
        .map(|rule| {
            service
                .create_rule(CreateRuleRequest {
                    rule: Some(rule.to_string()),
                })
                .unwrap()
                .rule_id
        })
        .collect::<Vec<_>>();

    // Evaluate each of them against an applicant
    let applicant = json!({
        "age": 32,
        "department": "Sales",
        "salary": 60000,
        "experience": 3
    });
    for id in &ids {
        let response = service
            .evaluate_stored_rule(
                *id,
                EvaluateStoredRuleRequest {
                    user_data: Some(applicant.clone()),
                },
            )
            .unwrap();
        println!("Rule {id} matches: {}", response.result);
    }

    // Combine the first two and evaluate the serialized tree
    let combined = service
        .combine_rules(CombineRulesRequest {
            rules: Some(vec![FIRST_RULE.to_string(), SECOND_RULE.to_string()]),
            connective: Some("OR".to_string()),
        })
        .unwrap()
        .combined_ast;
    println!("Combined: {combined:#}");

    let response = service
        .evaluate_rule(EvaluateRuleRequest {
            rule_ast: Some(combined),
            user_data: Some(json!({"age": 22, "department": "Marketing"})),
        })
        .unwrap();
    println!("Combined rule matches: {}", response.result);

    for rule in service.list_rules().unwrap() {
        println!("{}: {} (created at {})", rule.rule_id, rule.rule, rule.created_at);
    }
}
