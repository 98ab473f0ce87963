//! # Compiled Rule Sets
//!
//! One [`CompiledRuleSet`] per permit type, built once from the policy
//! document: the common rules followed by the permit type's own rules, its
//! cost rules and its permit conditions. A compiled set is immutable; every
//! evaluation supplies its own [`Facts`].
//!
//! ## Evaluation
//!
//! 1. Each rule whose condition tree holds emits its event, routed by event
//!    type to the matching result bucket. Unknown event types are reported
//!    as violations.
//! 2. Each cost rule appends one cost finding with the computed amount.
//! 3. Under a no-fee authorization the cost bucket is replaced by a single
//!    zero-cost finding, and an information finding records the total that
//!    would have been charged.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use permit_core::rule::RuleEvent;
use permit_core::{
    ConditionRequirement, PermitType, PolicyDefinition, Rule, ValidationResult,
    ValidationResultType, ValidationResults,
};

use crate::condition::holds;
use crate::cost::CostFact;
use crate::facts::Facts;

/// Code of computed cost findings.
pub const COST_CODE: &str = "cost-value";
/// Message of computed cost findings.
pub const COST_MESSAGE: &str = "Calculated permit cost";
/// Code of the information finding recording a waived fee.
pub const NO_FEE_CODE: &str = "no-fee-authorization";

/// A cost rule with its cost fact resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledCostRule {
    /// The fee computation.
    pub fact: CostFact,
    /// Parameters handed to it.
    pub params: Map<String, Value>,
}

/// The rules, cost rules and conditions of one permit type.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledRuleSet {
    permit_type_id: String,
    rules: Vec<Rule>,
    cost_rules: Vec<CompiledCostRule>,
    conditions: Vec<ConditionRequirement>,
}

impl CompiledRuleSet {
    /// Compile the rule set of `permit_type`. Cost rules naming an unknown
    /// cost fact are dropped with a warning.
    pub fn compile(policy: &PolicyDefinition, permit_type: &PermitType) -> Self {
        let rules: Vec<Rule> = policy
            .common_rules
            .iter()
            .chain(&permit_type.rules)
            .cloned()
            .collect();

        let cost_rules: Vec<CompiledCostRule> = permit_type
            .cost_rules
            .iter()
            .filter_map(|rule| match CostFact::from_name(&rule.fact) {
                Some(fact) => Some(CompiledCostRule {
                    fact,
                    params: rule.params.clone(),
                }),
                None => {
                    tracing::warn!(
                        permit_type = %permit_type.id,
                        fact = %rule.fact,
                        "unknown cost fact, cost rule ignored"
                    );
                    None
                }
            })
            .collect();

        tracing::debug!(
            permit_type = %permit_type.id,
            rules = rules.len(),
            cost_rules = cost_rules.len(),
            conditions = permit_type.conditions.len(),
            "compiled rule set"
        );

        Self {
            permit_type_id: permit_type.id.clone(),
            rules,
            cost_rules,
            conditions: permit_type.conditions.clone(),
        }
    }

    /// Compile every permit type of `policy`, keyed by permit type id.
    pub fn compile_all(policy: &PolicyDefinition) -> BTreeMap<String, CompiledRuleSet> {
        policy
            .permit_types
            .iter()
            .map(|pt| (pt.id.clone(), Self::compile(policy, pt)))
            .collect()
    }

    /// Id of the permit type this rule set was compiled for.
    pub fn permit_type_id(&self) -> &str {
        &self.permit_type_id
    }

    /// Common rules first, then the permit type's rules.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Cost rules, in document order.
    pub fn cost_rules(&self) -> &[CompiledCostRule] {
        &self.cost_rules
    }

    /// Evaluate the rule set. `no_fee_type` is the no-fee authorization in
    /// force, if any.
    pub fn evaluate(&self, facts: &Facts<'_>, no_fee_type: Option<&str>) -> ValidationResults {
        let mut results = ValidationResults::new();

        for rule in &self.rules {
            if holds(&rule.conditions, facts) {
                results.push(finding(&self.permit_type_id, &rule.event));
            }
        }

        for cost_rule in &self.cost_rules {
            let amount = cost_rule.fact.compute(&cost_rule.params, facts);
            results.push(ValidationResult::cost(COST_CODE, COST_MESSAGE, amount));
        }

        if let Some(no_fee_type) = no_fee_type {
            waive_fees(&mut results, no_fee_type);
        }

        tracing::debug!(
            permit_type = %self.permit_type_id,
            violations = results.violations.len(),
            requirements = results.requirements.len(),
            warnings = results.warnings.len(),
            information = results.information.len(),
            cost = results.total_cost(),
            "evaluated permit application"
        );
        results
    }

    /// Permit conditions applying under `facts`: unconditional ones, and
    /// those whose condition tree holds. Document order is preserved.
    pub fn applicable_conditions(&self, facts: &Facts<'_>) -> Vec<&ConditionRequirement> {
        self.conditions
            .iter()
            .filter(|c| c.conditions.as_ref().map_or(true, |tree| holds(tree, facts)))
            .collect()
    }
}

fn finding(permit_type_id: &str, event: &RuleEvent) -> ValidationResult {
    let result_type =
        ValidationResultType::from_event_type(&event.event_type).unwrap_or_else(|| {
            tracing::warn!(
                permit_type = %permit_type_id,
                event_type = %event.event_type,
                code = %event.params.code,
                "unknown event type, reporting as violation"
            );
            ValidationResultType::Violation
        });
    ValidationResult {
        result_type,
        code: event.params.code.clone(),
        message: event.params.message.clone(),
        field_reference: event.params.field_reference.clone(),
        cost: event.params.cost,
    }
}

/// Replace the cost bucket with one zero-cost finding and record the
/// waived total as information.
pub fn waive_fees(results: &mut ValidationResults, no_fee_type: &str) {
    let waived = results.total_cost();
    results.cost = vec![ValidationResult::cost(COST_CODE, COST_MESSAGE, 0.0)];
    results.push(ValidationResult::information(
        NO_FEE_CODE,
        format!("No fee applies under {no_fee_type} authorization; calculated cost was {waived:.2}"),
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use permit_core::fixtures::{sample_policy, ApplicationBuilder};
    use permit_core::PermitApplication;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 2, 1).unwrap()
    }

    fn evaluate(policy: &PolicyDefinition, app: &PermitApplication) -> ValidationResults {
        let permit_type = policy.permit_type(&app.permit_type).unwrap();
        let set = CompiledRuleSet::compile(policy, permit_type);
        let facts = Facts::new(policy, permit_type, app, day(), false);
        set.evaluate(&facts, None)
    }

    // ── Compilation ──────────────────────────────────────────────────

    #[test]
    fn common_rules_precede_permit_type_rules() {
        let policy = sample_policy().unwrap();
        let tros = policy.permit_type("TROS").unwrap();
        let set = CompiledRuleSet::compile(&policy, tros);
        assert_eq!(set.rules().len(), policy.common_rules.len() + tros.rules.len());
        assert_eq!(set.rules()[0], policy.common_rules[0]);
        assert_eq!(set.rules().last(), tros.rules.last());
        assert_eq!(set.cost_rules()[0].fact, CostFact::CostPerMonth);
    }

    #[test]
    fn every_permit_type_is_compiled() {
        let policy = sample_policy().unwrap();
        let sets = CompiledRuleSet::compile_all(&policy);
        assert_eq!(sets.len(), policy.permit_types.len());
        assert_eq!(sets["STOS"].permit_type_id(), "STOS");
    }

    #[test]
    fn unknown_cost_fact_is_dropped() {
        let mut policy = sample_policy().unwrap();
        policy.permit_types[0].cost_rules.push(permit_core::CostRule {
            fact: "costPerFortnight".into(),
            params: Map::new(),
        });
        let set = CompiledRuleSet::compile(&policy, &policy.permit_types[0]);
        assert_eq!(set.cost_rules().len(), policy.permit_types[0].cost_rules.len() - 1);
    }

    // ── Evaluation ───────────────────────────────────────────────────

    #[test]
    fn compliant_term_permit() {
        let policy = sample_policy().unwrap();
        let app = ApplicationBuilder::new("TROS")
            .start_date("2025-02-01")
            .duration(30)
            .vehicles(&["TRKTRAC", "SEMITRL"])
            .build();
        let results = evaluate(&policy, &app);
        assert!(results.is_valid(), "{:?}", results.violations);
        assert_eq!(results.cost.len(), 1);
        assert_eq!(results.cost[0].code, COST_CODE);
        assert_eq!(results.total_cost(), 30.0);
    }

    #[test]
    fn findings_are_routed_by_event_type() {
        let policy = sample_policy().unwrap();
        let app = ApplicationBuilder::new("STOS")
            .start_date("2025-01-15")
            .duration(10)
            .commodity("EMPTYXX")
            .vehicles(&["TRKTRAC", "JEEPSRT", "FLOATTR"])
            .build();
        let results = evaluate(&policy, &app);

        let messages: Vec<&str> = results.violations.iter().map(|v| v.message.as_str()).collect();
        assert_eq!(
            messages,
            vec!["Permit start date cannot be in the past", "Duration must be 7 days or less"]
        );
        assert_eq!(results.requirements.len(), 1);
        assert_eq!(results.requirements[0].code, "route-required");
        assert_eq!(results.information.len(), 1);
        assert_eq!(results.information[0].code, "pilot-car-advisory");
        assert_eq!(results.total_cost(), 15.0);
    }

    #[test]
    fn unknown_event_type_is_a_violation() {
        let mut policy = sample_policy().unwrap();
        let rule: Rule = serde_json::from_value(serde_json::json!({
            "conditions": { "all": [] },
            "event": { "type": "notice", "params": { "message": "always", "code": "odd" } }
        }))
        .unwrap();
        policy.common_rules.push(rule);
        let app = ApplicationBuilder::new("STWS").build();
        let results = evaluate(&policy, &app);
        assert!(results
            .violations
            .iter()
            .any(|v| v.code == "odd" && v.result_type == ValidationResultType::Violation));
    }

    #[test]
    fn cost_events_carry_their_amount() {
        let mut policy = sample_policy().unwrap();
        let rule: Rule = serde_json::from_value(serde_json::json!({
            "conditions": { "all": [] },
            "event": { "type": "cost", "params": { "message": "surcharge", "code": "surcharge", "cost": 12.5 } }
        }))
        .unwrap();
        policy.common_rules.push(rule);
        let app = ApplicationBuilder::new("STWS").build();
        let results = evaluate(&policy, &app);
        assert_eq!(results.cost.len(), 2);
        assert_eq!(results.total_cost(), 42.5);
    }

    // ── No fee ───────────────────────────────────────────────────────

    #[test]
    fn no_fee_replaces_cost_bucket() {
        let policy = sample_policy().unwrap();
        let app = ApplicationBuilder::new("STOS")
            .start_date("2025-02-01")
            .route_field("routeType", "RETURN")
            .build();
        let stos = policy.permit_type("STOS").unwrap();
        let set = CompiledRuleSet::compile(&policy, stos);
        let facts = Facts::new(&policy, stos, &app, day(), false);

        let charged = set.evaluate(&facts, None);
        assert_eq!(charged.total_cost(), 30.0);

        let waived = set.evaluate(&facts, Some("SCHOOL"));
        assert_eq!(waived.cost.len(), 1);
        assert_eq!(waived.cost[0].cost, Some(0.0));
        let note = waived
            .information
            .iter()
            .find(|i| i.code == NO_FEE_CODE)
            .unwrap();
        assert!(note.message.contains("30.00"));
        assert!(note.message.contains("SCHOOL"));
    }

    // ── Conditions ───────────────────────────────────────────────────

    #[test]
    fn conditional_permit_conditions() {
        let policy = sample_policy().unwrap();
        let tros = policy.permit_type("TROS").unwrap();
        let set = CompiledRuleSet::compile(&policy, tros);

        let float = ApplicationBuilder::new("TROS").vehicles(&["TRKTRAC", "FLOATTR"]).build();
        let facts = Facts::new(&policy, tros, &float, day(), false);
        let codes: Vec<&str> = set
            .applicable_conditions(&facts)
            .iter()
            .map(|c| c.condition.as_str())
            .collect();
        assert_eq!(codes, vec!["CVSE-1000", "CVSE-1070"]);

        let semi = ApplicationBuilder::new("TROS").vehicles(&["TRKTRAC", "SEMITRL"]).build();
        let facts = Facts::new(&policy, tros, &semi, day(), false);
        assert_eq!(set.applicable_conditions(&facts).len(), 1);
    }
}
