//! # Declarative Rule Definitions
//!
//! Rules, cost rules and permit-condition requirements as written in the
//! policy document. A rule pairs a condition tree over named facts with an
//! event; the event fires when the condition tree holds.
//!
//! ```json
//! {
//!   "conditions": { "all": [
//!     { "fact": "permitData", "path": "$.startDate",
//!       "operator": "dateLessThan", "value": { "fact": "validationDate" } }
//!   ] },
//!   "event": { "type": "violation",
//!              "params": { "message": "Permit start date cannot be in the past",
//!                          "code": "field-validation-error",
//!                          "fieldReference": "permitData.startDate" } }
//! }
//! ```
//!
//! Evaluation lives in `permit-rules`; this module is pure data.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A declarative rule: condition tree plus the event it produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    /// Condition tree; the event fires when it holds.
    pub conditions: Condition,
    /// Event produced when the conditions hold.
    pub event: RuleEvent,
}

/// A node of a condition tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Condition {
    /// Holds when every child holds (vacuously true when empty).
    All {
        /// Child conditions.
        all: Vec<Condition>,
    },
    /// Holds when at least one child holds.
    Any {
        /// Child conditions.
        any: Vec<Condition>,
    },
    /// Holds when the child does not.
    Not {
        /// Negated condition.
        not: Box<Condition>,
    },
    /// Compares a fact against a value.
    Fact(FactCondition),
}

/// Leaf condition comparing a fact (optionally narrowed by a path) with a
/// value. The value may itself be a fact reference of the form
/// `{ "fact": "<name>", "path": "<path>" }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactCondition {
    /// Fact name.
    pub fact: String,
    /// Comparison operator.
    pub operator: Operator,
    /// Comparison value or fact reference.
    #[serde(default)]
    pub value: Value,
    /// Path into the fact value, e.g. `$.vehicleDetails.vehicleSubType`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Parameters passed to parameterised facts (cost facts).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Map<String, Value>>,
}

/// Comparison operators available to fact conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operator {
    /// Strict equality.
    Equal,
    /// Strict inequality.
    NotEqual,
    /// Numeric `<`.
    LessThan,
    /// Numeric `<=`.
    LessThanInclusive,
    /// Numeric `>`.
    GreaterThan,
    /// Numeric `>=`.
    GreaterThanInclusive,
    /// Fact value is an element of the value array.
    In,
    /// Fact value is not an element of the value array.
    NotIn,
    /// Fact array contains the value.
    Contains,
    /// Fact array does not contain the value.
    DoesNotContain,
    /// Fact date is strictly before the value date.
    DateLessThan,
    /// Fact date is strictly after the value date.
    DateGreaterThan,
    /// Fact string has at least `value` characters.
    StringMinimumLength,
    /// Fact string has at most `value` characters.
    StringMaximumLength,
}

/// Event produced by a rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleEvent {
    /// Finding type: `violation`, `warning`, `requirement`, `information`
    /// or `cost`. Unrecognized types are reported as violations.
    #[serde(rename = "type")]
    pub event_type: String,
    /// Event payload.
    #[serde(default)]
    pub params: EventParams,
}

/// Payload of a rule event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventParams {
    /// Human-readable message.
    #[serde(default)]
    pub message: String,
    /// Machine-readable code.
    #[serde(default)]
    pub code: String,
    /// Application field the finding refers to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_reference: Option<String>,
    /// Amount carried by cost events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
}

/// A fee computation: a named cost fact and its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostRule {
    /// Cost fact name, e.g. `costPerMonth`.
    pub fact: String,
    /// Parameters handed to the cost fact.
    #[serde(default)]
    pub params: Map<String, Value>,
}

/// A permit condition that applies to issued permits of a type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionRequirement {
    /// Condition code, e.g. `CVSE-1000`.
    pub condition: String,
    /// Description shown on the permit.
    pub description: String,
    /// Link to the full condition text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition_link: Option<String>,
    /// When present, the condition applies only if this tree holds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Condition>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_condition_tree_deserializes() {
        let json = r#"{
            "all": [
                { "fact": "permitData", "path": "$.permitDuration",
                  "operator": "greaterThan", "value": 30 },
                { "any": [
                    { "fact": "configurationIsValid", "operator": "equal", "value": false },
                    { "not": { "fact": "permitType", "operator": "in", "value": ["TROS"] } }
                ] }
            ]
        }"#;
        let condition: Condition = serde_json::from_str(json).unwrap();
        let Condition::All { all } = condition else {
            panic!("expected all node");
        };
        assert_eq!(all.len(), 2);
        assert!(matches!(&all[0], Condition::Fact(f) if f.operator == Operator::GreaterThan));
        assert!(matches!(&all[1], Condition::Any { any } if any.len() == 2));
    }

    #[test]
    fn event_params_default_when_absent() {
        let event: RuleEvent = serde_json::from_str(r#"{"type":"warning"}"#).unwrap();
        assert_eq!(event.event_type, "warning");
        assert!(event.params.message.is_empty());
        assert!(event.params.field_reference.is_none());
    }

    #[test]
    fn operator_spelling() {
        let op: Operator = serde_json::from_str(r#""lessThanInclusive""#).unwrap();
        assert_eq!(op, Operator::LessThanInclusive);
        let op: Operator = serde_json::from_str(r#""dateGreaterThan""#).unwrap();
        assert_eq!(op, Operator::DateGreaterThan);
    }
}
