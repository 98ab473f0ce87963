//! # Cost Facts
//!
//! Named fee computations invoked by cost rules (and callable as facts from
//! rule conditions). Each takes the rule's `params` and the evaluation's
//! [`Facts`]:
//!
//! | Fact                   | Params                                 | Amount                                       |
//! |------------------------|----------------------------------------|----------------------------------------------|
//! | `fixedCost`            | `cost`                                 | `cost`                                       |
//! | `conditionalFixedCost` | `fieldReference`, `fieldValue`, `cost` | `cost` if the field equals the value, else 0 |
//! | `costPerMonth`         | `cost`                                 | `cost × months` (30-day months, rounded up)  |
//! | `costPerKilometre`     | `cost`, `minimum`                      | `max(cost × distance, minimum)`              |
//! | `rangeMatrixLookup`    | `matrix`, `fieldReference`             | value of the matching matrix row, else 0     |
//!
//! A duration equal to `daysInPermitYear` is billed as exactly 12 months.

use serde_json::{Map, Value};

use crate::facts::Facts;
use crate::operators::loose_eq;
use crate::path;

const PERMIT_DURATION: &str = "permitData.permitDuration";
const TOTAL_DISTANCE: &str = "permitData.permittedRoute.manualRoute.totalDistance";

/// A named cost computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CostFact {
    /// A constant amount.
    FixedCost,
    /// A constant amount when an application field has a given value.
    ConditionalFixedCost,
    /// A monthly rate over the permit duration.
    CostPerMonth,
    /// A per-kilometre rate over the route distance, with a floor.
    CostPerKilometre,
    /// An amount looked up in a range matrix by an application field.
    RangeMatrixLookup,
}

impl CostFact {
    /// All cost facts.
    pub fn all() -> &'static [CostFact] {
        &[
            Self::FixedCost,
            Self::ConditionalFixedCost,
            Self::CostPerMonth,
            Self::CostPerKilometre,
            Self::RangeMatrixLookup,
        ]
    }

    /// The cost fact called `name` in rule documents.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|f| f.name() == name)
    }

    /// The name used in rule documents.
    pub fn name(self) -> &'static str {
        match self {
            Self::FixedCost => "fixedCost",
            Self::ConditionalFixedCost => "conditionalFixedCost",
            Self::CostPerMonth => "costPerMonth",
            Self::CostPerKilometre => "costPerKilometre",
            Self::RangeMatrixLookup => "rangeMatrixLookup",
        }
    }

    /// Compute the amount for `params` against `facts`. Missing or
    /// non-numeric inputs contribute nothing.
    pub fn compute(self, params: &Map<String, Value>, facts: &Facts<'_>) -> f64 {
        let cost = number(params, "cost").unwrap_or(0.0);
        match self {
            Self::FixedCost => cost,
            Self::ConditionalFixedCost => {
                let field = params
                    .get("fieldReference")
                    .and_then(Value::as_str)
                    .and_then(|reference| path::resolve(facts.application(), reference));
                let expected = params.get("fieldValue").unwrap_or(&Value::Null);
                match field {
                    Some(actual) if loose_eq(actual, expected) => cost,
                    _ => 0.0,
                }
            }
            Self::CostPerMonth => {
                let duration = path::resolve(facts.application(), PERMIT_DURATION)
                    .and_then(Value::as_f64)
                    .unwrap_or(0.0);
                cost * billable_months(duration, facts.days_in_permit_year())
            }
            Self::CostPerKilometre => {
                let distance = path::resolve(facts.application(), TOTAL_DISTANCE)
                    .and_then(Value::as_f64)
                    .unwrap_or(0.0);
                let minimum = number(params, "minimum").unwrap_or(0.0);
                (cost * distance).max(minimum)
            }
            Self::RangeMatrixLookup => range_matrix_lookup(params, facts),
        }
    }
}

/// Months billed for a duration of `days`: 12 for a full permit year,
/// otherwise one per started 30-day period.
pub fn billable_months(days: f64, days_in_permit_year: i64) -> f64 {
    if days <= 0.0 {
        0.0
    } else if days == days_in_permit_year as f64 {
        12.0
    } else {
        (days / 30.0).ceil()
    }
}

fn range_matrix_lookup(params: &Map<String, Value>, facts: &Facts<'_>) -> f64 {
    let Some(matrix_id) = params.get("matrix").and_then(Value::as_str) else {
        tracing::warn!("rangeMatrixLookup without a matrix parameter");
        return 0.0;
    };
    let Some(matrix) = facts.policy().range_matrix(matrix_id) else {
        tracing::warn!(matrix = %matrix_id, "unknown range matrix");
        return 0.0;
    };
    let input = params
        .get("fieldReference")
        .and_then(Value::as_str)
        .and_then(|reference| path::resolve(facts.application(), reference))
        .and_then(Value::as_f64);
    let Some(input) = input else {
        tracing::debug!(matrix = %matrix_id, "range matrix input missing");
        return 0.0;
    };
    matrix.lookup(input).unwrap_or_else(|| {
        tracing::warn!(matrix = %matrix_id, input, "no range matrix row matches");
        0.0
    })
}

fn number(params: &Map<String, Value>, key: &str) -> Option<f64> {
    params.get(key).and_then(Value::as_f64)
}
