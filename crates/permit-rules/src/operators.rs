//! # Condition Operators
//!
//! Compares a fact value with a condition value. Every operator is total:
//! operands of the wrong shape make the comparison false rather than
//! failing the evaluation.
//!
//! Numbers compare by value, so `30` equals `30.0`. Dates are
//! `YYYY-MM-DD` strings, optionally followed by a time part.

use serde_json::Value;

use permit_core::{parse_date, Operator};

/// Apply `operator` to a fact value and a condition value.
pub fn apply(operator: Operator, fact: &Value, value: &Value) -> bool {
    match operator {
        Operator::Equal => loose_eq(fact, value),
        Operator::NotEqual => !loose_eq(fact, value),
        Operator::LessThan => numeric(fact, value, |a, b| a < b),
        Operator::LessThanInclusive => numeric(fact, value, |a, b| a <= b),
        Operator::GreaterThan => numeric(fact, value, |a, b| a > b),
        Operator::GreaterThanInclusive => numeric(fact, value, |a, b| a >= b),
        Operator::In => value
            .as_array()
            .is_some_and(|items| items.iter().any(|i| loose_eq(fact, i))),
        Operator::NotIn => value
            .as_array()
            .is_some_and(|items| !items.iter().any(|i| loose_eq(fact, i))),
        Operator::Contains => contains(fact, value).unwrap_or(false),
        Operator::DoesNotContain => contains(fact, value).is_some_and(|c| !c),
        Operator::DateLessThan => dates(fact, value, |a, b| a < b),
        Operator::DateGreaterThan => dates(fact, value, |a, b| a > b),
        Operator::StringMinimumLength => string_length(fact, value, |len, n| len >= n),
        Operator::StringMaximumLength => string_length(fact, value, |len, n| len <= n),
    }
}

/// JSON equality with numbers compared by value.
pub fn loose_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| loose_eq(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(k, x)| ys.get(k).is_some_and(|y| loose_eq(x, y)))
        }
        _ => a == b,
    }
}

fn numeric(fact: &Value, value: &Value, cmp: impl Fn(f64, f64) -> bool) -> bool {
    match (fact.as_f64(), value.as_f64()) {
        (Some(a), Some(b)) => cmp(a, b),
        _ => false,
    }
}

/// `None` when the fact cannot contain anything.
fn contains(fact: &Value, value: &Value) -> Option<bool> {
    match fact {
        Value::Array(items) => Some(items.iter().any(|i| loose_eq(i, value))),
        Value::String(s) => value.as_str().map(|needle| s.contains(needle)),
        _ => None,
    }
}

fn dates(
    fact: &Value,
    value: &Value,
    cmp: impl Fn(chrono::NaiveDate, chrono::NaiveDate) -> bool,
) -> bool {
    let fact = fact.as_str().and_then(parse_date);
    let value = value.as_str().and_then(parse_date);
    match (fact, value) {
        (Some(a), Some(b)) => cmp(a, b),
        _ => false,
    }
}

fn string_length(fact: &Value, value: &Value, cmp: impl Fn(u64, u64) -> bool) -> bool {
    match (fact.as_str(), value.as_u64()) {
        (Some(s), Some(n)) => cmp(s.chars().count() as u64, n),
        _ => false,
    }
}
