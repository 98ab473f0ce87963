//! # Condition Evaluation
//!
//! Evaluates condition trees against a [`Facts`] environment. `all` of no
//! children holds and `any` of no children does not. A leaf resolves its
//! fact, narrows it by `path` when one is given, resolves its value (which
//! may itself be a fact reference) and applies its operator.

use serde_json::Value;

use permit_core::{Condition, FactCondition};

use crate::facts::Facts;
use crate::operators;
use crate::path;

/// Whether `condition` holds under `facts`.
pub fn holds(condition: &Condition, facts: &Facts<'_>) -> bool {
    match condition {
        Condition::All { all } => all.iter().all(|c| holds(c, facts)),
        Condition::Any { any } => any.iter().any(|c| holds(c, facts)),
        Condition::Not { not } => !holds(not, facts),
        Condition::Fact(leaf) => leaf_holds(leaf, facts),
    }
}

fn leaf_holds(leaf: &FactCondition, facts: &Facts<'_>) -> bool {
    let fact = narrow(facts.value(&leaf.fact, leaf.params.as_ref()), leaf.path.as_deref());
    let value = match fact_reference(&leaf.value) {
        Some((name, reference_path)) => narrow(facts.value(name, None), reference_path),
        None => leaf.value.clone(),
    };
    operators::apply(leaf.operator, &fact, &value)
}

fn narrow(value: Value, path: Option<&str>) -> Value {
    match path {
        Some(p) => path::resolve_or_null(&value, p),
        None => value,
    }
}

/// `{ "fact": name, "path"?: path }` as a fact reference. Any other key
/// makes the object a literal.
fn fact_reference(value: &Value) -> Option<(&str, Option<&str>)> {
    let object = value.as_object()?;
    let name = object.get("fact")?.as_str()?;
    if object.keys().any(|k| k != "fact" && k != "path") {
        return None;
    }
    let reference_path = match object.get("path") {
        Some(p) => Some(p.as_str()?),
        None => None,
    };
    Some((name, reference_path))
}
