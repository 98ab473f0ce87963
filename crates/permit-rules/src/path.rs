//! # Value Paths
//!
//! Addresses values inside JSON documents. Two spellings are accepted:
//!
//! - condition paths, rooted at the fact value: `$.vehicleConfiguration.trailers[0].vehicleSubType`;
//! - field references, rooted at the application: `permitData.permittedRoute.routeType`.
//!
//! Both are a dot-separated list of keys, each optionally followed by one
//! or more `[index]` suffixes. A missing key, an out-of-range index or a
//! malformed segment resolves to nothing.

use serde_json::Value;

/// Resolve `path` within `root`. `None` means the path addresses nothing.
pub fn resolve<'v>(root: &'v Value, path: &str) -> Option<&'v Value> {
    let path = path.trim();
    let path = path
        .strip_prefix("$.")
        .or_else(|| path.strip_prefix('$'))
        .unwrap_or(path);
    if path.is_empty() {
        return Some(root);
    }
    path.split('.').try_fold(root, step)
}

/// Resolve `path` within `root`, yielding `null` when it addresses nothing.
pub fn resolve_or_null(root: &Value, path: &str) -> Value {
    resolve(root, path).cloned().unwrap_or(Value::Null)
}

fn step<'v>(current: &'v Value, segment: &str) -> Option<&'v Value> {
    let (key, mut indices) = match segment.find('[') {
        Some(open) => (&segment[..open], &segment[open..]),
        None => (segment, ""),
    };
    let mut value = if key.is_empty() {
        current
    } else {
        current.as_object()?.get(key)?
    };
    while !indices.is_empty() {
        let rest = indices.strip_prefix('[')?;
        let close = rest.find(']')?;
        let index: usize = rest[..close].trim().parse().ok()?;
        value = value.as_array()?.get(index)?;
        indices = &rest[close + 1..];
    }
    Some(value)
}
