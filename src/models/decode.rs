//! Field lookup over loosely-typed backend records.
//!
//! Each entity declares, per canonical field, the list of names the backend
//! has been seen to use. Lookups try them in order and fall back to the
//! zero/empty default, so a malformed record never aborts a list render.
//! Aliases may be dotted paths into nested objects (`barber.name`).

use serde_json::Value;

pub type Aliases = &'static [&'static str];

fn lookup<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(record, |node, key| node.get(key))
        .filter(|v| !v.is_null())
}

/// First non-null value among the aliases.
pub fn field<'a>(record: &'a Value, aliases: Aliases) -> Option<&'a Value> {
    aliases.iter().find_map(|path| lookup(record, path))
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

pub fn opt_text(record: &Value, aliases: Aliases) -> Option<String> {
    aliases
        .iter()
        .filter_map(|path| lookup(record, path))
        .find_map(as_text)
}

pub fn text(record: &Value, aliases: Aliases) -> String {
    opt_text(record, aliases).unwrap_or_default()
}

pub fn opt_number(record: &Value, aliases: Aliases) -> Option<f64> {
    aliases
        .iter()
        .filter_map(|path| lookup(record, path))
        .find_map(as_number)
        .filter(|n| n.is_finite())
}

pub fn number(record: &Value, aliases: Aliases) -> f64 {
    opt_number(record, aliases).unwrap_or(0.0)
}

pub fn opt_integer(record: &Value, aliases: Aliases) -> Option<i64> {
    opt_number(record, aliases).map(|n| n.round() as i64)
}

pub fn integer(record: &Value, aliases: Aliases) -> i64 {
    opt_integer(record, aliases).unwrap_or(0)
}

pub fn flag(record: &Value, aliases: Aliases) -> bool {
    match field(record, aliases) {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(s)) => matches!(s.trim().to_lowercase().as_str(), "true" | "1" | "si" | "sí" | "yes"),
        _ => false,
    }
}

/// Array under the first matching alias; anything else is an empty list.
pub fn list<'a>(record: &'a Value, aliases: Aliases) -> &'a [Value] {
    aliases
        .iter()
        .filter_map(|path| lookup(record, path))
        .find_map(|v| v.as_array())
        .map(Vec::as_slice)
        .unwrap_or(&[])
}
