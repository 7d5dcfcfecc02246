use crate::utilization::{DEFAULT_WEEKLY_CAPACITY, effective_capacity, parse_capacity};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A person (or bookable unit) whose weekly hours are allocated to projects.
///
/// Records are normalized once at ingestion: capacity is numeric, flags are
/// booleans and skills are always a list of trimmed, non-empty strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawResource")]
pub struct Resource {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    /// Hours per week, after defaulting.
    pub weekly_capacity: f64,
    pub is_active: bool,
    pub is_deleted: bool,
    pub skills: Vec<String>,
}

impl Resource {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role: None,
            department: None,
            weekly_capacity: DEFAULT_WEEKLY_CAPACITY,
            is_active: true,
            is_deleted: false,
            skills: Vec::new(),
        }
    }

    /// Active and not soft-deleted.
    pub fn is_available(&self) -> bool {
        self.is_active && !self.is_deleted
    }
}

/// Wire shape accepted from the REST layer. Every field is loosely typed, and
/// each spelling of a field is kept apart so that a record carrying two of
/// them still decodes.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawResource {
    id: Value,
    name: Value,
    role: Value,
    department: Value,
    #[serde(rename = "weeklyCapacity")]
    weekly_capacity_camel: Value,
    weekly_capacity: Value,
    capacity: Value,
    #[serde(rename = "isActive")]
    is_active_camel: Value,
    is_active: Value,
    active: Value,
    #[serde(rename = "isDeleted")]
    is_deleted_camel: Value,
    is_deleted: Value,
    deleted: Value,
    skills: Value,
}

impl From<RawResource> for Resource {
    fn from(raw: RawResource) -> Self {
        let capacity =
            first_present([raw.weekly_capacity_camel, raw.weekly_capacity, raw.capacity]);
        let is_active = first_present([raw.is_active_camel, raw.is_active, raw.active]);
        let is_deleted = first_present([raw.is_deleted_camel, raw.is_deleted, raw.deleted]);
        Self {
            id: value_to_string(&raw.id).unwrap_or_default(),
            name: value_to_string(&raw.name).unwrap_or_default(),
            role: value_to_string(&raw.role).filter(|s| !s.is_empty()),
            department: value_to_string(&raw.department).filter(|s| !s.is_empty()),
            weekly_capacity: capacity_from_value(&capacity),
            is_active: coerce_flag(&is_active, true),
            is_deleted: coerce_flag(&is_deleted, false),
            skills: normalize_skills(&raw.skills),
        }
    }
}

/// First non-null candidate, in precedence order.
pub(crate) fn first_present<const N: usize>(candidates: [Value; N]) -> Value {
    candidates
        .into_iter()
        .find(|value| !value.is_null())
        .unwrap_or(Value::Null)
}

/// Normalizes the skills field, which upstream sends either as a
/// comma-joined string or as a list.
pub fn normalize_skills(value: &Value) -> Vec<String> {
    match value {
        Value::String(joined) => split_skills(joined),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToOwned::to_owned)
            .collect(),
        _ => Vec::new(),
    }
}

pub fn split_skills(joined: &str) -> Vec<String> {
    joined
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Coerces a loosely-typed flag. `Null` (or absent) yields `default`;
/// anything unrecognised is `false`.
pub fn coerce_flag(value: &Value, default: bool) -> bool {
    match value {
        Value::Null => default,
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::String(s) => parse_flag(s).unwrap_or(false),
        _ => false,
    }
}

pub(crate) fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => Some(true),
        "false" | "0" | "no" | "n" => Some(false),
        _ => None,
    }
}

fn capacity_from_value(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n
            .as_f64()
            .map(effective_capacity)
            .unwrap_or(DEFAULT_WEEKLY_CAPACITY),
        Value::String(s) => parse_capacity(Some(s)),
        _ => DEFAULT_WEEKLY_CAPACITY,
    }
}

pub(crate) fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flags_from_strings_and_numbers() {
        assert!(coerce_flag(&json!("yes"), false));
        assert!(!coerce_flag(&json!("nope"), true));
        assert!(coerce_flag(&json!(1), false));
        assert!(coerce_flag(&Value::Null, true));
        assert!(!coerce_flag(&json!([true]), true));
    }

    #[test]
    fn numeric_id_becomes_string() {
        let resource: Resource = serde_json::from_value(json!({ "id": 7, "name": "Ana" })).unwrap();
        assert_eq!(resource.id, "7");
        assert_eq!(resource.weekly_capacity, DEFAULT_WEEKLY_CAPACITY);
        assert!(resource.is_active);
        assert!(!resource.is_deleted);
    }
}
