use crate::resource::{first_present, value_to_string};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Hours a resource is booked on a project. Serializes as a bare number or a
/// week map; decoding happens on [`Allocation`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AllocationHours {
    /// Hours per week, applying to every week.
    Flat(f64),
    /// Hours keyed by ISO week (`YYYY-Www`).
    Weekly(BTreeMap<String, f64>),
}

impl Default for AllocationHours {
    fn default() -> Self {
        AllocationHours::Flat(0.0)
    }
}

impl AllocationHours {
    pub fn for_week(&self, week_key: &str) -> f64 {
        match self {
            AllocationHours::Flat(hours) => *hours,
            AllocationHours::Weekly(by_week) => by_week.get(week_key).copied().unwrap_or(0.0),
        }
    }

    /// Flat hours, or the sum across all recorded weeks.
    pub fn total(&self) -> f64 {
        match self {
            AllocationHours::Flat(hours) => *hours,
            AllocationHours::Weekly(by_week) => by_week.values().sum(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawAllocation")]
pub struct Allocation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub resource_id: String,
    pub project_id: String,
    pub hours: AllocationHours,
}

impl Allocation {
    pub fn flat(resource_id: impl Into<String>, project_id: impl Into<String>, hours: f64) -> Self {
        Self {
            id: None,
            resource_id: resource_id.into(),
            project_id: project_id.into(),
            hours: AllocationHours::Flat(sanitize(hours)),
        }
    }

    pub fn weekly<I, K>(resource_id: impl Into<String>, project_id: impl Into<String>, weeks: I) -> Self
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        let by_week = weeks
            .into_iter()
            .map(|(key, hours)| (key.into(), sanitize(hours)))
            .collect();
        Self {
            id: None,
            resource_id: resource_id.into(),
            project_id: project_id.into(),
            hours: AllocationHours::Weekly(by_week),
        }
    }

    pub fn hours_for_week(&self, week_key: &str) -> f64 {
        self.hours.for_week(week_key)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawAllocation {
    id: Value,
    #[serde(rename = "resourceId")]
    resource_id_camel: Value,
    resource_id: Value,
    #[serde(rename = "projectId")]
    project_id_camel: Value,
    project_id: Value,
    #[serde(rename = "weeklyHours")]
    weekly_hours_camel: Value,
    weekly_hours: Value,
    hours: Value,
    #[serde(rename = "allocatedHours")]
    allocated_hours_camel: Value,
    allocated_hours: Value,
}

impl From<RawAllocation> for Allocation {
    fn from(raw: RawAllocation) -> Self {
        let resource_id = first_present([raw.resource_id_camel, raw.resource_id]);
        let project_id = first_present([raw.project_id_camel, raw.project_id]);
        let hours = hours_from_candidates([
            raw.weekly_hours_camel,
            raw.weekly_hours,
            raw.hours,
            raw.allocated_hours_camel,
            raw.allocated_hours,
        ]);
        Self {
            id: value_to_string(&raw.id),
            resource_id: value_to_string(&resource_id).unwrap_or_default(),
            project_id: value_to_string(&project_id).unwrap_or_default(),
            hours,
        }
    }
}

/// A weekly breakdown wins over a flat figure when a record sends both.
fn hours_from_candidates<const N: usize>(candidates: [Value; N]) -> AllocationHours {
    let (by_week, flat): (Vec<Value>, Vec<Value>) = candidates
        .into_iter()
        .filter(|value| !value.is_null())
        .partition(Value::is_object);
    let chosen = by_week
        .into_iter()
        .next()
        .or_else(|| flat.into_iter().next())
        .unwrap_or(Value::Null);
    hours_from_value(&chosen)
}

fn hours_from_value(value: &Value) -> AllocationHours {
    match value {
        Value::Object(by_week) => AllocationHours::Weekly(
            by_week
                .iter()
                .map(|(week, hours)| (week.trim().to_string(), coerce_hours(hours)))
                .collect(),
        ),
        Value::Null => AllocationHours::Flat(0.0),
        other => AllocationHours::Flat(coerce_hours(other)),
    }
}

/// Numeric or numeric-string hours; anything else counts as zero.
pub fn coerce_hours(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(hours) => sanitize(hours),
        None => {
            if !value.is_null() {
                tracing::debug!(%value, "non-numeric allocation hours treated as 0");
            }
            0.0
        }
    }
}

fn sanitize(hours: f64) -> f64 {
    if hours.is_finite() && hours > 0.0 {
        hours
    } else {
        0.0
    }
}

/// Sums the hours booked for `week_key` across `allocations`.
///
/// Weekly allocations contribute their entry for the week (0 when absent);
/// flat allocations contribute their hours to every week.
pub fn aggregate_weekly_allocations(allocations: &[Allocation], week_key: &str) -> f64 {
    let week_key = week_key.trim();
    allocations
        .iter()
        .map(|allocation| allocation.hours_for_week(week_key))
        .sum()
}

/// Hours booked for one resource, either for a single week or as flat totals.
pub fn allocated_hours_for(
    resource_id: &str,
    allocations: &[Allocation],
    week_key: Option<&str>,
) -> f64 {
    allocations
        .iter()
        .filter(|allocation| allocation.resource_id == resource_id)
        .map(|allocation| match week_key {
            Some(week) => allocation.hours_for_week(week.trim()),
            None => allocation.hours.total(),
        })
        .sum()
}
