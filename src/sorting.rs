use crate::summary::ResourceSummary;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    Name,
    Role,
    Department,
    Status,
    /// Orders by derived utilization percentage.
    Capacity,
    /// Orders by the number of distinct projects with hours booked in the
    /// selected week (any allocation when no week is selected), not by the
    /// raw allocation count.
    Projects,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortField {
    pub fn as_str(self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::Role => "role",
            SortField::Department => "department",
            SortField::Status => "status",
            SortField::Capacity => "capacity",
            SortField::Projects => "projects",
        }
    }

    fn compare(self, a: &ResourceSummary, b: &ResourceSummary) -> Ordering {
        match self {
            SortField::Name => compare_text(&a.resource.name, &b.resource.name),
            SortField::Role => compare_text(
                a.resource.role.as_deref().unwrap_or(""),
                b.resource.role.as_deref().unwrap_or(""),
            ),
            SortField::Department => compare_text(
                a.resource.department.as_deref().unwrap_or(""),
                b.resource.department.as_deref().unwrap_or(""),
            ),
            SortField::Status => a.status().priority().cmp(&b.status().priority()),
            SortField::Capacity => a
                .utilization
                .percentage
                .total_cmp(&b.utilization.percentage),
            SortField::Projects => a.project_count.cmp(&b.project_count),
        }
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SortParseError {
    #[error("unknown sort field '{0}'")]
    Field(String),
    #[error("unknown sort direction '{0}' (expected asc or desc)")]
    Direction(String),
}

impl FromStr for SortField {
    type Err = SortParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(SortField::Name),
            "role" => Ok(SortField::Role),
            "department" => Ok(SortField::Department),
            "status" => Ok(SortField::Status),
            "capacity" | "utilization" => Ok(SortField::Capacity),
            "projects" => Ok(SortField::Projects),
            _ => Err(SortParseError::Field(s.to_string())),
        }
    }
}

impl FromStr for SortDirection {
    type Err = SortParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(SortParseError::Direction(s.to_string())),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns a newly ordered copy of `resources`.
///
/// The sort is stable in both directions: entries with equal keys keep
/// their input order.
pub fn sort_resources(
    resources: &[ResourceSummary],
    field: SortField,
    direction: SortDirection,
) -> Vec<ResourceSummary> {
    let mut ordered = resources.to_vec();
    ordered.sort_by(|a, b| match direction {
        SortDirection::Asc => field.compare(a, b),
        SortDirection::Desc => field.compare(b, a),
    });
    ordered
}
