use crate::status::{StatusStyle, UtilizationStatus};
use serde::Serialize;

/// Weekly capacity used when a resource carries none (or an unusable one).
pub const DEFAULT_WEEKLY_CAPACITY: f64 = 40.0;

/// Upper bound applied by mini-graphs when drawing a percentage bar.
pub const DISPLAY_PERCENTAGE_CAP: f64 = 150.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UtilizationResult {
    /// Unclamped `allocated / capacity * 100`; 0 when capacity is not positive.
    pub percentage: f64,
    pub status: UtilizationStatus,
    pub style: StatusStyle,
}

impl UtilizationResult {
    fn new(percentage: f64, status: UtilizationStatus) -> Self {
        Self {
            percentage,
            status,
            style: status.style(),
        }
    }
}

/// Parses a raw capacity value as it arrives from the API.
///
/// Empty, unparsable, non-finite and negative inputs fall back to
/// [`DEFAULT_WEEKLY_CAPACITY`]. An explicit zero is kept.
pub fn parse_capacity(raw: Option<&str>) -> f64 {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return DEFAULT_WEEKLY_CAPACITY;
    };
    match raw.parse::<f64>() {
        Ok(value) => effective_capacity(value),
        Err(_) => {
            tracing::debug!(raw, "unparsable weekly capacity, using default");
            DEFAULT_WEEKLY_CAPACITY
        }
    }
}

/// Applies the capacity defaulting rules to an already-numeric value.
pub fn effective_capacity(value: f64) -> f64 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        DEFAULT_WEEKLY_CAPACITY
    }
}

fn sanitize_hours(hours: f64) -> f64 {
    if hours.is_finite() && hours > 0.0 {
        hours
    } else {
        0.0
    }
}

/// Derives the utilization percentage and status for one resource.
///
/// Rules are evaluated in order: inactive resources are always
/// [`UtilizationStatus::Inactive`], zero allocated hours is
/// [`UtilizationStatus::Unassigned`], everything else is bucketed by
/// percentage through the shared threshold table.
pub fn classify_utilization(
    weekly_capacity: f64,
    allocated_hours: f64,
    is_active: bool,
) -> UtilizationResult {
    let hours = sanitize_hours(allocated_hours);
    let capacity = if weekly_capacity.is_finite() {
        weekly_capacity
    } else {
        0.0
    };
    let percentage = if capacity > 0.0 {
        hours / capacity * 100.0
    } else {
        0.0
    };

    if !is_active {
        return UtilizationResult::new(percentage, UtilizationStatus::Inactive);
    }
    if hours == 0.0 {
        return UtilizationResult::new(percentage, UtilizationStatus::Unassigned);
    }
    UtilizationResult::new(percentage, UtilizationStatus::from_percentage(percentage))
}

/// Clamps a percentage into `[0, DISPLAY_PERCENTAGE_CAP]` for bar widths.
/// Classification never goes through this.
pub fn display_percentage(percentage: f64) -> f64 {
    if percentage.is_nan() {
        return 0.0;
    }
    percentage.clamp(0.0, DISPLAY_PERCENTAGE_CAP)
}
