use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Discrete classification of a resource's utilization.
///
/// Variants are declared in priority order, so the derived `Ord` matches
/// [`UtilizationStatus::priority`]: a higher value is more urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UtilizationStatus {
    Inactive,
    Unassigned,
    UnderUtilized,
    Optimal,
    NearCapacity,
    OverCapacity,
    Critical,
}

/// Display descriptor attached to every status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusStyle {
    pub color_class: &'static str,
    pub icon: &'static str,
    pub label: &'static str,
}

/// Upper bound of a utilization bucket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusThreshold {
    pub max_percentage: f64,
    /// Whether a percentage equal to `max_percentage` still falls in this bucket.
    pub inclusive: bool,
    pub status: UtilizationStatus,
}

impl StatusThreshold {
    pub fn contains(&self, percentage: f64) -> bool {
        if self.inclusive {
            percentage <= self.max_percentage
        } else {
            percentage < self.max_percentage
        }
    }
}

/// Percentage buckets, ascending. A percentage falls into the first bucket
/// whose bound it does not exceed; anything above the last bound is
/// [`UtilizationStatus::Critical`].
pub const STATUS_THRESHOLDS: [StatusThreshold; 4] = [
    StatusThreshold {
        max_percentage: 50.0,
        inclusive: true,
        status: UtilizationStatus::UnderUtilized,
    },
    StatusThreshold {
        max_percentage: 90.0,
        inclusive: false,
        status: UtilizationStatus::Optimal,
    },
    StatusThreshold {
        max_percentage: 100.0,
        inclusive: true,
        status: UtilizationStatus::NearCapacity,
    },
    StatusThreshold {
        max_percentage: 120.0,
        inclusive: true,
        status: UtilizationStatus::OverCapacity,
    },
];

impl UtilizationStatus {
    pub const ALL: [UtilizationStatus; 7] = [
        UtilizationStatus::Inactive,
        UtilizationStatus::Unassigned,
        UtilizationStatus::UnderUtilized,
        UtilizationStatus::Optimal,
        UtilizationStatus::NearCapacity,
        UtilizationStatus::OverCapacity,
        UtilizationStatus::Critical,
    ];

    /// Buckets a utilization percentage against [`STATUS_THRESHOLDS`].
    ///
    /// Half capacity is still under-utilized, 90% is already near capacity,
    /// and exactly 100% and 120% stay in the lower bucket.
    pub fn from_percentage(percentage: f64) -> Self {
        STATUS_THRESHOLDS
            .iter()
            .find(|threshold| threshold.contains(percentage))
            .map(|threshold| threshold.status)
            .unwrap_or(UtilizationStatus::Critical)
    }

    pub fn priority(self) -> u8 {
        match self {
            UtilizationStatus::Inactive => 0,
            UtilizationStatus::Unassigned => 1,
            UtilizationStatus::UnderUtilized => 2,
            UtilizationStatus::Optimal => 3,
            UtilizationStatus::NearCapacity => 4,
            UtilizationStatus::OverCapacity => 5,
            UtilizationStatus::Critical => 6,
        }
    }

    pub fn style(self) -> StatusStyle {
        match self {
            UtilizationStatus::Inactive => StatusStyle {
                color_class: "bg-gray-400",
                icon: "⏸",
                label: "Inactive",
            },
            UtilizationStatus::Unassigned => StatusStyle {
                color_class: "bg-slate-300",
                icon: "○",
                label: "Unassigned",
            },
            UtilizationStatus::UnderUtilized => StatusStyle {
                color_class: "bg-blue-500",
                icon: "↓",
                label: "Under-utilized",
            },
            UtilizationStatus::Optimal => StatusStyle {
                color_class: "bg-green-500",
                icon: "✓",
                label: "Optimal",
            },
            UtilizationStatus::NearCapacity => StatusStyle {
                color_class: "bg-yellow-500",
                icon: "◐",
                label: "Near capacity",
            },
            UtilizationStatus::OverCapacity => StatusStyle {
                color_class: "bg-orange-500",
                icon: "▲",
                label: "Over capacity",
            },
            UtilizationStatus::Critical => StatusStyle {
                color_class: "bg-red-600",
                icon: "⚠",
                label: "Critical",
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            UtilizationStatus::Inactive => "inactive",
            UtilizationStatus::Unassigned => "unassigned",
            UtilizationStatus::UnderUtilized => "under-utilized",
            UtilizationStatus::Optimal => "optimal",
            UtilizationStatus::NearCapacity => "near-capacity",
            UtilizationStatus::OverCapacity => "over-capacity",
            UtilizationStatus::Critical => "critical",
        }
    }

    /// True for the two statuses counted as over-allocated on the KPI cards.
    pub fn is_over_allocated(self) -> bool {
        matches!(
            self,
            UtilizationStatus::OverCapacity | UtilizationStatus::Critical
        )
    }
}

impl fmt::Display for UtilizationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown utilization status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for UtilizationStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        UtilizationStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// One row of the status legend, as served to the rendering layer.
#[derive(Debug, Clone, Serialize)]
pub struct StatusLegendEntry {
    pub status: UtilizationStatus,
    pub priority: u8,
    #[serde(flatten)]
    pub style: StatusStyle,
}

pub fn status_legend() -> Vec<StatusLegendEntry> {
    UtilizationStatus::ALL
        .into_iter()
        .map(|status| StatusLegendEntry {
            status,
            priority: status.priority(),
            style: status.style(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_order_matches_priority() {
        for pair in UtilizationStatus::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
            assert!(pair[0].priority() < pair[1].priority());
        }
    }

    #[test]
    fn bucket_boundaries() {
        assert_eq!(
            UtilizationStatus::from_percentage(49.9),
            UtilizationStatus::UnderUtilized
        );
        assert_eq!(
            UtilizationStatus::from_percentage(50.0),
            UtilizationStatus::UnderUtilized
        );
        assert_eq!(
            UtilizationStatus::from_percentage(50.1),
            UtilizationStatus::Optimal
        );
        assert_eq!(
            UtilizationStatus::from_percentage(89.9),
            UtilizationStatus::Optimal
        );
        assert_eq!(
            UtilizationStatus::from_percentage(90.0),
            UtilizationStatus::NearCapacity
        );
        assert_eq!(
            UtilizationStatus::from_percentage(100.0),
            UtilizationStatus::NearCapacity
        );
        assert_eq!(
            UtilizationStatus::from_percentage(120.0),
            UtilizationStatus::OverCapacity
        );
        assert_eq!(
            UtilizationStatus::from_percentage(120.1),
            UtilizationStatus::Critical
        );
    }

    #[test]
    fn parses_kebab_and_snake_case() {
        assert_eq!(
            "near-capacity".parse::<UtilizationStatus>().unwrap(),
            UtilizationStatus::NearCapacity
        );
        assert_eq!(
            "Under_Utilized".parse::<UtilizationStatus>().unwrap(),
            UtilizationStatus::UnderUtilized
        );
        assert!("busy".parse::<UtilizationStatus>().is_err());
    }
}
