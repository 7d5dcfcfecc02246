use crate::allocation::{Allocation, allocated_hours_for};
use crate::resource::Resource;
use crate::snapshot::Snapshot;
use crate::status::UtilizationStatus;
use crate::utilization::{UtilizationResult, classify_utilization};
use crate::week::WeekKey;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// A resource together with everything the tables and cards derive from it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceSummary {
    pub resource: Resource,
    pub allocated_hours: f64,
    /// Number of distinct projects the resource is booked on.
    pub project_count: usize,
    pub utilization: UtilizationResult,
}

impl ResourceSummary {
    /// Builds the summary for `resource`. With a `week`, only hours booked for
    /// that week count; without one, every allocation's total counts.
    pub fn build(resource: &Resource, allocations: &[Allocation], week: Option<&WeekKey>) -> Self {
        let week_key = week.map(ToString::to_string);
        let hours = allocated_hours_for(&resource.id, allocations, week_key.as_deref());
        let projects: BTreeSet<&str> = allocations
            .iter()
            .filter(|allocation| allocation.resource_id == resource.id)
            .filter(|allocation| match &week_key {
                Some(key) => allocation.hours_for_week(key) > 0.0,
                None => true,
            })
            .map(|allocation| allocation.project_id.as_str())
            .collect();

        let utilization =
            classify_utilization(resource.weekly_capacity, hours, resource.is_available());
        Self {
            resource: resource.clone(),
            allocated_hours: hours,
            project_count: projects.len(),
            utilization,
        }
    }

    pub fn status(&self) -> UtilizationStatus {
        self.utilization.status
    }
}

/// Summaries for every resource that has not been soft-deleted, in snapshot order.
pub fn summarize_resources(snapshot: &Snapshot, week: Option<&WeekKey>) -> Vec<ResourceSummary> {
    snapshot
        .resources
        .iter()
        .filter(|resource| !resource.is_deleted)
        .map(|resource| ResourceSummary::build(resource, &snapshot.allocations, week))
        .collect()
}

/// Figures shown on the dashboard's KPI cards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardKpis {
    pub total_resources: usize,
    pub active_resources: usize,
    pub unassigned_resources: usize,
    pub over_allocated_resources: usize,
    pub total_capacity_hours: f64,
    pub total_allocated_hours: f64,
    pub average_utilization: f64,
    pub status_counts: BTreeMap<UtilizationStatus, usize>,
}

impl DashboardKpis {
    pub fn from_summaries(summaries: &[ResourceSummary]) -> Self {
        let mut status_counts: BTreeMap<UtilizationStatus, usize> = UtilizationStatus::ALL
            .into_iter()
            .map(|status| (status, 0))
            .collect();
        let mut active = 0;
        let mut total_capacity = 0.0;
        let mut total_allocated = 0.0;
        let mut percentage_sum = 0.0;

        for summary in summaries {
            *status_counts.entry(summary.status()).or_default() += 1;
            if summary.resource.is_available() {
                active += 1;
                total_capacity += summary.resource.weekly_capacity;
                total_allocated += summary.allocated_hours;
                percentage_sum += summary.utilization.percentage;
            }
        }

        let count_of = |status: UtilizationStatus| status_counts.get(&status).copied().unwrap_or(0);
        Self {
            total_resources: summaries.len(),
            active_resources: active,
            unassigned_resources: count_of(UtilizationStatus::Unassigned),
            over_allocated_resources: count_of(UtilizationStatus::OverCapacity)
                + count_of(UtilizationStatus::Critical),
            total_capacity_hours: total_capacity,
            total_allocated_hours: total_allocated,
            average_utilization: if active == 0 {
                0.0
            } else {
                percentage_sum / active as f64
            },
            status_counts,
        }
    }

    pub fn to_cli_summary(&self) -> String {
        let mut parts = vec![
            format!("resources={}", self.total_resources),
            format!("active={}", self.active_resources),
            format!("avg_util={:.1}%", self.average_utilization),
        ];
        if self.unassigned_resources > 0 {
            parts.push(format!("unassigned={}", self.unassigned_resources));
        }
        if self.over_allocated_resources > 0 {
            parts.push(format!("over_allocated={}", self.over_allocated_resources));
        }
        parts.push(format!(
            "hours={:.1}/{:.1}",
            self.total_allocated_hours, self.total_capacity_hours
        ));
        parts.join(", ")
    }
}
