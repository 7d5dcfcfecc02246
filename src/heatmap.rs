use crate::snapshot::Snapshot;
use crate::status::UtilizationStatus;
use crate::summary::ResourceSummary;
use crate::week::WeekKey;
use polars::prelude::PlSmallStr;
use polars::prelude::*;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapCell {
    pub week: WeekKey,
    pub allocated_hours: f64,
    pub percentage: f64,
    pub status: UtilizationStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapRow {
    pub resource_id: String,
    pub name: String,
    pub weekly_capacity: f64,
    pub cells: Vec<HeatmapCell>,
}

/// Capacity heatmap: one row per resource, one cell per week.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Heatmap {
    pub weeks: Vec<WeekKey>,
    pub rows: Vec<HeatmapRow>,
}

impl Heatmap {
    /// Soft-deleted resources are left out; inactive ones keep their row and
    /// show as inactive in every week.
    pub fn build(snapshot: &Snapshot, weeks: &[WeekKey]) -> Self {
        let rows = snapshot
            .resources
            .iter()
            .filter(|resource| !resource.is_deleted)
            .map(|resource| {
                let cells = weeks
                    .iter()
                    .map(|week| {
                        let summary =
                            ResourceSummary::build(resource, &snapshot.allocations, Some(week));
                        HeatmapCell {
                            week: *week,
                            allocated_hours: summary.allocated_hours,
                            percentage: summary.utilization.percentage,
                            status: summary.utilization.status,
                        }
                    })
                    .collect();
                HeatmapRow {
                    resource_id: resource.id.clone(),
                    name: resource.name.clone(),
                    weekly_capacity: resource.weekly_capacity,
                    cells,
                }
            })
            .collect();

        Self {
            weeks: weeks.to_vec(),
            rows,
        }
    }

    pub fn starting_at(snapshot: &Snapshot, from: WeekKey, count: usize) -> Self {
        Self::build(snapshot, &from.range(count))
    }

    /// Tabular form: `resource_id`, `name`, then one percentage column per week.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let mut columns: Vec<Column> = Vec::with_capacity(self.weeks.len() + 2);

        let ids: Vec<&str> = self.rows.iter().map(|row| row.resource_id.as_str()).collect();
        columns.push(Series::new(PlSmallStr::from_static("resource_id"), ids).into_column());

        let names: Vec<&str> = self.rows.iter().map(|row| row.name.as_str()).collect();
        columns.push(Series::new(PlSmallStr::from_static("name"), names).into_column());

        for (idx, week) in self.weeks.iter().enumerate() {
            let values: Vec<f64> = self
                .rows
                .iter()
                .map(|row| row.cells.get(idx).map(|cell| cell.percentage).unwrap_or(0.0))
                .collect();
            let name = week.to_string();
            columns.push(Series::new(name.as_str().into(), values).into_column());
        }

        DataFrame::new(columns)
    }
}
