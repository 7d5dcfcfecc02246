pub mod allocation;
pub mod config;
pub mod heatmap;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod resource;
pub mod session;
pub mod snapshot;
pub mod sorting;
pub mod status;
pub mod summary;
pub mod telemetry;
pub mod utilization;
pub mod week;

pub use allocation::{Allocation, AllocationHours, aggregate_weekly_allocations, allocated_hours_for};
pub use config::{Config, ConfigError, LogFormat, LoggingConfig};
pub use heatmap::{Heatmap, HeatmapCell, HeatmapRow};
pub use resource::{Resource, normalize_skills};
pub use session::{AccessError, Permission, Session, resolve_viewed_resource};
pub use snapshot::{
    IngestError, Snapshot, load_allocations_from_csv, load_resources_from_csv,
    load_snapshot_from_csv, load_snapshot_from_json, save_snapshot_to_json,
};
pub use sorting::{SortDirection, SortField, sort_resources};
pub use status::{STATUS_THRESHOLDS, StatusStyle, UtilizationStatus, status_legend};
pub use summary::{DashboardKpis, ResourceSummary, summarize_resources};
pub use utilization::{
    DEFAULT_WEEKLY_CAPACITY, UtilizationResult, classify_utilization, display_percentage,
    parse_capacity,
};
pub use week::{WeekKey, WeekKeyError};
