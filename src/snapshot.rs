use crate::allocation::{Allocation, AllocationHours};
use crate::resource::{Resource, parse_flag, split_skills};
use crate::utilization::parse_capacity;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid data: {0}")]
    InvalidData(String),
}

pub type IngestResult<T> = Result<T, IngestError>;

/// The resources and allocations handed to the engine for one render/query.
///
/// Decoding goes through [`Snapshot::from_json_value`], which tolerates
/// missing or null members and reports non-array ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Snapshot {
    pub resources: Vec<Resource>,
    pub allocations: Vec<Allocation>,
}

impl Snapshot {
    pub fn new(resources: Vec<Resource>, allocations: Vec<Allocation>) -> Self {
        Self {
            resources,
            allocations,
        }
    }

    pub fn find_resource(&self, resource_id: &str) -> Option<&Resource> {
        self.resources
            .iter()
            .find(|resource| resource.id == resource_id && !resource.is_deleted)
    }

    /// Parses a snapshot payload. The top level must be an object; its
    /// `resources` and `allocations` members, when present, must be arrays.
    pub fn from_json_value(value: Value) -> IngestResult<Self> {
        let Value::Object(mut members) = value else {
            return Err(IngestError::InvalidData(
                "snapshot must be a JSON object".to_string(),
            ));
        };
        let resources: Vec<Resource> = take_array(&mut members, "resources")?;
        let allocations: Vec<Allocation> = take_array(&mut members, "allocations")?;
        tracing::debug!(
            resources = resources.len(),
            allocations = allocations.len(),
            "snapshot ingested"
        );
        Ok(Self::new(resources, allocations))
    }

    pub fn from_json_reader<R: Read>(reader: R) -> IngestResult<Self> {
        let value: Value = serde_json::from_reader(reader)?;
        Self::from_json_value(value)
    }

    pub fn from_json_str(raw: &str) -> IngestResult<Self> {
        let value: Value = serde_json::from_str(raw)?;
        Self::from_json_value(value)
    }
}

fn take_array<T>(members: &mut serde_json::Map<String, Value>, key: &str) -> IngestResult<Vec<T>>
where
    T: for<'de> Deserialize<'de>,
{
    match members.remove(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(items @ Value::Array(_)) => Ok(serde_json::from_value(items)?),
        Some(other) => Err(IngestError::InvalidData(format!(
            "'{key}' must be an array (got {})",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

pub fn load_snapshot_from_json<P: AsRef<Path>>(path: P) -> IngestResult<Snapshot> {
    let file = File::open(path.as_ref())?;
    let snapshot = Snapshot::from_json_reader(file)?;
    tracing::info!(
        path = %path.as_ref().display(),
        resources = snapshot.resources.len(),
        allocations = snapshot.allocations.len(),
        "loaded snapshot"
    );
    Ok(snapshot)
}

pub fn save_snapshot_to_json<P: AsRef<Path>>(snapshot: &Snapshot, path: P) -> IngestResult<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, snapshot)?;
    Ok(())
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct ResourceCsvRecord {
    id: String,
    name: String,
    role: String,
    department: String,
    weekly_capacity: String,
    is_active: String,
    is_deleted: String,
    skills: String,
}

impl From<ResourceCsvRecord> for Resource {
    fn from(record: ResourceCsvRecord) -> Self {
        Self {
            id: record.id.trim().to_string(),
            name: record.name.trim().to_string(),
            role: non_empty(record.role),
            department: non_empty(record.department),
            weekly_capacity: parse_capacity(Some(&record.weekly_capacity)),
            is_active: csv_flag(&record.is_active, true),
            is_deleted: csv_flag(&record.is_deleted, false),
            skills: split_skills(&record.skills),
        }
    }
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct AllocationCsvRecord {
    id: String,
    resource_id: String,
    project_id: String,
    week: String,
    hours: String,
}

impl From<AllocationCsvRecord> for Allocation {
    fn from(record: AllocationCsvRecord) -> Self {
        let hours = crate::allocation::coerce_hours(&Value::String(record.hours));
        let week = record.week.trim();
        let hours = if week.is_empty() {
            AllocationHours::Flat(hours)
        } else {
            AllocationHours::Weekly(BTreeMap::from([(week.to_string(), hours)]))
        };
        Self {
            id: non_empty(record.id),
            resource_id: record.resource_id.trim().to_string(),
            project_id: record.project_id.trim().to_string(),
            hours,
        }
    }
}

fn non_empty(raw: String) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn csv_flag(raw: &str, default: bool) -> bool {
    if raw.trim().is_empty() {
        return default;
    }
    parse_flag(raw).unwrap_or(false)
}

pub fn load_resources_from_csv<P: AsRef<Path>>(path: P) -> IngestResult<Vec<Resource>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut resources = Vec::new();
    for record in reader.deserialize::<ResourceCsvRecord>() {
        resources.push(Resource::from(record?));
    }
    Ok(resources)
}

/// Loads allocations, one per row. A blank `week` makes the row a flat
/// weekly allocation.
pub fn load_allocations_from_csv<P: AsRef<Path>>(path: P) -> IngestResult<Vec<Allocation>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut allocations = Vec::new();
    for record in reader.deserialize::<AllocationCsvRecord>() {
        allocations.push(Allocation::from(record?));
    }
    Ok(allocations)
}

pub fn load_snapshot_from_csv<P, Q>(resources_path: P, allocations_path: Option<Q>) -> IngestResult<Snapshot>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let resources = load_resources_from_csv(resources_path)?;
    let allocations = match allocations_path {
        Some(path) => load_allocations_from_csv(path)?,
        None => Vec::new(),
    };
    tracing::info!(
        resources = resources.len(),
        allocations = allocations.len(),
        "loaded snapshot from csv"
    );
    Ok(Snapshot::new(resources, allocations))
}
