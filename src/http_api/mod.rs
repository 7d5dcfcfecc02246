use std::{net::SocketAddr, str::FromStr, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{
    AccessError, DashboardKpis, Heatmap, IngestError, Permission, ResourceSummary, Session,
    Snapshot, SortDirection, SortField, UtilizationResult, WeekKey, classify_utilization,
    resolve_viewed_resource, sort_resources, status_legend, summarize_resources,
};

pub const DEFAULT_HEATMAP_WEEKS: usize = 8;
pub const MAX_HEATMAP_WEEKS: usize = 52;

#[derive(Clone)]
pub struct AppState {
    snapshot: Arc<RwLock<Snapshot>>,
}

impl AppState {
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            snapshot: Arc::new(RwLock::new(snapshot)),
        }
    }

    pub fn with_shared(snapshot: Arc<RwLock<Snapshot>>) -> Self {
        Self { snapshot }
    }

    fn snapshot(&self) -> Arc<RwLock<Snapshot>> {
        self.snapshot.clone()
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    NotFound(String),
    Unauthorized(String),
    Forbidden(String),
    Invalid(String),
}

impl ApiError {
    fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    fn invalid(message: impl Into<String>) -> Self {
        ApiError::Invalid(message.into())
    }
}

impl From<AccessError> for ApiError {
    fn from(value: AccessError) -> Self {
        match value {
            AccessError::NoLinkedResource { .. } => ApiError::NotFound(value.to_string()),
            AccessError::Forbidden { .. } | AccessError::MissingPermission { .. } => {
                ApiError::Forbidden(value.to_string())
            }
        }
    }
}

impl From<IngestError> for ApiError {
    fn from(value: IngestError) -> Self {
        ApiError::Invalid(value.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, "not_found", message),
            ApiError::Unauthorized(message) => (StatusCode::UNAUTHORIZED, "unauthorized", message),
            ApiError::Forbidden(message) => (StatusCode::FORBIDDEN, "forbidden", message),
            ApiError::Invalid(message) => (StatusCode::BAD_REQUEST, "invalid_request", message),
        };
        tracing::warn!(status = status.as_u16(), kind = error, %message, "request rejected");
        (status, Json(ErrorBody { error, message })).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/statuses", get(list_statuses))
        .route("/resources", get(list_resources))
        .route("/resources/:id", get(get_resource))
        .route("/me", get(get_own_resource))
        .route("/kpis", get(get_kpis))
        .route("/heatmap", get(get_heatmap))
        .route("/classify", post(classify))
        .route("/snapshot", put(replace_snapshot))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, snapshot: Snapshot) -> std::io::Result<()> {
    let state = AppState::new(snapshot);
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "http api listening");
    axum::serve(listener, app).await
}

/// Reads the caller's session from `x-user-id`, `x-resource-id` and
/// `x-permissions` (comma-separated).
fn session_from_headers(headers: &HeaderMap) -> Result<Session, ApiError> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
    };
    let user_id = header("x-user-id")
        .ok_or_else(|| ApiError::Unauthorized("missing x-user-id header".to_string()))?;
    let resource_id = header("x-resource-id").map(ToOwned::to_owned);
    let mut permissions = Vec::new();
    if let Some(raw) = header("x-permissions") {
        for item in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let permission =
                Permission::from_str(item).map_err(|err| ApiError::invalid(err.to_string()))?;
            permissions.push(permission);
        }
    }
    Ok(Session::new(user_id, resource_id, permissions))
}

fn parse_week(raw: Option<&str>) -> Result<Option<WeekKey>, ApiError> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| WeekKey::from_str(s).map_err(|err| ApiError::invalid(err.to_string())))
        .transpose()
}

#[derive(Debug, Default, Deserialize)]
struct WeekQuery {
    week: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ListQuery {
    sort: Option<String>,
    dir: Option<String>,
    week: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct HeatmapQuery {
    from: Option<String>,
    weeks: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct ClassifyPayload {
    #[serde(default)]
    weekly_capacity: Value,
    #[serde(default)]
    allocated_hours: Value,
    #[serde(default = "default_true")]
    is_active: bool,
}

fn default_true() -> bool {
    true
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn list_statuses() -> impl IntoResponse {
    Json(status_legend())
}

async fn list_resources(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<ResourceSummary>>, ApiError> {
    let week = parse_week(query.week.as_deref())?;
    let direction = match query.dir.as_deref() {
        Some(raw) => {
            SortDirection::from_str(raw).map_err(|err| ApiError::invalid(err.to_string()))?
        }
        None => SortDirection::default(),
    };
    let field = query
        .sort
        .as_deref()
        .map(|raw| SortField::from_str(raw).map_err(|err| ApiError::invalid(err.to_string())))
        .transpose()?;

    let summaries = {
        let guard = state.snapshot.read();
        summarize_resources(&guard, week.as_ref())
    };
    let ordered = match field {
        Some(field) => sort_resources(&summaries, field, direction),
        None => summaries,
    };
    Ok(Json(ordered))
}

fn summary_for(
    snapshot: &Snapshot,
    resource_id: &str,
    week: Option<&WeekKey>,
) -> Result<ResourceSummary, ApiError> {
    let resource = snapshot
        .find_resource(resource_id)
        .ok_or_else(|| ApiError::not_found(format!("resource {resource_id} not found")))?;
    Ok(ResourceSummary::build(resource, &snapshot.allocations, week))
}

async fn get_resource(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(resource_id): Path<String>,
    Query(query): Query<WeekQuery>,
) -> Result<Json<ResourceSummary>, ApiError> {
    let session = session_from_headers(&headers)?;
    let viewed = resolve_viewed_resource(&session, Some(&resource_id))?;
    let week = parse_week(query.week.as_deref())?;
    let snapshot = state.snapshot();
    let guard = snapshot.read();
    Ok(Json(summary_for(&guard, &viewed, week.as_ref())?))
}

async fn get_own_resource(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<WeekQuery>,
) -> Result<Json<ResourceSummary>, ApiError> {
    let session = session_from_headers(&headers)?;
    let viewed = resolve_viewed_resource(&session, None)?;
    let week = parse_week(query.week.as_deref())?;
    let snapshot = state.snapshot();
    let guard = snapshot.read();
    Ok(Json(summary_for(&guard, &viewed, week.as_ref())?))
}

async fn get_kpis(
    State(state): State<AppState>,
    Query(query): Query<WeekQuery>,
) -> Result<Json<DashboardKpis>, ApiError> {
    let week = parse_week(query.week.as_deref())?;
    let summaries = {
        let guard = state.snapshot.read();
        summarize_resources(&guard, week.as_ref())
    };
    Ok(Json(DashboardKpis::from_summaries(&summaries)))
}

async fn get_heatmap(
    State(state): State<AppState>,
    Query(query): Query<HeatmapQuery>,
) -> Result<Json<Heatmap>, ApiError> {
    let from = parse_week(query.from.as_deref())?
        .unwrap_or_else(|| WeekKey::from_date(chrono::Local::now().date_naive()));
    let weeks = query.weeks.unwrap_or(DEFAULT_HEATMAP_WEEKS);
    if weeks == 0 || weeks > MAX_HEATMAP_WEEKS {
        return Err(ApiError::invalid(format!(
            "weeks must be between 1 and {MAX_HEATMAP_WEEKS}"
        )));
    }
    let heatmap = {
        let guard = state.snapshot.read();
        Heatmap::starting_at(&guard, from, weeks)
    };
    Ok(Json(heatmap))
}

async fn classify(Json(payload): Json<ClassifyPayload>) -> Json<UtilizationResult> {
    let capacity = match &payload.weekly_capacity {
        Value::String(raw) => crate::parse_capacity(Some(raw)),
        Value::Number(n) => n
            .as_f64()
            .map(crate::utilization::effective_capacity)
            .unwrap_or(crate::DEFAULT_WEEKLY_CAPACITY),
        _ => crate::DEFAULT_WEEKLY_CAPACITY,
    };
    let hours = crate::allocation::coerce_hours(&payload.allocated_hours);
    Json(classify_utilization(capacity, hours, payload.is_active))
}

async fn replace_snapshot(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let session = session_from_headers(&headers)?;
    session.require(Permission::ManageAllocations)?;
    let snapshot = Snapshot::from_json_value(payload)?;
    let counts = json!({
        "resources": snapshot.resources.len(),
        "allocations": snapshot.allocations.len(),
    });
    {
        let mut guard = state.snapshot.write();
        *guard = snapshot;
    }
    tracing::info!(user_id = %session.user_id, %counts, "snapshot replaced");
    Ok(Json(counts))
}
