//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the model
//! and service layers; the occurrence engine itself stays a pure function,
//! fed the server clock (or a caller-supplied preview instant) from here.

use std::str::FromStr;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use super::dto::{
    CreateShareRequest, CreateShareResponse, HealthResponse, ImportCoursesRequest,
    ImportCoursesResponse, OccurrenceQueryParams, SaveScheduleRequest, SaveScheduleResponse,
    SharedSnapshot, ShareViewQuery, ShareViewResponse,
};
use super::error::AppError;
use super::state::AppState;
use crate::api::{OccurrenceSnapshot, UserId};
use crate::models::{parse_document_json_str, ScheduleDocument, ShareAccessError, SharedLink};
use crate::services::{
    normalize_document, parse_course_csv, resolve_occurrence, validate_document, OccurrenceQuery,
};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service and its storage backend.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let storage = match state.repository.health_check().await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        storage,
    }))
}

// =============================================================================
// Schedule CRUD
// =============================================================================

/// GET /v1/users/{user_id}/schedule
///
/// Fetch the stored schedule document.
pub async fn get_schedule(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> HandlerResult<ScheduleDocument> {
    let user_id = UserId::new(user_id);
    let document = state
        .repository
        .fetch_document(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No schedule stored for user {}", user_id)))?;
    Ok(Json(document))
}

/// PUT /v1/users/{user_id}/schedule
///
/// Validate, normalize and store a document, replacing any previous one.
pub async fn put_schedule(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(request): Json<SaveScheduleRequest>,
) -> HandlerResult<SaveScheduleResponse> {
    let user_id = UserId::new(user_id);

    let schedule_json = serde_json::to_string(&request.schedule)
        .map_err(|e| AppError::BadRequest(format!("Invalid schedule JSON: {}", e)))?;
    let mut document = parse_document_json_str(&schedule_json)
        .map_err(|e| AppError::BadRequest(format!("{:#}", e)))?;

    validate_document(&document)?;
    normalize_document(&mut document);

    state.repository.store_document(user_id, &document).await?;
    tracing::info!(user = %user_id, courses = document.courses.len(), "schedule saved");

    Ok(Json(SaveScheduleResponse {
        message: "Schedule saved".to_string(),
    }))
}

/// DELETE /v1/users/{user_id}/schedule
///
/// Clear the user's schedule document.
pub async fn delete_schedule(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.repository.clear_document(UserId::new(user_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Occurrence resolution
// =============================================================================

/// GET /v1/users/{user_id}/occurrence
///
/// Resolve the current/next highlighting and the full course grid for one
/// instant. `?all=true` previews the full schedule; `?tz=` overrides the
/// display timezone; `?at=` resolves a preview instant instead of now.
pub async fn get_occurrence(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(params): Query<OccurrenceQueryParams>,
) -> HandlerResult<OccurrenceSnapshot> {
    let user_id = UserId::new(user_id);
    let document = state
        .repository
        .fetch_document(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No schedule stored for user {}", user_id)))?;

    let query = OccurrenceQuery::new(resolve_instant(params.at.as_deref())?)
        .show_all(params.all.unwrap_or(false))
        .display_tz(parse_display_tz(params.tz.as_deref())?);

    Ok(Json(resolve_occurrence(&document, &query)))
}

// =============================================================================
// Course import
// =============================================================================

/// POST /v1/users/{user_id}/schedule/import
///
/// Parse pasted CSV text into course placements for the editor to review.
/// Nothing is stored; the editor merges and saves via PUT.
pub async fn import_courses(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(request): Json<ImportCoursesRequest>,
) -> HandlerResult<ImportCoursesResponse> {
    // Periods are bounded by the stored document's slots, when there is one.
    let max_idx = state
        .repository
        .fetch_document(UserId::new(user_id))
        .await?
        .and_then(|doc| doc.max_period_idx());

    let courses = parse_course_csv(&request.text, max_idx)
        .map_err(|e| AppError::BadRequest(format!("{:#}", e)))?;
    let total = courses.len();

    Ok(Json(ImportCoursesResponse { courses, total }))
}

// =============================================================================
// Share links
// =============================================================================

/// POST /v1/users/{user_id}/shares
///
/// Publish a read-only, pass-protected share link for the user's timetable.
pub async fn create_share(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(request): Json<CreateShareRequest>,
) -> Result<(StatusCode, Json<CreateShareResponse>), AppError> {
    let user_id = UserId::new(user_id);

    if !SharedLink::is_pass_format(&request.share_pass) {
        return Err(AppError::BadRequest(
            "share_pass must be exactly 4 digits".to_string(),
        ));
    }
    // Owners can only share a schedule that exists.
    if state.repository.fetch_document(user_id).await?.is_none() {
        return Err(AppError::NotFound(format!(
            "No schedule stored for user {}",
            user_id
        )));
    }

    let mut link = SharedLink::new(
        user_id,
        request.share_pass,
        request.display_fields.unwrap_or_default(),
        Utc::now(),
    );
    link.expires_at = request.expires_at;
    link.max_visits = request.max_visits;
    if let Some(tz_mode) = request.tz_mode {
        link.tz_mode = tz_mode;
    }
    link.tz_value = match request.tz_value.as_deref() {
        Some(name) => Some(
            Tz::from_str(name)
                .map_err(|_| AppError::BadRequest(format!("Unknown timezone: {}", name)))?,
        ),
        None => None,
    };

    state.repository.store_share_link(&link).await?;
    tracing::info!(user = %user_id, token = %link.token, "share link created");

    Ok((
        StatusCode::CREATED,
        Json(CreateShareResponse {
            token: link.token.clone(),
            message: format!("Share link created. View at /v1/shares/{}", link.token),
        }),
    ))
}

/// GET /v1/shares/{token}
///
/// Public, login-free share view. Requires `?p=<4-digit code>`; `?all=true`
/// shows every week. Each successful visit counts against the link's cap.
pub async fn get_share_view(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Query(params): Query<ShareViewQuery>,
) -> HandlerResult<ShareViewResponse> {
    if !SharedLink::is_token_format(&token) {
        return Err(ShareAccessError::MalformedToken.into());
    }

    let link = state
        .repository
        .fetch_share_link(&token)
        .await?
        .ok_or_else(|| AppError::NotFound("Share link does not exist".to_string()))?;

    link.check_access(Utc::now(), params.p.as_deref())?;
    state.repository.record_share_visit(&token).await?;

    // An owner may share before finishing setup; render an empty grid then.
    let document = state
        .repository
        .fetch_document(link.user_id)
        .await?
        .unwrap_or_default();

    let display_tz = link.display_tz(document.tz);
    let query = OccurrenceQuery::new(Utc::now())
        .show_all(params.all.unwrap_or(false))
        .display_tz(Some(display_tz));
    let snapshot = resolve_occurrence(&document, &query);

    Ok(Json(ShareViewResponse {
        enabled_days: document.enabled_days.clone(),
        timeslots: document.timeslots.clone(),
        display_fields: link.display_fields.clone(),
        display_tz: display_tz.name().to_string(),
        snapshot: SharedSnapshot::from_snapshot(snapshot, &link),
    }))
}

// =============================================================================
// Parameter helpers
// =============================================================================

fn resolve_instant(at: Option<&str>) -> Result<DateTime<Utc>, AppError> {
    match at {
        None => Ok(Utc::now()),
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| AppError::BadRequest(format!("Invalid \"at\" instant: {}", e))),
    }
}

fn parse_display_tz(tz: Option<&str>) -> Result<Option<Tz>, AppError> {
    match tz {
        None => Ok(None),
        Some(name) => Tz::from_str(name)
            .map(Some)
            .map_err(|_| AppError::BadRequest(format!("Unknown timezone: {}", name))),
    }
}
