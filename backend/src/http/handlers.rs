//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! schedule lifecycle for business logic.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::{StatusCode, Uri},
    Json,
};

use super::dto::{
    CreateScheduleRequest, Envelope, HealthResponse, ListSchedulesQuery, ScheduleDto,
    ScheduleListResponse, UpdateScheduleRequest,
};
use super::error::AppError;
use super::state::AppState;
use crate::db::repository::ScheduleRepository;
use crate::services::{parse_flight_id, parse_schedule_id, UpdateOutcome};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<Envelope<T>>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and the store is reachable.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_status = match state.repository.health_check().await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
    })
}

// =============================================================================
// Schedule CRUD
// =============================================================================

/// GET /api/v1/schedules
///
/// List schedules, optionally restricted to one flight with `?flightId=`.
pub async fn list_schedules(
    State(state): State<AppState>,
    query: Result<Query<ListSchedulesQuery>, QueryRejection>,
) -> HandlerResult<ScheduleListResponse> {
    let Query(query) = query?;
    let flight_id = query
        .flight_id
        .as_deref()
        .map(parse_flight_id)
        .transpose()?;

    let listing = state.schedules.list(flight_id).await?;

    Ok(Json(Envelope::success(
        "Schedules retrieved successfully",
        ScheduleListResponse {
            schedules: listing.schedules.into_iter().map(Into::into).collect(),
            total: listing.total,
        },
    )))
}

/// GET /api/v1/schedules/{schedule_id}
pub async fn get_schedule(
    State(state): State<AppState>,
    Path(schedule_id): Path<String>,
) -> HandlerResult<ScheduleDto> {
    let schedule_id = parse_schedule_id(&schedule_id)?;
    let schedule = state.schedules.get(schedule_id).await?;

    Ok(Json(Envelope::success(
        "Schedule retrieved successfully",
        schedule.into(),
    )))
}

/// POST /api/v1/schedules
///
/// Create a schedule after conflict and seat inventory validation.
pub async fn create_schedule(
    State(state): State<AppState>,
    body: Result<Json<CreateScheduleRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope<ScheduleDto>>), AppError> {
    let Json(request) = body?;
    let schedule = state.schedules.create(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::success(
            "Schedule created successfully",
            schedule.into(),
        )),
    ))
}

/// PUT /api/v1/schedules/{schedule_id}
///
/// Partial update. An empty body leaves the schedule untouched.
pub async fn update_schedule(
    State(state): State<AppState>,
    Path(schedule_id): Path<String>,
    body: Result<Json<UpdateScheduleRequest>, JsonRejection>,
) -> HandlerResult<ScheduleDto> {
    let schedule_id = parse_schedule_id(&schedule_id)?;
    let Json(request) = body?;

    let (message, schedule) = match state.schedules.update(schedule_id, request).await? {
        UpdateOutcome::Updated(s) => ("Schedule updated successfully", s),
        UpdateOutcome::Unchanged(s) => ("No changes to apply", s),
    };

    Ok(Json(Envelope::success(message, schedule.into())))
}

/// DELETE /api/v1/schedules/{schedule_id}
///
/// Refused while any seat class still has bookings.
pub async fn delete_schedule(
    State(state): State<AppState>,
    Path(schedule_id): Path<String>,
) -> HandlerResult<ScheduleDto> {
    let schedule_id = parse_schedule_id(&schedule_id)?;
    let schedule = state.schedules.delete(schedule_id).await?;

    Ok(Json(Envelope::success(
        "Schedule deleted successfully",
        schedule.into(),
    )))
}

/// Fallback for unmatched routes.
pub async fn route_not_found(uri: Uri) -> AppError {
    AppError::RouteNotFound(uri.path().to_string())
}
