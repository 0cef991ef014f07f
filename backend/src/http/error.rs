//! HTTP error handling and response types.
//!
//! Failures are rendered in the same envelope as successes, with `status`
//! set to `failed` for client errors and `error` for server errors.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Map, Value};

use super::dto::{Envelope, ScheduleDto};
use crate::error::ScheduleError;

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Domain failure raised by the schedule lifecycle
    Schedule(ScheduleError),
    /// Request body or query string could not be decoded
    BadRequest(String),
    /// No route matches the request path
    RouteNotFound(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::RouteNotFound(_) => StatusCode::NOT_FOUND,
            AppError::Schedule(err) => match err {
                ScheduleError::InvalidInput { .. }
                | ScheduleError::CapacityExceeded { .. }
                | ScheduleError::OverbookedClass { .. }
                | ScheduleError::InvalidPrice { .. } => StatusCode::BAD_REQUEST,
                ScheduleError::NotFound { .. } | ScheduleError::ClassUnavailable { .. } => {
                    StatusCode::NOT_FOUND
                }
                ScheduleError::ScheduleConflict { .. }
                | ScheduleError::DuplicateDeparture { .. }
                | ScheduleError::DeleteBlocked { .. } => StatusCode::CONFLICT,
                ScheduleError::StoreFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn message(&self) -> String {
        match self {
            AppError::BadRequest(msg) => msg.clone(),
            AppError::RouteNotFound(_) => "Route not found".to_string(),
            // Store internals stay in the logs.
            AppError::Schedule(ScheduleError::StoreFailure(_)) => {
                "Internal server error".to_string()
            }
            AppError::Schedule(err) => err.to_string(),
        }
    }

    fn data(&self) -> Value {
        match self {
            AppError::BadRequest(_) => json!({ "code": "BAD_REQUEST" }),
            AppError::RouteNotFound(path) => json!({ "code": "ROUTE_NOT_FOUND", "path": path }),
            AppError::Schedule(err) => schedule_error_data(err),
        }
    }
}

fn schedule_error_data(err: &ScheduleError) -> Value {
    let mut data = Map::new();
    data.insert("code".to_string(), Value::from(err.code()));

    let extra = match err {
        ScheduleError::InvalidInput { field, .. } => json!({ "field": field }),
        ScheduleError::NotFound { entity, id } => json!({ "entity": entity, "id": id }),
        ScheduleError::ClassUnavailable { class } => json!({ "seatClass": class }),
        ScheduleError::CapacityExceeded {
            class,
            requested,
            capacity,
        } => json!({ "seatClass": class, "requested": requested, "capacity": capacity }),
        ScheduleError::OverbookedClass {
            class,
            booked,
            total,
        } => json!({ "seatClass": class, "booked": booked, "total": total }),
        ScheduleError::InvalidPrice { class, price } => {
            json!({ "seatClass": class, "price": price })
        }
        ScheduleError::ScheduleConflict {
            existing,
            turnaround_minutes,
        } => json!({
            "conflictingSchedule": ScheduleDto::from(existing.as_ref().clone()),
            "turnAroundTime": format!("{turnaround_minutes} minutes"),
        }),
        ScheduleError::DuplicateDeparture {
            flight_id,
            departure,
        } => json!({ "flightId": flight_id, "departureDateTime": departure }),
        ScheduleError::DeleteBlocked {
            schedule_id,
            booked,
        } => {
            let booked_seats: Map<String, Value> = booked
                .iter()
                .map(|(class, count)| (class.as_str().to_string(), Value::from(*count)))
                .collect();
            json!({ "scheduleId": schedule_id, "bookedSeats": booked_seats })
        }
        ScheduleError::StoreFailure(e) => json!({ "retryable": e.is_retryable() }),
    };

    if let Value::Object(extra) = extra {
        data.extend(extra);
    }
    Value::Object(data)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = ?self, "request failed");
        } else {
            tracing::debug!(status = %status, error = %self.message(), "request rejected");
        }

        let body = Envelope {
            status: if status.is_server_error() {
                "error".to_string()
            } else {
                "failed".to_string()
            },
            message: self.message(),
            data: Some(self.data()),
        };

        (status, Json(body)).into_response()
    }
}

impl From<ScheduleError> for AppError {
    fn from(err: ScheduleError) -> Self {
        AppError::Schedule(err)
    }
}

impl From<crate::db::repository::RepositoryError> for AppError {
    fn from(err: crate::db::repository::RepositoryError) -> Self {
        AppError::Schedule(ScheduleError::StoreFailure(err))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(format!("Invalid query string: {}", rejection.body_text()))
    }
}
