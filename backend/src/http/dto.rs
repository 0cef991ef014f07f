//! Data Transfer Objects for the HTTP API.
//!
//! Request payloads are the service-layer request types. Responses wrap a
//! schedule view that adds the derived `available` seat count.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use crate::services::{
    CreateScheduleRequest, SeatClassRequest, SeatRequest, UpdateScheduleRequest,
};

use crate::models::{FlightId, Schedule, ScheduleId, ScheduleStatus, SeatClassState, SeatMap};

/// Response envelope shared by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// `success`, `failed` (client error) or `error` (server error)
    pub status: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            status: "success".to_string(),
            message: message.into(),
            data: Some(data),
        }
    }
}

/// Seat class with the derived availability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeatClassDto {
    pub total: u32,
    pub booked: u32,
    pub price: f64,
    pub available: u32,
}

impl From<SeatClassState> for SeatClassDto {
    fn from(state: SeatClassState) -> Self {
        Self {
            total: state.total,
            booked: state.booked,
            price: state.price,
            available: state.available(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeatMapDto {
    pub economy: SeatClassDto,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business: Option<SeatClassDto>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first: Option<SeatClassDto>,
}

impl From<SeatMap> for SeatMapDto {
    fn from(seats: SeatMap) -> Self {
        Self {
            economy: seats.economy.into(),
            business: seats.business.map(Into::into),
            first: seats.first.map(Into::into),
        }
    }
}

/// Schedule as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleDto {
    pub id: ScheduleId,
    pub flight_id: FlightId,
    pub departure_date_time: DateTime<Utc>,
    pub arrival_date_time: DateTime<Utc>,
    pub seats: SeatMapDto,
    pub status: ScheduleStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Schedule> for ScheduleDto {
    fn from(schedule: Schedule) -> Self {
        Self {
            id: schedule.id,
            flight_id: schedule.flight_id,
            departure_date_time: schedule.departure_date_time,
            arrival_date_time: schedule.arrival_date_time,
            seats: schedule.seats.into(),
            status: schedule.status,
            created_at: schedule.created_at,
            updated_at: schedule.updated_at,
        }
    }
}

/// Response for listing schedules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleListResponse {
    pub schedules: Vec<ScheduleDto>,
    /// Store count for the same filter
    pub total: usize,
}

/// Query parameters for the list endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSchedulesQuery {
    /// Restrict the listing to one flight
    #[serde(default)]
    pub flight_id: Option<String>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Store status
    pub database: String,
}
