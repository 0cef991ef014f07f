//! Error taxonomy for schedule operations.
//!
//! Every validation failure is raised before any write, so a rejected
//! operation leaves the store unchanged. Store failures are wrapped as-is.

use chrono::{DateTime, Utc};

use crate::db::repository::RepositoryError;
use crate::models::{FlightId, Schedule, ScheduleId, SeatClass};
use crate::services::seat_inventory::SeatInventoryError;

/// Result type for schedule operations.
pub type ScheduleResult<T> = Result<T, ScheduleError>;

#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    /// Malformed or missing field, bad datetime, or ordering violation.
    #[error("{message}")]
    InvalidInput {
        field: Option<&'static str>,
        message: String,
    },

    #[error("{entity} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("No {class} class is available on this flight")]
    ClassUnavailable { class: SeatClass },

    #[error("We only have {capacity} {class} seats available but {requested} were requested")]
    CapacityExceeded {
        class: SeatClass,
        requested: u64,
        capacity: u32,
    },

    #[error("{class} booked ({booked}) cannot exceed total ({total})")]
    OverbookedClass {
        class: SeatClass,
        booked: u64,
        total: u64,
    },

    #[error("{class} seat price is required and must be a non-negative number")]
    InvalidPrice { class: SeatClass, price: Option<f64> },

    /// The candidate's buffered interval overlaps an existing schedule.
    #[error("Schedule conflict: another schedule overlaps this time range")]
    ScheduleConflict {
        existing: Box<Schedule>,
        turnaround_minutes: u32,
    },

    /// The store rejected a second schedule with the same flight and departure.
    #[error("Schedule conflict: flight {flight_id} already departs at {departure}")]
    DuplicateDeparture {
        flight_id: FlightId,
        departure: DateTime<Utc>,
    },

    #[error("Cannot delete schedule {schedule_id}: active bookings exist")]
    DeleteBlocked {
        schedule_id: ScheduleId,
        booked: Vec<(SeatClass, u32)>,
    },

    #[error("Store failure: {0}")]
    StoreFailure(#[from] RepositoryError),
}

impl ScheduleError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: None,
            message: message.into(),
        }
    }

    pub fn invalid_field(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: Some(field),
            message: message.into(),
        }
    }

    pub fn flight_not_found(flight_id: FlightId) -> Self {
        Self::NotFound {
            entity: "Flight",
            id: flight_id.to_string(),
        }
    }

    pub fn schedule_not_found(schedule_id: ScheduleId) -> Self {
        Self::NotFound {
            entity: "Schedule",
            id: schedule_id.to_string(),
        }
    }

    /// Machine-readable code for API clients.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput { .. } => "INVALID_INPUT",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::ClassUnavailable { .. } => "CLASS_UNAVAILABLE",
            Self::CapacityExceeded { .. } => "CAPACITY_EXCEEDED",
            Self::OverbookedClass { .. } => "OVERBOOKED_CLASS",
            Self::InvalidPrice { .. } => "INVALID_PRICE",
            Self::ScheduleConflict { .. } | Self::DuplicateDeparture { .. } => "SCHEDULE_CONFLICT",
            Self::DeleteBlocked { .. } => "DELETE_BLOCKED",
            Self::StoreFailure(_) => "STORE_FAILURE",
        }
    }
}

impl From<SeatInventoryError> for ScheduleError {
    fn from(err: SeatInventoryError) -> Self {
        match err {
            SeatInventoryError::MissingRequiredClass { .. }
            | SeatInventoryError::MissingTotal { .. }
            | SeatInventoryError::NegativeCount { .. }
            | SeatInventoryError::EmptyEconomy => {
                ScheduleError::invalid_field("seats", err.to_string())
            }
            SeatInventoryError::ClassUnavailable { class } => {
                ScheduleError::ClassUnavailable { class }
            }
            SeatInventoryError::CapacityExceeded {
                class,
                requested,
                capacity,
            } => ScheduleError::CapacityExceeded {
                class,
                requested,
                capacity,
            },
            SeatInventoryError::OverbookedClass {
                class,
                booked,
                total,
            } => ScheduleError::OverbookedClass {
                class,
                booked,
                total,
            },
            SeatInventoryError::InvalidPrice { class, price } => {
                ScheduleError::InvalidPrice { class, price }
            }
        }
    }
}
