//! Schedule lifecycle orchestration.
//!
//! Create and update resolve the flight, validate the time window, run the
//! conflict detector, validate seats, and only then write. Delete refuses to
//! remove a schedule that still holds bookings.
//!
//! # Concurrency
//!
//! Conflict detection is check-then-act. Within one process, writes for the
//! same flight are serialized through [`FlightLocks`], held from the conflict
//! check until the store commit. Across processes the store's
//! `(flight_id, departure_date_time)` uniqueness constraint is the only
//! backstop, which does not catch overlapping windows with different
//! departures.

use chrono::{DateTime, Utc};
use log::{error, info, warn};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::OwnedMutexGuard;

use super::seat_inventory::{build_seat_config, merge_seat_config, SeatRequest};
use crate::algorithms::{find_conflict, CandidateWindow};
use crate::db::repository::{FlightCatalog, FullRepository, RepositoryError, ScheduleRepository};
use crate::error::{ScheduleError, ScheduleResult};
use crate::models::{
    parse_instant, Flight, FlightId, NewSchedule, Schedule, ScheduleId, SchedulePatch,
    ScheduleStatus,
};

/// Payload for creating a schedule. Fields are optional so that missing
/// values are reported as invalid input rather than decode failures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateScheduleRequest {
    #[serde(default)]
    pub flight_id: Option<String>,
    #[serde(default)]
    pub departure_date_time: Option<String>,
    #[serde(default)]
    pub arrival_date_time: Option<String>,
    #[serde(default)]
    pub seats: Option<SeatRequest>,
}

/// Partial update payload. Every field is independently optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateScheduleRequest {
    #[serde(default)]
    pub departure_date_time: Option<String>,
    #[serde(default)]
    pub arrival_date_time: Option<String>,
    #[serde(default)]
    pub seats: Option<SeatRequest>,
    #[serde(default)]
    pub status: Option<ScheduleStatus>,
}

impl UpdateScheduleRequest {
    pub fn is_empty(&self) -> bool {
        self.departure_date_time.is_none()
            && self.arrival_date_time.is_none()
            && self.seats.is_none()
            && self.status.is_none()
    }

    fn touches_times(&self) -> bool {
        self.departure_date_time.is_some() || self.arrival_date_time.is_some()
    }
}

/// Result of an update request.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    Updated(Schedule),
    /// Nothing was supplied; the stored record is returned as-is.
    Unchanged(Schedule),
}

impl UpdateOutcome {
    pub fn schedule(&self) -> &Schedule {
        match self {
            UpdateOutcome::Updated(s) | UpdateOutcome::Unchanged(s) => s,
        }
    }

    pub fn into_schedule(self) -> Schedule {
        match self {
            UpdateOutcome::Updated(s) | UpdateOutcome::Unchanged(s) => s,
        }
    }
}

/// A page of schedules plus the store's count for the same filter.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleListing {
    pub schedules: Vec<Schedule>,
    pub total: usize,
}

/// Per-flight async locks serializing writes for the same flight.
#[derive(Default)]
pub struct FlightLocks {
    locks: Mutex<HashMap<FlightId, Arc<tokio::sync::Mutex<()>>>>,
}

impl FlightLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `flight_id`. Released when the guard drops.
    pub async fn acquire(&self, flight_id: FlightId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock();
            Arc::clone(locks.entry(flight_id).or_default())
        };
        lock.lock_owned().await
    }

    /// Number of flights that have been locked at least once.
    #[cfg(test)]
    fn tracked_flights(&self) -> usize {
        self.locks.lock().len()
    }
}

/// Parse a schedule id from a path segment.
pub fn parse_schedule_id(raw: &str) -> ScheduleResult<ScheduleId> {
    raw.parse()
        .map_err(|_| ScheduleError::invalid_field("id", "Invalid schedule ID"))
}

/// Parse a flight id from a request field or query parameter.
pub fn parse_flight_id(raw: &str) -> ScheduleResult<FlightId> {
    raw.parse()
        .map_err(|_| ScheduleError::invalid_field("flightId", "Invalid flight ID"))
}

fn required<'a>(field: &'static str, value: &'a Option<String>) -> ScheduleResult<&'a str> {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ScheduleError::invalid_field(field, format!("{} is required", field)))
}

fn parse_time(field: &'static str, raw: &str) -> ScheduleResult<DateTime<Utc>> {
    parse_instant(raw).map_err(|reason| {
        ScheduleError::invalid_field(
            field,
            format!("Invalid departure or arrival datetime: {}", reason),
        )
    })
}

fn ensure_ordered(departure: DateTime<Utc>, arrival: DateTime<Utc>) -> ScheduleResult<()> {
    if departure >= arrival {
        return Err(ScheduleError::invalid_input(
            "Departure time must be before arrival time",
        ));
    }
    Ok(())
}

fn candidate_window(
    flight: &Flight,
    departure: DateTime<Utc>,
    arrival: DateTime<Utc>,
) -> ScheduleResult<CandidateWindow> {
    CandidateWindow::new(departure, arrival, flight.minimum_turnaround_time).ok_or_else(|| {
        ScheduleError::invalid_field(
            "departureDateTime",
            "Departure time is too early to apply the turnaround buffer",
        )
    })
}

fn duplicate_or_store_failure(
    err: RepositoryError,
    flight_id: FlightId,
    departure: DateTime<Utc>,
) -> ScheduleError {
    if err.is_unique_violation() {
        ScheduleError::DuplicateDeparture {
            flight_id,
            departure,
        }
    } else {
        ScheduleError::StoreFailure(err)
    }
}

/// Orchestrates create/read/update/delete over the store and flight catalog.
pub struct ScheduleLifecycleManager {
    repository: Arc<dyn FullRepository>,
    locks: FlightLocks,
}

impl ScheduleLifecycleManager {
    pub fn new(repository: Arc<dyn FullRepository>) -> Self {
        Self {
            repository,
            locks: FlightLocks::new(),
        }
    }

    async fn resolve_flight(&self, flight_id: FlightId) -> ScheduleResult<Flight> {
        self.repository
            .get_flight_by_id(flight_id)
            .await?
            .ok_or_else(|| ScheduleError::flight_not_found(flight_id))
    }

    async fn check_conflict(
        &self,
        flight: &Flight,
        window: &CandidateWindow,
        exclude: Option<ScheduleId>,
    ) -> ScheduleResult<()> {
        let hit = find_conflict(self.repository.as_ref(), flight.id, window, exclude).await?;
        match hit {
            Some(existing) => {
                warn!(
                    "Rejected window {} - {} for flight {}: overlaps schedule {} ({} min turnaround)",
                    window.departure(),
                    window.arrival(),
                    flight.flight_number,
                    existing.id,
                    window.turnaround_minutes()
                );
                Err(ScheduleError::ScheduleConflict {
                    existing: Box::new(existing),
                    turnaround_minutes: window.turnaround_minutes(),
                })
            }
            None => Ok(()),
        }
    }

    // ==================== Reads ====================

    pub async fn get(&self, schedule_id: ScheduleId) -> ScheduleResult<Schedule> {
        self.repository
            .find_schedule(schedule_id)
            .await?
            .ok_or_else(|| ScheduleError::schedule_not_found(schedule_id))
    }

    pub async fn list(&self, flight_id: Option<FlightId>) -> ScheduleResult<ScheduleListing> {
        let schedules = self.repository.list_schedules(flight_id).await?;
        let total = self.repository.count(flight_id).await?;
        Ok(ScheduleListing { schedules, total })
    }

    // ==================== Writes ====================

    pub async fn create(&self, request: CreateScheduleRequest) -> ScheduleResult<Schedule> {
        let flight_id = parse_flight_id(required("flightId", &request.flight_id)?)?;
        let flight = self.resolve_flight(flight_id).await?;

        let departure = parse_time(
            "departureDateTime",
            required("departureDateTime", &request.departure_date_time)?,
        )?;
        let arrival = parse_time(
            "arrivalDateTime",
            required("arrivalDateTime", &request.arrival_date_time)?,
        )?;
        ensure_ordered(departure, arrival)?;

        let _guard = self.locks.acquire(flight_id).await;

        let window = candidate_window(&flight, departure, arrival)?;
        self.check_conflict(&flight, &window, None).await?;

        let seats = build_seat_config(
            &request.seats.unwrap_or_default(),
            &flight.seat_capacities,
        )?;

        let stored = self
            .repository
            .insert_schedule(NewSchedule {
                flight_id,
                departure_date_time: departure,
                arrival_date_time: arrival,
                seats,
                status: ScheduleStatus::Scheduled,
            })
            .await
            .map_err(|e| duplicate_or_store_failure(e, flight_id, departure))?;

        info!(
            "Created schedule {} for flight {} ({} - {})",
            stored.id, flight.flight_number, departure, arrival
        );
        Ok(stored)
    }

    pub async fn update(
        &self,
        schedule_id: ScheduleId,
        request: UpdateScheduleRequest,
    ) -> ScheduleResult<UpdateOutcome> {
        let current = self.get(schedule_id).await?;
        if request.is_empty() {
            return Ok(UpdateOutcome::Unchanged(current));
        }

        let flight = match self.repository.get_flight_by_id(current.flight_id).await? {
            Some(flight) => flight,
            None => {
                error!(
                    "Schedule {} references missing flight {}",
                    schedule_id, current.flight_id
                );
                return Err(ScheduleError::flight_not_found(current.flight_id));
            }
        };

        let _guard = self.locks.acquire(flight.id).await;
        // Re-read under the lock; another writer may have changed it.
        let current = self.get(schedule_id).await?;

        let mut patch = SchedulePatch {
            status: request.status,
            ..Default::default()
        };

        if request.touches_times() {
            let departure = request
                .departure_date_time
                .as_deref()
                .map(|raw| parse_time("departureDateTime", raw))
                .transpose()?;
            let arrival = request
                .arrival_date_time
                .as_deref()
                .map(|raw| parse_time("arrivalDateTime", raw))
                .transpose()?;

            let effective_departure = departure.unwrap_or(current.departure_date_time);
            let effective_arrival = arrival.unwrap_or(current.arrival_date_time);
            ensure_ordered(effective_departure, effective_arrival)?;

            let window = candidate_window(&flight, effective_departure, effective_arrival)?;
            self.check_conflict(&flight, &window, Some(schedule_id)).await?;

            patch.departure_date_time = departure;
            patch.arrival_date_time = arrival;
        }

        if let Some(seats) = request.seats.as_ref() {
            patch.seats = Some(merge_seat_config(
                seats,
                &flight.seat_capacities,
                &current.seats,
            )?);
        }

        let effective_departure = patch
            .departure_date_time
            .unwrap_or(current.departure_date_time);
        let updated = self
            .repository
            .update_schedule(schedule_id, patch)
            .await
            .map_err(|e| duplicate_or_store_failure(e, flight.id, effective_departure))?
            .ok_or_else(|| ScheduleError::schedule_not_found(schedule_id))?;

        info!("Updated schedule {} (status {})", schedule_id, updated.status);
        Ok(UpdateOutcome::Updated(updated))
    }

    pub async fn delete(&self, schedule_id: ScheduleId) -> ScheduleResult<Schedule> {
        let current = self.get(schedule_id).await?;

        let _guard = self.locks.acquire(current.flight_id).await;
        let current = self.get(schedule_id).await?;

        let booked = current.seats.booked_classes();
        if !booked.is_empty() {
            warn!(
                "Refusing to delete schedule {}: {} class(es) hold bookings",
                schedule_id,
                booked.len()
            );
            return Err(ScheduleError::DeleteBlocked {
                schedule_id,
                booked,
            });
        }

        let removed = self
            .repository
            .delete_schedule(schedule_id)
            .await?
            .ok_or_else(|| ScheduleError::schedule_not_found(schedule_id))?;

        info!("Deleted schedule {}", schedule_id);
        Ok(removed)
    }
}
