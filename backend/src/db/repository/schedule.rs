//! Schedule store trait.
//!
//! The store is the sole owner of persisted schedules. Writes are atomic per
//! call, and `insert_schedule`/`update_schedule` must enforce uniqueness of
//! `(flight_id, departure_date_time)`, failing with
//! [`RepositoryError::UniqueViolation`](super::RepositoryError::UniqueViolation).

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::algorithms::OverlapQuery;
use crate::models::{FlightId, NewSchedule, Schedule, ScheduleId, SchedulePatch};

/// Repository trait for schedule persistence.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    // ==================== Health & Connection ====================

    /// Check if the store is reachable.
    async fn health_check(&self) -> RepositoryResult<bool>;

    // ==================== Reads ====================

    /// Retrieve a schedule by id, `Ok(None)` when absent.
    async fn find_schedule(&self, schedule_id: ScheduleId) -> RepositoryResult<Option<Schedule>>;

    /// All schedules matching the overlap predicate, in store order.
    async fn find_overlapping(&self, query: &OverlapQuery) -> RepositoryResult<Vec<Schedule>>;

    /// List schedules ordered by departure, optionally for one flight only.
    async fn list_schedules(&self, flight_id: Option<FlightId>) -> RepositoryResult<Vec<Schedule>>;

    /// Number of stored schedules, optionally for one flight only.
    async fn count(&self, flight_id: Option<FlightId>) -> RepositoryResult<usize>;

    // ==================== Writes ====================

    /// Insert a schedule, assigning its id and timestamps.
    async fn insert_schedule(&self, schedule: NewSchedule) -> RepositoryResult<Schedule>;

    /// Replace only the fields present in `patch`.
    ///
    /// # Returns
    /// * `Ok(Some(Schedule))` - The updated record
    /// * `Ok(None)` - If the schedule no longer exists
    async fn update_schedule(
        &self,
        schedule_id: ScheduleId,
        patch: SchedulePatch,
    ) -> RepositoryResult<Option<Schedule>>;

    /// Remove a schedule and return it, `Ok(None)` when absent.
    async fn delete_schedule(&self, schedule_id: ScheduleId) -> RepositoryResult<Option<Schedule>>;
}
