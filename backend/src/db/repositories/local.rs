//! In-memory local repository implementation.
//!
//! Implements both the schedule store and the flight catalog with HashMaps
//! behind a single lock, so every write is atomic and the
//! `(flight_id, departure_date_time)` uniqueness check happens under the
//! same lock as the write.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::algorithms::OverlapQuery;
use crate::db::repository::*;
use crate::models::{Flight, FlightId, NewSchedule, Schedule, ScheduleId, SchedulePatch};

/// In-memory local repository.
///
/// # Example
/// ```
/// use flight_schedules::db::repositories::LocalRepository;
/// use flight_schedules::db::repository::ScheduleRepository;
///
/// # tokio_test_block_on(async {
/// let repo = LocalRepository::new();
/// assert_eq!(repo.count(None).await.unwrap(), 0);
/// # });
/// # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Runtime::new().unwrap().block_on(f)
/// # }
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    schedules: HashMap<ScheduleId, Schedule>,
    flights: HashMap<FlightId, Flight>,

    // Connection health
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            schedules: HashMap::new(),
            flights: HashMap::new(),
            is_healthy: true,
        }
    }
}

impl LocalData {
    fn departure_taken(
        &self,
        flight_id: FlightId,
        departure: DateTime<Utc>,
        ignore: Option<ScheduleId>,
    ) -> Option<ScheduleId> {
        self.schedules
            .values()
            .find(|s| {
                s.flight_id == flight_id
                    && s.departure_date_time == departure
                    && Some(s.id) != ignore
            })
            .map(|s| s.id)
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Create a repository whose catalog already holds `flights`.
    pub fn with_flights(flights: impl IntoIterator<Item = Flight>) -> Self {
        let repo = Self::new();
        for flight in flights {
            repo.insert_flight(flight);
        }
        repo
    }

    /// Add or replace a flight in the catalog.
    pub fn insert_flight(&self, flight: Flight) {
        self.data.write().flights.insert(flight.id, flight);
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Get the number of schedules stored.
    pub fn schedule_count(&self) -> usize {
        self.data.read().schedules.len()
    }

    /// Check if a schedule exists.
    pub fn has_schedule(&self, schedule_id: ScheduleId) -> bool {
        self.data.read().schedules.contains_key(&schedule_id)
    }

    /// Helper to check health and return error if unhealthy.
    fn check_health(&self, operation: &str) -> RepositoryResult<()> {
        if !self.data.read().is_healthy {
            return Err(RepositoryError::connection_with_context(
                "Database is not healthy",
                ErrorContext::new(operation),
            ));
        }
        Ok(())
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn sorted_by_departure(mut schedules: Vec<Schedule>) -> Vec<Schedule> {
    schedules.sort_by(|a, b| {
        a.departure_date_time
            .cmp(&b.departure_date_time)
            .then_with(|| a.id.cmp(&b.id))
    });
    schedules
}

#[async_trait]
impl ScheduleRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn find_schedule(&self, schedule_id: ScheduleId) -> RepositoryResult<Option<Schedule>> {
        self.check_health("find_schedule")?;
        Ok(self.data.read().schedules.get(&schedule_id).cloned())
    }

    async fn find_overlapping(&self, query: &OverlapQuery) -> RepositoryResult<Vec<Schedule>> {
        self.check_health("find_overlapping")?;
        let data = self.data.read();
        let hits = data
            .schedules
            .values()
            .filter(|s| query.matches(s))
            .cloned()
            .collect();
        Ok(sorted_by_departure(hits))
    }

    async fn list_schedules(&self, flight_id: Option<FlightId>) -> RepositoryResult<Vec<Schedule>> {
        self.check_health("list_schedules")?;
        let data = self.data.read();
        let schedules = data
            .schedules
            .values()
            .filter(|s| flight_id.map_or(true, |f| s.flight_id == f))
            .cloned()
            .collect();
        Ok(sorted_by_departure(schedules))
    }

    async fn count(&self, flight_id: Option<FlightId>) -> RepositoryResult<usize> {
        self.check_health("count")?;
        let data = self.data.read();
        Ok(match flight_id {
            Some(f) => data.schedules.values().filter(|s| s.flight_id == f).count(),
            None => data.schedules.len(),
        })
    }

    async fn insert_schedule(&self, schedule: NewSchedule) -> RepositoryResult<Schedule> {
        self.check_health("insert_schedule")?;
        let mut data = self.data.write();

        if let Some(existing) =
            data.departure_taken(schedule.flight_id, schedule.departure_date_time, None)
        {
            return Err(RepositoryError::unique_violation_with_context(
                "a schedule for this flight already departs at this time",
                ErrorContext::new("insert_schedule")
                    .with_entity("schedule")
                    .with_entity_id(existing),
            ));
        }

        let now = Utc::now();
        let stored = Schedule {
            id: ScheduleId::new_random(),
            flight_id: schedule.flight_id,
            departure_date_time: schedule.departure_date_time,
            arrival_date_time: schedule.arrival_date_time,
            seats: schedule.seats,
            status: schedule.status,
            created_at: now,
            updated_at: now,
        };
        data.schedules.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn update_schedule(
        &self,
        schedule_id: ScheduleId,
        patch: SchedulePatch,
    ) -> RepositoryResult<Option<Schedule>> {
        self.check_health("update_schedule")?;
        let mut data = self.data.write();

        let Some(current) = data.schedules.get(&schedule_id) else {
            return Ok(None);
        };

        if let Some(departure) = patch.departure_date_time {
            if let Some(existing) =
                data.departure_taken(current.flight_id, departure, Some(schedule_id))
            {
                return Err(RepositoryError::unique_violation_with_context(
                    "a schedule for this flight already departs at this time",
                    ErrorContext::new("update_schedule")
                        .with_entity("schedule")
                        .with_entity_id(existing),
                ));
            }
        }

        let mut updated = current.clone();
        patch.apply_to(&mut updated);
        updated.updated_at = Utc::now();
        data.schedules.insert(schedule_id, updated.clone());
        Ok(Some(updated))
    }

    async fn delete_schedule(&self, schedule_id: ScheduleId) -> RepositoryResult<Option<Schedule>> {
        self.check_health("delete_schedule")?;
        Ok(self.data.write().schedules.remove(&schedule_id))
    }
}

#[async_trait]
impl FlightCatalog for LocalRepository {
    async fn get_flight_by_id(&self, flight_id: FlightId) -> RepositoryResult<Option<Flight>> {
        self.check_health("get_flight_by_id")?;
        Ok(self.data.read().flights.get(&flight_id).cloned())
    }
}
