//! Turnaround-aware overlap detection between schedules of the same flight.
//!
//! A candidate window `[departure, arrival]` is widened on its departure
//! side by the flight's minimum turnaround time:
//!
//! ```text
//!            buffer
//!   |<-------------------->|
//!   buffered_departure     departure ............ arrival
//! ```
//!
//! An existing schedule `S` collides iff
//! `S.departure <= candidate.arrival && S.arrival >= buffered_departure`.
//! Both bounds are inclusive, so touching intervals collide. The buffer is
//! only applied to the candidate; a later schedule gets its own buffer when it
//! is the candidate.

use chrono::{DateTime, Duration, Utc};
use log::debug;

use crate::db::repository::{RepositoryResult, ScheduleRepository};
use crate::models::{FlightId, Schedule, ScheduleId};

/// Milliseconds in one minute of turnaround.
pub const MILLIS_PER_MINUTE: i64 = 60_000;

/// A candidate departure/arrival window plus the turnaround buffer applied to it.
///
/// Callers must ensure `departure < arrival` before building a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateWindow {
    departure: DateTime<Utc>,
    arrival: DateTime<Utc>,
    turnaround_minutes: u32,
    buffered_departure: DateTime<Utc>,
}

fn turnaround_buffer(turnaround_minutes: u32) -> Duration {
    Duration::milliseconds(i64::from(turnaround_minutes) * MILLIS_PER_MINUTE)
}

impl CandidateWindow {
    /// Build a window, or `None` when `departure - turnaround` falls before
    /// the earliest representable instant.
    pub fn new(
        departure: DateTime<Utc>,
        arrival: DateTime<Utc>,
        turnaround_minutes: u32,
    ) -> Option<Self> {
        let buffered_departure =
            departure.checked_sub_signed(turnaround_buffer(turnaround_minutes))?;
        Some(Self {
            departure,
            arrival,
            turnaround_minutes,
            buffered_departure,
        })
    }

    pub fn departure(&self) -> DateTime<Utc> {
        self.departure
    }

    pub fn arrival(&self) -> DateTime<Utc> {
        self.arrival
    }

    pub fn turnaround_minutes(&self) -> u32 {
        self.turnaround_minutes
    }

    pub fn buffer(&self) -> Duration {
        turnaround_buffer(self.turnaround_minutes)
    }

    /// Left edge of the buffered interval.
    pub fn buffered_departure(&self) -> DateTime<Utc> {
        self.buffered_departure
    }

    /// Store query selecting every schedule of `flight_id` that may collide.
    pub fn overlap_query(&self, flight_id: FlightId, exclude: Option<ScheduleId>) -> OverlapQuery {
        OverlapQuery {
            flight_id,
            departs_no_later_than: self.arrival,
            arrives_no_earlier_than: self.buffered_departure,
            exclude,
        }
    }
}

/// Time-range predicate handed to the schedule store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlapQuery {
    pub flight_id: FlightId,
    pub departs_no_later_than: DateTime<Utc>,
    pub arrives_no_earlier_than: DateTime<Utc>,
    pub exclude: Option<ScheduleId>,
}

impl OverlapQuery {
    pub fn matches(&self, schedule: &Schedule) -> bool {
        schedule.flight_id == self.flight_id
            && Some(schedule.id) != self.exclude
            && schedule.departure_date_time <= self.departs_no_later_than
            && schedule.arrival_date_time >= self.arrives_no_earlier_than
    }
}

/// Return the first existing schedule that collides with `window`.
///
/// Schedules of other flights and the excluded id are ignored.
pub fn first_conflict<'a, I>(
    existing: I,
    flight_id: FlightId,
    window: &CandidateWindow,
    exclude: Option<ScheduleId>,
) -> Option<&'a Schedule>
where
    I: IntoIterator<Item = &'a Schedule>,
{
    let query = window.overlap_query(flight_id, exclude);
    existing.into_iter().find(|s| query.matches(s))
}

/// Look up a colliding schedule for `flight_id` through the store.
///
/// Read-only. When several schedules collide, whichever the store returns
/// first is reported.
pub async fn find_conflict<R>(
    store: &R,
    flight_id: FlightId,
    window: &CandidateWindow,
    exclude: Option<ScheduleId>,
) -> RepositoryResult<Option<Schedule>>
where
    R: ScheduleRepository + ?Sized,
{
    let query = window.overlap_query(flight_id, exclude);
    debug!(
        "conflict query: flight={} departs<={} arrives>={} exclude={:?}",
        flight_id, query.departs_no_later_than, query.arrives_no_earlier_than, exclude
    );

    let candidates = store.find_overlapping(&query).await?;
    Ok(first_conflict(candidates.iter(), flight_id, window, exclude).cloned())
}
