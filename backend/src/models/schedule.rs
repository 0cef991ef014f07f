//! Schedule entities: concrete departure/arrival instances of a flight with
//! per-class seat inventory.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::flight::FlightId;
use crate::define_id_type;

define_id_type!(ScheduleId);

/// The closed set of seat classes tracked on a schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatClass {
    Economy,
    Business,
    First,
}

impl SeatClass {
    /// All classes in validation order.
    pub const ALL: [SeatClass; 3] = [SeatClass::Economy, SeatClass::Business, SeatClass::First];

    pub fn as_str(&self) -> &'static str {
        match self {
            SeatClass::Economy => "economy",
            SeatClass::Business => "business",
            SeatClass::First => "first",
        }
    }
}

impl std::fmt::Display for SeatClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inventory of one seat class on one schedule.
///
/// Invariant after every mutation: `booked <= total <= flight capacity`
/// and `price` is finite and non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeatClassState {
    pub total: u32,
    pub booked: u32,
    pub price: f64,
}

impl SeatClassState {
    /// Seats still open for booking.
    pub fn available(&self) -> u32 {
        self.total.saturating_sub(self.booked)
    }
}

/// Seat inventory per class. Economy is mandatory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeatMap {
    pub economy: SeatClassState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business: Option<SeatClassState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first: Option<SeatClassState>,
}

impl SeatMap {
    pub fn get(&self, class: SeatClass) -> Option<&SeatClassState> {
        match class {
            SeatClass::Economy => Some(&self.economy),
            SeatClass::Business => self.business.as_ref(),
            SeatClass::First => self.first.as_ref(),
        }
    }

    pub fn set(&mut self, class: SeatClass, state: SeatClassState) {
        match class {
            SeatClass::Economy => self.economy = state,
            SeatClass::Business => self.business = Some(state),
            SeatClass::First => self.first = Some(state),
        }
    }

    /// Present classes in `SeatClass::ALL` order.
    pub fn iter(&self) -> impl Iterator<Item = (SeatClass, &SeatClassState)> + '_ {
        SeatClass::ALL
            .into_iter()
            .filter_map(move |class| self.get(class).map(|state| (class, state)))
    }

    /// Classes that still hold at least one booking, with their booked count.
    pub fn booked_classes(&self) -> Vec<(SeatClass, u32)> {
        self.iter()
            .filter(|(_, state)| state.booked > 0)
            .map(|(class, state)| (class, state.booked))
            .collect()
    }
}

/// Operational status of a schedule. Any value may be set on update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScheduleStatus {
    #[default]
    Scheduled,
    Boarding,
    Departed,
    InAir,
    Landed,
    Delayed,
    Canceled,
}

impl ScheduleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduleStatus::Scheduled => "scheduled",
            ScheduleStatus::Boarding => "boarding",
            ScheduleStatus::Departed => "departed",
            ScheduleStatus::InAir => "in-air",
            ScheduleStatus::Landed => "landed",
            ScheduleStatus::Delayed => "delayed",
            ScheduleStatus::Canceled => "canceled",
        }
    }
}

impl std::fmt::Display for ScheduleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub id: ScheduleId,
    pub flight_id: FlightId,
    pub departure_date_time: DateTime<Utc>,
    pub arrival_date_time: DateTime<Utc>,
    pub seats: SeatMap,
    pub status: ScheduleStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A fully validated schedule ready for insertion. The store assigns the id
/// and timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSchedule {
    pub flight_id: FlightId,
    pub departure_date_time: DateTime<Utc>,
    pub arrival_date_time: DateTime<Utc>,
    pub seats: SeatMap,
    pub status: ScheduleStatus,
}

/// Partial replacement of a schedule. Only `Some` fields are written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchedulePatch {
    pub departure_date_time: Option<DateTime<Utc>>,
    pub arrival_date_time: Option<DateTime<Utc>>,
    pub seats: Option<SeatMap>,
    pub status: Option<ScheduleStatus>,
}

impl SchedulePatch {
    /// Write the supplied fields into `schedule`.
    pub fn apply_to(&self, schedule: &mut Schedule) {
        if let Some(departure) = self.departure_date_time {
            schedule.departure_date_time = departure;
        }
        if let Some(arrival) = self.arrival_date_time {
            schedule.arrival_date_time = arrival;
        }
        if let Some(seats) = self.seats {
            schedule.seats = seats;
        }
        if let Some(status) = self.status {
            schedule.status = status;
        }
    }
}
