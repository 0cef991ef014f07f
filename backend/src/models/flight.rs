//! Flight catalog entities.
//!
//! Flights are read-only to the scheduling core: it only consults the
//! per-class seat capacity and the minimum turnaround time.

use serde::{Deserialize, Serialize};

use super::schedule::SeatClass;
use crate::define_id_type;

define_id_type!(FlightId);

/// Lower bound on ground time between a landing and the next departure.
pub const MIN_TURNAROUND_MINUTES: u32 = 30;

/// Capacity offered by a flight for a single seat class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatCapacity {
    pub total: u32,
}

/// Seat capacity per class. A class the flight does not offer is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatCapacities {
    pub economy: SeatCapacity,
    #[serde(default)]
    pub business: Option<SeatCapacity>,
    #[serde(default)]
    pub first: Option<SeatCapacity>,
}

impl SeatCapacities {
    /// Capacity for `class`, or `None` when the flight does not offer it.
    pub fn for_class(&self, class: SeatClass) -> Option<u32> {
        match class {
            SeatClass::Economy => Some(self.economy.total),
            SeatClass::Business => self.business.map(|c| c.total),
            SeatClass::First => self.first.map(|c| c.total),
        }
    }
}

fn default_turnaround() -> u32 {
    MIN_TURNAROUND_MINUTES
}

/// A flight as exposed by the flight catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flight {
    pub id: FlightId,
    pub flight_number: String,
    #[serde(default)]
    pub airline: String,
    #[serde(default)]
    pub aircraft_model: String,
    /// Minimum ground time in minutes before the aircraft can depart again.
    #[serde(default = "default_turnaround")]
    pub minimum_turnaround_time: u32,
    pub seat_capacities: SeatCapacities,
}

impl Flight {
    /// Check catalog-level invariants before a flight is loaded.
    pub fn validate(&self) -> Result<(), String> {
        if self.flight_number.trim().is_empty() {
            return Err(format!("flight {} has an empty flight number", self.id));
        }
        if self.minimum_turnaround_time < MIN_TURNAROUND_MINUTES {
            return Err(format!(
                "flight {} turnaround of {} minutes is below the {} minute minimum",
                self.flight_number, self.minimum_turnaround_time, MIN_TURNAROUND_MINUTES
            ));
        }
        Ok(())
    }
}
