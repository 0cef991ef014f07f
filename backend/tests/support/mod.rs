#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use flight_schedules::db::{FullRepository, LocalRepository};
use flight_schedules::models::{Flight, FlightId, SeatCapacities, SeatCapacity};
use flight_schedules::services::{
    CreateScheduleRequest, ScheduleLifecycleManager, SeatClassRequest, SeatRequest,
};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// This is panic-safe (restores variables on unwind) and also serializes access to
/// process-global env vars to avoid flaky tests when Rust runs tests in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().expect("ENV_LOCK poisoned");
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

// =============================================================================
// Fixtures
// =============================================================================

/// Flight with economy 80 / business 20 and no first class.
pub fn flight(turnaround_minutes: u32) -> Flight {
    Flight {
        id: FlightId::new_random(),
        flight_number: "AF22".to_string(),
        airline: "Air France".to_string(),
        aircraft_model: "A220-300".to_string(),
        minimum_turnaround_time: turnaround_minutes,
        seat_capacities: SeatCapacities {
            economy: SeatCapacity { total: 80 },
            business: Some(SeatCapacity { total: 20 }),
            first: None,
        },
    }
}

/// RFC3339 instant on 2025-06-01 at `hour:minute` UTC.
pub fn at(hour: u32, minute: u32) -> String {
    format!("2025-06-01T{:02}:{:02}:00Z", hour, minute)
}

pub fn class(total: i64, booked: i64, price: f64) -> SeatClassRequest {
    SeatClassRequest {
        total: Some(total),
        booked: Some(booked),
        price: Some(price),
    }
}

pub fn economy_only(total: i64, price: f64) -> SeatRequest {
    SeatRequest {
        economy: Some(class(total, 0, price)),
        ..Default::default()
    }
}

pub fn create_request(flight_id: FlightId, departure: &str, arrival: &str) -> CreateScheduleRequest {
    CreateScheduleRequest {
        flight_id: Some(flight_id.to_string()),
        departure_date_time: Some(departure.to_string()),
        arrival_date_time: Some(arrival.to_string()),
        seats: Some(economy_only(60, 50.0)),
    }
}

/// Local store seeded with `flights`, plus a manager over it.
pub fn manager_with(flights: Vec<Flight>) -> (Arc<LocalRepository>, ScheduleLifecycleManager) {
    let repo = Arc::new(LocalRepository::with_flights(flights));
    let shared: Arc<dyn FullRepository> = repo.clone();
    (repo, ScheduleLifecycleManager::new(shared))
}
