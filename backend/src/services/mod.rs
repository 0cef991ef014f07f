//! Service layer for business logic and orchestration.
//!
//! Services sit between the HTTP layer and the repositories:
//! - [`seat_inventory`]: seat configuration validation and merging
//! - [`schedule_lifecycle`]: create/read/update/delete orchestration

pub mod schedule_lifecycle;
pub mod seat_inventory;

pub use schedule_lifecycle::{
    parse_flight_id, parse_schedule_id, CreateScheduleRequest, FlightLocks, ScheduleLifecycleManager,
    ScheduleListing, UpdateOutcome, UpdateScheduleRequest,
};
pub use seat_inventory::{
    build_seat_config, merge_seat_config, SeatClassRequest, SeatInventoryError, SeatRequest,
};
