//! # Flight Schedules
//!
//! Flight schedule management: concrete departure/arrival instances of a
//! flight, each carrying per-class seat inventory.
//!
//! ## Features
//!
//! - **Conflict Detection**: turnaround-aware overlap checks between schedules
//!   of the same flight
//! - **Seat Inventory**: `booked <= total <= capacity` per class across
//!   create, partial update and delete
//! - **HTTP API**: RESTful CRUD endpoints under `/api/v1/schedules`
//!
//! ## Architecture
//!
//! - [`models`]: Flights, schedules, seat maps, identifiers
//! - [`algorithms`]: Pure conflict detection
//! - [`services`]: Seat validation and lifecycle orchestration
//! - [`db`]: Repository traits and the in-memory backend
//! - [`error`]: Error taxonomy returned by schedule operations
//! - [`http`]: Axum-based HTTP server and request handlers

pub mod algorithms;
pub mod db;
pub mod error;
pub mod models;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;

pub use error::{ScheduleError, ScheduleResult};
