//! HTTP server module.
//!
//! Exposes the schedule lifecycle as a REST API. Handlers are thin adapters:
//! they decode requests, call [`ScheduleLifecycleManager`](crate::services::ScheduleLifecycleManager)
//! and wrap results in the `{status, message, data}` envelope.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  HTTP Layer (axum handlers)                               │
//! │  - Request parsing and id validation                      │
//! │  - JSON envelope, status code mapping                     │
//! │  - CORS, compression, tracing                             │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Service Layer (services/)                                │
//! │  - Conflict detection, seat validation                    │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Repository Layer (db/)                                   │
//! │  - Schedule store, flight catalog                         │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;
