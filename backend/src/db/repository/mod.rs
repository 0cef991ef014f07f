//! Repository trait definitions for database operations.
//!
//! # Module Organization
//!
//! - [`error`]: Error types for repository operations
//! - [`schedule`]: Schedule store (CRUD, overlap queries, count)
//! - [`flight`]: Read-only flight catalog lookups
//!
//! # Convenience Trait Bound
//!
//! For code that needs both the store and the catalog, use [`FullRepository`]:
//!
//! ```ignore
//! async fn my_service<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<()> {
//!     let flight = repo.get_flight_by_id(flight_id).await?;
//!     let total = repo.count(None).await?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod flight;
pub mod schedule;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

pub use flight::FlightCatalog;
pub use schedule::ScheduleRepository;

/// Composite trait bound for a complete repository implementation.
pub trait FullRepository: ScheduleRepository + FlightCatalog {}

// Blanket implementation: any type implementing both traits is a FullRepository
impl<T> FullRepository for T where T: ScheduleRepository + FlightCatalog {}
