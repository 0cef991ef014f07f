//! Flight catalog trait.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{Flight, FlightId};

/// Read-only access to flights. The scheduling core never mutates flights.
#[async_trait]
pub trait FlightCatalog: Send + Sync {
    /// Look up a flight.
    ///
    /// # Returns
    /// * `Ok(Some(Flight))` - The flight with its capacities and turnaround
    /// * `Ok(None)` - If no flight has this id
    /// * `Err(RepositoryError)` - If the catalog could not be queried
    async fn get_flight_by_id(&self, flight_id: FlightId) -> RepositoryResult<Option<Flight>>;
}
