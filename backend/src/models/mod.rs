pub mod flight;
pub mod macros;
pub mod schedule;
pub mod time;

pub use flight::*;
pub use schedule::*;
pub use time::parse_instant;
