//! Domain types for timetable boards.
//!
//! Times are validated at construction, so code holding a `DepartureTime`
//! can compare it without re-checking the format.

mod departure;
mod error;
mod filter;
mod page;
mod time;

pub use departure::Departure;
pub use error::{BoardError, EntityKind};
pub use filter::{BusFilter, FilterId, FilterPatch};
pub use page::{PLACEHOLDER_STOP_NAME, Page, PageId, PageInit, PagePatch, Theme};
pub use time::{DepartureTime, TimeError, parse_time_floor};
