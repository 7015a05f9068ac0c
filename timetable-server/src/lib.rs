//! Bus timetable board server.
//!
//! Users keep projects of printable departure boards, one board per stop.
//! Each board shows at most eleven upcoming departures, narrowed by the
//! project's bus filters and time floor.

pub mod board;
pub mod cache;
pub mod config;
pub mod domain;
pub mod quota;
pub mod schedule;
pub mod store;
pub mod web;
