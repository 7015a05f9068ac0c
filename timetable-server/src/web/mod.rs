//! Web layer for the timetable boards.
//!
//! JSON endpoints for every board operation, with HTML fragments for
//! clients that ask for them, plus the dashboard and print views.

mod dto;
mod error;
mod identity;
mod routes;
mod state;
pub mod templates;


pub use dto::*;
pub use error::AppError;
pub use identity::{Principal, USER_EMAIL_HEADER};
pub use routes::create_router;
pub use state::{AppState, SharedSession};
pub use templates::*;
