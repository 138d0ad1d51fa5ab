//! Web layer for the seat watchdog.
//!
//! Provides HTTP endpoints for browsing routes, registering watches and
//! previewing seat-change alternatives.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
