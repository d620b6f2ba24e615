//! Web layer for the schedule proxy.
//!
//! Maps `/api/horarios` requests onto the ADIF adapter and serializes the
//! result or a structured error.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
