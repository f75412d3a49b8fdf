//! Colabdocs API Library
//!
//! HTTP handlers, error responses and application setup for the
//! collaborator import service.

pub mod constants;
pub mod error;
mod handlers;
pub mod setup;
pub mod state;
mod telemetry;
mod utils;

pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
