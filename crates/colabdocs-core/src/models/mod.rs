//! Data models for the application
//!
//! Each sub-module represents one persisted entity or response payload.

mod collaborator;
mod document;
mod import;

pub use collaborator::*;
pub use document::*;
pub use import::*;
