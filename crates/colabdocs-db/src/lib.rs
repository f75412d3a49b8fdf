//! Colabdocs Database Layer
//!
//! Postgres repositories for collaborators and their documents, plus the
//! `CollaboratorStore` trait the import orchestrator writes through.

pub mod db;
pub mod store;

// Re-exports: repositories
pub use db::{CollaboratorRepository, DocumentRepository};

// Re-exports: store abstraction
pub use store::{CollaboratorStore, PgCollaboratorStore};
