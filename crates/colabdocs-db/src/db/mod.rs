//! Database repositories for data access layer
//!
//! Each repository owns a clone of the pool and maps one table.

pub mod collaborator;
pub mod document;

pub use collaborator::CollaboratorRepository;
pub use document::DocumentRepository;
