//! Colabdocs Services Layer
//!
//! Business logic for the collaborator bulk import: the ZIP archive reader,
//! the entry classifier that groups PDFs by collaborator, and the
//! orchestrator that writes collaborators, folders and documents through the
//! store and storage abstractions. The API crate only talks to
//! `ImportService`.

pub mod archive;
pub mod import;

#[cfg(test)]
pub(crate) mod test_support;

pub use archive::{
    classify_entries, read_archive, ArchiveEntry, ArchiveError, ArchiveLimits, Classification,
    CollaboratorFileGroup, ImportFile,
};
pub use import::{
    IdentifierAllocator, ImportOrchestrator, ImportOutcome, ImportService, PlaceholderGenerator,
    Placeholders,
};
