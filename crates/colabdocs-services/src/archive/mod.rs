//! ZIP archive reading and classification of its entries

pub mod classifier;
pub mod reader;

pub use classifier::{classify_entries, Classification, CollaboratorFileGroup, ImportFile};
pub use reader::{read_archive, ArchiveEntry, ArchiveError, ArchiveLimits};
