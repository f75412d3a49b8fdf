//! Collaborator import: numbering, placeholder data and orchestration

pub mod identifier;
pub mod orchestrator;
pub mod placeholders;
pub mod service;

pub use identifier::IdentifierAllocator;
pub use orchestrator::{ImportOrchestrator, ImportOutcome};
pub use placeholders::{PlaceholderGenerator, Placeholders};
pub use service::ImportService;
