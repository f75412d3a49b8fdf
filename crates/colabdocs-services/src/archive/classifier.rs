//! Groups archive entries into per-collaborator PDF batches.
//!
//! Expected archive layouts:
//!
//! ```text
//! Ana Souza/rg.pdf             exportado/Ana Souza/rg.pdf
//! Ana Souza/contrato.pdf       exportado/Ana Souza/contrato.pdf
//! Bruno Lima/cpf.pdf           exportado/Bruno Lima/cpf.pdf
//! ```
//!
//! When every path shares the same first segment and at least one path is
//! nested, that segment is treated as a wrapper folder and skipped.

use std::collections::{HashMap, HashSet};

use super::reader::ArchiveEntry;

const MACOS_METADATA_DIR: &str = "__MACOSX";

/// A PDF taken from the archive, ready for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportFile {
    /// Base name of the entry (last path segment).
    pub file_name: String,
    pub buffer: Vec<u8>,
}

/// All PDFs found for one collaborator, in archive order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollaboratorFileGroup {
    pub name: String,
    pub files: Vec<ImportFile>,
}

/// Classifier output: groups in first-seen order plus rejection messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub groups: Vec<CollaboratorFileGroup>,
    pub errors: Vec<String>,
}

fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

fn is_pdf(file_name: &str) -> bool {
    file_name.to_lowercase().ends_with(".pdf")
}

/// Wrapper folder shared by every path, if any.
fn common_root<'a>(paths: &[Vec<&'a str>]) -> Option<&'a str> {
    let first = *paths.first()?.first()?;
    let shared = paths.iter().all(|p| p.first() == Some(&first));
    let nested = paths.iter().any(|p| p.len() > 1);
    (shared && nested).then_some(first)
}

/// Group the PDF entries of an archive by collaborator name.
pub fn classify_entries(entries: &[ArchiveEntry]) -> Classification {
    let candidates: Vec<(&ArchiveEntry, Vec<&str>)> = entries
        .iter()
        .filter(|e| !e.is_directory)
        .filter(|e| !e.path.is_empty())
        .filter(|e| !e.path.starts_with("__MACOSX/"))
        .map(|e| (e, segments(&e.path)))
        .filter(|(_, segs)| !segs.is_empty())
        .collect();

    let paths: Vec<Vec<&str>> = candidates.iter().map(|(_, s)| s.clone()).collect();
    let root = common_root(&paths);
    if let Some(root) = root {
        tracing::debug!(root = %root, "Stripping common archive root folder");
    }

    let mut classification = Classification::default();
    let mut index: HashMap<String, usize> = HashMap::new();
    // Folder names seen with at least one file, in first-seen order.
    let mut seen: Vec<&str> = Vec::new();
    let mut seen_set: HashSet<&str> = HashSet::new();
    let name_index = usize::from(root.is_some());

    for (entry, segs) in &candidates {
        let name = match segs.get(name_index) {
            Some(name) => *name,
            None => continue,
        };
        if name.is_empty() || name == MACOS_METADATA_DIR {
            continue;
        }
        // A loose file at the name level is not a collaborator folder.
        if segs.len() > name_index + 1 && seen_set.insert(name) {
            seen.push(name);
        }

        let file_name = segs.last().copied().unwrap_or(name);
        if !is_pdf(file_name) {
            classification.errors.push(format!(
                "Arquivo ignorado ({}) - apenas PDFs são suportados.",
                file_name
            ));
            continue;
        }

        let slot = *index.entry(name.to_string()).or_insert_with(|| {
            classification.groups.push(CollaboratorFileGroup {
                name: name.to_string(),
                files: Vec::new(),
            });
            classification.groups.len() - 1
        });
        classification.groups[slot].files.push(ImportFile {
            file_name: file_name.to_string(),
            buffer: entry.content.clone(),
        });
    }

    for name in seen {
        if !index.contains_key(name) {
            classification.errors.push(format!(
                "Nenhum documento PDF encontrado para o colaborador {}.",
                name
            ));
        }
    }

    classification
}
