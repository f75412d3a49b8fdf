//! Turns classified file groups into collaborators, folders and documents.
//!
//! The run is best effort: every group and every file is attempted, failures
//! are recorded in the summary, and nothing already written is rolled back.
//! All I/O is sequential.

use std::sync::Arc;

use colabdocs_core::constants::{
    IMPORTED_COLLABORATOR_DEPARTMENT, IMPORTED_COLLABORATOR_ROLE, IMPORTED_COLLABORATOR_STATUS,
    IMPORTED_DOCUMENT_CATEGORY, PDF_CONTENT_TYPE,
};
use colabdocs_core::models::{Collaborator, ImportSummary, NewCollaborator, NewDocument};
use colabdocs_db::CollaboratorStore;
use colabdocs_storage::StorageClient;

use super::identifier::IdentifierAllocator;
use super::placeholders::PlaceholderGenerator;
use crate::archive::{CollaboratorFileGroup, ImportFile};

const NO_COLLABORATOR_CREATED: &str = "Nenhum colaborador foi criado";

/// Result of one import run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    /// At least one collaborator was created.
    Success { summary: ImportSummary },
    /// Nothing was created; `message` is the first recorded error.
    Failure {
        message: String,
        summary: ImportSummary,
    },
}

impl ImportOutcome {
    pub fn summary(&self) -> &ImportSummary {
        match self {
            ImportOutcome::Success { summary } | ImportOutcome::Failure { summary, .. } => summary,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ImportOutcome::Success { .. })
    }
}

pub struct ImportOrchestrator {
    store: Arc<dyn CollaboratorStore>,
    storage: Arc<dyn StorageClient>,
    placeholders: PlaceholderGenerator,
}

impl ImportOrchestrator {
    pub fn new(
        store: Arc<dyn CollaboratorStore>,
        storage: Arc<dyn StorageClient>,
        placeholders: PlaceholderGenerator,
    ) -> Self {
        Self {
            store,
            storage,
            placeholders,
        }
    }

    pub async fn run(&self, groups: Vec<CollaboratorFileGroup>) -> ImportOutcome {
        self.run_with_summary(groups, ImportSummary::default()).await
    }

    /// Run the import, appending to a summary that may already hold
    /// classification errors.
    #[tracing::instrument(skip_all, fields(groups = groups.len()))]
    pub async fn run_with_summary(
        &self,
        groups: Vec<CollaboratorFileGroup>,
        mut summary: ImportSummary,
    ) -> ImportOutcome {
        let greatest = match self.store.greatest_identifier().await {
            Ok(greatest) => greatest,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load greatest collaborator identifier");
                let message = format!("Erro ao consultar identificadores de colaboradores: {}", e);
                summary.push_error(message.clone());
                return ImportOutcome::Failure { message, summary };
            }
        };
        let mut identifiers = IdentifierAllocator::from_greatest(greatest.as_deref());

        for group in groups {
            self.import_group(group, &mut identifiers, &mut summary).await;
        }

        tracing::info!(
            created = summary.created_count,
            documents = summary.imported_document_count,
            errors = summary.errors.len(),
            "Collaborator import finished"
        );

        if summary.created_count == 0 {
            let message = summary
                .errors
                .first()
                .cloned()
                .unwrap_or_else(|| NO_COLLABORATOR_CREATED.to_string());
            return ImportOutcome::Failure { message, summary };
        }
        ImportOutcome::Success { summary }
    }

    async fn import_group(
        &self,
        group: CollaboratorFileGroup,
        identifiers: &mut IdentifierAllocator,
        summary: &mut ImportSummary,
    ) {
        let CollaboratorFileGroup { name, files } = group;
        if files.is_empty() {
            summary.push_error(format!(
                "Nenhum documento encontrado para o colaborador {}.",
                name
            ));
            return;
        }

        let identifier = identifiers.allocate();
        let placeholders = self.placeholders.generate(&name);
        let new_collaborator = NewCollaborator {
            identifier: identifier.clone(),
            name: name.clone(),
            email: placeholders.email,
            phone: placeholders.phone,
            admission_date: placeholders.admission_date,
            status: IMPORTED_COLLABORATOR_STATUS.to_string(),
            role: IMPORTED_COLLABORATOR_ROLE.to_string(),
            department: IMPORTED_COLLABORATOR_DEPARTMENT.to_string(),
        };

        let collaborator = match self.store.insert_collaborator(new_collaborator).await {
            Ok(collaborator) => collaborator,
            Err(e) => {
                tracing::warn!(collaborator = %name, identifier = %identifier, error = %e, "Failed to create collaborator");
                summary.push_error(format!("Erro ao criar colaborador {}: {}", name, e));
                return;
            }
        };
        summary.created_count += 1;
        tracing::info!(collaborator = %name, identifier = %identifier, id = %collaborator.id, "Collaborator created");

        let folder = NewCollaborator::folder_name(&identifier, collaborator.id);
        match self.storage.create_folder(&folder).await {
            Ok(()) => {
                if let Err(e) = self.store.set_storage_folder(collaborator.id, &folder).await {
                    tracing::warn!(collaborator = %name, folder = %folder, error = %e, "Failed to record storage folder");
                    summary.push_error(format!(
                        "Aviso: falha ao registrar pasta para {}: {}",
                        name, e
                    ));
                }
            }
            Err(e) => {
                // Uploads are still attempted; the storage service may create
                // the folder on demand.
                tracing::warn!(collaborator = %name, folder = %folder, error = %e, "Failed to create storage folder");
                summary.push_error(format!("Aviso: falha ao criar pasta para {}: {}", name, e));
            }
        }

        for file in files {
            let file_name = file.file_name.clone();
            match self.import_file(&collaborator, &folder, file).await {
                Ok(()) => summary.imported_document_count += 1,
                Err(e) => {
                    tracing::warn!(collaborator = %name, file = %file_name, error = %e, "Failed to import document");
                    summary.push_error(format!(
                        "Erro ao importar {} de {}: {}",
                        file_name, name, e
                    ));
                }
            }
        }
    }

    async fn import_file(
        &self,
        collaborator: &Collaborator,
        folder: &str,
        file: ImportFile,
    ) -> Result<(), String> {
        let ImportFile { file_name, buffer } = file;
        let file_size = buffer.len() as i64;

        let stored = self
            .storage
            .upload_buffer(buffer, &file_name, folder, PDF_CONTENT_TYPE)
            .await
            .map_err(|e| e.to_string())?;

        self.store
            .insert_document(NewDocument {
                collaborator_id: collaborator.id,
                original_filename: file_name,
                stored_filename: stored.stored_file_name,
                file_url: stored.file_url,
                content_type: PDF_CONTENT_TYPE.to_string(),
                file_size,
                category: IMPORTED_DOCUMENT_CATEGORY.to_string(),
            })
            .await
            .map_err(|e| e.to_string())?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MockStorage, MockStore};

    fn group(name: &str, files: &[(&str, &[u8])]) -> CollaboratorFileGroup {
        CollaboratorFileGroup {
            name: name.to_string(),
            files: files
                .iter()
                .map(|(file_name, buffer)| ImportFile {
                    file_name: file_name.to_string(),
                    buffer: buffer.to_vec(),
                })
                .collect(),
        }
    }

    fn orchestrator(store: &MockStore, storage: &MockStorage) -> ImportOrchestrator {
        ImportOrchestrator::new(
            Arc::new(store.clone()),
            Arc::new(storage.clone()),
            PlaceholderGenerator::new("importado.local"),
        )
    }

    #[tokio::test]
    async fn test_creates_collaborators_folders_and_documents() {
        let store = MockStore::default();
        let storage = MockStorage::default();

        let outcome = orchestrator(&store, &storage)
            .run(vec![
                group("Ana Souza", &[("rg.pdf", b"1"), ("cpf.pdf", b"22")]),
                group("Bruno Lima", &[("ctps.pdf", b"333")]),
            ])
            .await;

        assert!(outcome.is_success());
        let summary = outcome.summary();
        assert_eq!(summary.created_count, 2);
        assert_eq!(summary.imported_document_count, 3);
        assert!(summary.errors.is_empty());

        let collaborators = store.collaborators.lock().unwrap().clone();
        assert_eq!(collaborators[0].identifier, "00001");
        assert_eq!(collaborators[1].identifier, "00002");
        assert_eq!(collaborators[0].status, "Ativo");
        assert_eq!(collaborators[0].role, "Operador");
        assert_eq!(collaborators[0].department, "Operação");
        assert!(collaborators[0].email.starts_with("ana.souza."));

        let expected_folder = format!("00001_{}", collaborators[0].id);
        assert_eq!(storage.folders.lock().unwrap()[0], expected_folder);
        assert_eq!(
            store.folders.lock().unwrap().get(&collaborators[0].id),
            Some(&expected_folder)
        );

        let documents = store.documents.lock().unwrap().clone();
        assert_eq!(documents.len(), 3);
        assert_eq!(documents[1].original_filename, "cpf.pdf");
        assert_eq!(documents[1].stored_filename, "stored_cpf.pdf");
        assert_eq!(documents[1].file_size, 2);
        assert_eq!(documents[1].category, "Importado");
        assert_eq!(documents[1].content_type, "application/pdf");
        assert_eq!(
            storage
                .files
                .lock()
                .unwrap()
                .get(&(expected_folder, "stored_rg.pdf".to_string())),
            Some(&b"1".to_vec())
        );
    }

    #[tokio::test]
    async fn test_identifiers_continue_from_greatest() {
        let store = MockStore::with_greatest("00042");
        let storage = MockStorage::default();

        orchestrator(&store, &storage)
            .run(vec![group("Ana", &[("rg.pdf", b"1")])])
            .await;

        assert_eq!(store.collaborators.lock().unwrap()[0].identifier, "00043");
    }

    #[tokio::test]
    async fn test_failed_insert_consumes_identifier() {
        let store = MockStore::default();
        store.reject("Ana");
        let storage = MockStorage::default();

        let outcome = orchestrator(&store, &storage)
            .run(vec![
                group("Ana", &[("rg.pdf", b"1")]),
                group("Bruno", &[("rg.pdf", b"2")]),
            ])
            .await;

        assert!(outcome.is_success());
        assert_eq!(
            *store.attempted_identifiers.lock().unwrap(),
            vec!["00001".to_string(), "00002".to_string()]
        );
        assert_eq!(store.collaborators.lock().unwrap()[0].identifier, "00002");
        assert_eq!(outcome.summary().created_count, 1);
        assert_eq!(
            outcome.summary().errors,
            vec!["Erro ao criar colaborador Ana: Internal error: insert rejected".to_string()]
        );
    }

    #[tokio::test]
    async fn test_all_inserts_failing_is_failure() {
        let store = MockStore::default();
        *store.fail_all_inserts.lock().unwrap() = true;
        let storage = MockStorage::default();

        let outcome = orchestrator(&store, &storage)
            .run(vec![
                group("Ana", &[("rg.pdf", b"1")]),
                group("Bruno", &[("rg.pdf", b"2")]),
                group("Carla", &[("rg.pdf", b"3")]),
            ])
            .await;

        match outcome {
            ImportOutcome::Failure { message, summary } => {
                assert_eq!(summary.created_count, 0);
                assert_eq!(summary.errors.len(), 3);
                assert_eq!(message, summary.errors[0]);
                assert!(message.contains("Ana"));
            }
            other => panic!("expected failure, got {:?}", other),
        }
        assert!(storage.folders.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_group_is_reported_without_allocating() {
        let store = MockStore::default();
        let storage = MockStorage::default();

        let outcome = orchestrator(&store, &storage)
            .run(vec![group("Vazio", &[]), group("Ana", &[("rg.pdf", b"1")])])
            .await;

        assert_eq!(
            outcome.summary().errors,
            vec!["Nenhum documento encontrado para o colaborador Vazio.".to_string()]
        );
        assert_eq!(store.collaborators.lock().unwrap()[0].identifier, "00001");
    }

    #[tokio::test]
    async fn test_no_groups_is_failure_with_default_message() {
        let outcome = orchestrator(&MockStore::default(), &MockStorage::default())
            .run(Vec::new())
            .await;

        assert_eq!(
            outcome,
            ImportOutcome::Failure {
                message: "Nenhum colaborador foi criado".to_string(),
                summary: ImportSummary::default(),
            }
        );
    }

    #[tokio::test]
    async fn test_folder_failure_is_warning_and_uploads_continue() {
        let store = MockStore::default();
        let storage = MockStorage::default();
        *storage.fail_folders.lock().unwrap() = true;

        let outcome = orchestrator(&store, &storage)
            .run(vec![group("Ana", &[("rg.pdf", b"1")])])
            .await;

        assert!(outcome.is_success());
        assert_eq!(outcome.summary().imported_document_count, 1);
        assert_eq!(outcome.summary().errors.len(), 1);
        assert!(outcome.summary().errors[0].starts_with("Aviso: falha ao criar pasta para Ana:"));
        assert!(store.folders.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upload_failure_is_per_file() {
        let store = MockStore::default();
        let storage = MockStorage::default();
        storage.reject("cpf.pdf");

        let outcome = orchestrator(&store, &storage)
            .run(vec![group("Ana", &[("rg.pdf", b"1"), ("cpf.pdf", b"2")])])
            .await;

        let summary = outcome.summary();
        assert_eq!(summary.created_count, 1);
        assert_eq!(summary.imported_document_count, 1);
        assert_eq!(
            summary.errors,
            vec!["Erro ao importar cpf.pdf de Ana: Upload failed: quota exceeded".to_string()]
        );
    }

    #[tokio::test]
    async fn test_identifier_lookup_failure_aborts_before_writes() {
        let store = MockStore::default();
        *store.fail_greatest.lock().unwrap() = true;
        let storage = MockStorage::default();

        let outcome = orchestrator(&store, &storage)
            .run(vec![group("Ana", &[("rg.pdf", b"1")])])
            .await;

        assert!(!outcome.is_success());
        assert_eq!(outcome.summary().errors.len(), 1);
        assert!(store.attempted_identifiers.lock().unwrap().is_empty());
        assert_eq!(*storage.calls.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_seeded_errors_come_first() {
        let store = MockStore::default();
        *store.fail_all_inserts.lock().unwrap() = true;

        let seeded = ImportSummary::with_errors(vec![
            "Arquivo ignorado (a.txt) - apenas PDFs são suportados.".to_string(),
        ]);
        let outcome = orchestrator(&store, &MockStorage::default())
            .run_with_summary(vec![group("Ana", &[("rg.pdf", b"1")])], seeded)
            .await;

        match outcome {
            ImportOutcome::Failure { message, summary } => {
                assert!(message.starts_with("Arquivo ignorado"));
                assert_eq!(summary.errors.len(), 2);
                assert!(summary.errors[1].starts_with("Erro ao criar colaborador Ana"));
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }
}
