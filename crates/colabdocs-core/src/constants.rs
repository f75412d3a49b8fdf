//! Domain constants written into records created by the bulk import.

/// Status assigned to every imported collaborator.
pub const IMPORTED_COLLABORATOR_STATUS: &str = "Ativo";

/// Role assigned to every imported collaborator.
pub const IMPORTED_COLLABORATOR_ROLE: &str = "Operador";

/// Department assigned to every imported collaborator.
pub const IMPORTED_COLLABORATOR_DEPARTMENT: &str = "Operação";

/// Category recorded on documents created by the bulk import.
pub const IMPORTED_DOCUMENT_CATEGORY: &str = "Importado";

/// MIME type of every document accepted by the bulk import.
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Width of the zero-padded sequential collaborator identifier.
pub const IDENTIFIER_WIDTH: usize = 5;
