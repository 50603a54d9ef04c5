pub mod document;
pub mod task;

pub use document::{
    AgencyDetails, DocumentExporter, ExportError, ExportFormat, ExportedDocument,
    TeraDocumentExporter,
};
pub use task::{ExportStatus, ExportTask};
