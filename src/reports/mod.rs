pub mod docx;
pub mod exporter;

pub use docx::{Block, DocxDocument, DocxParagraph, Inline};
pub use exporter::{download_file_name, DocumentExporter, ExportArtifact, DOCX_MIME_TYPE};
