use serde::Serialize;

use crate::config::ExportSettings;
use crate::errors::EssayResult;
use crate::models::Source;
use crate::reports::docx::{DocxDocument, DocxParagraph};
use crate::writing::citations::{split_paragraphs, CitationLinker};

pub const DOCX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
const FILE_SUFFIX: &str = "_ensayo.docx";

/// A serialized document ready to be offered for download.
#[derive(Debug, Clone, Serialize)]
pub struct ExportArtifact {
    pub file_name: String,
    pub mime_type: &'static str,
    #[serde(skip)]
    pub bytes: Vec<u8>,
    pub hyperlink_count: usize,
}

/// Builds the downloadable essay document.
#[derive(Debug, Clone, Default)]
pub struct DocumentExporter {
    settings: ExportSettings,
}

impl DocumentExporter {
    pub fn new(settings: ExportSettings) -> Self {
        Self { settings }
    }

    /// Heading, title, one linked paragraph per essay paragraph, then the
    /// disclaimer.
    pub fn build(&self, title: &str, essay_text: &str, sources: &[Source]) -> DocxDocument {
        let linker = CitationLinker::new(sources);
        let mut document = DocxDocument::new();
        document.set_title(title);
        document.add_heading(self.settings.heading.as_str(), 0);
        document.add_heading(title, 1);
        for paragraph in split_paragraphs(essay_text) {
            document.add_paragraph(linker.render_document(paragraph));
        }
        document.add_paragraph(DocxParagraph::from_text(self.settings.disclaimer.as_str()));
        document
    }

    pub fn export(
        &self,
        title: &str,
        essay_text: &str,
        sources: &[Source],
    ) -> EssayResult<ExportArtifact> {
        let document = self.build(title, essay_text, sources);
        let bytes = document.to_bytes()?;
        tracing::debug!(
            file_name = %download_file_name(title),
            size_bytes = bytes.len(),
            "essay document serialized"
        );
        Ok(ExportArtifact {
            file_name: download_file_name(title),
            mime_type: DOCX_MIME_TYPE,
            hyperlink_count: document.hyperlinks().len(),
            bytes,
        })
    }
}

/// Lowercased title with spaces replaced by underscores, plus `_ensayo.docx`.
pub fn download_file_name(title: &str) -> String {
    format!("{}{FILE_SUFFIX}", title.to_lowercase().replace(' ', "_"))
}
