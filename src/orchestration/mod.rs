//! End-to-end essay run: validate, collect sources, generate, render, export.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::config::{AppConfig, Credentials};
use crate::errors::{EssayError, EssayResult};
use crate::models::{EssayRequest, Source};
use crate::reports::{DocumentExporter, ExportArtifact};
use crate::services::{
    EssayRequester, GenerationProvider, SearchProvider, SerplyScholarClient, SourceCollector,
    TogetherClient,
};
use crate::writing::{collect_markers, CitationLinker};

/// Everything one run produced.
///
/// The export outcome is kept separate so a document failure never discards
/// the display rendering.
#[derive(Debug)]
pub struct EssayRun {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub title: String,
    pub sources: Vec<Source>,
    pub essay_text: String,
    pub display_markdown: String,
    pub markers: Vec<String>,
    pub linked_markers: usize,
    pub export: EssayResult<ExportArtifact>,
}

/// Serializable digest of a run, without the document bytes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub title: String,
    pub sources: Vec<Source>,
    pub marker_count: usize,
    pub linked_markers: usize,
    pub content_hash: String,
    pub export_file: Option<String>,
    pub export_error: Option<String>,
}

impl EssayRun {
    pub fn summary(&self) -> RunSummary {
        let (export_file, export_error) = match &self.export {
            Ok(artifact) => (Some(artifact.file_name.clone()), None),
            Err(err) => (None, Some(err.to_string())),
        };
        RunSummary {
            run_id: self.run_id,
            started_at: self.started_at,
            title: self.title.clone(),
            sources: self.sources.clone(),
            marker_count: self.markers.len(),
            linked_markers: self.linked_markers,
            content_hash: content_hash(&self.essay_text),
            export_file,
            export_error,
        }
    }
}

pub struct EssayPipeline<S, G> {
    collector: SourceCollector<S>,
    requester: EssayRequester<G>,
    exporter: DocumentExporter,
}

impl EssayPipeline<SerplyScholarClient, TogetherClient> {
    /// Wires the live provider clients with explicit credentials.
    pub fn from_config(config: &AppConfig, credentials: &Credentials) -> EssayResult<Self> {
        let search = SerplyScholarClient::new(
            &config.search,
            &config.http,
            credentials.search_api_key.clone(),
        )?;
        let generation = TogetherClient::new(
            &config.generation,
            &config.http,
            credentials.generation_api_key.clone(),
        )?;
        Ok(Self::new(search, generation, config))
    }
}

impl<S: SearchProvider, G: GenerationProvider> EssayPipeline<S, G> {
    pub fn new(search: S, generation: G, config: &AppConfig) -> Self {
        Self {
            collector: SourceCollector::new(search),
            requester: EssayRequester::new(generation, config.generation.clone()),
            exporter: DocumentExporter::new(config.export.clone()),
        }
    }

    /// Runs the whole pipeline. Validation failures return before any
    /// provider is contacted; provider failures propagate unchanged.
    pub fn run(&self, request: &EssayRequest) -> EssayResult<EssayRun> {
        let validated = request.validate()?;
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("essay_run", %run_id);
        let _guard = span.enter();
        let started_at = Utc::now();

        let sources = self
            .collector
            .collect_all(validated.author_list(), &validated.title)?;
        tracing::info!(
            authors = validated.author_list().len(),
            sources = sources.len(),
            "sources collected"
        );

        let essay_text = self.requester.generate(&validated, &sources)?;
        tracing::info!(chars = essay_text.chars().count(), "essay generated");

        let linker = CitationLinker::new(&sources);
        let display_markdown = linker.render_display_text(&essay_text);
        let markers = collect_markers(&essay_text);
        let linked_markers = linker.linked_count(&essay_text);
        tracing::info!(
            markers = markers.len(),
            linked = linked_markers,
            "citations linked"
        );

        let export = self.exporter.export(&validated.title, &essay_text, &sources);
        match &export {
            Ok(artifact) => tracing::info!(
                file_name = %artifact.file_name,
                hyperlinks = artifact.hyperlink_count,
                "document exported"
            ),
            Err(err) => tracing::warn!(error = %err, "document export failed"),
        }

        Ok(EssayRun {
            run_id,
            started_at,
            title: validated.title,
            sources,
            essay_text,
            display_markdown,
            markers,
            linked_markers,
            export,
        })
    }
}

/// True when the error came from missing user input rather than a provider.
pub fn is_user_error(err: &EssayError) -> bool {
    err.is_validation()
}

fn content_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}
