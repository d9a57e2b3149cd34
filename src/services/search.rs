//! Source discovery through the scholar search provider.

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;

use crate::config::{HttpSettings, SearchSettings};
use crate::errors::{EssayError, EssayResult};
use crate::models::Source;

const PROVIDER: &str = "search";
/// Results kept per author query, whatever the provider returns.
pub const RESULTS_PER_AUTHOR: usize = 2;

/// One search result as returned by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub link: String,
}

impl From<SearchHit> for Source {
    fn from(hit: SearchHit) -> Self {
        Source::new(hit.title, hit.link)
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchHit>,
}

/// Anything that can answer a free-text scholar query.
pub trait SearchProvider {
    fn search(&self, query: &str) -> EssayResult<Vec<SearchHit>>;
}

impl<T: SearchProvider + ?Sized> SearchProvider for &T {
    fn search(&self, query: &str) -> EssayResult<Vec<SearchHit>> {
        (**self).search(query)
    }
}

/// Blocking client for the Serply scholar endpoint.
pub struct SerplyScholarClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl SerplyScholarClient {
    pub fn new(
        settings: &SearchSettings,
        http: &HttpSettings,
        api_key: impl Into<String>,
    ) -> EssayResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = http.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| EssayError::transport(PROVIDER, format!("failed to build http client: {err}")))?;
        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
            api_key: api_key.into(),
        })
    }
}

impl SearchProvider for SerplyScholarClient {
    fn search(&self, query: &str) -> EssayResult<Vec<SearchHit>> {
        let response = self
            .client
            .get(&self.endpoint)
            .header("X-Api-Key", &self.api_key)
            .header(CONTENT_TYPE, "application/json")
            .query(&[("q", query)])
            .send()
            .map_err(|err| EssayError::transport(PROVIDER, err))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(EssayError::transport(
                PROVIDER,
                format!("http error {status}: {body}"),
            ));
        }
        let parsed: SearchResponse = response
            .json()
            .map_err(|err| EssayError::malformed(PROVIDER, err.to_string()))?;
        Ok(parsed.results)
    }
}

/// Gathers a few sources per author, in author order.
pub struct SourceCollector<P> {
    provider: P,
}

impl<P: SearchProvider> SourceCollector<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// One search for `"{author} {topic}"`, truncated to [`RESULTS_PER_AUTHOR`].
    pub fn collect(&self, author: &str, topic: &str) -> EssayResult<Vec<Source>> {
        let query = format!("{author} {topic}");
        let hits = self.provider.search(&query)?;
        let returned = hits.len();
        let sources: Vec<Source> = hits
            .into_iter()
            .take(RESULTS_PER_AUTHOR)
            .map(Source::from)
            .collect();
        tracing::debug!(author, returned, kept = sources.len(), "sources collected");
        Ok(sources)
    }

    /// Sequential lookups for every author; results are concatenated without
    /// deduplication. The first failure aborts the whole collection.
    pub fn collect_all(&self, authors: &[String], topic: &str) -> EssayResult<Vec<Source>> {
        let mut sources = Vec::new();
        for author in authors {
            sources.extend(self.collect(author, topic)?);
        }
        Ok(sources)
    }
}
