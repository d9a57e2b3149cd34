use essaybase::errors::{EssayError, EssayResult};
use essaybase::services::{CompletionRequest, GenerationProvider, SearchHit, SearchProvider};
use std::cell::RefCell;
use std::collections::HashMap;

/// Search fake keyed by the author part of the query.
#[derive(Default)]
pub struct ScriptedSearch {
    hits: HashMap<String, Vec<SearchHit>>,
    failing: Option<String>,
    pub queries: RefCell<Vec<String>>,
}

impl ScriptedSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hits(mut self, author: &str, hits: &[(&str, &str)]) -> Self {
        self.hits.insert(
            author.to_string(),
            hits.iter()
                .map(|(title, link)| SearchHit {
                    title: title.to_string(),
                    link: link.to_string(),
                })
                .collect(),
        );
        self
    }

    pub fn failing_for(mut self, author: &str) -> Self {
        self.failing = Some(author.to_string());
        self
    }
}

impl SearchProvider for ScriptedSearch {
    fn search(&self, query: &str) -> EssayResult<Vec<SearchHit>> {
        self.queries.borrow_mut().push(query.to_string());
        let author = query.split(' ').next().unwrap_or_default();
        if self.failing.as_deref() == Some(author) {
            return Err(EssayError::transport("search", "connection reset"));
        }
        Ok(self.hits.get(author).cloned().unwrap_or_default())
    }
}

/// Generation fake returning a fixed essay.
pub struct ScriptedGeneration {
    reply: Result<String, String>,
    pub requests: RefCell<Vec<CompletionRequest>>,
}

impl ScriptedGeneration {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            requests: RefCell::new(Vec::new()),
        }
    }
}

impl GenerationProvider for ScriptedGeneration {
    fn complete(&self, request: &CompletionRequest) -> EssayResult<String> {
        self.requests.borrow_mut().push(request.clone());
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(message) => Err(EssayError::transport("generation", message)),
        }
    }
}
