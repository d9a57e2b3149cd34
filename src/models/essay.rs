use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{EssayError, EssayResult};

const CANONICAL_DELIMITER: &str = ": ";

/// A discovered reference: a title plus the link it resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub label: String,
    pub url: String,
}

impl Source {
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
        }
    }

    /// `"{label}: {url}"`, the form embedded in prompts and used for matching.
    pub fn canonical(&self) -> String {
        format!("{}{}{}", self.label, CANONICAL_DELIMITER, self.url)
    }

    /// Recovers a source from its canonical form. The URL is whatever follows
    /// the last `": "`; a string without the delimiter is all URL.
    pub fn parse_canonical(value: &str) -> Self {
        match value.rfind(CANONICAL_DELIMITER) {
            Some(idx) => Self {
                label: value[..idx].to_string(),
                url: value[idx + CANONICAL_DELIMITER.len()..].to_string(),
            },
            None => Self {
                label: String::new(),
                url: value.to_string(),
            },
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.label, CANONICAL_DELIMITER, self.url)
    }
}

/// Intended readership of the essay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Audience {
    #[default]
    General,
    Knowledgeable,
    Specialist,
}

impl Audience {
    pub fn as_str(&self) -> &'static str {
        match self {
            Audience::General => "general",
            Audience::Knowledgeable => "knowledgeable",
            Audience::Specialist => "specialist",
        }
    }

    /// Directive appended to the generation prompt.
    pub fn prompt_directive(&self) -> &'static str {
        match self {
            Audience::General => {
                "El ensayo está dirigido a un público general: evita la jerga y explica los conceptos técnicos."
            }
            Audience::Knowledgeable => {
                "El ensayo está dirigido a lectores conocedores del tema: puedes asumir familiaridad con los conceptos básicos."
            }
            Audience::Specialist => {
                "El ensayo está dirigido a especialistas: usa terminología técnica precisa y un análisis riguroso."
            }
        }
    }
}

impl FromStr for Audience {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "general" => Ok(Audience::General),
            "knowledgeable" | "conocedor" | "conocedores" => Ok(Audience::Knowledgeable),
            "specialist" | "especialista" | "especialistas" => Ok(Audience::Specialist),
            other => Err(format!(
                "Unknown audience '{other}' (expected general, knowledgeable or specialist)"
            )),
        }
    }
}

impl fmt::Display for Audience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw user input for one essay run.
#[derive(Debug, Clone, Default)]
pub struct EssayRequest {
    pub title: String,
    pub thesis: String,
    /// Comma-separated author names, exactly as typed.
    pub authors: String,
    pub audience: Audience,
}

impl EssayRequest {
    pub fn new(
        title: impl Into<String>,
        thesis: impl Into<String>,
        authors: impl Into<String>,
        audience: Audience,
    ) -> Self {
        Self {
            title: title.into(),
            thesis: thesis.into(),
            authors: authors.into(),
            audience,
        }
    }

    /// Checks that every required field carries content. Nothing downstream
    /// may run unless this succeeds.
    pub fn validate(&self) -> EssayResult<ValidatedRequest> {
        let author_list = split_authors(&self.authors);
        let mut missing = Vec::new();
        if self.title.trim().is_empty() {
            missing.push("title");
        }
        if self.thesis.trim().is_empty() {
            missing.push("thesis");
        }
        if author_list.is_empty() {
            missing.push("authors");
        }
        if !missing.is_empty() {
            return Err(EssayError::Validation { missing });
        }
        Ok(ValidatedRequest {
            title: self.title.trim().to_string(),
            thesis: self.thesis.trim().to_string(),
            authors_raw: self.authors.trim().to_string(),
            author_list,
            audience: self.audience,
        })
    }
}

/// Input that passed validation; the only shape the pipeline accepts.
#[derive(Debug, Clone)]
pub struct ValidatedRequest {
    pub title: String,
    pub thesis: String,
    pub authors_raw: String,
    author_list: Vec<String>,
    pub audience: Audience,
}

impl ValidatedRequest {
    /// Author names in input order.
    pub fn author_list(&self) -> &[String] {
        &self.author_list
    }
}

fn split_authors(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
