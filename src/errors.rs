use thiserror::Error;

/// Failures surfaced by the essay pipeline.
///
/// Unmatched citation markers are not represented here: they render as plain
/// bracketed text.
#[derive(Debug, Error)]
pub enum EssayError {
    /// Required user input is missing; nothing downstream was invoked.
    #[error("missing required fields: {}", missing.join(", "))]
    Validation { missing: Vec<&'static str> },
    #[error("{provider} request failed: {message}")]
    Transport {
        provider: &'static str,
        message: String,
    },
    #[error("{provider} returned an unexpected response: {detail}")]
    MalformedResponse {
        provider: &'static str,
        detail: String,
    },
    /// Document serialization failed; display output is unaffected.
    #[error("failed to render document: {0}")]
    Render(String),
    #[error("configuration error: {0}")]
    Config(String),
}

impl EssayError {
    pub fn transport(provider: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Transport {
            provider,
            message: err.to_string(),
        }
    }

    pub fn malformed(provider: &'static str, detail: impl Into<String>) -> Self {
        Self::MalformedResponse {
            provider,
            detail: detail.into(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

impl From<zip::result::ZipError> for EssayError {
    fn from(err: zip::result::ZipError) -> Self {
        Self::Render(err.to_string())
    }
}

pub type EssayResult<T> = Result<T, EssayError>;
