//! Essay drafting through the text-generation provider.

use reqwest::blocking::Client;
use serde::Serialize;
use serde_json::Value;

use crate::config::{GenerationSettings, HttpSettings};
use crate::errors::{EssayError, EssayResult};
use crate::models::{Source, ValidatedRequest};

const PROVIDER: &str = "generation";
const COMPLETION_TEXT_POINTER: &str = "/output/choices/0/text";

/// Request body sent to the inference endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub repetition_penalty: f32,
    pub stop: Vec<String>,
}

/// Anything that turns a completion request into text.
pub trait GenerationProvider {
    fn complete(&self, request: &CompletionRequest) -> EssayResult<String>;
}

impl<T: GenerationProvider + ?Sized> GenerationProvider for &T {
    fn complete(&self, request: &CompletionRequest) -> EssayResult<String> {
        (**self).complete(request)
    }
}

/// Blocking client for the Together inference endpoint.
pub struct TogetherClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl TogetherClient {
    pub fn new(
        settings: &GenerationSettings,
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

impl GenerationProvider for TogetherClient {
    fn complete(&self, request: &CompletionRequest) -> EssayResult<String> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(request)
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
        let value: Value = response
            .json()
            .map_err(|err| EssayError::malformed(PROVIDER, err.to_string()))?;
        extract_completion_text(&value)
    }
}

/// Pulls the first completion choice out of an inference response.
pub fn extract_completion_text(value: &Value) -> EssayResult<String> {
    value
        .pointer(COMPLETION_TEXT_POINTER)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            EssayError::malformed(PROVIDER, format!("missing {COMPLETION_TEXT_POINTER}"))
        })
}

/// Builds the essay prompt and issues the single generation request.
pub struct EssayRequester<G> {
    provider: G,
    settings: GenerationSettings,
}

impl<G: GenerationProvider> EssayRequester<G> {
    pub fn new(provider: G, settings: GenerationSettings) -> Self {
        Self { provider, settings }
    }

    /// Returns the trimmed essay text. Output that ignores the citation format
    /// is still returned as-is.
    pub fn generate(&self, request: &ValidatedRequest, sources: &[Source]) -> EssayResult<String> {
        let completion = self.completion_request(build_prompt(request, sources));
        tracing::debug!(
            model = %completion.model,
            prompt_chars = completion.prompt.chars().count(),
            "requesting essay generation"
        );
        let text = self.provider.complete(&completion)?;
        Ok(text.trim().to_string())
    }

    pub fn completion_request(&self, prompt: String) -> CompletionRequest {
        CompletionRequest {
            model: self.settings.model.clone(),
            prompt,
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
            top_p: self.settings.top_p,
            top_k: self.settings.top_k,
            repetition_penalty: self.settings.repetition_penalty,
            stop: self.settings.stop.clone(),
        }
    }
}

/// The generation instruction: every input verbatim, the three-part
/// structure and the `[Autor, Año]` citation format.
pub fn build_prompt(request: &ValidatedRequest, sources: &[Source]) -> String {
    let source_list = sources
        .iter()
        .map(|source| format!("- {source}"))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "Escribe un ensayo académico con el título \"{title}\".\n\
         La tesis principal a defender es: \"{thesis}\"\n\
         Incluye citas y discusiones de los siguientes autores: {authors}.\n\
         Utiliza y cita las siguientes fuentes en tu ensayo:\n\
         {source_list}\n\
         {audience}\n\
         El ensayo debe tener la siguiente estructura:\n\
         1. Introducción (presenta el tema y la tesis)\n\
         2. Desarrollo (argumenta la tesis, utilizando las fuentes y autores proporcionados)\n\
         3. Conclusión (resume los puntos principales y reafirma la tesis)\n\n\
         No escribas las instrucciones ni ejemplos ni las referencias al principio.\n\
         Asegúrate de incluir citas en el texto y una lista de referencias al final.\n\
         Para cada cita en el texto, usa el formato [Autor, Año] y asegúrate de que \
         corresponda con una entrada en la lista de referencias.",
        title = request.title,
        thesis = request.thesis,
        authors = request.authors_raw,
        audience = request.audience.prompt_directive(),
    )
}
