pub mod generation;
pub mod search;

pub use generation::{
    build_prompt, CompletionRequest, EssayRequester, GenerationProvider, TogetherClient,
};
pub use search::{SearchHit, SearchProvider, SerplyScholarClient, SourceCollector};
