pub mod config;
pub mod errors;
pub mod models;
pub mod orchestration;
pub mod reports;
pub mod services;
pub mod writing;

// Re-export commonly used types for convenience.
pub use config::{AppConfig, Credentials};
pub use errors::{EssayError, EssayResult};
pub use models::{Audience, EssayRequest, Source};
pub use orchestration::{EssayPipeline, EssayRun, RunSummary};
pub use writing::CitationLinker;
