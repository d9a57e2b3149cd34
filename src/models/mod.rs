pub mod essay;

pub use essay::{Audience, EssayRequest, Source, ValidatedRequest};
