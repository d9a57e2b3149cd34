pub mod citations;

pub use citations::{
    collect_markers, find_first_match, split_paragraphs, tokenize, CitationLinker, Segment, Span,
};
