//! Citation linking for generated essays.
//!
//! Prose is scanned for bracketed markers (`[Author, Year]`). Each marker key is
//! matched against the discovered sources by case-insensitive containment in
//! the source's canonical `"label: url"` form; the first source that matches
//! supplies the link target. Markers without a match stay plain bracketed
//! text. The same span sequence feeds the markdown display and the exported
//! document.

use regex::Regex;
use std::sync::OnceLock;

use crate::models::Source;
use crate::reports::docx::DocxParagraph;

const PARAGRAPH_SEPARATOR: &str = "\n\n";

fn marker_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\[([^\]]+)\]").expect("citation marker pattern is valid"))
}

/// One piece of a tokenized paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Prose copied verbatim. May be empty at marker boundaries.
    Literal(&'a str),
    /// The interior of a `[...]` marker.
    Marker(&'a str),
}

/// A rendered unit of a paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Span {
    Text(String),
    Citation { key: String, url: Option<String> },
}

impl Span {
    pub fn is_linked(&self) -> bool {
        matches!(self, Span::Citation { url: Some(_), .. })
    }

    /// Text as it appears in the source paragraph.
    pub fn plain_text(&self) -> String {
        match self {
            Span::Text(text) => text.clone(),
            Span::Citation { key, .. } => format!("[{key}]"),
        }
    }

    /// Inline markdown: linked citations become `[key](url)`.
    pub fn display_text(&self) -> String {
        match self {
            Span::Text(text) => text.clone(),
            Span::Citation {
                key,
                url: Some(url),
            } => format!("[{key}]({url})"),
            Span::Citation { key, url: None } => format!("[{key}]"),
        }
    }
}

/// Splits essay text into paragraphs on blank lines, keeping document order.
pub fn split_paragraphs(text: &str) -> Vec<&str> {
    text.split(PARAGRAPH_SEPARATOR).collect()
}

/// Tokenizes a paragraph into alternating literal and marker segments. The
/// sequence always starts and ends with a literal, so even positions are
/// prose and odd positions are marker keys.
pub fn tokenize(paragraph: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut cursor = 0;
    for captures in marker_pattern().captures_iter(paragraph) {
        let (Some(whole), Some(key)) = (captures.get(0), captures.get(1)) else {
            continue;
        };
        segments.push(Segment::Literal(&paragraph[cursor..whole.start()]));
        segments.push(Segment::Marker(key.as_str()));
        cursor = whole.end();
    }
    segments.push(Segment::Literal(&paragraph[cursor..]));
    segments
}

/// Every marker key in the text, in document order.
pub fn collect_markers(text: &str) -> Vec<String> {
    marker_pattern()
        .captures_iter(text)
        .filter_map(|captures| captures.get(1))
        .map(|key| key.as_str().to_string())
        .collect()
}

/// The first source whose canonical form contains `key`, ignoring case.
/// The key is matched as written, surrounding whitespace included.
///
/// When no source contains the whole key and the key has the
/// `Author, Year` shape, the author part is tried the same way.
pub fn find_first_match<'s>(key: &str, sources: &'s [Source]) -> Option<&'s Source> {
    if key.is_empty() {
        return None;
    }
    first_containing(key, sources).or_else(|| {
        let author = citation_author(key)?;
        first_containing(author, sources)
    })
}

/// Author part of an `Author, Year` key; `None` when the text after the
/// first comma is not a year.
fn citation_author(key: &str) -> Option<&str> {
    let (author, year) = key.split_once(',')?;
    let author = author.trim();
    if author.is_empty() || !year_pattern().is_match(year.trim()) {
        return None;
    }
    Some(author)
}

fn year_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d{4}[a-z]?$").expect("citation year pattern is valid"))
}

fn first_containing<'s>(needle: &str, sources: &'s [Source]) -> Option<&'s Source> {
    let needle = needle.to_lowercase();
    sources
        .iter()
        .find(|source| source.canonical().to_lowercase().contains(&needle))
}

/// Links citation markers in essay text against an ordered source list.
#[derive(Debug, Clone, Copy)]
pub struct CitationLinker<'a> {
    sources: &'a [Source],
}

impl<'a> CitationLinker<'a> {
    pub fn new(sources: &'a [Source]) -> Self {
        Self { sources }
    }

    pub fn link_paragraph(&self, paragraph: &str) -> Vec<Span> {
        tokenize(paragraph)
            .into_iter()
            .map(|segment| match segment {
                Segment::Literal(text) => Span::Text(text.to_string()),
                Segment::Marker(key) => match find_first_match(key, self.sources) {
                    Some(source) => Span::Citation {
                        key: key.to_string(),
                        url: Some(source.url.clone()),
                    },
                    None => Span::Citation {
                        key: key.to_string(),
                        url: None,
                    },
                },
            })
            .collect()
    }

    /// Markdown rendering of a single paragraph.
    pub fn render_display(&self, paragraph: &str) -> String {
        self.link_paragraph(paragraph)
            .iter()
            .map(Span::display_text)
            .collect()
    }

    /// Markdown rendering of a whole essay, paragraph by paragraph.
    pub fn render_display_text(&self, text: &str) -> String {
        split_paragraphs(text)
            .into_iter()
            .map(|paragraph| self.render_display(paragraph))
            .collect::<Vec<_>>()
            .join(PARAGRAPH_SEPARATOR)
    }

    /// Document rendering: prose becomes plain runs and matched citations
    /// become hyperlinks whose visible text is `[key]`.
    pub fn render_document(&self, paragraph: &str) -> DocxParagraph {
        let mut rendered = DocxParagraph::new();
        for span in self.link_paragraph(paragraph) {
            match span {
                Span::Text(text) => rendered.add_run(text),
                Span::Citation {
                    key,
                    url: Some(url),
                } => rendered.add_hyperlink(url, format!("[{key}]")),
                Span::Citation { key, url: None } => rendered.add_run(format!("[{key}]")),
            }
        }
        rendered
    }

    /// Number of markers in `text` that resolve to a source.
    pub fn linked_count(&self, text: &str) -> usize {
        collect_markers(text)
            .iter()
            .filter(|key| find_first_match(key, self.sources).is_some())
            .count()
    }
}

pub fn spans_to_plain(spans: &[Span]) -> String {
    spans.iter().map(Span::plain_text).collect()
}
