//! Minimal WordprocessingML writer.
//!
//! Produces a `.docx` package in memory: headings, paragraphs made of plain
//! runs and external hyperlinks, a small style sheet and core properties.

use chrono::{DateTime, SecondsFormat, Utc};
use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::errors::{EssayError, EssayResult};

const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const R_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const REL_HYPERLINK: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink";
const REL_STYLES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
const HYPERLINK_COLOR: &str = "0000FF";
/// `rId1` is reserved for the style sheet.
const FIRST_HYPERLINK_REL: usize = 2;

/// Inline content of a paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Run(String),
    Hyperlink { url: String, text: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocxParagraph {
    inlines: Vec<Inline>,
}

impl DocxParagraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        let mut paragraph = Self::new();
        paragraph.add_run(text);
        paragraph
    }

    pub fn add_run(&mut self, text: impl Into<String>) {
        self.inlines.push(Inline::Run(text.into()));
    }

    /// Appends an underlined, colored hyperlink run pointing at `url`.
    pub fn add_hyperlink(&mut self, url: impl Into<String>, text: impl Into<String>) {
        self.inlines.push(Inline::Hyperlink {
            url: url.into(),
            text: text.into(),
        });
    }

    pub fn inlines(&self) -> &[Inline] {
        &self.inlines
    }

    pub fn plain_text(&self) -> String {
        self.inlines
            .iter()
            .map(|inline| match inline {
                Inline::Run(text) => text.as_str(),
                Inline::Hyperlink { text, .. } => text.as_str(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Level 0 renders with the `Title` style, level n with `Heading{n}`.
    Heading { level: u8, text: String },
    Paragraph(DocxParagraph),
}

#[derive(Debug, Clone)]
pub struct DocxDocument {
    title: Option<String>,
    blocks: Vec<Block>,
    created_at: DateTime<Utc>,
}

impl Default for DocxDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl DocxDocument {
    pub fn new() -> Self {
        Self {
            title: None,
            blocks: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Title recorded in the package core properties.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    pub fn add_heading(&mut self, text: impl Into<String>, level: u8) {
        self.blocks.push(Block::Heading {
            level,
            text: text.into(),
        });
    }

    pub fn add_paragraph(&mut self, paragraph: DocxParagraph) {
        self.blocks.push(Block::Paragraph(paragraph));
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// `(url, visible text)` for every hyperlink in document order.
    pub fn hyperlinks(&self) -> Vec<(&str, &str)> {
        self.blocks
            .iter()
            .filter_map(|block| match block {
                Block::Paragraph(paragraph) => Some(paragraph.inlines()),
                Block::Heading { .. } => None,
            })
            .flatten()
            .filter_map(|inline| match inline {
                Inline::Hyperlink { url, text } => Some((url.as_str(), text.as_str())),
                Inline::Run(_) => None,
            })
            .collect()
    }

    /// Serializes the package into an in-memory buffer.
    pub fn to_bytes(&self) -> EssayResult<Vec<u8>> {
        let (document_xml, hyperlink_targets) = self.document_xml();
        let parts = [
            ("[Content_Types].xml", content_types_xml()),
            ("_rels/.rels", package_rels_xml()),
            ("docProps/core.xml", self.core_xml()),
            ("word/document.xml", document_xml),
            ("word/styles.xml", styles_xml()),
            ("word/_rels/document.xml.rels", document_rels_xml(&hyperlink_targets)),
        ];

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
        for (name, body) in &parts {
            zip.start_file(*name, options)?;
            zip.write_all(body.as_bytes())
                .map_err(|err| EssayError::Render(format!("writing {name}: {err}")))?;
        }
        let cursor = zip.finish()?;
        Ok(cursor.into_inner())
    }

    fn document_xml(&self) -> (String, Vec<String>) {
        let mut targets = Vec::new();
        let mut body = String::new();
        for block in &self.blocks {
            match block {
                Block::Heading { level, text } => {
                    let style = if *level == 0 {
                        "Title".to_string()
                    } else {
                        format!("Heading{level}")
                    };
                    body.push_str(&format!(
                        "<w:p><w:pPr><w:pStyle w:val=\"{style}\"/></w:pPr>{}</w:p>",
                        run_xml(text, None)
                    ));
                }
                Block::Paragraph(paragraph) => {
                    body.push_str("<w:p>");
                    for inline in paragraph.inlines() {
                        match inline {
                            Inline::Run(text) => body.push_str(&run_xml(text, None)),
                            Inline::Hyperlink { url, text } => {
                                let rel_id = format!("rId{}", FIRST_HYPERLINK_REL + targets.len());
                                targets.push(url.clone());
                                body.push_str(&format!(
                                    "<w:hyperlink r:id=\"{rel_id}\" w:history=\"1\">{}</w:hyperlink>",
                                    run_xml(text, Some(HYPERLINK_COLOR))
                                ));
                            }
                        }
                    }
                    body.push_str("</w:p>");
                }
            }
        }
        let xml = format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
             <w:document xmlns:w=\"{W_NS}\" xmlns:r=\"{R_NS}\"><w:body>{body}\
             <w:sectPr><w:pgSz w:w=\"12240\" w:h=\"15840\"/>\
             <w:pgMar w:top=\"1440\" w:right=\"1440\" w:bottom=\"1440\" w:left=\"1440\" \
             w:header=\"720\" w:footer=\"720\" w:gutter=\"0\"/></w:sectPr></w:body></w:document>"
        );
        (xml, targets)
    }

    fn core_xml(&self) -> String {
        let title = self.title.as_deref().map(escape_xml).unwrap_or_default();
        let created = self.created_at.to_rfc3339_opts(SecondsFormat::Secs, true);
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
             <cp:coreProperties \
             xmlns:cp=\"http://schemas.openxmlformats.org/package/2006/metadata/core-properties\" \
             xmlns:dc=\"http://purl.org/dc/elements/1.1/\" \
             xmlns:dcterms=\"http://purl.org/dc/terms/\" \
             xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\">\
             <dc:title>{title}</dc:title><dc:creator>essaybase</dc:creator>\
             <dcterms:created xsi:type=\"dcterms:W3CDTF\">{created}</dcterms:created>\
             </cp:coreProperties>"
        )
    }
}

fn run_xml(text: &str, hyperlink_color: Option<&str>) -> String {
    let mut xml = String::from("<w:r>");
    if let Some(color) = hyperlink_color {
        xml.push_str(&format!(
            "<w:rPr><w:rStyle w:val=\"Hyperlink\"/><w:color w:val=\"{color}\"/><w:u w:val=\"single\"/></w:rPr>"
        ));
    }
    for (idx, line) in text.split('\n').enumerate() {
        if idx > 0 {
            xml.push_str("<w:br/>");
        }
        xml.push_str(&format!(
            "<w:t xml:space=\"preserve\">{}</w:t>",
            escape_xml(line)
        ));
    }
    xml.push_str("</w:r>");
    xml
}

fn content_types_xml() -> String {
    "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
     <Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">\
     <Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>\
     <Default Extension=\"xml\" ContentType=\"application/xml\"/>\
     <Override PartName=\"/word/document.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml\"/>\
     <Override PartName=\"/word/styles.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml\"/>\
     <Override PartName=\"/docProps/core.xml\" ContentType=\"application/vnd.openxmlformats-package.core-properties+xml\"/>\
     </Types>"
        .to_string()
}

fn package_rels_xml() -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
         <Relationships xmlns=\"{REL_NS}\">\
         <Relationship Id=\"rId1\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument\" Target=\"word/document.xml\"/>\
         <Relationship Id=\"rId2\" Type=\"http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties\" Target=\"docProps/core.xml\"/>\
         </Relationships>"
    )
}

fn document_rels_xml(hyperlink_targets: &[String]) -> String {
    let mut xml = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
         <Relationships xmlns=\"{REL_NS}\">\
         <Relationship Id=\"rId1\" Type=\"{REL_STYLES}\" Target=\"styles.xml\"/>"
    );
    for (idx, target) in hyperlink_targets.iter().enumerate() {
        xml.push_str(&format!(
            "<Relationship Id=\"rId{}\" Type=\"{REL_HYPERLINK}\" Target=\"{}\" TargetMode=\"External\"/>",
            FIRST_HYPERLINK_REL + idx,
            escape_xml(target)
        ));
    }
    xml.push_str("</Relationships>");
    xml
}

fn styles_xml() -> String {
    let heading = |level: u8, size: u8| {
        format!(
            "<w:style w:type=\"paragraph\" w:styleId=\"Heading{level}\">\
             <w:name w:val=\"heading {level}\"/><w:basedOn w:val=\"Normal\"/><w:next w:val=\"Normal\"/>\
             <w:pPr><w:keepNext/><w:spacing w:before=\"240\" w:after=\"80\"/><w:outlineLvl w:val=\"{}\"/></w:pPr>\
             <w:rPr><w:b/><w:sz w:val=\"{size}\"/></w:rPr></w:style>",
            level - 1
        )
    };
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
         <w:styles xmlns:w=\"{W_NS}\">\
         <w:style w:type=\"paragraph\" w:default=\"1\" w:styleId=\"Normal\"><w:name w:val=\"Normal\"/>\
         <w:pPr><w:spacing w:after=\"160\"/></w:pPr><w:rPr><w:sz w:val=\"22\"/></w:rPr></w:style>\
         <w:style w:type=\"paragraph\" w:styleId=\"Title\"><w:name w:val=\"Title\"/><w:basedOn w:val=\"Normal\"/>\
         <w:next w:val=\"Normal\"/><w:rPr><w:sz w:val=\"52\"/></w:rPr></w:style>\
         {}{}{}\
         <w:style w:type=\"character\" w:styleId=\"Hyperlink\"><w:name w:val=\"Hyperlink\"/>\
         <w:rPr><w:color w:val=\"{HYPERLINK_COLOR}\"/><w:u w:val=\"single\"/></w:rPr></w:style>\
         </w:styles>",
        heading(1, 32),
        heading(2, 28),
        heading(3, 24)
    )
}

/// Escapes markup characters and drops code points XML 1.0 cannot carry.
fn escape_xml(input: &str) -> String {
    input
        .chars()
        .filter(|ch| matches!(ch, '\t' | '\n' | '\r') || !ch.is_control())
        .map(|ch| match ch {
            '<' => "&lt;".into(),
            '>' => "&gt;".into(),
            '&' => "&amp;".into(),
            '"' => "&quot;".into(),
            '\'' => "&apos;".into(),
            _ => ch.to_string(),
        })
        .collect::<String>()
}
