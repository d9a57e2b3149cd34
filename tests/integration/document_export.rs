use super::support::docx_reader::read_part;
use anyhow::Result;
use essaybase::config::ExportSettings;
use essaybase::reports::{DocumentExporter, DOCX_MIME_TYPE};
use essaybase::Source;

#[test]
fn exported_document_links_matched_citations() -> Result<()> {
    let exporter = DocumentExporter::new(ExportSettings::default());
    let sources = vec![
        Source::new("Climate Report", "http://a.co"),
        Source::new("Smith Study", "http://b.co"),
    ];
    let essay = "Introducción [Smith, 2020].\n\nDesarrollo [Doe, 1999] y [Climate].";
    let artifact = exporter.export("Cambio Climático", essay, &sources)?;

    assert_eq!(artifact.file_name, "cambio_climático_ensayo.docx");
    assert_eq!(artifact.mime_type, DOCX_MIME_TYPE);
    assert_eq!(artifact.hyperlink_count, 2);

    let document = read_part(&artifact.bytes, "word/document.xml")?;
    let title_at = document.find("Academic Essay").expect("heading present");
    let subtitle_at = document.find("Cambio Climático").expect("title present");
    let intro_at = document.find("Introducción").expect("first paragraph present");
    let note_at = document.find("Nota:").expect("disclaimer present");
    assert!(title_at < subtitle_at && subtitle_at < intro_at && intro_at < note_at);
    assert!(document.contains("[Doe, 1999]"));
    assert_eq!(document.matches("<w:hyperlink ").count(), 2);

    let rels = read_part(&artifact.bytes, "word/_rels/document.xml.rels")?;
    assert!(rels.contains("Target=\"http://b.co\""));
    assert!(rels.contains("Target=\"http://a.co\""));
    Ok(())
}

#[test]
fn custom_heading_and_disclaimer_are_used() -> Result<()> {
    let exporter = DocumentExporter::new(ExportSettings {
        heading: "Ensayo Académico".into(),
        disclaimer: "Generado automáticamente.".into(),
    });
    let artifact = exporter.export("T", "Cuerpo.", &[])?;
    let document = read_part(&artifact.bytes, "word/document.xml")?;
    assert!(document.contains("Ensayo Académico"));
    assert!(document.contains("Generado automáticamente."));
    assert!(!document.contains("<w:hyperlink"));
    Ok(())
}
