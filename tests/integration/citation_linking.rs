use essaybase::writing::citations::spans_to_plain;
use essaybase::{CitationLinker, Source};

fn climate_sources() -> Vec<Source> {
    vec![
        Source::new("Climate Report", "http://a.co"),
        Source::new("Smith Study", "http://b.co"),
    ]
}

#[test]
fn matched_citation_becomes_inline_link() {
    let sources = climate_sources();
    let linker = CitationLinker::new(&sources);
    assert_eq!(
        linker.render_display("Según [Smith, 2020], el clima cambia."),
        "Según [Smith, 2020](http://b.co), el clima cambia."
    );
}

#[test]
fn citation_without_sources_is_unchanged() {
    let linker = CitationLinker::new(&[]);
    let paragraph = "Nadie lo sabe [Doe, 1999].";
    assert_eq!(linker.render_display(paragraph), paragraph);
    let document = linker.render_document(paragraph);
    assert_eq!(document.plain_text(), paragraph);
    assert!(linker
        .link_paragraph(paragraph)
        .iter()
        .all(|span| !span.is_linked()));
}

#[test]
fn earlier_source_wins_when_both_contain_key() {
    let sources = vec![
        Source::new("Ostrom on commons", "http://first.co"),
        Source::new("Ostrom revisited", "http://second.co"),
    ];
    let linker = CitationLinker::new(&sources);
    assert_eq!(linker.render_display("[Ostrom]"), "[Ostrom](http://first.co)");
}

#[test]
fn non_conformant_output_degrades_to_plain_text() {
    let sources = climate_sources();
    let linker = CitationLinker::new(&sources);
    let text = "Sin citas (Smith 2020) ni corchetes.\n\nOtro párrafo.";
    assert_eq!(linker.render_display_text(text), text);
    assert_eq!(linker.linked_count(text), 0);
}

#[test]
fn spans_round_trip_mixed_paragraph() {
    let sources = climate_sources();
    let linker = CitationLinker::new(&sources);
    let paragraph = "[Climate] abre; [Smith, 2020] sigue; [Nadie] cierra [x";
    let spans = linker.link_paragraph(paragraph);
    assert_eq!(spans_to_plain(&spans), paragraph);
    assert_eq!(spans.iter().filter(|span| span.is_linked()).count(), 2);
}
