use super::support::docx_reader::read_part;
use super::support::providers::{ScriptedGeneration, ScriptedSearch};
use anyhow::Result;
use essaybase::{AppConfig, Audience, EssayError, EssayPipeline, EssayRequest};

#[test]
fn one_search_per_author_in_input_order() -> Result<()> {
    let search = ScriptedSearch::new()
        .with_hits(
            "Smith",
            &[
                ("Smith Study", "http://b.co"),
                ("Smith Notes", "http://c.co"),
                ("Smith Extra", "http://d.co"),
            ],
        )
        .with_hits("Doe", &[("Doe Review", "http://e.co")]);
    let generation = ScriptedGeneration::replying("Según [Smith, 2020], el clima cambia.");
    let pipeline = EssayPipeline::new(&search, &generation, &AppConfig::default());

    let run = pipeline.run(&EssayRequest::new(
        "Climate",
        "El clima cambia",
        "Smith, Doe",
        Audience::General,
    ))?;

    assert_eq!(
        *search.queries.borrow(),
        vec!["Smith Climate".to_string(), "Doe Climate".to_string()]
    );
    let labels: Vec<_> = run.sources.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, vec!["Smith Study", "Smith Notes", "Doe Review"]);
    assert_eq!(generation.requests.borrow().len(), 1);
    assert_eq!(
        run.display_markdown,
        "Según [Smith, 2020](http://b.co), el clima cambia."
    );
    assert_eq!(run.markers, vec!["Smith, 2020".to_string()]);
    assert_eq!(run.linked_markers, 1);
    Ok(())
}

#[test]
fn prompt_carries_rendered_source_list() -> Result<()> {
    let search = ScriptedSearch::new().with_hits("Arendt", &[("Eichmann in Jerusalem", "http://x.co")]);
    let generation = ScriptedGeneration::replying("Texto.");
    let pipeline = EssayPipeline::new(&search, &generation, &AppConfig::default());
    pipeline.run(&EssayRequest::new(
        "Banalidad",
        "El mal es banal",
        "Arendt",
        Audience::Knowledgeable,
    ))?;
    let requests = generation.requests.borrow();
    assert!(requests[0].prompt.contains("- Eichmann in Jerusalem: http://x.co"));
    assert!(requests[0].prompt.contains("Banalidad"));
    Ok(())
}

#[test]
fn missing_field_stops_before_any_network_call() {
    let search = ScriptedSearch::new();
    let generation = ScriptedGeneration::replying("unused");
    let pipeline = EssayPipeline::new(&search, &generation, &AppConfig::default());
    let err = pipeline
        .run(&EssayRequest::new("Climate", "Thesis", "   ", Audience::General))
        .unwrap_err();
    assert!(matches!(err, EssayError::Validation { .. }));
    assert!(search.queries.borrow().is_empty());
    assert!(generation.requests.borrow().is_empty());
}

#[test]
fn search_failure_propagates_without_generation() {
    let search = ScriptedSearch::new()
        .with_hits("Smith", &[("Smith Study", "http://b.co")])
        .failing_for("Doe");
    let generation = ScriptedGeneration::replying("unused");
    let pipeline = EssayPipeline::new(&search, &generation, &AppConfig::default());
    let err = pipeline
        .run(&EssayRequest::new("Climate", "Thesis", "Smith, Doe", Audience::General))
        .unwrap_err();
    assert!(matches!(err, EssayError::Transport { provider: "search", .. }));
    assert!(generation.requests.borrow().is_empty());
}

#[test]
fn generation_failure_propagates() {
    let search = ScriptedSearch::new();
    let generation = ScriptedGeneration::failing("503 service unavailable");
    let pipeline = EssayPipeline::new(&search, &generation, &AppConfig::default());
    let err = pipeline
        .run(&EssayRequest::new("Climate", "Thesis", "Smith", Audience::General))
        .unwrap_err();
    assert!(err.to_string().contains("503"));
}

#[test]
fn run_export_matches_display_links() -> Result<()> {
    let search = ScriptedSearch::new().with_hits("Smith", &[("Smith Study", "http://b.co")]);
    let generation =
        ScriptedGeneration::replying("  Intro [Smith, 2020].\n\nCierre [Doe, 1999].  ");
    let pipeline = EssayPipeline::new(&search, &generation, &AppConfig::default());
    let run = pipeline.run(&EssayRequest::new(
        "Mi Ensayo",
        "Tesis",
        "Smith",
        Audience::Specialist,
    ))?;
    assert_eq!(run.essay_text, "Intro [Smith, 2020].\n\nCierre [Doe, 1999].");
    assert_eq!(
        run.display_markdown,
        "Intro [Smith, 2020](http://b.co).\n\nCierre [Doe, 1999]."
    );
    let artifact = run.export.as_ref().expect("export succeeds");
    assert_eq!(artifact.file_name, "mi_ensayo_ensayo.docx");
    let rels = read_part(&artifact.bytes, "word/_rels/document.xml.rels")?;
    assert!(rels.contains("http://b.co"));
    assert_eq!(artifact.hyperlink_count, 1);

    let summary = run.summary();
    assert_eq!(summary.marker_count, 2);
    assert_eq!(summary.linked_markers, 1);
    Ok(())
}
