use super::IntegrationHarness;
use anyhow::Result;
use essaybase::config::{config_file_path, load_or_default, save};

#[test]
fn config_round_trips_through_workspace() -> Result<()> {
    let harness = IntegrationHarness::new();
    let path = config_file_path()?;
    assert!(path.starts_with(harness.workspace_path()));

    let defaults = load_or_default()?;
    assert_eq!(defaults.search.endpoint, "https://api.serply.io/v1/scholar");
    assert_eq!(defaults.export.heading, "Academic Essay");

    let mut config = defaults.clone();
    config.search.endpoint = "http://localhost:8080/scholar".into();
    config.http.timeout_secs = Some(30);
    config.generation.model = "meta-llama/Llama-3-70b-chat-hf".into();
    save(&config)?;
    assert!(path.exists());

    let reloaded = load_or_default()?;
    assert_eq!(reloaded.search.endpoint, "http://localhost:8080/scholar");
    assert_eq!(reloaded.http.timeout_secs, Some(30));
    assert_eq!(reloaded.generation.model, "meta-llama/Llama-3-70b-chat-hf");
    assert_eq!(reloaded.generation.stop, vec!["Título:".to_string()]);
    Ok(())
}
