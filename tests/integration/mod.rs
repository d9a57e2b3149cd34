use std::env;
use std::path::Path;
use tempfile::TempDir;

pub struct IntegrationHarness {
    workspace: TempDir,
}

impl IntegrationHarness {
    pub fn new() -> Self {
        let workspace = TempDir::new().expect("failed to create temp workspace");
        env::set_var("ESSAYBASE_HOME", workspace.path());
        Self { workspace }
    }

    pub fn workspace_path(&self) -> &Path {
        self.workspace.path()
    }
}

mod support;

mod citation_linking;
mod config_layer;
mod document_export;
mod essay_pipeline;
