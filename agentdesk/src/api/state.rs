use std::sync::Arc;

use crate::artifacts::ArtifactStore;
use crate::config::Config;
use crate::llm::LlmProvider;
use crate::services::{ContentService, Orchestrator, PresentationService};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub llm: LlmProvider,
    pub artifacts: ArtifactStore,
    pub presentation: PresentationService,
    pub content: ContentService,
    pub orchestrator: Orchestrator,
}

impl AppState {
    pub fn new(config: Config, llm: LlmProvider) -> Self {
        let config = Arc::new(config);
        let artifacts = ArtifactStore::new(config.output.dir.clone());
        let presentation = PresentationService::new(
            llm.clone(),
            artifacts.clone(),
            config.presentation.clone(),
        );
        let content = ContentService::new(llm.clone(), artifacts.clone());
        let orchestrator = Orchestrator::new(llm.clone(), presentation.clone(), content.clone());

        Self {
            config,
            llm,
            artifacts,
            presentation,
            content,
            orchestrator,
        }
    }

    /// Builds the provider from `config.llm` and wires every service to it.
    pub fn from_config(config: Config) -> Self {
        let llm = LlmProvider::new(&config.llm);
        Self::new(config, llm)
    }
}
