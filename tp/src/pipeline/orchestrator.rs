//! Pipeline orchestrator
//!
//! Sequences research then planning for one request. Credentials come in
//! with each call and are only used to build that run's adapters. There are
//! no retries: the first failure ends the run.

use std::sync::Arc;

use tracing::{Instrument, debug, info_span};

use super::capabilities::{Capabilities, HttpCapabilities};
use super::state::{PipelinePhase, PipelineRun, RunTracker};
use crate::config::Config;
use crate::domain::{ItineraryDocument, PipelineCredentials, Request, RequestDraft, RequestError};
use crate::error::{PipelineError, ValidationError};
use crate::prompts::PromptLoader;
use crate::stages::{PlanningStage, ResearchOutput, ResearchStage};

/// Runs the research → planning pipeline
pub struct Orchestrator {
    capabilities: Arc<dyn Capabilities>,
    research_model: String,
    planning_model: String,
    source_limit: usize,
    prompts: Arc<PromptLoader>,
}

impl Orchestrator {
    pub fn new(capabilities: Arc<dyn Capabilities>, config: &Config, prompts: PromptLoader) -> Self {
        debug!(
            research_model = %config.llm.research_model,
            planning_model = %config.llm.planning_model,
            "Orchestrator::new: called"
        );
        Self {
            capabilities,
            research_model: config.llm.research_model.clone(),
            planning_model: config.llm.planning_model.clone(),
            source_limit: config.research.source_limit(),
            prompts: Arc::new(prompts),
        }
    }

    /// HTTP adapters and templates resolved relative to `root`
    pub fn from_config(config: &Config, root: impl AsRef<std::path::Path>) -> Self {
        let prompts = PromptLoader::new(root, config.prompts.dir.clone());
        Self::new(Arc::new(HttpCapabilities::from_config(config)), config, prompts)
    }

    /// Validate `draft` and run the full pipeline
    pub async fn run(&self, draft: RequestDraft, credentials: &PipelineCredentials) -> PipelineRun {
        self.execute(Request::new(draft), credentials).await
    }

    /// Run the full pipeline for an already validated request
    pub async fn run_request(&self, request: Request, credentials: &PipelineCredentials) -> PipelineRun {
        self.execute(Ok(request), credentials).await
    }

    /// Run only the research stage (query and ranked sources)
    pub async fn research(
        &self,
        request: &Request,
        credentials: &PipelineCredentials,
    ) -> Result<ResearchOutput, PipelineError> {
        debug!(destination = %request.destination(), "Orchestrator::research: called");
        let (generation_key, search_key) = Self::required_keys(credentials)?;
        let (research, _) = self.build_stages(generation_key, search_key)?;
        research.run(request).await
    }

    async fn execute(&self, request: Result<Request, RequestError>, credentials: &PipelineCredentials) -> PipelineRun {
        let mut tracker = RunTracker::new();
        let span = info_span!("pipeline_run", run_id = %tracker.id());
        let result = self.drive(&mut tracker, request, credentials).instrument(span).await;
        tracker.finish(result)
    }

    async fn drive(
        &self,
        tracker: &mut RunTracker,
        request: Result<Request, RequestError>,
        credentials: &PipelineCredentials,
    ) -> Result<ItineraryDocument, PipelineError> {
        tracker.enter(PipelinePhase::ValidatingPreconditions);
        let (generation_key, search_key) = Self::required_keys(credentials)?;
        let request = request?;
        let (research, planning) = self.build_stages(generation_key, search_key)?;

        tracker.enter(PipelinePhase::Researching);
        let output = research.run(&request).await?;

        tracker.enter(PipelinePhase::Planning);
        let document = planning.plan(&request, &output.sources).await?;
        Ok(document)
    }

    /// Both keys, generation first
    fn required_keys(credentials: &PipelineCredentials) -> Result<(&str, &str), ValidationError> {
        debug!(?credentials, "Orchestrator::required_keys: called");
        let generation_key = credentials
            .generation_key()
            .ok_or(ValidationError::MissingCredential("generation_api_key"))?;
        let search_key = credentials
            .search_key()
            .ok_or(ValidationError::MissingCredential("search_api_key"))?;
        Ok((generation_key, search_key))
    }

    /// Build this run's adapters and stages
    fn build_stages(
        &self,
        generation_key: &str,
        search_key: &str,
    ) -> Result<(ResearchStage, PlanningStage), ValidationError> {
        debug!("Orchestrator::build_stages: called");
        let llm = self
            .capabilities
            .generation(generation_key)
            .map_err(|e| ValidationError::AdapterSetup {
                adapter: "generation",
                reason: e.to_string(),
            })?;
        let search = self
            .capabilities
            .search(search_key)
            .map_err(|e| ValidationError::AdapterSetup {
                adapter: "search",
                reason: e.to_string(),
            })?;

        let research = ResearchStage::new(
            llm.clone(),
            search,
            &self.research_model,
            self.source_limit,
            self.prompts.clone(),
        );
        let planning = PlanningStage::new(llm, &self.planning_model, self.prompts.clone());
        Ok((research, planning))
    }
}
