//! Pipeline error taxonomy

use std::fmt;

use thiserror::Error;

use crate::domain::RequestError;
use crate::llm::LlmError;
use crate::search::SearchError;

/// A run could not start
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("missing credential: {0}")]
    MissingCredential(&'static str),

    #[error("invalid request: {0}")]
    InvalidRequest(#[from] RequestError),

    #[error("could not set up {adapter} adapter: {reason}")]
    AdapterSetup { adapter: &'static str, reason: String },
}

/// The research stage could not produce a query or a ranking
#[derive(Debug, Error)]
pub enum ResearchError {
    #[error("generation call failed: {0}")]
    Generation(#[from] LlmError),

    #[error("no search query could be extracted from: {0:?}")]
    NoQuery(String),

    #[error("ranking output is not a list of result numbers: {0:?}")]
    UnparseableRanking(String),

    #[error("prompt error: {0}")]
    Prompt(String),
}

/// The planning stage failed before producing any text
#[derive(Debug, Error)]
pub enum PlanningError {
    #[error("generation call failed: {0}")]
    Generation(#[from] LlmError),

    #[error("planner returned no text")]
    EmptyOutput,

    #[error("prompt error: {0}")]
    Prompt(String),
}

/// Classified terminal failure of a pipeline run
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Research(#[from] ResearchError),

    #[error(transparent)]
    SearchProvider(#[from] SearchError),

    #[error(transparent)]
    Planning(#[from] PlanningError),
}

impl PipelineError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Validation(_) => FailureKind::Validation,
            Self::Research(_) => FailureKind::Research,
            Self::SearchProvider(_) => FailureKind::SearchProvider,
            Self::Planning(_) => FailureKind::Planning,
        }
    }
}

impl From<RequestError> for PipelineError {
    fn from(e: RequestError) -> Self {
        Self::Validation(ValidationError::InvalidRequest(e))
    }
}

/// Failure classification reported to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Validation,
    Research,
    SearchProvider,
    Planning,
}

impl FailureKind {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation => "VALIDATION_ERROR",
            Self::Research => "RESEARCH_FAILURE",
            Self::SearchProvider => "SEARCH_PROVIDER_FAILURE",
            Self::Planning => "PLANNING_FAILURE",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
