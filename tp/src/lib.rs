//! travelplanner - grounded day-by-day travel itineraries
//!
//! A two-stage pipeline turns a structured travel request into a markdown
//! itinerary. The research stage derives one search query, runs it against a
//! web search provider and has a fast model rank the hits. The planning
//! stage hands the ranked sources to a reasoning model that writes one
//! section per trip day, using only what the sources support.
//!
//! # Modules
//!
//! - [`domain`] - Request, source and itinerary types
//! - [`llm`] - Generation client trait and OpenAI implementation
//! - [`search`] - Web search client trait and provider implementations
//! - [`stages`] - Research and planning stages
//! - [`pipeline`] - Run state machine and orchestrator
//! - [`error`] - Failure taxonomy
//! - [`prompts`] - Prompt template loading
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod llm;
pub mod pipeline;
pub mod prompts;
pub mod search;
pub mod stages;

// Re-export commonly used types
pub use config::{Config, LlmConfig, SearchConfig};
pub use domain::{
    Accommodation, DaySection, Interest, ItineraryDocument, ItineraryWarning, Pace, PipelineCredentials, Request,
    RequestDraft, RequestError, SourceReference, Transport,
};
pub use error::{FailureKind, PipelineError, PlanningError, ResearchError, ValidationError};
pub use llm::{CompletionRequest, CompletionResponse, LlmClient, LlmError};
pub use pipeline::{Capabilities, HttpCapabilities, Orchestrator, PipelineOutcome, PipelinePhase, PipelineRun};
pub use search::{SearchClient, SearchError, SearchHit};
