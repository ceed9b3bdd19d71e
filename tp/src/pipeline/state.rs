//! Pipeline run state machine
//!
//! `Idle → ValidatingPreconditions → Researching → Planning → Done`, with a
//! transition to `Failed(kind)` from any active phase.

use std::fmt;

use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::ItineraryDocument;
use crate::error::{FailureKind, PipelineError};

/// Phase of a pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelinePhase {
    Idle,
    ValidatingPreconditions,
    Researching,
    Planning,
    Done,
    Failed(FailureKind),
}

impl PipelinePhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed(_))
    }
}

impl fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::ValidatingPreconditions => write!(f, "validating-preconditions"),
            Self::Researching => write!(f, "researching"),
            Self::Planning => write!(f, "planning"),
            Self::Done => write!(f, "done"),
            Self::Failed(kind) => write!(f, "failed({})", kind),
        }
    }
}

/// Terminal result of a run
#[derive(Debug)]
pub enum PipelineOutcome {
    Done(ItineraryDocument),
    Failed(PipelineError),
}

/// A finished run: its id, every phase it passed through, and the outcome
#[derive(Debug)]
pub struct PipelineRun {
    pub id: Uuid,
    pub phases: Vec<PipelinePhase>,
    pub outcome: PipelineOutcome,
}

impl PipelineRun {
    /// The terminal phase
    pub fn phase(&self) -> PipelinePhase {
        match &self.outcome {
            PipelineOutcome::Done(_) => PipelinePhase::Done,
            PipelineOutcome::Failed(e) => PipelinePhase::Failed(e.kind()),
        }
    }

    pub fn itinerary(&self) -> Option<&ItineraryDocument> {
        match &self.outcome {
            PipelineOutcome::Done(doc) => Some(doc),
            PipelineOutcome::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&PipelineError> {
        match &self.outcome {
            PipelineOutcome::Done(_) => None,
            PipelineOutcome::Failed(e) => Some(e),
        }
    }

    pub fn into_result(self) -> Result<ItineraryDocument, PipelineError> {
        match self.outcome {
            PipelineOutcome::Done(doc) => Ok(doc),
            PipelineOutcome::Failed(e) => Err(e),
        }
    }
}

/// Records phase transitions while a run is in flight
pub(crate) struct RunTracker {
    id: Uuid,
    phases: Vec<PipelinePhase>,
}

impl RunTracker {
    pub(crate) fn new() -> Self {
        let id = Uuid::now_v7();
        debug!(%id, "RunTracker::new: called");
        Self {
            id,
            phases: vec![PipelinePhase::Idle],
        }
    }

    pub(crate) fn id(&self) -> Uuid {
        self.id
    }

    pub(crate) fn enter(&mut self, phase: PipelinePhase) {
        info!(run_id = %self.id, %phase, "pipeline phase");
        self.phases.push(phase);
    }

    pub(crate) fn finish(mut self, result: Result<ItineraryDocument, PipelineError>) -> PipelineRun {
        let outcome = match result {
            Ok(doc) => PipelineOutcome::Done(doc),
            Err(e) => PipelineOutcome::Failed(e),
        };
        let terminal = match &outcome {
            PipelineOutcome::Done(_) => PipelinePhase::Done,
            PipelineOutcome::Failed(e) => PipelinePhase::Failed(e.kind()),
        };
        self.enter(terminal);
        PipelineRun {
            id: self.id,
            phases: self.phases,
            outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlanningError;

    #[test]
    fn test_tracker_records_failure() {
        let mut tracker = RunTracker::new();
        tracker.enter(PipelinePhase::ValidatingPreconditions);
        tracker.enter(PipelinePhase::Researching);
        tracker.enter(PipelinePhase::Planning);
        let run = tracker.finish(Err(PlanningError::EmptyOutput.into()));

        assert_eq!(run.phase(), PipelinePhase::Failed(FailureKind::Planning));
        assert_eq!(run.phases.last(), Some(&PipelinePhase::Failed(FailureKind::Planning)));
        assert_eq!(run.phases.first(), Some(&PipelinePhase::Idle));
        assert!(run.itinerary().is_none());
        assert!(run.error().is_some());
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(PipelinePhase::Researching.to_string(), "researching");
        assert_eq!(
            PipelinePhase::Failed(FailureKind::SearchProvider).to_string(),
            "failed(SEARCH_PROVIDER_FAILURE)"
        );
        assert!(PipelinePhase::Done.is_terminal());
        assert!(!PipelinePhase::Planning.is_terminal());
    }
}
