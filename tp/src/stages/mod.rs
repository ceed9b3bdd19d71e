//! The two pipeline stages
//!
//! Each stage is bound to one role, one fixed instruction list and one model.

mod planning;
mod research;

pub use planning::{PLANNER_ROLE, PlanningStage, planner_instructions};
pub use research::{RESEARCHER_ROLE, ResearchOutput, ResearchStage, extract_query, parse_ranking};
