//! Embedded prompts
//!
//! These are compiled into the binary from .pmt files at build time.

use tracing::debug;

/// Single search-term derivation input
pub const RESEARCH_QUERY: &str = include_str!("../../prompts/research-query.pmt");

/// Search result ranking input
pub const RESEARCH_RANK: &str = include_str!("../../prompts/research-rank.pmt");

/// Itinerary planning input
pub const PLAN: &str = include_str!("../../prompts/plan.pmt");

/// Get the embedded prompt by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    debug!(%name, "get_embedded: called");
    match name {
        "research-query" => Some(RESEARCH_QUERY),
        "research-rank" => Some(RESEARCH_RANK),
        "plan" => Some(PLAN),
        _ => {
            debug!("get_embedded: no match found");
            None
        }
    }
}
