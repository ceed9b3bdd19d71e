//! Planning stage
//!
//! Turns the request and the ranked sources into a day-wise markdown
//! itinerary using the planning model. With no sources the stage returns a
//! skeleton document instead of calling the model.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::domain::{ItineraryDocument, Pace, Request, SourceReference};
use crate::error::PlanningError;
use crate::llm::{CompletionRequest, LlmClient};
use crate::prompts::PromptLoader;

/// Role description for the planner
pub const PLANNER_ROLE: &str = "You are a senior travel planner responsible for crafting a thoughtful and \
customized travel itinerary. You are given a structured summary of the user's travel preferences and a list \
of research results pointing to travel articles and itinerary resources. Extract the suggestions that align \
with the user's goals and turn them into a practical, engaging, well-paced day-by-day plan.";

const PLAN_MAX_TOKENS: u32 = 8192;

/// Heading date format given to the planner ("April 10")
const DAY_DATE_FORMAT: &str = "%B %-d";

#[derive(Serialize)]
struct PlanContext<'a> {
    summary: String,
    trip_days: usize,
    days: Vec<PlanDay>,
    sources: Vec<PlanSource<'a>>,
}

#[derive(Serialize)]
struct PlanDay {
    number: usize,
    date: String,
}

#[derive(Serialize)]
struct PlanSource<'a> {
    number: usize,
    title: &'a str,
    url: &'a str,
    snippet: &'a str,
}

/// Planner instructions, including the fixed pace table
pub fn planner_instructions() -> Vec<String> {
    let mut instructions: Vec<String> = vec![
        "Carefully analyze the user's structured requirements. Pay close attention to:".into(),
        "   - **Destination**: Ensure all activities are relevant to this place.".into(),
        "   - **Travel Dates**: Match the itinerary length to these dates, one section per day.".into(),
        "   - **Number of Travelers**: Suggest group-friendly or couple-friendly options where applicable.".into(),
        "   - **Accommodation Preference**: Highlight suitable styles (e.g., Airbnb, hotel) from the source content."
            .into(),
        "   - **Budget**: Keep recommendations aligned with the given range.".into(),
        "   - **Interests**: Prioritize experiences matching the user's selected themes (e.g., food, nature, culture)."
            .into(),
        "   - **Itinerary Pace**: Adjust the number and intensity of activities per day:".into(),
    ];
    for pace in Pace::ALL {
        let range = pace.activities_per_day();
        instructions.push(format!(
            "      - {} pace: {}–{} activities/day",
            pace.name(),
            range.start(),
            range.end()
        ));
    }
    instructions.extend(
        [
            "   - **Local Transport**: Consider walkability, public transit, or driving for suggestions.",
            "   - **Dietary Needs**: Include dietary-specific recommendations where applicable.",
            "   - **Special Notes**: For honeymoons, birthdays, etc., personalize the experience with meaningful touches.",
            "Use only the insights from the research results to suggest real activities, restaurants, and attractions.",
            "Do not fabricate or invent content. Never introduce activities, venues, or facts that are absent from the research results.",
            "Design a clean, personalized day-by-day itinerary using Markdown formatting.",
            "Use `### Day X – Month Day: [Descriptive Title]` as the heading for each day (e.g., `### Day 1 – April 10: Arrival & Higashiyama Charm`).",
            "Below each heading, list that day's activities as bullet points, one activity per bullet, matching the selected pace.",
            "Group experiences logically by location, interest, or time of day.",
            "Embed hyperlinks in relevant keywords using Markdown, e.g., [Fushimi Inari Shrine](https://example.com/kyoto-guide). Do not paste raw URLs.",
            "Do not include any summary or introductory paragraph. Begin directly with Day 1.",
        ]
        .map(String::from),
    );
    instructions
}

/// Planning stage bound to the planning model
pub struct PlanningStage {
    llm: Arc<dyn LlmClient>,
    model: String,
    prompts: Arc<PromptLoader>,
}

impl PlanningStage {
    pub fn new(llm: Arc<dyn LlmClient>, model: impl Into<String>, prompts: Arc<PromptLoader>) -> Self {
        Self {
            llm,
            model: model.into(),
            prompts,
        }
    }

    /// Produce the itinerary for `request` from `sources`
    ///
    /// Malformed planner output is returned (with a warning) rather than
    /// rejected; only a failed or empty generation call is an error.
    pub async fn plan(&self, request: &Request, sources: &[SourceReference]) -> Result<ItineraryDocument, PlanningError> {
        debug!(model = %self.model, source_count = sources.len(), "PlanningStage::plan: called");
        if sources.is_empty() {
            warn!(destination = %request.destination(), "no research sources, returning skeleton itinerary");
            return Ok(ItineraryDocument::degraded(request));
        }

        let context = PlanContext {
            summary: request.to_prompt_summary(),
            trip_days: request.trip_days(),
            days: request
                .trip_dates()
                .iter()
                .enumerate()
                .map(|(i, d)| PlanDay {
                    number: i + 1,
                    date: d.format(DAY_DATE_FORMAT).to_string(),
                })
                .collect(),
            sources: sources
                .iter()
                .enumerate()
                .map(|(i, s)| PlanSource {
                    number: i + 1,
                    title: &s.title,
                    url: &s.url,
                    snippet: &s.snippet,
                })
                .collect(),
        };
        let input = self
            .prompts
            .render("plan", &context)
            .map_err(|e| PlanningError::Prompt(e.to_string()))?;

        let response = self
            .llm
            .complete(CompletionRequest {
                model: self.model.clone(),
                role: PLANNER_ROLE.to_string(),
                instructions: planner_instructions(),
                input,
                max_tokens: PLAN_MAX_TOKENS,
            })
            .await?;

        let text = response.into_text().ok_or(PlanningError::EmptyOutput)?;
        let document = ItineraryDocument::assess(text, request);
        for warning in document.warnings() {
            warn!(%warning, "itinerary check");
        }
        info!(days = document.days().len(), warnings = document.warnings().len(), "itinerary planned");
        Ok(document)
    }
}
