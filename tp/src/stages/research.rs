//! Research stage
//!
//! Compresses a request into one search query, runs it, and has the research
//! model rank the raw hits down to at most ten sources. Three external calls:
//! query derivation, search, ranking. Ranking is skipped when the search
//! returns nothing usable.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::domain::{MAX_SOURCES, Request, SourceReference};
use crate::error::{PipelineError, ResearchError};
use crate::llm::{CompletionRequest, LlmClient};
use crate::prompts::PromptLoader;
use crate::search::{SearchClient, SearchHit};

/// Role description for both research calls
pub const RESEARCHER_ROLE: &str = "You are a world-class travel researcher. Given a detailed summary of a \
traveller's requirements, you find the web sources that best capture their travel intent.";

const QUERY_INSTRUCTIONS: &[&str] = &[
    "Use the user's travel requirements to understand their travel preferences, location, interests, and travel style.",
    "Generate exactly ONE concise, highly relevant search term (e.g., '4-day Tokyo itinerary for food lovers' or 'best relaxing beaches in Bali').",
    "Avoid using too many keywords in the search term. Keep it short and focused so search results stay relevant.",
    "Output only the search term itself: no quotes, no list, no boolean operators, no commentary.",
];

const RANK_INSTRUCTIONS: &[&str] = &[
    "From the search results, pick the entries that best align with the user's preferences.",
    "Judge relevance against the full requirements (destination, dates, interests, pace, budget), not only the search term.",
    "Focus on relevance, clarity, and usability of results.",
    "Respond with ONLY a JSON array of result numbers, most relevant first.",
];

const QUERY_MAX_TOKENS: u32 = 100;
const RANK_MAX_TOKENS: u32 = 200;

/// Separators that indicate the model produced more than one query
const MULTI_QUERY_SEPARATORS: &[&str] = &[" AND ", " OR ", ";", " | "];

/// Label prefixes models like to put before the term
const QUERY_LABELS: &[&str] = &["search term:", "search query:", "query:"];

/// Output of a successful research stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResearchOutput {
    pub query: String,
    pub sources: Vec<SourceReference>,
}

#[derive(Serialize)]
struct QueryContext {
    summary: String,
}

#[derive(Serialize)]
struct RankContext<'a> {
    summary: String,
    query: &'a str,
    hits: Vec<NumberedHit<'a>>,
    limit: usize,
}

#[derive(Serialize)]
struct NumberedHit<'a> {
    number: usize,
    title: &'a str,
    url: &'a str,
    snippet: &'a str,
}

/// Research stage bound to the research model and a search client
pub struct ResearchStage {
    llm: Arc<dyn LlmClient>,
    search: Arc<dyn SearchClient>,
    model: String,
    limit: usize,
    prompts: Arc<PromptLoader>,
}

impl ResearchStage {
    /// `limit` is clamped to the hard cap of ten sources
    pub fn new(
        llm: Arc<dyn LlmClient>,
        search: Arc<dyn SearchClient>,
        model: impl Into<String>,
        limit: usize,
        prompts: Arc<PromptLoader>,
    ) -> Self {
        Self {
            llm,
            search,
            model: model.into(),
            limit: limit.clamp(1, MAX_SOURCES),
            prompts,
        }
    }

    /// Query derivation followed by search and ranking
    pub async fn run(&self, request: &Request) -> Result<ResearchOutput, PipelineError> {
        debug!(destination = %request.destination(), "ResearchStage::run: called");
        let query = self.derive_query(request).await?;
        let sources = self.search(request, &query).await?;
        Ok(ResearchOutput { query, sources })
    }

    /// Ask the research model for exactly one search term
    pub async fn derive_query(&self, request: &Request) -> Result<String, ResearchError> {
        debug!(model = %self.model, "ResearchStage::derive_query: called");
        let input = self
            .prompts
            .render(
                "research-query",
                &QueryContext {
                    summary: request.to_prompt_summary(),
                },
            )
            .map_err(|e| ResearchError::Prompt(e.to_string()))?;

        let response = self
            .llm
            .complete(self.completion(QUERY_INSTRUCTIONS, input, QUERY_MAX_TOKENS))
            .await?;

        let raw = response.into_text().unwrap_or_default();
        let query = extract_query(&raw).ok_or(ResearchError::NoQuery(raw))?;
        info!(%query, "research query derived");
        Ok(query)
    }

    /// Run the query and keep the most relevant hits, in ranked order
    ///
    /// Zero usable hits is not an error; the result is simply empty.
    pub async fn search(&self, request: &Request, query: &str) -> Result<Vec<SourceReference>, PipelineError> {
        debug!(%query, "ResearchStage::search: called");
        let hits: Vec<SearchHit> = self
            .search
            .search(query)
            .await?
            .into_iter()
            .filter(|h| !h.url.trim().is_empty())
            .collect();

        if hits.is_empty() {
            info!(%query, "search returned no usable results");
            return Ok(Vec::new());
        }

        let order = self.rank(request, query, &hits).await?;
        let sources: Vec<SourceReference> = order
            .into_iter()
            .take(self.limit)
            .map(|i| {
                let hit = &hits[i];
                SourceReference::new(hit.title.trim(), hit.url.trim(), hit.snippet.trim())
            })
            .collect();

        info!(raw_hits = hits.len(), sources = sources.len(), "research sources ranked");
        Ok(sources)
    }

    /// Zero-based indices into `hits`, most relevant first
    async fn rank(&self, request: &Request, query: &str, hits: &[SearchHit]) -> Result<Vec<usize>, ResearchError> {
        debug!(hit_count = hits.len(), "ResearchStage::rank: called");
        let context = RankContext {
            summary: request.to_prompt_summary(),
            query,
            hits: hits
                .iter()
                .enumerate()
                .map(|(i, h)| NumberedHit {
                    number: i + 1,
                    title: &h.title,
                    url: &h.url,
                    snippet: &h.snippet,
                })
                .collect(),
            limit: self.limit,
        };
        let input = self
            .prompts
            .render("research-rank", &context)
            .map_err(|e| ResearchError::Prompt(e.to_string()))?;

        let response = self
            .llm
            .complete(self.completion(RANK_INSTRUCTIONS, input, RANK_MAX_TOKENS))
            .await?;

        let raw = response.into_text().unwrap_or_default();
        let numbers = parse_ranking(&raw).ok_or(ResearchError::UnparseableRanking(raw))?;
        Ok(select_indices(&numbers, hits.len()))
    }

    fn completion(&self, instructions: &[&str], input: String, max_tokens: u32) -> CompletionRequest {
        CompletionRequest {
            model: self.model.clone(),
            role: RESEARCHER_ROLE.to_string(),
            instructions: instructions.iter().map(|s| s.to_string()).collect(),
            input,
            max_tokens,
        }
    }
}

/// Pull a single search term out of model output
///
/// Takes the first non-empty line that does not just introduce the answer
/// (ends in `:`), strips list markers, labels and quotes, and cuts at the
/// first multi-query separator.
pub fn extract_query(raw: &str) -> Option<String> {
    debug!(raw_len = raw.len(), "extract_query: called");
    let line = raw
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty() && !l.starts_with("```") && !l.ends_with(':'))?;

    let mut term = strip_list_marker(line);
    for label in QUERY_LABELS {
        if let Some(head) = term.get(..label.len())
            && head.eq_ignore_ascii_case(label)
        {
            term = term[label.len()..].trim_start();
            break;
        }
    }

    let mut term = term.trim_matches(|c: char| matches!(c, '"' | '\'' | '`' | '“' | '”' | '*'));
    for sep in MULTI_QUERY_SEPARATORS {
        if let Some(pos) = term.find(sep) {
            term = &term[..pos];
        }
    }

    let term = term
        .trim_matches(|c: char| matches!(c, '"' | '\'' | '`' | '“' | '”' | '*'))
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    if term.is_empty() { None } else { Some(term) }
}

fn strip_list_marker(line: &str) -> &str {
    if let Some(rest) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
        return rest.trim_start();
    }
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        let rest = &line[digits..];
        if let Some(rest) = rest.strip_prefix(". ").or_else(|| rest.strip_prefix(") ")) {
            return rest.trim_start();
        }
    }
    line
}

/// Parse a JSON array of result numbers, tolerating surrounding prose
pub fn parse_ranking(raw: &str) -> Option<Vec<usize>> {
    debug!(raw_len = raw.len(), "parse_ranking: called");
    if let Ok(numbers) = serde_json::from_str::<Vec<usize>>(raw.trim()) {
        return Some(numbers);
    }

    // Fallback: try to extract a JSON array from the response
    let start = raw.find('[')?;
    let end = raw.rfind(']')?;
    if end < start {
        return None;
    }
    serde_json::from_str::<Vec<usize>>(&raw[start..=end]).ok()
}

/// Map 1-based result numbers to unique in-range 0-based indices, keeping order
fn select_indices(numbers: &[usize], hit_count: usize) -> Vec<usize> {
    let mut selected: Vec<usize> = Vec::new();
    for &n in numbers {
        if (1..=hit_count).contains(&n) && !selected.contains(&(n - 1)) {
            selected.push(n - 1);
        }
    }
    selected
}
