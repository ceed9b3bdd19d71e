//! Source references produced by the research stage

use serde::{Deserialize, Serialize};

/// Hard cap on the number of sources handed to the planner
pub const MAX_SOURCES: usize = 10;

/// A single web result judged relevant to the trip
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceReference {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

impl SourceReference {
    pub fn new(title: impl Into<String>, url: impl Into<String>, snippet: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            snippet: snippet.into(),
        }
    }

    /// Markdown link over the title, falling back to the URL for untitled results
    pub fn markdown_link(&self) -> String {
        let text = if self.title.trim().is_empty() { &self.url } else { &self.title };
        format!("[{}]({})", text.trim(), self.url)
    }
}
