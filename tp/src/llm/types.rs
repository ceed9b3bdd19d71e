//! Generation request/response types
//!
//! A request is the `(model, role, instructions, input)` tuple every stage
//! sends; providers turn it into their own wire format.

use chrono::NaiveDate;
use tracing::debug;

/// A completion request - everything needed for one generation call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    /// Model identifier (research and planning use different models)
    pub model: String,

    /// Role description, e.g. "senior travel planner"
    pub role: String,

    /// Ordered instructions appended to the role
    pub instructions: Vec<String>,

    /// The user-side input (rendered from a prompt template)
    pub input: String,

    /// Max tokens for response
    pub max_tokens: u32,
}

impl CompletionRequest {
    /// Compose the system prompt from role, instructions and the current date
    ///
    /// Instructions starting with whitespace or `-` are treated as
    /// continuation items and kept as written; others become bullets.
    pub fn system_prompt(&self, today: NaiveDate) -> String {
        debug!(model = %self.model, instruction_count = self.instructions.len(), "CompletionRequest::system_prompt: called");
        let mut prompt = self.role.trim().to_string();

        if !self.instructions.is_empty() {
            prompt.push_str("\n\nInstructions:\n");
            for instruction in &self.instructions {
                if instruction.starts_with(char::is_whitespace) || instruction.starts_with('-') {
                    prompt.push_str(instruction);
                } else {
                    prompt.push_str("- ");
                    prompt.push_str(instruction);
                }
                prompt.push('\n');
            }
        }

        prompt.push_str(&format!("\nThe current date is {}.", today.format("%Y-%m-%d")));
        prompt
    }
}

/// Response from a completion request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionResponse {
    /// Text content (if any)
    pub content: Option<String>,

    /// Why the model stopped
    pub stop_reason: StopReason,

    /// Token usage for cost tracking
    pub usage: TokenUsage,
}

impl CompletionResponse {
    /// Plain text response with no usage information
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            stop_reason: StopReason::EndTurn,
            usage: TokenUsage::default(),
        }
    }

    /// The content, if it is present and not blank
    pub fn into_text(self) -> Option<String> {
        self.content.filter(|c| !c.trim().is_empty())
    }
}

/// Why the model stopped generating
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    EndTurn,
    MaxTokens,
    ContentFilter,
}

impl StopReason {
    /// Parse from an OpenAI `finish_reason`
    pub fn from_openai(reason: Option<&str>) -> Self {
        debug!(?reason, "StopReason::from_openai: called");
        match reason {
            Some("length") => StopReason::MaxTokens,
            Some("content_filter") => StopReason::ContentFilter,
            _ => StopReason::EndTurn,
        }
    }
}

/// Token usage counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}
