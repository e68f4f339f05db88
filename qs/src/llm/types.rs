//! LLM request/response types
//!
//! Provider-agnostic shapes for a single chat completion exchange.

use tracing::debug;

/// A completion request - everything needed for one LLM call
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// System prompt (role-designated preamble)
    pub system_prompt: String,

    /// User messages (one per oracle exchange)
    pub messages: Vec<Message>,

    /// Max tokens for response
    pub max_tokens: u32,

    /// Sampling temperature; low values keep repeated runs convergent
    pub temperature: f64,
}

/// A user-role message carrying one instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub content: String,
}

impl Message {
    /// Create a user message
    pub fn user(text: impl Into<String>) -> Self {
        debug!("Message::user: called");
        Self { content: text.into() }
    }
}

/// Why the model stopped generating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StopReason {
    #[default]
    EndTurn,
    MaxTokens,
}

impl StopReason {
    /// Map an OpenAI `finish_reason` to a stop reason
    pub fn from_finish_reason(reason: Option<&str>) -> Self {
        match reason {
            Some("length") => StopReason::MaxTokens,
            _ => StopReason::EndTurn,
        }
    }
}

/// Token accounting for one exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

/// A completion response
#[derive(Debug, Clone, Default)]
pub struct CompletionResponse {
    /// Text content, if the model produced any
    pub content: Option<String>,

    pub stop_reason: StopReason,

    pub usage: TokenUsage,
}

impl CompletionResponse {
    /// Build a plain text response
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Default::default()
        }
    }
}
