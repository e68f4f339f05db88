//! Oracle client
//!
//! One request/response exchange with the text-generation model: a fixed
//! system preamble plus the instruction body, bounded output, low temperature.
//! Errors are handed back to the caller untouched.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::config::LlmConfig;
use crate::llm::{CompletionRequest, LlmClient, LlmError, Message};

/// The seam between the decomposition engine and whatever answers it
#[async_trait]
pub trait Oracle: Send + Sync {
    /// Send `instruction` and return the raw reply, whitespace-trimmed
    ///
    /// `question` is the original question the instruction was built from.
    async fn invoke(&self, instruction: &str, question: &str) -> Result<String, LlmError>;
}

/// Oracle backed by an LLM chat completion client
pub struct LlmOracle {
    llm: Arc<dyn LlmClient>,
    system_prompt: String,
    max_tokens: u32,
    temperature: f64,
}

impl LlmOracle {
    pub fn new(llm: Arc<dyn LlmClient>, system_prompt: impl Into<String>, max_tokens: u32, temperature: f64) -> Self {
        Self {
            llm,
            system_prompt: system_prompt.into(),
            max_tokens,
            temperature,
        }
    }

    /// Build an oracle using the output bound and temperature from config
    pub fn from_config(llm: Arc<dyn LlmClient>, system_prompt: impl Into<String>, config: &LlmConfig) -> Self {
        Self::new(llm, system_prompt, config.max_tokens, config.temperature)
    }
}

#[async_trait]
impl Oracle for LlmOracle {
    async fn invoke(&self, instruction: &str, question: &str) -> Result<String, LlmError> {
        debug!(question_len = question.len(), instruction_len = instruction.len(), "LlmOracle::invoke: called");
        let request = CompletionRequest {
            system_prompt: self.system_prompt.clone(),
            messages: vec![Message::user(instruction)],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let response = self.llm.complete(request).await?;
        debug!(
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            stop_reason = ?response.stop_reason,
            "LlmOracle::invoke: response received"
        );

        Ok(response.content.as_deref().map(str::trim).unwrap_or_default().to_string())
    }
}
