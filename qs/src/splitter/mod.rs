//! Decomposition engine
//!
//! Turns one question into an ordered list of follow-up questions by asking the
//! oracle, then validating what comes back. Every failure path ends in the
//! single-element list holding the original question.

mod extract;

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::oracle::Oracle;
use crate::prompts::PromptLoader;

pub use extract::{Extraction, ValidationError, extract_list, parse_questions, validate};

/// How the oracle reply was interpreted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplitOutcome {
    /// Validated decomposition, in conversational order
    Decomposed(Vec<String>),
    /// Reply was empty or carried the no-split sentinel
    Declined,
    /// Reply could not be turned into a decomposition
    Rejected(ValidationError),
}

impl SplitOutcome {
    /// Interpret a raw oracle reply
    pub fn from_reply(raw: &str, no_split_token: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            debug!("SplitOutcome::from_reply: empty reply");
            return Self::Declined;
        }
        if !no_split_token.is_empty() && raw.contains(no_split_token) {
            debug!(%no_split_token, "SplitOutcome::from_reply: sentinel found");
            return Self::Declined;
        }

        match parse_questions(raw) {
            Ok(questions) => Self::Decomposed(questions),
            Err(e) => Self::Rejected(e),
        }
    }

    /// Resolve into the final question list, falling back to `question`
    pub fn into_questions(self, question: &str) -> Vec<String> {
        match self {
            Self::Decomposed(questions) => questions,
            Self::Declined | Self::Rejected(_) => vec![question.to_string()],
        }
    }
}

/// Splits questions through an oracle
pub struct QuestionSplitter {
    oracle: Arc<dyn Oracle>,
    prompts: PromptLoader,
    no_split_token: String,
}

impl QuestionSplitter {
    pub fn new(oracle: Arc<dyn Oracle>, prompts: PromptLoader, no_split_token: impl Into<String>) -> Self {
        Self {
            oracle,
            prompts,
            no_split_token: no_split_token.into(),
        }
    }

    /// Split `question` into an ordered list of sub-questions
    ///
    /// Never fails: oracle errors, malformed replies and explicit declines all
    /// yield `[question]`.
    pub async fn split(&self, question: &str) -> Vec<String> {
        debug!(question_len = question.len(), "split: called");

        let instruction = match self.prompts.split_instruction(question) {
            Ok(instruction) => instruction,
            Err(e) => {
                warn!(error = %e, "split: failed to build instruction, keeping original question");
                return vec![question.to_string()];
            }
        };

        let raw = match self.oracle.invoke(&instruction, question).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, %question, "split: oracle call failed, keeping original question");
                return vec![question.to_string()];
            }
        };

        let outcome = SplitOutcome::from_reply(&raw, &self.no_split_token);
        match &outcome {
            SplitOutcome::Decomposed(questions) => {
                info!(count = questions.len(), "split: decomposed");
            }
            SplitOutcome::Declined => {
                debug!("split: oracle declined to split");
            }
            SplitOutcome::Rejected(reason) => {
                warn!(%reason, %question, reply = %raw, "split: unusable oracle output, keeping original question");
            }
        }

        outcome.into_questions(question)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::stub::StubOracle;

    fn build_splitter(oracle: StubOracle) -> (QuestionSplitter, Arc<StubOracle>) {
        let oracle = Arc::new(oracle);
        let splitter = QuestionSplitter::new(oracle.clone(), PromptLoader::embedded_only(), crate::NO_SPLIT_TOKEN);
        (splitter, oracle)
    }

    #[tokio::test]
    async fn test_direct_parse_returns_sequence_verbatim() {
        let reply = r#"["최근 5년간의 매출금액", "GM은?", "그렇다면 ... 예측해줄 수 있나요?"]"#;
        let question = "최근 5개년의 매출금액과 GM을 기반으로, 향후 5개년간의 예상되는 매출금액과 GM은?";
        let (splitter, _) = build_splitter(StubOracle::always(reply));

        let result = splitter.split(question).await;
        assert_eq!(
            result,
            vec![
                "최근 5년간의 매출금액".to_string(),
                "GM은?".to_string(),
                "그렇다면 ... 예측해줄 수 있나요?".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_embedded_extraction() {
        let (splitter, _) = build_splitter(StubOracle::always("Here is the result:\n[\"A\", \"B\"]\nThanks"));
        assert_eq!(splitter.split("Q?").await, vec!["A".to_string(), "B".to_string()]);
    }

    #[tokio::test]
    async fn test_oracle_failure_falls_back() {
        let (splitter, _) = build_splitter(StubOracle::failing(503));
        assert_eq!(splitter.split("Q?").await, vec!["Q?".to_string()]);

        let (splitter, _) = build_splitter(StubOracle::failing(401));
        assert_eq!(splitter.split("Q?").await, vec!["Q?".to_string()]);
    }

    #[tokio::test]
    async fn test_unparseable_reply_falls_back() {
        let (splitter, _) = build_splitter(StubOracle::always("I think this question is fine as is."));
        assert_eq!(splitter.split("Q?").await, vec!["Q?".to_string()]);
    }

    #[tokio::test]
    async fn test_object_reply_falls_back() {
        let (splitter, oracle) = build_splitter(StubOracle::always(r#"{"questions": ["A?", "B?"]}"#));
        assert_eq!(splitter.split("Q?").await, vec!["Q?".to_string()]);
        assert_eq!(oracle.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_reply_falls_back() {
        let (splitter, _) = build_splitter(StubOracle::always("   \n "));
        assert_eq!(splitter.split("Q?").await, vec!["Q?".to_string()]);
    }

    #[tokio::test]
    async fn test_sentinel_wins_over_content() {
        let (splitter, _) = build_splitter(StubOracle::always("[\"A\", \"B\"]\nNO_SPLIT"));
        assert_eq!(splitter.split("Q?").await, vec!["Q?".to_string()]);
    }

    #[tokio::test]
    async fn test_shape_validation_falls_back() {
        for reply in ["[\"A\", 3]", "[\"A\", \"   \"]", "[]", "[null]", "[1, 2]"] {
            let (splitter, _) = build_splitter(StubOracle::always(reply));
            assert_eq!(splitter.split("Q?").await, vec!["Q?".to_string()], "reply: {}", reply);
        }
    }

    #[tokio::test]
    async fn test_rephrased_single_question_is_kept() {
        let (splitter, _) = build_splitter(StubOracle::always("[\"Y?\"]"));
        assert_eq!(splitter.split("X?").await, vec!["Y?".to_string()]);
    }

    #[tokio::test]
    async fn test_instruction_carries_question() {
        let (splitter, oracle) = build_splitter(StubOracle::always("[\"A\"]"));
        splitter.split("올해 매출은?").await;

        let calls = oracle.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].0.contains("원본 질문: 올해 매출은?"));
        assert_eq!(calls[0].1, "올해 매출은?");
    }

    #[test]
    fn test_outcome_from_reply() {
        assert_eq!(SplitOutcome::from_reply("", "NO_SPLIT"), SplitOutcome::Declined);
        assert_eq!(SplitOutcome::from_reply("NO_SPLIT", "NO_SPLIT"), SplitOutcome::Declined);
        assert_eq!(
            SplitOutcome::from_reply("[\"A\"]", "NO_SPLIT"),
            SplitOutcome::Decomposed(vec!["A".to_string()])
        );
        assert_eq!(
            SplitOutcome::from_reply("no list", "NO_SPLIT"),
            SplitOutcome::Rejected(ValidationError::NotFound)
        );
    }

    #[test]
    fn test_custom_sentinel() {
        assert_eq!(SplitOutcome::from_reply("KEEP", "KEEP"), SplitOutcome::Declined);
        // empty sentinel disables the check instead of matching everything
        assert_eq!(
            SplitOutcome::from_reply("[\"A\"]", ""),
            SplitOutcome::Decomposed(vec!["A".to_string()])
        );
    }

    #[test]
    fn test_into_questions() {
        assert_eq!(SplitOutcome::Declined.into_questions("Q"), vec!["Q".to_string()]);
        assert_eq!(
            SplitOutcome::Rejected(ValidationError::Empty).into_questions("Q"),
            vec!["Q".to_string()]
        );
        assert_eq!(
            SplitOutcome::Decomposed(vec!["A".to_string(), "B".to_string()]).into_questions("Q"),
            vec!["A".to_string(), "B".to_string()]
        );
    }
}
