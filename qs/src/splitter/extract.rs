//! Recovering a question list from noisy oracle output
//!
//! Everything here is pure: text in, tagged value out. The oracle may wrap its
//! array in prose or markdown fences, so extraction tries the whole reply first
//! and then every bracketed span in order of appearance.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use thiserror::Error;

/// Non-greedy bracketed span, allowed to cross newlines
static BRACKETED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)\[.*?\]").expect("bracket pattern is valid"));

/// Result of scanning a reply for a JSON array
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    /// First JSON array found, elements not yet checked
    Found(Vec<Value>),
    /// The whole text is valid JSON, but not an array
    NotAList,
    /// No parseable array anywhere in the text
    NotFound,
}

/// Why a recovered array cannot be used as a decomposition
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no JSON array found in oracle output")]
    NotFound,

    #[error("oracle output is JSON but not an array")]
    NotAList,

    #[error("oracle returned an empty array")]
    Empty,

    #[error("element {index} is not a string")]
    NonString { index: usize },

    #[error("element {index} is blank")]
    Blank { index: usize },
}

/// Find the first JSON array in `text`
///
/// Stage one parses the whole trimmed text; stage two tries each bracketed
/// span left to right and keeps the first that parses as an array. Stage two
/// only runs when the whole text is not JSON at all: a reply that parses as an
/// object or scalar is [`Extraction::NotAList`].
pub fn extract_list(text: &str) -> Extraction {
    let trimmed = text.trim();

    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Array(values)) => return Extraction::Found(values),
        Ok(_) => return Extraction::NotAList,
        Err(_) => {}
    }

    BRACKETED
        .find_iter(trimmed)
        .find_map(|m| serde_json::from_str::<Vec<Value>>(m.as_str()).ok())
        .map_or(Extraction::NotFound, Extraction::Found)
}

/// Check that every element is a non-blank string
///
/// Strings are returned verbatim; trimming is only used for the blank check.
pub fn validate(values: Vec<Value>) -> Result<Vec<String>, ValidationError> {
    if values.is_empty() {
        return Err(ValidationError::Empty);
    }

    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| match value {
            Value::String(s) if s.trim().is_empty() => Err(ValidationError::Blank { index }),
            Value::String(s) => Ok(s),
            _ => Err(ValidationError::NonString { index }),
        })
        .collect()
}

/// Extract and validate in one step
pub fn parse_questions(text: &str) -> Result<Vec<String>, ValidationError> {
    match extract_list(text) {
        Extraction::Found(values) => validate(values),
        Extraction::NotAList => Err(ValidationError::NotAList),
        Extraction::NotFound => Err(ValidationError::NotFound),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_extract_whole_text() {
        let text = r#"["최근 5년간의 매출금액", "GM은?"]"#;
        assert_eq!(
            extract_list(text),
            Extraction::Found(vec![json!("최근 5년간의 매출금액"), json!("GM은?")])
        );
    }

    #[test]
    fn test_extract_whole_text_multiline() {
        let text = "[\n  \"A\",\n  \"B\"\n]\n";
        assert_eq!(extract_list(text), Extraction::Found(vec![json!("A"), json!("B")]));
    }

    #[test]
    fn test_extract_embedded_in_prose() {
        let text = "Here is the result:\n[\"A\", \"B\"]\nThanks";
        assert_eq!(extract_list(text), Extraction::Found(vec![json!("A"), json!("B")]));
    }

    #[test]
    fn test_extract_from_markdown_fence() {
        let text = "```json\n[\n  \"first?\",\n  \"second?\"\n]\n```";
        assert_eq!(
            extract_list(text),
            Extraction::Found(vec![json!("first?"), json!("second?")])
        );
    }

    #[test]
    fn test_extract_skips_unparseable_spans() {
        let text = "see [note 1] then [\"A\"] and [\"B\"]";
        assert_eq!(extract_list(text), Extraction::Found(vec![json!("A")]));
    }

    #[test]
    fn test_extract_object_is_not_a_list() {
        assert_eq!(extract_list(r#"{"questions": "none"}"#), Extraction::NotAList);
    }

    #[test]
    fn test_extract_object_wrapping_array_is_not_a_list() {
        assert_eq!(extract_list(r#"{"questions": ["A?", "B?"]}"#), Extraction::NotAList);
        assert_eq!(extract_list("  \"just a string\"\n"), Extraction::NotAList);
        assert_eq!(extract_list("42"), Extraction::NotAList);
        assert_eq!(
            parse_questions(r#"{"questions": ["A?", "B?"]}"#),
            Err(ValidationError::NotAList)
        );
    }

    #[test]
    fn test_extract_not_found() {
        assert_eq!(extract_list("I cannot split this question."), Extraction::NotFound);
        assert_eq!(extract_list(""), Extraction::NotFound);
        assert_eq!(extract_list("[unterminated"), Extraction::NotFound);
    }

    #[test]
    fn test_validate_accepts_strings_verbatim() {
        let values = vec![json!(" A "), json!("B?")];
        assert_eq!(validate(values), Ok(vec![" A ".to_string(), "B?".to_string()]));
    }

    #[test]
    fn test_validate_rejects_empty() {
        assert_eq!(validate(vec![]), Err(ValidationError::Empty));
    }

    #[test]
    fn test_validate_rejects_non_string() {
        assert_eq!(
            validate(vec![json!("A"), json!(42)]),
            Err(ValidationError::NonString { index: 1 })
        );
        assert_eq!(
            validate(vec![json!(null)]),
            Err(ValidationError::NonString { index: 0 })
        );
        assert_eq!(
            validate(vec![json!(["nested"])]),
            Err(ValidationError::NonString { index: 0 })
        );
    }

    #[test]
    fn test_validate_rejects_blank() {
        assert_eq!(
            validate(vec![json!("A"), json!("  \n\t")]),
            Err(ValidationError::Blank { index: 1 })
        );
        assert_eq!(validate(vec![json!("")]), Err(ValidationError::Blank { index: 0 }));
    }

    #[test]
    fn test_parse_questions() {
        assert_eq!(
            parse_questions("Result: [\"X?\", \"Y?\"]"),
            Ok(vec!["X?".to_string(), "Y?".to_string()])
        );
        assert_eq!(parse_questions("nothing here"), Err(ValidationError::NotFound));
        assert_eq!(parse_questions("[]"), Err(ValidationError::Empty));
    }

    proptest! {
        #[test]
        fn prop_text_without_brackets_has_no_list(text in "[^\\[\\]]*") {
            prop_assert!(!matches!(extract_list(&text), Extraction::Found(_)));
        }

        #[test]
        fn prop_array_in_prose_is_recovered(
            items in prop::collection::vec("[a-zA-Z0-9 ?]{1,20}", 1..5),
            prefix in "[a-zA-Z .:]{0,30}",
            suffix in "[a-zA-Z .!]{0,30}",
        ) {
            let array = serde_json::to_string(&items).unwrap();
            let text = format!("{}\n{}\n{}", prefix, array, suffix);
            let expected: Vec<Value> = items.iter().map(|s| json!(s)).collect();
            prop_assert_eq!(extract_list(&text), Extraction::Found(expected));
        }
    }
}
