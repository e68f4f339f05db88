//! Dataset annotation
//!
//! Walks a JSON array of question records, splits each `question` through the
//! decomposition engine, and merges `split_questions`, `is_split` and
//! `total_splits` into the record. Records are handled one at a time in input
//! order; other fields are left alone.

use std::fs;
use std::path::Path;

use eyre::{Context, Result, bail, eyre};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::splitter::QuestionSplitter;

/// Fields merged into every processed record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub split_questions: Vec<String>,
    pub is_split: bool,
    pub total_splits: usize,
}

impl Annotation {
    /// Derive the annotation for `question` from its decomposition
    ///
    /// A single element that differs from the question still counts as a
    /// split: the oracle rephrased rather than declined.
    pub fn derive(question: &str, split_questions: Vec<String>) -> Self {
        let total_splits = split_questions.len();
        let is_split = total_splits > 1 || (total_splits == 1 && split_questions[0] != question);
        Self {
            split_questions,
            is_split,
            total_splits,
        }
    }

    /// Write the annotation fields into `record`, replacing earlier values
    pub fn merge_into(self, record: &mut Map<String, Value>) {
        record.insert("split_questions".to_string(), Value::from(self.split_questions));
        record.insert("is_split".to_string(), Value::Bool(self.is_split));
        record.insert("total_splits".to_string(), Value::from(self.total_splits));
    }
}

/// Counts reported at the end of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub processed: usize,
    pub split: usize,
}

/// Per-record progress notification
#[derive(Debug, Clone, Copy)]
pub struct Progress<'a> {
    /// 1-based position of the record being processed
    pub current: usize,
    pub total: usize,
    pub question: &'a str,
}

type ProgressFn = Box<dyn Fn(Progress<'_>) + Send + Sync>;

/// Annotates question records through a [`QuestionSplitter`]
pub struct DatasetAnnotator {
    splitter: QuestionSplitter,
    progress: Option<ProgressFn>,
}

impl DatasetAnnotator {
    pub fn new(splitter: QuestionSplitter) -> Self {
        Self {
            splitter,
            progress: None,
        }
    }

    /// Call `f` before each record is sent to the oracle
    pub fn with_progress(mut self, f: impl Fn(Progress<'_>) + Send + Sync + 'static) -> Self {
        self.progress = Some(Box::new(f));
        self
    }

    /// Annotate `records` in place
    ///
    /// Every record is checked for a string `question` before the first oracle
    /// call, so a malformed dataset fails without spending requests.
    pub async fn process(&self, records: &mut [Value]) -> Result<RunSummary> {
        debug!(count = records.len(), "process: called");
        for (index, record) in records.iter().enumerate() {
            question_of(record, index)?;
        }

        let total = records.len();
        let mut summary = RunSummary::default();

        for (index, record) in records.iter_mut().enumerate() {
            let question = question_of(record, index)?.to_string();

            if let Some(ref progress) = self.progress {
                progress(Progress {
                    current: index + 1,
                    total,
                    question: &question,
                });
            }
            info!(current = index + 1, total, "process: splitting record");

            let split_questions = self.splitter.split(&question).await;
            let annotation = Annotation::derive(&question, split_questions);
            debug!(index, is_split = annotation.is_split, total_splits = annotation.total_splits, "process: annotated");

            summary.processed += 1;
            if annotation.is_split {
                summary.split += 1;
            }

            let Value::Object(map) = record else {
                return Err(eyre!("Record {} is not an object", index));
            };
            annotation.merge_into(map);
        }

        info!(processed = summary.processed, split = summary.split, "process: done");
        Ok(summary)
    }

    /// Read records from `input`, annotate them, and write them to `output`
    ///
    /// Nothing is written unless every record was processed.
    pub async fn process_file(&self, input: &Path, output: &Path) -> Result<RunSummary> {
        debug!(?input, ?output, "process_file: called");
        let mut records = read_records(input)?;

        let summary = self.process(&mut records).await?;

        write_records(output, &records)?;
        info!(?output, "process_file: wrote {} records", records.len());
        Ok(summary)
    }
}

fn question_of(record: &Value, index: usize) -> Result<&str> {
    let Value::Object(map) = record else {
        bail!("Record {} is not an object", index);
    };
    match map.get("question") {
        Some(Value::String(q)) => Ok(q),
        Some(_) => bail!("Record {} has a non-string 'question' field", index),
        None => bail!("Record {} has no 'question' field", index),
    }
}

/// Load a JSON array of records
pub fn read_records(path: &Path) -> Result<Vec<Value>> {
    let content = fs::read_to_string(path).context(format!("Failed to read {}", path.display()))?;
    let value: Value = serde_json::from_str(&content).context(format!("Failed to parse {}", path.display()))?;
    match value {
        Value::Array(records) => Ok(records),
        _ => bail!("{} must contain a JSON array of records", path.display()),
    }
}

/// Write records as 2-space indented JSON, non-ASCII kept verbatim
pub fn write_records(path: &Path, records: &[Value]) -> Result<()> {
    let mut content = serde_json::to_string_pretty(records)?;
    content.push('\n');
    fs::write(path, content).context(format!("Failed to write {}", path.display()))
}
