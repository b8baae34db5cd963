use std::time::Duration;

use crate::error::{CompareError, Result};
use crate::source::{SourceInput, supported_encoding};

pub const DEFAULT_KGRAM_LEN: usize = 3;
pub const DEFAULT_WINDOW_SIZE: usize = 5;
pub const DEFAULT_PREPROCESS_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Options {
    /// k-gram length for winnowing.
    pub kgram_len: usize,
    /// Winnowing window size.
    pub window_size: usize,
    /// Source text encoding; only UTF-8 is currently accepted.
    pub encoding: String,
    /// Preprocessor-capable compiler invoked as `<compiler> -E <file>`.
    pub compiler: String,
    /// Upper bound on one preprocessor invocation; `None` waits forever.
    pub preprocess_timeout: Option<Duration>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            kgram_len: DEFAULT_KGRAM_LEN,
            window_size: DEFAULT_WINDOW_SIZE,
            encoding: "utf-8".to_string(),
            compiler: "g++".to_string(),
            preprocess_timeout: Some(Duration::from_secs(DEFAULT_PREPROCESS_TIMEOUT_SECS)),
        }
    }
}

impl Options {
    pub(crate) fn validate(&self) -> Result<()> {
        if self.kgram_len == 0 {
            return Err(CompareError::invalid_input("kgram_len must be >= 1"));
        }
        if self.window_size == 0 {
            return Err(CompareError::invalid_input("window_size must be >= 1"));
        }
        if !supported_encoding(&self.encoding) {
            return Err(CompareError::invalid_input(format!(
                "unsupported encoding: {}",
                self.encoding
            )));
        }
        if self.compiler.is_empty() {
            return Err(CompareError::invalid_input("compiler must not be empty"));
        }
        Ok(())
    }
}

/// The second side of a similarity comparison: one candidate or a list.
#[derive(Debug, Clone)]
pub enum Target {
    Single(SourceInput),
    Many(Vec<SourceInput>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityOutcome {
    /// Remapped Jaccard score in [0, 1].
    pub score: f64,
    /// Index of the best-scoring candidate (first-encountered on ties).
    pub best_index: Option<usize>,
    /// Raw text of the best-scoring candidate.
    pub best_match: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateRun {
    pub number: usize,
    /// Matched token text from each stream, grouped at statement boundaries.
    pub left: Vec<String>,
    pub right: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DuplicationReport {
    pub runs: Vec<DuplicateRun>,
}

impl DuplicationReport {
    pub fn render_a(&self) -> String {
        render(self.runs.iter().map(|run| (run.number, &run.left)))
    }

    pub fn render_b(&self) -> String {
        render(self.runs.iter().map(|run| (run.number, &run.right)))
    }
}

fn render<'a>(runs: impl Iterator<Item = (usize, &'a Vec<String>)>) -> String {
    let rendered: Vec<String> = runs
        .map(|(number, groups)| format!("{number}: {}\n\n", groups.join(" ")))
        .collect();
    rendered.join(" ")
}
