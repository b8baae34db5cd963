use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CompareError>;

#[derive(Debug, Error)]
pub enum CompareError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("preprocess failed: {0}")]
    Preprocess(String),

    #[error("parser error: {0}")]
    Parser(String),

    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("cannot decode {what} as {encoding}")]
    Decode { what: String, encoding: String },
}

impl CompareError {
    pub(crate) fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub(crate) fn preprocess(msg: impl Into<String>) -> Self {
        Self::Preprocess(msg.into())
    }

    pub(crate) fn parser(msg: impl Into<String>) -> Self {
        Self::Parser(msg.into())
    }

    // Prefixes unit-scoped failures with the candidate's position so a
    // multi-candidate caller can tell which unit aborted the comparison.
    pub(crate) fn for_candidate(self, index: usize) -> Self {
        match self {
            Self::Preprocess(msg) => Self::Preprocess(format!("candidate {index}: {msg}")),
            Self::Parser(msg) => Self::Parser(format!("candidate {index}: {msg}")),
            Self::Decode { what, encoding } => Self::Decode {
                what: format!("candidate {index}: {what}"),
                encoding,
            },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidate_prefix_names_the_failing_unit() {
        let err = CompareError::preprocess("g++ exited with status 1").for_candidate(2);
        assert!(err.to_string().contains("candidate 2"));
    }

    #[test]
    fn io_errors_convert() {
        let err: CompareError = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, CompareError::Io(_)));
    }
}
