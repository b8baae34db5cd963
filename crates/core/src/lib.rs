mod compare;
mod duplicate;
mod error;
mod fingerprint;
mod normalize;
mod reduce;
mod score;
mod source;
mod syntax;
mod types;

pub use compare::{cst_graph, duplication, similarity};

pub use error::{CompareError, Result};

pub use source::{SourceInput, SourceUnit};

pub use syntax::{CstGraph, CstGraphNode};

pub use types::{
    DEFAULT_KGRAM_LEN, DEFAULT_PREPROCESS_TIMEOUT_SECS, DEFAULT_WINDOW_SIZE, DuplicateRun,
    DuplicationReport, Options, SimilarityOutcome, Target,
};
