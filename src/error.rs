use std::path::PathBuf;

use thiserror::Error;

/// Reasons a table cannot be turned into a comparison family.
///
/// Every variant is local to one input file: the run logs it and moves on.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed table: {0}")]
    Csv(#[from] csv::Error),

    #[error("table has no header row")]
    MissingHeader,

    #[error("file name {file_name:?} does not match the trace pattern {pattern}")]
    Naming { file_name: String, pattern: String },

    #[error(
        "table has {found} recognized algorithm column(s) {algorithms:?}, at least 2 are required"
    )]
    InsufficientColumns {
        found: usize,
        algorithms: Vec<String>,
    },
}

/// Why a single statistic could not be computed for one pair.
///
/// These never abort a pair or a file; the affected field becomes missing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatFailure {
    #[error("need at least {required} paired observations, got {got}")]
    InsufficientData { required: usize, got: usize },

    #[error("paired differences have zero variance")]
    ZeroVariance,

    #[error("all paired differences are zero")]
    AllZeroDifferences,

    #[error("input range is degenerate")]
    DegenerateInput,

    #[error("distribution error: {0}")]
    Distribution(String),

    #[error("result is not finite")]
    NonFinite,
}

impl StatFailure {
    /// Degenerate inputs are expected on real data and only logged at debug level.
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            StatFailure::InsufficientData { .. }
                | StatFailure::ZeroVariance
                | StatFailure::AllZeroDifferences
                | StatFailure::DegenerateInput
        )
    }
}
