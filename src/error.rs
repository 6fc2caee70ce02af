//! Error type shared by the collection, enrichment and analysis layers.

use thiserror::Error;

use crate::types::TimeWindow;

#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// Conflicting or missing selection, or an out-of-range argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A metric that needs at least one observation saw none.
    #[error("cannot compute {metric} for {window}: no data in this time range")]
    EmptyWindow {
        metric: &'static str,
        window: TimeWindow,
    },

    /// The catalog failed or answered with something unusable.
    #[error("remote fetch failed: {0}")]
    RemoteFetch(String),
}

impl From<reqwest::Error> for AnalyzerError {
    fn from(err: reqwest::Error) -> Self {
        AnalyzerError::RemoteFetch(err.to_string())
    }
}
