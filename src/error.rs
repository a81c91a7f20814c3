use std::path::PathBuf;

use thiserror::Error;

/// Fatal failures of one normalization pass. None of these are retried.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("no test report found at {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read test report {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed XML in {}: {message}", path.display())]
    Malformed { path: PathBuf, message: String },

    #[error("unsupported report format in {}: root element <{root}>", path.display())]
    Unsupported { path: PathBuf, root: String },

    #[error(
        "<{root}> report {} found while scanning a directory: this format has no directory support",
        path.display()
    )]
    NoDirectorySupport { path: PathBuf, root: String },
}
