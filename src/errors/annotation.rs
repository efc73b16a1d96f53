//! Post-processing annotation errors
//!
//! None of these abort a run: the annotator logs them and the affected
//! feature degrades (unmarked cofactor, `svg = null`).

use std::time::Duration;
use thiserror::Error;

/// Cofactor tagging and structure depiction failures
#[derive(Error, Debug)]
pub enum AnnotationError {
    /// Cofactor reference file does not exist
    #[error("Cofactor file not found: {0}")]
    CofactorFileNotFound(String),

    /// Cofactor reference file could not be parsed
    #[error("Cofactor file unreadable: {0}")]
    CofactorFile(#[from] csv::Error),

    /// External renderer could not be started or talked to
    #[error("Renderer I/O error: {0}")]
    RendererIo(#[from] std::io::Error),

    /// External renderer exited with a failure status
    #[error("Renderer exited with status {status}: {stderr}")]
    RendererFailed {
        /// Exit status reported by the renderer
        status: String,
        /// Captured standard error
        stderr: String,
    },

    /// Depiction service rejected the request
    #[error("Depiction request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Depiction service URL template is unusable
    #[error("Invalid depiction URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Renderer produced no output for the structure
    #[error("Renderer returned an empty depiction")]
    EmptyDepiction,

    /// Renderer exceeded the per-depiction budget
    #[error("Depiction timed out after {0:?}")]
    Timeout(Duration),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cofactor_file_not_found() {
        let err = AnnotationError::CofactorFileNotFound("cofactors.tsv".to_string());
        assert_eq!(err.to_string(), "Cofactor file not found: cofactors.tsv");
    }

    #[test]
    fn test_timeout_message() {
        let err = AnnotationError::Timeout(Duration::from_secs(2));
        assert_eq!(err.to_string(), "Depiction timed out after 2s");
    }
}
