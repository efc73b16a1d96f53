//! Collection-level aggregation and export errors

use thiserror::Error;

/// Errors that stop an aggregation run
#[derive(Error, Debug)]
pub enum BuildError {
    /// Input collection is missing or unreadable
    #[error("Input collection unavailable: {path}")]
    InputUnavailable {
        /// Input location
        path: String,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// Two input files declare the same pathway id
    #[error("Duplicate pathway id: {0}")]
    DuplicatePathwayId(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// CSV writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Template rendering failed
    #[error("Template rendering failed: {0}")]
    Template(#[from] handlebars::RenderError),
}

impl BuildError {
    /// Get error code for logs and exit reporting
    pub fn error_code(&self) -> &'static str {
        match self {
            BuildError::InputUnavailable { .. } => "INPUT_UNAVAILABLE",
            BuildError::DuplicatePathwayId(_) => "DUPLICATE_PATHWAY",
            BuildError::Io(_) => "IO_ERROR",
            BuildError::Serialization(_) | BuildError::Csv(_) | BuildError::Template(_) => {
                "EXPORT_FAILED"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_pathway_id() {
        let err = BuildError::DuplicatePathwayId("rp_1_1".to_string());
        assert_eq!(err.to_string(), "Duplicate pathway id: rp_1_1");
        assert_eq!(err.error_code(), "DUPLICATE_PATHWAY");
    }

    #[test]
    fn test_input_unavailable_keeps_source() {
        use std::error::Error as _;

        let err = BuildError::InputUnavailable {
            path: "missing/".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(err.error_code(), "INPUT_UNAVAILABLE");
        assert!(err.source().is_some());
    }
}
