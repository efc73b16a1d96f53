//! Domain-specific error types for pathnet
//!
//! # Error Categories
//!
//! - **IdentityError**: no canonical identifier can be derived for a record
//! - **AnnotationError**: cofactor reference or depiction failures
//! - **BuildError**: collection-level failures while aggregating pathways
//!
//! Record-level errors are logged and the record is skipped. Only a
//! [`BuildError`] can stop an aggregation run.
//!
//! # Examples
//!
//! ```rust
//! use pathnet::errors::{BuildError, IdentityError};
//!
//! let err = IdentityError::MissingReactionSmiles("RP1".to_string());
//! assert!(err.to_string().contains("RP1"));
//!
//! let err = BuildError::DuplicatePathwayId("rp_1_1".to_string());
//! assert_eq!(err.error_code(), "DUPLICATE_PATHWAY");
//! ```

pub mod annotation;
pub mod identity;
pub mod pipeline;

pub use annotation::AnnotationError;
pub use identity::IdentityError;
pub use pipeline::BuildError;

/// Result type alias for identifier resolution
pub type IdentityResult<T> = Result<T, IdentityError>;

/// Result type alias for annotation passes
pub type AnnotationResult<T> = Result<T, AnnotationError>;

/// Result type alias for aggregation runs
pub type BuildResult<T> = Result<T, BuildError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_result_alias() {
        let result: IdentityResult<String> =
            Err(IdentityError::MissingReactionSmiles("RP1".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_annotation_result_alias() {
        let result: AnnotationResult<()> = Err(AnnotationError::EmptyDepiction);
        assert!(result.is_err());
    }

    #[test]
    fn test_build_result_alias() {
        let result: BuildResult<()> = Err(BuildError::DuplicatePathwayId("p".to_string()));
        assert!(result.is_err());
    }
}
