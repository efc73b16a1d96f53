//! Identifier resolution errors

use thiserror::Error;

/// Raised when no canonical node identifier can be derived for a record.
///
/// Callers skip the offending record and keep processing the pathway.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    /// Reaction carries no reaction SMILES
    #[error("Reaction '{0}' has no reaction SMILES, cannot derive an identifier")]
    MissingReactionSmiles(String),

    /// Species carries neither an InChIKey nor a usable cross-reference
    #[error("Species '{0}' has no InChIKey nor MetaNetX/ChEBI cross-reference")]
    UnresolvedSpecies(String),

    /// Reaction side references a species missing from the pathway
    #[error("Species '{species}' referenced by reaction '{reaction}' is not defined")]
    UnknownSpecies {
        /// Reaction record identifier
        reaction: String,
        /// Species record identifier
        species: String,
    },
}

impl IdentityError {
    /// Raw record identifier the error refers to
    pub fn record_id(&self) -> &str {
        match self {
            IdentityError::MissingReactionSmiles(id) | IdentityError::UnresolvedSpecies(id) => id,
            IdentityError::UnknownSpecies { species, .. } => species,
        }
    }
}
