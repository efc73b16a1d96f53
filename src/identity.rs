//! Canonical node identifiers
//!
//! Reactions are identified by their reaction SMILES. Chemicals are
//! identified by an ordered list of strategies, the first one yielding an
//! identifier wins:
//!
//! 1. InChIKey
//! 2. MetaNetX cross-reference with the smallest numeric suffix
//! 3. ChEBI cross-reference with the smallest numeric suffix
//! 4. raw species id, only when the resolver is permissive
//!
//! Ordering cross-references by their numeric suffix keeps the chosen id
//! stable whatever order the source file lists them in.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::error;

use crate::errors::{IdentityError, IdentityResult};
use crate::records::{non_empty, CrossReferences, ReactionRecord, SpeciesRecord};

pub const METANETX_DBS: &[&str] = &["metanetx", "metanetx.chemical"];
pub const CHEBI_DBS: &[&str] = &["chebi"];

static TRAILING_DIGITS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]+)$").expect("static regex is valid"));

type SpeciesStrategy = fn(&SpeciesRecord) -> Option<String>;

const SPECIES_STRATEGIES: &[(&str, SpeciesStrategy)] = &[
    ("inchikey", by_inchikey),
    ("metanetx", by_metanetx),
    ("chebi", by_chebi),
];

fn by_inchikey(species: &SpeciesRecord) -> Option<String> {
    non_empty(&species.brsynth.inchikey).map(str::to_string)
}

fn by_metanetx(species: &SpeciesRecord) -> Option<String> {
    lowest_cross_reference(&species.miriam, METANETX_DBS)
}

fn by_chebi(species: &SpeciesRecord) -> Option<String> {
    lowest_cross_reference(&species.miriam, CHEBI_DBS)
}

/// Picks the id with the smallest numeric suffix among the given databases.
/// Ids without a numeric suffix sort last; ties fall back to the id text.
pub fn lowest_cross_reference(xrefs: &CrossReferences, dbs: &[&str]) -> Option<String> {
    dbs.iter()
        .filter_map(|db| xrefs.get(*db))
        .flatten()
        .map(|id| id.trim())
        .filter(|id| !id.is_empty())
        .min_by(|a, b| {
            numeric_suffix(a)
                .cmp(&numeric_suffix(b))
                .then_with(|| a.cmp(b))
        })
        .map(str::to_string)
}

/// Ids without a numeric suffix sort after every numbered id. Digits are
/// compared by length, then text, so suffixes of any size keep numeric order.
fn numeric_suffix(id: &str) -> (bool, usize, &str) {
    match TRAILING_DIGITS.captures(id).and_then(|c| c.get(1)) {
        Some(m) => {
            let digits = m.as_str().trim_start_matches('0');
            (false, digits.len(), digits)
        }
        None => (true, 0, ""),
    }
}

#[derive(Clone, Copy, Debug)]
pub struct IdentityResolver {
    permissive: bool,
}

impl Default for IdentityResolver {
    fn default() -> Self {
        Self { permissive: true }
    }
}

impl IdentityResolver {
    pub fn new(permissive: bool) -> Self {
        Self { permissive }
    }

    pub fn is_permissive(&self) -> bool {
        self.permissive
    }

    pub fn reaction_id(&self, record_id: &str, reaction: &ReactionRecord) -> IdentityResult<String> {
        non_empty(&reaction.brsynth.smiles)
            .map(str::to_string)
            .ok_or_else(|| IdentityError::MissingReactionSmiles(record_id.to_string()))
    }

    pub fn species_id(&self, record_id: &str, species: &SpeciesRecord) -> IdentityResult<String> {
        if let Some(id) = SPECIES_STRATEGIES
            .iter()
            .find_map(|(_, strategy)| strategy(species))
        {
            return Ok(id);
        }

        if self.permissive && !record_id.trim().is_empty() {
            error!(
                "No InChIKey nor cross-reference for species {}, falling back to its raw id",
                record_id
            );
            return Ok(record_id.to_string());
        }
        Err(IdentityError::UnresolvedSpecies(record_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn species(value: serde_json::Value) -> SpeciesRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_reaction_id_is_smiles() {
        let reaction: ReactionRecord = serde_json::from_value(json!({
            "brsynth": {"smiles": "CC(=O)O>>CC(=O)O", "rule_id": "RR-1"}
        }))
        .unwrap();
        let resolver = IdentityResolver::default();
        assert_eq!(
            resolver.reaction_id("rxn_1", &reaction).unwrap(),
            "CC(=O)O>>CC(=O)O"
        );
    }

    #[test]
    fn test_reaction_without_smiles_fails_even_with_xrefs() {
        let reaction: ReactionRecord = serde_json::from_value(json!({
            "brsynth": {"smiles": ""},
            "miriam": {"metanetx": ["MNXR100"]}
        }))
        .unwrap();
        let err = IdentityResolver::default()
            .reaction_id("rxn_1", &reaction)
            .unwrap_err();
        assert_eq!(err, IdentityError::MissingReactionSmiles("rxn_1".to_string()));
    }

    #[test]
    fn test_inchikey_wins_over_xrefs() {
        let s = species(json!({
            "brsynth": {"inchikey": "XYZ-1"},
            "miriam": {"metanetx": ["MNXM2"], "chebi": ["CHEBI:1"]}
        }));
        assert_eq!(
            IdentityResolver::default().species_id("CMPD_1", &s).unwrap(),
            "XYZ-1"
        );
    }

    #[test]
    fn test_metanetx_smallest_numeric_suffix() {
        let s = species(json!({
            "brsynth": {"inchikey": ""},
            "miriam": {"metanetx": ["MNXM100", "MNXM9", "MNXM21"], "chebi": ["CHEBI:1"]}
        }));
        assert_eq!(
            IdentityResolver::default().species_id("CMPD_1", &s).unwrap(),
            "MNXM9"
        );
    }

    #[test]
    fn test_chebi_fallback() {
        let s = species(json!({
            "miriam": {"chebi": ["CHEBI:15377", "CHEBI:1029"]}
        }));
        assert_eq!(
            IdentityResolver::default().species_id("CMPD_1", &s).unwrap(),
            "CHEBI:1029"
        );
    }

    #[test]
    fn test_raw_id_fallback_only_when_permissive() {
        let s = species(json!({"brsynth": {"smiles": "O"}}));
        assert_eq!(
            IdentityResolver::new(true).species_id("CMPD_7", &s).unwrap(),
            "CMPD_7"
        );
        assert_eq!(
            IdentityResolver::new(false).species_id("CMPD_7", &s).unwrap_err(),
            IdentityError::UnresolvedSpecies("CMPD_7".to_string())
        );
    }

    #[test]
    fn test_ids_without_digits_sort_last() {
        let mut xrefs = CrossReferences::new();
        xrefs.insert(
            "metanetx".to_string(),
            vec!["WATER".to_string(), "MNXM3".to_string()],
        );
        assert_eq!(
            lowest_cross_reference(&xrefs, METANETX_DBS).as_deref(),
            Some("MNXM3")
        );
    }

    #[test]
    fn test_long_numeric_suffixes_keep_numeric_order() {
        let mut xrefs = CrossReferences::new();
        xrefs.insert(
            "metanetx".to_string(),
            vec![
                "MNXM100000000000000000000000".to_string(),
                "WATER".to_string(),
                "MNXM99999999999999999999999".to_string(),
                "MNXM0000000000000000000000000000042".to_string(),
            ],
        );
        assert_eq!(
            lowest_cross_reference(&xrefs, METANETX_DBS).as_deref(),
            Some("MNXM0000000000000000000000000000042")
        );

        xrefs.insert(
            "metanetx".to_string(),
            vec![
                "WATER".to_string(),
                "MNXM100000000000000000000000".to_string(),
                "MNXM99999999999999999999999".to_string(),
            ],
        );
        assert_eq!(
            lowest_cross_reference(&xrefs, METANETX_DBS).as_deref(),
            Some("MNXM99999999999999999999999")
        );
    }
}
