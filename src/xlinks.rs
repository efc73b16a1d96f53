use std::collections::HashSet;

use crate::graph::Xlink;
use crate::records::CrossReferences;

const IDENTIFIERS_ORG: &str = "https://identifiers.org";
const EC_QUERY: &str = "https://www.ebi.ac.uk/intenz/query?cmd=SearchEC&ec=";
const METANETX_CHEMICAL: &str = "https://www.metanetx.org/chem_info/";
const KEGG_COMPOUND: &str = "https://identifiers.org/kegg.compound/";
const KEGG_DRUG: &str = "https://identifiers.org/kegg.drug/";

pub const EC_DB: &str = "ec-code";

fn generic_url(db_name: &str, entity_id: &str) -> String {
    format!("{}/{}/{}", IDENTIFIERS_ORG, db_name, entity_id)
}

/// Query URL on the enzyme registry. Wildcard fragments (`-`, `_`, empty)
/// are dropped: `1.1.-.-` queries the `1.1` class.
pub fn ec_url(ec_number: &str) -> String {
    let cleaned = ec_number
        .split('.')
        .map(str::trim)
        .filter(|part| !part.is_empty() && *part != "-" && *part != "_")
        .collect::<Vec<_>>()
        .join(".");
    format!("{}{}", EC_QUERY, cleaned)
}

pub fn reaction_url(db_name: &str, entity_id: &str) -> String {
    match db_name {
        EC_DB => ec_url(entity_id),
        _ => generic_url(db_name, entity_id),
    }
}

pub fn chemical_url(db_name: &str, entity_id: &str) -> String {
    match db_name {
        "metanetx" | "metanetx.chemical" => format!("{}{}", METANETX_CHEMICAL, entity_id),
        "kegg" => match entity_id.chars().next() {
            Some('D') => format!("{}{}", KEGG_DRUG, entity_id),
            _ => format!("{}{}", KEGG_COMPOUND, entity_id),
        },
        _ => generic_url(db_name, entity_id),
    }
}

fn build_xlinks(xrefs: &CrossReferences, url_for: fn(&str, &str) -> String) -> Vec<Xlink> {
    let links = xrefs
        .iter()
        .flat_map(|(db_name, ids)| {
            ids.iter()
                .map(|id| id.trim())
                .filter(|id| !id.is_empty())
                .map(move |id| Xlink {
                    db_name: db_name.clone(),
                    entity_id: id.to_string(),
                    url: url_for(db_name, id),
                })
        })
        .collect();
    dedup_xlinks(links)
}

pub fn reaction_xlinks(xrefs: &CrossReferences) -> Vec<Xlink> {
    build_xlinks(xrefs, reaction_url)
}

pub fn chemical_xlinks(xrefs: &CrossReferences) -> Vec<Xlink> {
    build_xlinks(xrefs, chemical_url)
}

/// Keeps the first xlink of every (db_name, entity_id) pair, in order
pub fn dedup_xlinks(xlinks: Vec<Xlink>) -> Vec<Xlink> {
    let mut seen = HashSet::new();
    xlinks
        .into_iter()
        .filter(|x| seen.insert((x.db_name.clone(), x.entity_id.clone())))
        .collect()
}

/// EC numbers listed in the cross-references
pub fn ec_numbers(xrefs: &CrossReferences) -> Vec<String> {
    let mut seen = HashSet::new();
    xrefs
        .get(EC_DB)
        .into_iter()
        .flatten()
        .map(|ec| ec.trim().to_string())
        .filter(|ec| !ec.is_empty() && seen.insert(ec.clone()))
        .collect()
}
