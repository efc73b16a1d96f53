use indexmap::IndexMap;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, error};

use crate::errors::IdentityError;
use crate::graph::{ChemicalData, Edge, Node, NodeKind, PathwayInfo, ReactionData};
use crate::identity::IdentityResolver;
use crate::pipeline::merge::{compare_edges, compare_nodes, log_conflicts};
use crate::records::{as_measure, non_empty, ReactionRecord, SourcedRecord, SpeciesRecord};
use crate::xlinks::{chemical_xlinks, ec_numbers, reaction_xlinks};

/// Species whose raw id starts with this are pathway targets
pub const TARGET_PREFIX: &str = "TARGET_";
/// Intermediate compounds; anything neither target nor intermediate is
/// provided by the chassis
pub const INTERMEDIATE_PREFIX: &str = "CMPD_";

const PATH_ID_KEY: &str = "path_id";
const GIBBS_KEY: &str = "dfG_prime_m";
const TARGET_FLUX_KEY: &str = "fba_target_flux";
const FBA_OBJECTIVE_PREFIX: &str = "fba_obj_";

/// Nodes, edges and pathway info of a single pathway, local ids resolved
#[derive(Debug, Clone, Default)]
pub struct NormalizedPathway {
    pub info: PathwayInfo,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    /// Raw ids of records dropped because no identifier could be assigned
    pub skipped: Vec<String>,
}

fn reaction_node(path_id: &str, id: &str, record_id: &str, reaction: &ReactionRecord) -> Node {
    let annotation = &reaction.brsynth;
    let ec_numbers = ec_numbers(&reaction.miriam);
    let rule_id = non_empty(&annotation.rule_id);

    let label = if !ec_numbers.is_empty() {
        ec_numbers.join(", ")
    } else {
        rule_id.unwrap_or(record_id).to_string()
    };

    Node {
        id: id.to_string(),
        path_ids: BTreeSet::from([path_id.to_string()]),
        all_labels: BTreeSet::from([label.clone()]),
        label,
        xlinks: reaction_xlinks(&reaction.miriam),
        kind: NodeKind::Reaction(ReactionData {
            rsmiles: id.to_string(),
            rule_ids: rule_id.map(str::to_string).into_iter().collect(),
            ec_numbers,
            thermo_dg_m_gibbs: annotation.dfg_prime_m.as_ref().and_then(as_measure),
            rule_score: annotation.rule_score.as_ref().and_then(as_measure),
        }),
    }
}

fn chemical_node(path_id: &str, id: &str, record_id: &str, species: &SpeciesRecord) -> Node {
    let annotation = &species.brsynth;
    let target_chemical = record_id.starts_with(TARGET_PREFIX);

    Node {
        id: id.to_string(),
        path_ids: BTreeSet::from([path_id.to_string()]),
        label: id.to_string(),
        all_labels: BTreeSet::from([id.to_string()]),
        xlinks: chemical_xlinks(&species.miriam),
        kind: NodeKind::Chemical(ChemicalData {
            smiles: non_empty(&annotation.smiles).map(str::to_string),
            inchi: non_empty(&annotation.inchi).map(str::to_string),
            inchikey: non_empty(&annotation.inchikey).map(str::to_string),
            target_chemical,
            sink_chemical: !target_chemical && !record_id.starts_with(INTERMEDIATE_PREFIX),
            thermo_dg_m_formation: annotation.dfg_prime_m.as_ref().and_then(as_measure),
            cofactor: false,
            svg: None,
        }),
    }
}

/// Two local records resolving to the same id must describe the same
/// entity; on disagreement the first one is kept.
fn insert_node(nodes: &mut IndexMap<String, Node>, node: Node) {
    match nodes.get(&node.id) {
        Some(existing) => {
            let conflicts = compare_nodes(existing, &node);
            if !conflicts.is_empty() {
                error!("Local records collapse onto node {} with different content", node.id);
                log_conflicts(&conflicts);
            }
        }
        None => {
            nodes.insert(node.id.clone(), node);
        }
    }
}

fn insert_edge(edges: &mut IndexMap<String, Edge>, edge: Edge) {
    match edges.get(&edge.id) {
        Some(existing) => log_conflicts(&compare_edges(existing, &edge)),
        None => {
            edges.insert(edge.id.clone(), edge);
        }
    }
}

fn pathway_info(sourced: &SourcedRecord, path_id: &str) -> PathwayInfo {
    let brsynth = &sourced.record.pathway.brsynth;
    let mut info = PathwayInfo::new(path_id);
    info.nb_steps = sourced.record.reactions.len();
    info.thermo_dg_m_gibbs = brsynth.get(GIBBS_KEY).and_then(as_measure);
    info.fba_target_flux = brsynth
        .get(TARGET_FLUX_KEY)
        .and_then(as_measure)
        .or_else(|| {
            brsynth
                .iter()
                .find(|(key, _)| key.starts_with(FBA_OBJECTIVE_PREFIX))
                .and_then(|(_, value)| as_measure(value))
        });
    info.scores = brsynth
        .iter()
        .filter(|(key, _)| {
            !matches!(key.as_str(), PATH_ID_KEY | GIBBS_KEY | TARGET_FLUX_KEY)
                && !key.starts_with(FBA_OBJECTIVE_PREFIX)
        })
        .map(|(key, value)| (key.clone(), as_measure(value)))
        .collect::<BTreeMap<_, _>>();
    info
}

/// Turns one pathway record into nodes and edges keyed by resolved ids.
///
/// Reactions or species without a resolvable id are logged and skipped
/// together with the edges that touch them; the rest of the pathway is
/// still produced.
pub fn normalize_pathway(sourced: &SourcedRecord, resolver: &IdentityResolver) -> NormalizedPathway {
    let path_id = sourced.path_id();
    let record = &sourced.record;
    let mut info = pathway_info(sourced, &path_id);
    let mut skipped = Vec::new();

    let mut nodes: IndexMap<String, Node> = IndexMap::new();
    let mut edges: IndexMap<String, Edge> = IndexMap::new();

    let mut reaction_ids: IndexMap<&str, String> = IndexMap::new();
    for (record_id, reaction) in &record.reactions {
        match resolver.reaction_id(record_id, reaction) {
            Ok(id) => {
                insert_node(&mut nodes, reaction_node(&path_id, &id, record_id, reaction));
                reaction_ids.insert(record_id.as_str(), id);
            }
            Err(e) => {
                error!("[{}] {}", path_id, e);
                skipped.push(e.record_id().to_string());
            }
        }
    }

    let mut species_ids: IndexMap<&str, String> = IndexMap::new();
    for (record_id, species) in &record.species {
        match resolver.species_id(record_id, species) {
            Ok(id) => {
                insert_node(&mut nodes, chemical_node(&path_id, &id, record_id, species));
                species_ids.insert(record_id.as_str(), id);
            }
            Err(e) => {
                error!("[{}] {}", path_id, e);
                skipped.push(e.record_id().to_string());
            }
        }
    }

    let species_id = |reaction: &str, species: &str| -> Option<String> {
        let resolved = species_ids.get(species).cloned();
        if resolved.is_none() {
            let reason = if record.species.contains_key(species) {
                IdentityError::UnresolvedSpecies(species.to_string())
            } else {
                IdentityError::UnknownSpecies {
                    reaction: reaction.to_string(),
                    species: species.to_string(),
                }
            };
            error!("[{}] {}, edge skipped", path_id, reason);
        }
        resolved
    };

    for (record_id, reaction) in &record.reactions {
        let Some(reaction_id) = reaction_ids.get(record_id.as_str()) else {
            continue;
        };
        for species in reaction.brsynth.left.keys() {
            if let Some(chemical_id) = species_id(record_id, species) {
                insert_edge(&mut edges, Edge::new(&chemical_id, reaction_id, &path_id));
            }
        }
        for species in reaction.brsynth.right.keys() {
            if let Some(chemical_id) = species_id(record_id, species) {
                insert_edge(&mut edges, Edge::new(reaction_id, &chemical_id, &path_id));
            }
        }
    }

    for id in nodes.keys() {
        info.add_node_id(id);
    }
    for id in edges.keys() {
        info.add_edge_id(id);
    }

    debug!(
        "[{}] {} node(s), {} edge(s), {} record(s) skipped {:?}",
        path_id,
        nodes.len(),
        edges.len(),
        skipped.len(),
        skipped
    );

    NormalizedPathway {
        info,
        nodes: nodes.into_values().collect(),
        edges: edges.into_values().collect(),
        skipped,
    }
}
