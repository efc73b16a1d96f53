use indexmap::map::Entry;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, error, warn};

use crate::graph::{ChemicalData, Edge, Node, NodeKind, PathwayGraph, ReactionData};
use crate::xlinks::dedup_xlinks;

/// How single-valued fields are resolved when two observations disagree
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MergePolicy {
    /// Keep the value observed first. Output depends on pathway order
    /// when inputs disagree.
    #[default]
    FirstSeen,
    /// Keep the smallest value (`true` for flags), independent of order
    Canonical,
}

/// Disagreement between two observations of the same node or edge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeConflict {
    pub id: String,
    pub field: &'static str,
    pub kept: String,
    pub ignored: String,
}

impl MergeConflict {
    fn new(id: &str, field: &'static str, kept: impl fmt::Debug, ignored: impl fmt::Debug) -> Self {
        Self {
            id: id.to_string(),
            field,
            kept: format!("{:?}", kept),
            ignored: format!("{:?}", ignored),
        }
    }

    /// Type or endpoint disagreements mean two different entities share an id
    pub fn is_identity_clash(&self) -> bool {
        matches!(self.field, "type" | "source" | "target")
    }
}

impl fmt::Display for MergeConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] conflicting {}: kept {} ignored {}",
            self.id, self.field, self.kept, self.ignored
        )
    }
}

pub fn log_conflicts(conflicts: &[MergeConflict]) {
    for conflict in conflicts {
        if conflict.is_identity_clash() {
            error!("{}", conflict);
        } else {
            warn!("{}", conflict);
        }
    }
}

/// Compares the identity-relevant fields of two nodes built for the same id
pub fn compare_nodes(a: &Node, b: &Node) -> Vec<MergeConflict> {
    let mut conflicts = Vec::new();
    if a.node_type() != b.node_type() {
        conflicts.push(MergeConflict::new(&a.id, "type", a.node_type(), b.node_type()));
        return conflicts;
    }
    if a.label != b.label {
        conflicts.push(MergeConflict::new(&a.id, "label", &a.label, &b.label));
    }
    match (&a.kind, &b.kind) {
        (NodeKind::Reaction(ra), NodeKind::Reaction(rb)) => {
            if ra.rsmiles != rb.rsmiles {
                conflicts.push(MergeConflict::new(&a.id, "rsmiles", &ra.rsmiles, &rb.rsmiles));
            }
        }
        (NodeKind::Chemical(ca), NodeKind::Chemical(cb)) => {
            for (field, x, y) in [
                ("smiles", &ca.smiles, &cb.smiles),
                ("inchi", &ca.inchi, &cb.inchi),
                ("inchikey", &ca.inchikey, &cb.inchikey),
            ] {
                if x != y {
                    conflicts.push(MergeConflict::new(&a.id, field, x, y));
                }
            }
        }
        _ => {}
    }
    conflicts
}

pub fn compare_edges(a: &Edge, b: &Edge) -> Vec<MergeConflict> {
    let mut conflicts = Vec::new();
    if a.source != b.source {
        conflicts.push(MergeConflict::new(&a.id, "source", &a.source, &b.source));
    }
    if a.target != b.target {
        conflicts.push(MergeConflict::new(&a.id, "target", &a.target, &b.target));
    }
    conflicts
}

fn pick<T: Ord + Clone>(a: &Option<T>, b: &Option<T>, policy: MergePolicy) -> Option<T> {
    match (a, b, policy) {
        (Some(x), Some(y), MergePolicy::Canonical) => Some(x.min(y).clone()),
        _ => a.clone().or_else(|| b.clone()),
    }
}

fn pick_f64(a: Option<f64>, b: Option<f64>, policy: MergePolicy) -> Option<f64> {
    match (a, b, policy) {
        (Some(x), Some(y), MergePolicy::Canonical) => Some(if y.total_cmp(&x).is_lt() { y } else { x }),
        _ => a.or(b),
    }
}

fn max_f64(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    match (a, b) {
        (Some(x), Some(y)) => Some(x.max(y)),
        _ => a.or(b),
    }
}

fn pick_flag(a: bool, b: bool, policy: MergePolicy) -> bool {
    match policy {
        MergePolicy::FirstSeen => a,
        MergePolicy::Canonical => a || b,
    }
}

/// Structural fields never get overwritten: a disagreement is recorded and
/// the policy's value kept.
fn pick_structural(
    id: &str,
    field: &'static str,
    a: &Option<String>,
    b: &Option<String>,
    policy: MergePolicy,
    conflicts: &mut Vec<MergeConflict>,
) -> Option<String> {
    let kept = pick(a, b, policy);
    if let (Some(x), Some(y)) = (a, b) {
        if x != y {
            let ignored = if kept.as_ref() == Some(x) { y } else { x };
            conflicts.push(MergeConflict::new(
                id,
                field,
                kept.as_deref().unwrap_or_default(),
                ignored,
            ));
        }
    }
    kept
}

fn merge_reaction(
    id: &str,
    a: &ReactionData,
    b: &ReactionData,
    policy: MergePolicy,
    conflicts: &mut Vec<MergeConflict>,
) -> ReactionData {
    let rsmiles = pick_structural(
        id,
        "rsmiles",
        &Some(a.rsmiles.clone()),
        &Some(b.rsmiles.clone()),
        policy,
        conflicts,
    )
    .unwrap_or_else(|| a.rsmiles.clone());

    let ec_numbers = match (a.ec_numbers.is_empty(), b.ec_numbers.is_empty(), policy) {
        (true, _, _) => b.ec_numbers.clone(),
        (false, false, MergePolicy::Canonical) => a.ec_numbers.clone().min(b.ec_numbers.clone()),
        _ => a.ec_numbers.clone(),
    };

    ReactionData {
        rsmiles,
        rule_ids: a.rule_ids.union(&b.rule_ids).cloned().collect(),
        ec_numbers,
        thermo_dg_m_gibbs: pick_f64(a.thermo_dg_m_gibbs, b.thermo_dg_m_gibbs, policy),
        rule_score: max_f64(a.rule_score, b.rule_score),
    }
}

fn merge_chemical(
    id: &str,
    a: &ChemicalData,
    b: &ChemicalData,
    policy: MergePolicy,
    conflicts: &mut Vec<MergeConflict>,
) -> ChemicalData {
    ChemicalData {
        smiles: pick_structural(id, "smiles", &a.smiles, &b.smiles, policy, conflicts),
        inchi: pick_structural(id, "inchi", &a.inchi, &b.inchi, policy, conflicts),
        inchikey: pick_structural(id, "inchikey", &a.inchikey, &b.inchikey, policy, conflicts),
        target_chemical: pick_flag(a.target_chemical, b.target_chemical, policy),
        sink_chemical: pick_flag(a.sink_chemical, b.sink_chemical, policy),
        thermo_dg_m_formation: pick_f64(a.thermo_dg_m_formation, b.thermo_dg_m_formation, policy),
        cofactor: a.cofactor || b.cofactor,
        svg: pick(&a.svg, &b.svg, policy),
    }
}

/// Merges two observations of the same node id.
///
/// Sets (`path_ids`, `all_labels`, `rule_id`) are unioned, xlinks are
/// concatenated then deduplicated, `rule_score` keeps the maximum and
/// single values follow `policy`. Structural disagreements are returned,
/// never resolved destructively.
pub fn merge_nodes(first: &Node, second: &Node, policy: MergePolicy) -> (Node, Vec<MergeConflict>) {
    let mut conflicts = Vec::new();
    let path_ids = first.path_ids.union(&second.path_ids).cloned().collect();

    let kind = match (&first.kind, &second.kind) {
        (NodeKind::Reaction(a), NodeKind::Reaction(b)) => {
            NodeKind::Reaction(merge_reaction(&first.id, a, b, policy, &mut conflicts))
        }
        (NodeKind::Chemical(a), NodeKind::Chemical(b)) => {
            NodeKind::Chemical(merge_chemical(&first.id, a, b, policy, &mut conflicts))
        }
        _ => {
            conflicts.push(MergeConflict::new(
                &first.id,
                "type",
                first.node_type(),
                second.node_type(),
            ));
            let mut kept = first.clone();
            kept.path_ids = path_ids;
            return (kept, conflicts);
        }
    };

    let label = match policy {
        MergePolicy::FirstSeen => first.label.clone(),
        MergePolicy::Canonical => first.label.clone().min(second.label.clone()),
    };

    let mut xlinks: Vec<_> = first.xlinks.iter().chain(&second.xlinks).cloned().collect();
    if policy == MergePolicy::Canonical {
        xlinks.sort_by(|x, y| {
            (&x.db_name, &x.entity_id, &x.url).cmp(&(&y.db_name, &y.entity_id, &y.url))
        });
    }

    let merged = Node {
        id: first.id.clone(),
        path_ids,
        label,
        all_labels: first.all_labels.union(&second.all_labels).cloned().collect(),
        xlinks: dedup_xlinks(xlinks),
        kind,
    };
    (merged, conflicts)
}

/// Unions `path_ids`; everything else comes from `first`
pub fn merge_edges(first: &Edge, second: &Edge) -> (Edge, Vec<MergeConflict>) {
    let conflicts = compare_edges(first, second);
    let mut merged = first.clone();
    merged.path_ids.extend(second.path_ids.iter().cloned());
    (merged, conflicts)
}

/// Global node and edge tables folded across every pathway of a run
#[derive(Debug, Default)]
pub struct GraphAccumulator {
    policy: MergePolicy,
    nodes: IndexMap<String, Node>,
    edges: IndexMap<String, Edge>,
    conflicts: usize,
}

impl GraphAccumulator {
    pub fn new(policy: MergePolicy) -> Self {
        Self {
            policy,
            ..Default::default()
        }
    }

    pub fn fold_nodes(&mut self, nodes: impl IntoIterator<Item = Node>) {
        for node in nodes {
            match self.nodes.entry(node.id.clone()) {
                Entry::Occupied(mut entry) => {
                    let (merged, conflicts) = merge_nodes(entry.get(), &node, self.policy);
                    log_conflicts(&conflicts);
                    self.conflicts += conflicts.len();
                    *entry.get_mut() = merged;
                }
                Entry::Vacant(entry) => {
                    entry.insert(node);
                }
            }
        }
    }

    pub fn fold_edges(&mut self, edges: impl IntoIterator<Item = Edge>) {
        for edge in edges {
            match self.edges.entry(edge.id.clone()) {
                Entry::Occupied(mut entry) => {
                    let (merged, conflicts) = merge_edges(entry.get(), &edge);
                    log_conflicts(&conflicts);
                    self.conflicts += conflicts.len();
                    *entry.get_mut() = merged;
                }
                Entry::Vacant(entry) => {
                    entry.insert(edge);
                }
            }
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn conflict_count(&self) -> usize {
        self.conflicts
    }

    /// Emits reactions then chemicals, each sorted by id, and edges sorted
    /// by id
    pub fn into_graph(self) -> PathwayGraph {
        let mut nodes: Vec<Node> = self.nodes.into_values().collect();
        nodes.sort_by(|a, b| {
            a.node_type()
                .cmp(&b.node_type())
                .then_with(|| a.id.cmp(&b.id))
        });
        let mut edges: Vec<Edge> = self.edges.into_values().collect();
        edges.sort_by(|a, b| a.id.cmp(&b.id));
        debug!("Accumulated {} node(s) and {} edge(s)", nodes.len(), edges.len());
        PathwayGraph { nodes, edges }
    }
}
