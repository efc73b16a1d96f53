use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use tracing::{debug, warn};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Reaction,
    Chemical,
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeType::Reaction => write!(f, "reaction"),
            NodeType::Chemical => write!(f, "chemical"),
        }
    }
}

/// External database cross-link, unique per (db_name, entity_id)
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Xlink {
    pub db_name: String,
    pub entity_id: String,
    pub url: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ReactionData {
    /// Reaction SMILES, identity-defining
    pub rsmiles: String,
    pub rule_ids: BTreeSet<String>,
    pub ec_numbers: Vec<String>,
    pub thermo_dg_m_gibbs: Option<f64>,
    pub rule_score: Option<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChemicalData {
    pub smiles: Option<String>,
    pub inchi: Option<String>,
    /// InChIKey, identity-defining when present
    pub inchikey: Option<String>,
    pub target_chemical: bool,
    pub sink_chemical: bool,
    pub thermo_dg_m_formation: Option<f64>,
    pub cofactor: bool,
    pub svg: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    Reaction(ReactionData),
    Chemical(ChemicalData),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub id: String,
    pub path_ids: BTreeSet<String>,
    pub label: String,
    pub all_labels: BTreeSet<String>,
    pub xlinks: Vec<Xlink>,
    pub kind: NodeKind,
}

impl Node {
    pub fn node_type(&self) -> NodeType {
        match self.kind {
            NodeKind::Reaction(_) => NodeType::Reaction,
            NodeKind::Chemical(_) => NodeType::Chemical,
        }
    }

    pub fn as_reaction(&self) -> Option<&ReactionData> {
        match &self.kind {
            NodeKind::Reaction(data) => Some(data),
            NodeKind::Chemical(_) => None,
        }
    }

    pub fn as_chemical(&self) -> Option<&ChemicalData> {
        match &self.kind {
            NodeKind::Chemical(data) => Some(data),
            NodeKind::Reaction(_) => None,
        }
    }

    pub fn as_chemical_mut(&mut self) -> Option<&mut ChemicalData> {
        match &mut self.kind {
            NodeKind::Chemical(data) => Some(data),
            NodeKind::Reaction(_) => None,
        }
    }
}

/// Directed edge: species -> reaction for consumption, reaction -> species
/// for production
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub path_ids: BTreeSet<String>,
}

impl Edge {
    pub fn new(source: &str, target: &str, path_id: &str) -> Self {
        Self {
            id: Edge::edge_id(source, target),
            source: source.to_string(),
            target: target.to_string(),
            path_ids: BTreeSet::from([path_id.to_string()]),
        }
    }

    pub fn edge_id(source: &str, target: &str) -> String {
        format!("{}_{}", source, target)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct PathwayInfo {
    pub path_id: String,
    pub nb_steps: usize,
    pub node_ids: Vec<String>,
    pub edge_ids: Vec<String>,
    pub scores: BTreeMap<String, Option<f64>>,
    pub thermo_dg_m_gibbs: Option<f64>,
    pub fba_target_flux: Option<f64>,
}

impl PathwayInfo {
    pub fn new(path_id: &str) -> Self {
        Self {
            path_id: path_id.to_string(),
            ..Default::default()
        }
    }

    pub fn add_node_id(&mut self, id: &str) {
        if !self.node_ids.iter().any(|n| n == id) {
            self.node_ids.push(id.to_string());
        }
    }

    pub fn add_edge_id(&mut self, id: &str) {
        if !self.edge_ids.iter().any(|e| e == id) {
            self.edge_ids.push(id.to_string());
        }
    }
}

/// Merged pathway network
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PathwayGraph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl PathwayGraph {
    pub fn get_node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn get_edge(&self, id: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id == id)
    }

    pub fn chemical_nodes_mut(&mut self) -> impl Iterator<Item = (&String, &mut ChemicalData)> {
        self.nodes.iter_mut().filter_map(|node| {
            let Node { id, kind, .. } = node;
            match kind {
                NodeKind::Chemical(data) => Some((&*id, data)),
                NodeKind::Reaction(_) => None,
            }
        })
    }

    pub fn stats(&self) -> String {
        let reactions = self
            .nodes
            .iter()
            .filter(|n| n.node_type() == NodeType::Reaction)
            .count();
        format!(
            "Nodes: {} ({} reactions, {} chemicals), Edges: {}",
            self.nodes.len(),
            reactions,
            self.nodes.len() - reactions,
            self.edges.len()
        )
    }

    /// Checks node id uniqueness, edge endpoints and reaction/chemical
    /// bipartiteness
    pub fn verify_graph_integrity(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        let mut node_types = std::collections::HashMap::new();
        let mut seen = HashSet::new();

        for node in &self.nodes {
            if !seen.insert(node.id.as_str()) {
                errors.push(format!("Node id:[{}] is not unique", node.id));
            }
            node_types.insert(node.id.as_str(), node.node_type());
        }

        for edge in &self.edges {
            let source = node_types.get(edge.source.as_str());
            let target = node_types.get(edge.target.as_str());
            if source.is_none() {
                errors.push(format!(
                    "Edge id:[{}] source {:?} not found in nodes",
                    edge.id, edge.source
                ));
            }
            if target.is_none() {
                errors.push(format!(
                    "Edge id:[{}] target {:?} not found in nodes",
                    edge.id, edge.target
                ));
            }
            if let (Some(s), Some(t)) = (source, target) {
                if s == t {
                    errors.push(format!(
                        "Edge id:[{}] links two {} nodes",
                        edge.id, s
                    ));
                }
            }
        }

        if errors.is_empty() {
            debug!("All edges have valid source and target nodes");
            Ok(())
        } else {
            warn!("Some edges have missing or inconsistent endpoints");
            Err(errors)
        }
    }

    pub fn to_network(&self) -> Network {
        Network {
            elements: Elements {
                nodes: self
                    .nodes
                    .iter()
                    .map(|n| Element {
                        data: NodeData::from(n),
                    })
                    .collect(),
                edges: self
                    .edges
                    .iter()
                    .map(|e| Element { data: e.clone() })
                    .collect(),
            },
        }
    }
}

/// Flat node record consumed by the viewer. Fields that do not apply to
/// the node type are null.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct NodeData {
    pub id: String,
    pub path_ids: Vec<String>,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub label: String,
    pub all_labels: Vec<String>,
    pub svg: Option<String>,
    pub xlinks: Vec<Xlink>,
    pub rsmiles: Option<String>,
    pub rule_id: Option<Vec<String>>,
    pub ec_numbers: Option<Vec<String>>,
    pub thermo_dg_m_gibbs: Option<f64>,
    pub rule_score: Option<f64>,
    pub smiles: Option<String>,
    pub inchi: Option<String>,
    pub inchikey: Option<String>,
    pub target_chemical: Option<bool>,
    pub sink_chemical: Option<bool>,
    pub thermo_dg_m_formation: Option<f64>,
    pub cofactor: Option<u8>,
}

impl From<&Node> for NodeData {
    fn from(node: &Node) -> Self {
        let mut data = NodeData {
            id: node.id.clone(),
            path_ids: node.path_ids.iter().cloned().collect(),
            node_type: node.node_type(),
            label: node.label.clone(),
            all_labels: node.all_labels.iter().cloned().collect(),
            svg: None,
            xlinks: node.xlinks.clone(),
            rsmiles: None,
            rule_id: None,
            ec_numbers: None,
            thermo_dg_m_gibbs: None,
            rule_score: None,
            smiles: None,
            inchi: None,
            inchikey: None,
            target_chemical: None,
            sink_chemical: None,
            thermo_dg_m_formation: None,
            cofactor: None,
        };
        match &node.kind {
            NodeKind::Reaction(r) => {
                data.rsmiles = Some(r.rsmiles.clone());
                data.rule_id = Some(r.rule_ids.iter().cloned().collect());
                data.ec_numbers = Some(r.ec_numbers.clone());
                data.thermo_dg_m_gibbs = r.thermo_dg_m_gibbs;
                data.rule_score = r.rule_score;
            }
            NodeKind::Chemical(c) => {
                data.svg = c.svg.clone();
                data.smiles = c.smiles.clone();
                data.inchi = c.inchi.clone();
                data.inchikey = c.inchikey.clone();
                data.target_chemical = Some(c.target_chemical);
                data.sink_chemical = Some(c.sink_chemical);
                data.thermo_dg_m_formation = c.thermo_dg_m_formation;
                data.cofactor = Some(u8::from(c.cofactor));
            }
        }
        data
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Element<T> {
    pub data: T,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct Elements {
    pub nodes: Vec<Element<NodeData>>,
    pub edges: Vec<Element<Edge>>,
}

/// `{elements: {nodes: [{data}], edges: [{data}]}}`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct Network {
    pub elements: Elements,
}

/// Pathway info table keyed by `path_id`
pub type PathwaysInfo = IndexMap<String, PathwayInfo>;

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn reaction_node(id: &str, path_id: &str) -> Node {
        Node {
            id: id.to_string(),
            path_ids: BTreeSet::from([path_id.to_string()]),
            label: "RR-01".to_string(),
            all_labels: BTreeSet::from(["RR-01".to_string()]),
            xlinks: Vec::new(),
            kind: NodeKind::Reaction(ReactionData {
                rsmiles: id.to_string(),
                rule_ids: BTreeSet::from(["RR-01".to_string()]),
                ec_numbers: Vec::new(),
                thermo_dg_m_gibbs: None,
                rule_score: Some(0.5),
            }),
        }
    }

    pub(crate) fn chemical_node(id: &str, path_id: &str, inchi: Option<&str>) -> Node {
        Node {
            id: id.to_string(),
            path_ids: BTreeSet::from([path_id.to_string()]),
            label: id.to_string(),
            all_labels: BTreeSet::from([id.to_string()]),
            xlinks: Vec::new(),
            kind: NodeKind::Chemical(ChemicalData {
                smiles: None,
                inchi: inchi.map(str::to_string),
                inchikey: Some(id.to_string()),
                target_chemical: false,
                sink_chemical: true,
                thermo_dg_m_formation: None,
                cofactor: false,
                svg: None,
            }),
        }
    }

    fn create_test_graph() -> PathwayGraph {
        PathwayGraph {
            nodes: vec![
                reaction_node("CC>>CO", "path_0"),
                chemical_node("AAA-1", "path_0", Some("InChI=1S/CH4/h1H4")),
                chemical_node("BBB-2", "path_0", None),
            ],
            edges: vec![
                Edge::new("AAA-1", "CC>>CO", "path_0"),
                Edge::new("CC>>CO", "BBB-2", "path_0"),
            ],
        }
    }

    #[test]
    fn test_edge_id() {
        let edge = Edge::new("AAA-1", "CC>>CO", "path_0");
        assert_eq!(edge.id, "AAA-1_CC>>CO");
        assert_eq!(edge.path_ids.len(), 1);
    }

    #[test]
    fn test_verify_graph_integrity_ok() {
        let graph = create_test_graph();
        assert!(graph.verify_graph_integrity().is_ok());
        assert_eq!(
            graph.stats(),
            "Nodes: 3 (1 reactions, 2 chemicals), Edges: 2"
        );
    }

    #[test]
    fn test_verify_graph_integrity_reports_dangling_and_same_type_edges() {
        let mut graph = create_test_graph();
        graph.edges.push(Edge::new("AAA-1", "BBB-2", "path_0"));
        graph.edges.push(Edge::new("MISSING", "CC>>CO", "path_0"));

        let errors = graph.verify_graph_integrity().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("links two chemical nodes"));
        assert!(errors[1].contains("MISSING"));
    }

    #[test]
    fn test_node_data_nulls_fields_of_other_type() {
        let graph = create_test_graph();
        let network = graph.to_network();
        let value = serde_json::to_value(&network).unwrap();

        let reaction = &value["elements"]["nodes"][0]["data"];
        assert_eq!(reaction["type"], "reaction");
        assert_eq!(reaction["rsmiles"], "CC>>CO");
        assert_eq!(reaction["rule_id"], serde_json::json!(["RR-01"]));
        assert!(reaction["inchi"].is_null());
        assert!(reaction["cofactor"].is_null());
        assert!(reaction["svg"].is_null());

        let chemical = &value["elements"]["nodes"][1]["data"];
        assert_eq!(chemical["type"], "chemical");
        assert_eq!(chemical["cofactor"], 0);
        assert_eq!(chemical["sink_chemical"], true);
        assert!(chemical["rsmiles"].is_null());

        let edge = &value["elements"]["edges"][1]["data"];
        assert_eq!(edge["id"], "CC>>CO_BBB-2");
        assert_eq!(edge["path_ids"], serde_json::json!(["path_0"]));
    }
}
