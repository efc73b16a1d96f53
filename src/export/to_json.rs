use crate::errors::BuildResult;
use crate::graph::{PathwayGraph, PathwaysInfo};

/// `{"elements": {"nodes": [{"data": ...}], "edges": [{"data": ...}]}}`
pub fn render_network(graph: &PathwayGraph) -> BuildResult<String> {
    Ok(serde_json::to_string_pretty(&graph.to_network())?)
}

/// Pathway info object keyed by `path_id`, in table order
pub fn render_pathways(pathways: &PathwaysInfo) -> BuildResult<String> {
    Ok(serde_json::to_string_pretty(pathways)?)
}
