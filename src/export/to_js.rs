use serde_json::json;

use crate::errors::BuildResult;
use crate::graph::{PathwayGraph, PathwaysInfo};

/// Script declaring the `network` and `pathways_info` globals read by the
/// viewer page
pub fn render(name: &str, graph: &PathwayGraph, pathways: &PathwaysInfo) -> BuildResult<String> {
    let handlebars = crate::common::get_handlebars();
    let res = handlebars.render_template(
        &get_template(),
        &json!({
            "name": name,
            "stats": graph.stats(),
            "network": serde_json::to_string_pretty(&graph.to_network())?,
            "pathways_info": serde_json::to_string_pretty(pathways)?,
        }),
    )?;
    Ok(res)
}

pub fn get_template() -> String {
    include_str!("to_js.hbs").to_string()
}
