pub mod to_csv_pathways;
pub mod to_js;
pub mod to_json;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::common::write_string_to_file;
use crate::errors::BuildResult;
use crate::pipeline::PathwayCollection;

pub const NETWORK_JSON: &str = "network.json";
pub const PATHWAYS_JSON: &str = "pathways_info.json";
pub const NETWORK_JS: &str = "network.js";
pub const PATHWAYS_CSV: &str = "pathways_info.csv";

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// `network.json` and `pathways_info.json`
    Json,
    /// `network.js` for the viewer page
    Js,
    /// `pathways_info.csv`
    Csv,
}

impl ExportFormat {
    pub fn default_formats() -> Vec<ExportFormat> {
        vec![ExportFormat::Json, ExportFormat::Js]
    }
}

/// Writes the requested renderings into `dir`, creating it if needed, and
/// returns the written paths. Integrity problems are logged, the output is
/// still written.
pub fn export_collection(
    name: &str,
    collection: &PathwayCollection,
    dir: &Path,
    formats: &[ExportFormat],
) -> BuildResult<Vec<PathBuf>> {
    if let Err(errors) = collection.graph.verify_graph_integrity() {
        for error in errors {
            warn!("{}", error);
        }
    }

    fs::create_dir_all(dir)?;
    let mut written = Vec::new();
    let mut write = |file_name: &str, content: String| -> BuildResult<()> {
        let path = dir.join(file_name);
        write_string_to_file(&path, &content)?;
        info!("Wrote {}", path.display());
        written.push(path);
        Ok(())
    };

    for format in formats {
        match format {
            ExportFormat::Json => {
                write(NETWORK_JSON, to_json::render_network(&collection.graph)?)?;
                write(PATHWAYS_JSON, to_json::render_pathways(&collection.pathways)?)?;
            }
            ExportFormat::Js => write(
                NETWORK_JS,
                to_js::render(name, &collection.graph, &collection.pathways)?,
            )?,
            ExportFormat::Csv => write(
                PATHWAYS_CSV,
                to_csv_pathways::render(&collection.pathways)?,
            )?,
        }
    }

    Ok(written)
}
