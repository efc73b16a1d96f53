use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::annotate::{
    annotate_cofactors, annotate_depictions, CommandRenderer, HttpRenderer, StructureRenderer,
    DEFAULT_QUERY_PARAMETER,
};
use crate::data_loader::load_pathway_records;
use crate::export::export_collection;
use crate::pipeline::{aggregate, PathwayCollection};
use crate::plan::{DepictionConfig, Plan};

/// Result of a plan run: the merged collection and the files written
#[derive(Debug)]
pub struct PlanOutput {
    pub collection: PathwayCollection,
    pub written: Vec<PathBuf>,
}

pub fn build_renderer(config: &DepictionConfig) -> Result<Box<dyn StructureRenderer>> {
    if let Some(command) = &config.command {
        let renderer = CommandRenderer::from_command_line(command)
            .ok_or_else(|| anyhow!("Depiction command is empty"))?;
        return Ok(Box::new(renderer));
    }
    if let Some(url) = &config.url {
        let parameter = config
            .query_parameter
            .as_deref()
            .unwrap_or(DEFAULT_QUERY_PARAMETER);
        return Ok(Box::new(HttpRenderer::new(url, parameter)?));
    }
    Err(anyhow!("Depiction needs either a command or a url"))
}

/// Load, aggregate, annotate and export, with paths already resolved
pub async fn run_plan(plan: &Plan) -> Result<PlanOutput> {
    let records = load_pathway_records(&plan.input.directory)?;
    let PathwayCollection { mut graph, pathways } =
        aggregate(&records, &plan.aggregate_options())?;

    if let Some(cofactors) = &plan.annotate.cofactors {
        graph = annotate_cofactors(graph, cofactors);
    }

    if let Some(depiction) = &plan.annotate.depiction {
        match build_renderer(depiction) {
            Ok(renderer) => {
                graph = annotate_depictions(graph, renderer.as_ref(), &depiction.options()).await;
            }
            Err(e) => warn!("Depictions skipped: {}", e),
        }
    }

    let collection = PathwayCollection { graph, pathways };
    let written = export_collection(
        &plan.meta.name,
        &collection,
        &plan.export.directory,
        &plan.export.formats,
    )?;

    Ok(PlanOutput {
        collection,
        written,
    })
}

pub fn load_plan(plan_file_path: &Path) -> Result<Plan> {
    let content = std::fs::read_to_string(plan_file_path)
        .with_context(|| format!("Failed to read plan {}", plan_file_path.display()))?;
    let plan: Plan = serde_yaml::from_str(&content)
        .with_context(|| format!("Invalid plan {}", plan_file_path.display()))?;
    let base = plan_file_path.parent().unwrap_or_else(|| Path::new(""));
    Ok(plan.resolve_paths(base))
}

pub async fn execute_plan(plan: &str) -> Result<PlanOutput> {
    info!("Executing plan {}", plan);
    let plan = load_plan(Path::new(plan))?;
    debug!("Executing plan: {:?}", plan);
    run_plan(&plan).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_renderer_requires_a_backend() {
        let config = DepictionConfig {
            command: None,
            url: None,
            query_parameter: None,
            timeout_secs: 30,
            max_concurrency: 4,
        };
        assert!(build_renderer(&config).is_err());

        let config = DepictionConfig {
            url: Some("http://localhost:9/depict".to_string()),
            ..config
        };
        assert!(build_renderer(&config).is_ok());
    }

    #[test]
    fn test_load_plan_resolves_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let plan_path = dir.path().join("plan.yaml");
        std::fs::write(&plan_path, "input:\n  directory: in\nexport:\n  directory: out\n").unwrap();

        let plan = load_plan(&plan_path).unwrap();
        assert_eq!(plan.input.directory, dir.path().join("in"));
        assert_eq!(plan.export.directory, dir.path().join("out"));
    }

    #[tokio::test]
    async fn test_missing_input_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut plan = Plan::default().resolve_paths(dir.path());
        plan.input.directory = dir.path().join("absent");
        assert!(run_plan(&plan).await.is_err());
    }
}
