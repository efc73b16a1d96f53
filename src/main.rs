use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use pathnet::export::ExportFormat;
use pathnet::pipeline::{DuplicatePolicy, MergePolicy};
use pathnet::plan::{
    AnnotateConfig, DepictionConfig, ExportConfig, IdentityConfig, InputConfig, MergeConfig, Plan,
    PlanMeta,
};
use pathnet::{common, plan_execution};

#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    #[clap(short, long, global = true)]
    log_level: Option<String>,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a YAML plan
    Run {
        #[clap(short, long)]
        plan: String,
    },
    /// Write a default plan file
    Init {
        #[clap(short, long)]
        plan: String,
    },
    /// Merge every pathway record of a directory into one network
    Build {
        input_dir: PathBuf,
        output_dir: PathBuf,
        /// Tab-separated cofactor reference file
        #[clap(long)]
        cofactors: Option<PathBuf>,
        /// Program turning an InChI on stdin into SVG on stdout
        #[clap(long)]
        depict_command: Option<String>,
        /// Depiction service queried with `?inchi=<InChI>`
        #[clap(long, conflicts_with = "depict_command")]
        depict_url: Option<String>,
        /// Drop species lacking InChIKey and MetaNetX/ChEBI references
        #[clap(long)]
        strict_ids: bool,
        /// Fail when two records declare the same pathway id
        #[clap(long)]
        reject_duplicate_paths: bool,
        /// Resolve merge conflicts independently of input order
        #[clap(long)]
        canonical_merge: bool,
        #[clap(long, value_enum, num_args = 1..)]
        format: Vec<ExportFormat>,
        #[clap(long, default_value = "pathways")]
        name: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    setup_logging(&args.log_level);

    match args.command {
        Commands::Run { plan } => {
            info!("Running plan: {}", plan);
            plan_execution::execute_plan(&plan).await?;
        }
        Commands::Init { plan } => {
            info!("Initializing plan: {}", plan);
            let plan_file_path = plan;
            let plan = Plan::default();
            let serialized_plan = serde_yaml::to_string(&plan)?;
            common::write_string_to_file(Path::new(&plan_file_path), &serialized_plan)?;
        }
        Commands::Build {
            input_dir,
            output_dir,
            cofactors,
            depict_command,
            depict_url,
            strict_ids,
            reject_duplicate_paths,
            canonical_merge,
            format,
            name,
        } => {
            let depiction = (depict_command.is_some() || depict_url.is_some()).then(|| {
                DepictionConfig {
                    command: depict_command,
                    url: depict_url,
                    query_parameter: None,
                    timeout_secs: 30,
                    max_concurrency: 4,
                }
            });
            let plan = Plan {
                meta: PlanMeta { name },
                input: InputConfig {
                    directory: input_dir,
                },
                identity: IdentityConfig {
                    permissive: !strict_ids,
                },
                merge: MergeConfig {
                    policy: if canonical_merge {
                        MergePolicy::Canonical
                    } else {
                        MergePolicy::FirstSeen
                    },
                    duplicate_pathways: if reject_duplicate_paths {
                        DuplicatePolicy::Reject
                    } else {
                        DuplicatePolicy::Overwrite
                    },
                },
                annotate: AnnotateConfig {
                    cofactors,
                    depiction,
                },
                export: ExportConfig {
                    directory: output_dir,
                    formats: if format.is_empty() {
                        ExportFormat::default_formats()
                    } else {
                        format
                    },
                },
            };
            let output = plan_execution::run_plan(&plan).await?;
            info!(
                "{} pathway(s) merged into {} file(s)",
                output.collection.pathways.len(),
                output.written.len()
            );
        }
    }

    Ok(())
}

fn setup_logging(log_level: &Option<String>) {
    let log_level = match log_level
        .as_ref()
        .unwrap_or(&"info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(format!("handlebars=off,{}", log_level)))
        .without_time()
        .init();
}
