use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::annotate::DepictionOptions;
use crate::export::ExportFormat;
use crate::pipeline::{AggregateOptions, DuplicatePolicy, MergePolicy};

/// ## Structure
/// This module contains the data structures for the plan file.
///
/// ```text
/// Plan
///   ├── meta: PlanMeta { name }
///   ├── input: InputConfig { directory }
///   ├── identity: IdentityConfig { permissive }
///   ├── merge: MergeConfig { policy, duplicate_pathways }
///   ├── annotate: AnnotateConfig
///   │   ├── cofactors: Option<PathBuf>
///   │   └── depiction: Option<DepictionConfig>
///   │       ├── command | url (+ query_parameter)
///   │       ├── timeout_secs
///   │       └── max_concurrency
///   └── export: ExportConfig { directory, formats: [json, js, csv] }
/// ```
///
/// Relative paths are resolved against the directory of the plan file.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Plan {
    #[serde(default)]
    pub meta: PlanMeta,
    pub input: InputConfig,
    #[serde(default)]
    pub identity: IdentityConfig,
    #[serde(default)]
    pub merge: MergeConfig,
    #[serde(default)]
    pub annotate: AnnotateConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PlanMeta {
    pub name: String,
}

impl Default for PlanMeta {
    fn default() -> Self {
        Self {
            name: "pathways".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct InputConfig {
    pub directory: PathBuf,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("pathways"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct IdentityConfig {
    /// Fall back to the raw species id when nothing better exists
    #[serde(default = "default_true")]
    pub permissive: bool,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self { permissive: true }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
pub struct MergeConfig {
    #[serde(default)]
    pub policy: MergePolicy,
    #[serde(default)]
    pub duplicate_pathways: DuplicatePolicy,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct AnnotateConfig {
    /// Tab-separated cofactor reference file
    pub cofactors: Option<PathBuf>,
    pub depiction: Option<DepictionConfig>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DepictionConfig {
    /// External program reading an InChI on stdin and writing SVG
    pub command: Option<String>,
    /// Depiction service endpoint, used when no command is set
    pub url: Option<String>,
    pub query_parameter: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_concurrency() -> usize {
    4
}

impl DepictionConfig {
    pub fn options(&self) -> DepictionOptions {
        DepictionOptions {
            timeout: Duration::from_secs(self.timeout_secs),
            max_concurrency: self.max_concurrency,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ExportConfig {
    pub directory: PathBuf,
    #[serde(default = "ExportFormat::default_formats")]
    pub formats: Vec<ExportFormat>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("output"),
            formats: ExportFormat::default_formats(),
        }
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

impl Plan {
    /// Rebases every relative path onto `base`
    pub fn resolve_paths(mut self, base: &Path) -> Self {
        self.input.directory = resolve(base, &self.input.directory);
        self.export.directory = resolve(base, &self.export.directory);
        self.annotate.cofactors = self.annotate.cofactors.map(|p| resolve(base, &p));
        self
    }

    pub fn aggregate_options(&self) -> AggregateOptions {
        AggregateOptions {
            permissive_ids: self.identity.permissive,
            merge_policy: self.merge.policy,
            duplicate_policy: self.merge.duplicate_pathways,
        }
    }
}
