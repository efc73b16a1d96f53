use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::errors::{BuildError, BuildResult};
use crate::graph::{PathwayGraph, PathwaysInfo};
use crate::identity::IdentityResolver;
use crate::pipeline::merge::{GraphAccumulator, MergePolicy};
use crate::pipeline::normalizer::{normalize_pathway, NormalizedPathway};
use crate::records::SourcedRecord;

/// What to do when two pathway records declare the same `path_id`
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// The later pathway info replaces the earlier one, nodes and edges of
    /// both are merged
    #[default]
    Overwrite,
    Reject,
}

#[derive(Clone, Copy, Debug)]
pub struct AggregateOptions {
    pub permissive_ids: bool,
    pub merge_policy: MergePolicy,
    pub duplicate_policy: DuplicatePolicy,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            permissive_ids: true,
            merge_policy: MergePolicy::default(),
            duplicate_policy: DuplicatePolicy::default(),
        }
    }
}

/// Merged network plus the per-pathway info table, sorted by `path_id`
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PathwayCollection {
    pub graph: PathwayGraph,
    pub pathways: PathwaysInfo,
}

pub struct PathwayAggregator {
    options: AggregateOptions,
    resolver: IdentityResolver,
}

impl PathwayAggregator {
    pub fn new(options: AggregateOptions) -> Self {
        Self {
            options,
            resolver: IdentityResolver::new(options.permissive_ids),
        }
    }

    /// Normalizes every record in parallel, then folds them in input order
    /// so the merged result does not depend on thread scheduling.
    pub fn aggregate(&self, records: &[SourcedRecord]) -> BuildResult<PathwayCollection> {
        debug!(
            "Normalizing {} pathway(s), raw species id fallback {}",
            records.len(),
            if self.resolver.is_permissive() { "on" } else { "off" }
        );
        let normalized: Vec<NormalizedPathway> = records
            .par_iter()
            .map(|record| normalize_pathway(record, &self.resolver))
            .collect();

        let mut accumulator = GraphAccumulator::new(self.options.merge_policy);
        let mut pathways = PathwaysInfo::new();
        let mut skipped = 0;

        for pathway in normalized {
            let path_id = pathway.info.path_id.clone();
            if pathways.contains_key(&path_id) {
                match self.options.duplicate_policy {
                    DuplicatePolicy::Reject => {
                        return Err(BuildError::DuplicatePathwayId(path_id));
                    }
                    DuplicatePolicy::Overwrite => warn!(
                        "Pathway id {} seen more than once, keeping the latest pathway info",
                        path_id
                    ),
                }
            }
            skipped += pathway.skipped.len();
            pathways.insert(path_id, pathway.info);
            accumulator.fold_nodes(pathway.nodes);
            accumulator.fold_edges(pathway.edges);
        }

        pathways.sort_keys();
        let conflicts = accumulator.conflict_count();
        let graph = accumulator.into_graph();

        info!(
            "Aggregated {} pathway(s): {}",
            pathways.len(),
            graph.stats()
        );
        if skipped > 0 || conflicts > 0 {
            warn!(
                "{} record(s) skipped, {} merge conflict(s) recorded",
                skipped, conflicts
            );
        }

        Ok(PathwayCollection { graph, pathways })
    }
}

/// Builds the merged network of `records` with the given options
pub fn aggregate(
    records: &[SourcedRecord],
    options: &AggregateOptions,
) -> BuildResult<PathwayCollection> {
    PathwayAggregator::new(*options).aggregate(records)
}
