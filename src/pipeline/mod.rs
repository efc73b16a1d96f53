mod aggregator;
mod merge;
mod normalizer;

pub use aggregator::{aggregate, AggregateOptions, DuplicatePolicy, PathwayAggregator, PathwayCollection};
pub use merge::{
    compare_edges, compare_nodes, merge_edges, merge_nodes, GraphAccumulator, MergeConflict,
    MergePolicy,
};
pub use normalizer::{normalize_pathway, NormalizedPathway, INTERMEDIATE_PREFIX, TARGET_PREFIX};
