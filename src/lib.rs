pub mod annotate;
pub mod common;
pub mod data_loader;
pub mod errors;
pub mod export;
pub mod graph;
pub mod identity;
pub mod pipeline;
pub mod plan;
pub mod plan_execution;
pub mod records;
pub mod xlinks;
