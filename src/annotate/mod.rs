//! Post-merge annotation passes over the network
//!
//! Both passes are best-effort: a missing reference file or an unavailable
//! renderer degrades the output without failing the run.

mod cofactors;
mod depiction;

pub use cofactors::{annotate_cofactors, tag_cofactors};
pub use depiction::{
    annotate_depictions, depict, svg_data_uri, CommandRenderer, DepictionOptions, HttpRenderer,
    StructureRenderer, DEFAULT_QUERY_PARAMETER,
};
