//! Configuration: data tables and pipeline options.

mod options;
mod tables;

pub use options::{ExtractOptions, PipelineOptions, MAX_WORKERS};
pub use tables::{
    default_exclusion_patterns, ExclusionPatterns, KeywordTable, ProfileConfig, RankConfig,
};
