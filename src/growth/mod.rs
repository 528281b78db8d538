//! Hierarchy growth
//!
//! Extends a seeded hierarchy with whole levels of synthetic nodes. Each
//! level is first grown as a standalone attachment graph whose shape is
//! controlled by an [`AttachmentKernel`], then wired to the level below it.

pub mod attachment;
pub mod config;
pub mod extender;
pub mod kernel;

use crate::graph::GraphError;
use std::collections::BTreeMap;
use thiserror::Error;

pub use attachment::AttachmentGraph;
pub use config::{ConfigError, ConfigResult, GrowthConfig, DEFAULT_FIRST_LEVEL};
pub use extender::{extend_levels, ExtensionReport, GraphExtender, LevelReport};
pub use kernel::{
    normalize_distribution, validate_distribution, AttachmentKernel, DegreeBucketKernel,
    DEFAULT_DISTRIBUTION,
};

/// Logical level index -> number of nodes to create, processed in key order
pub type LevelPlan = BTreeMap<u32, usize>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GrowthError {
    #[error("Invalid growth parameter: {0}")]
    InvalidParameter(String),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

pub type GrowthResult<T> = Result<T, GrowthError>;
