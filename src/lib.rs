//! Hierarchical graph synthesizer
//!
//! Builds a directed hierarchy graph from a nested JSON schema, grows it
//! level by level with a degree-bucket attachment process plus random
//! cross-level jump edges, and runs classic traversal queries over the
//! result.
//!
//! # Architecture
//!
//! - [`schema`]: seed graph from a JSON hierarchy
//! - [`growth`]: level-by-level extension and its configuration
//! - [`algo`]: query methods over a dense view of the graph
//! - [`viz`]: Graphviz DOT rendering with highlights
//! - [`session`]: the graph carried between generation and querying
//!
//! ## Example Usage
//!
//! ```rust
//! use hiergraph::algo::{run_query, QueryMethod, QueryParams};
//! use hiergraph::growth::{GraphExtender, LevelPlan};
//! use hiergraph::schema::load_schema;
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let mut graph = load_schema(
//!     r#"{"Business Group": {"name": "BG", "children": [{"name": "PF1"}, {"name": "PF2"}]}}"#,
//! )
//! .unwrap();
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let report = GraphExtender::default()
//!     .extend(&mut graph, &LevelPlan::from([(3, 10)]), &mut rng)
//!     .unwrap();
//! assert_eq!(report.nodes_added(), 10);
//! assert_eq!(graph.nodes_at_level(2).len(), 10);
//!
//! let outcome = run_query(&graph, QueryMethod::Bfs, &QueryParams::from_source("BG")).unwrap();
//! assert!(outcome.summary.starts_with("BFS traversal order: ['BG'"));
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod graph;
pub mod growth;
pub mod schema;
pub mod session;
pub mod viz;

// Re-export main types for convenience
pub use graph::{
    DocumentError, GraphDocument, GraphError, GraphResult, HierGraph, NodeAttrs, NodeKey,
};

pub use schema::{load_schema, SchemaError, SchemaLoader, SchemaResult};

pub use growth::{
    extend_levels, AttachmentKernel, ConfigError, DegreeBucketKernel, ExtensionReport,
    GraphExtender, GrowthConfig, GrowthError, GrowthResult, LevelPlan, LevelReport,
};

pub use algo::{run_query, QueryError, QueryMethod, QueryOutcome, QueryParams, QueryResult};

pub use viz::{render_dot, DotRenderer, GraphRenderer, Highlight, VizError};

pub use session::{Session, SessionError, SessionResult};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
