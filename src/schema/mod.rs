//! Schema loading
//!
//! Turns a nested JSON description of a product hierarchy into the seed
//! graph: one node per `name`, parent→child edges from the nesting and
//! node→target edges for every `connected_to` cross-link.

pub mod loader;

pub use loader::{load_schema, SchemaError, SchemaLoader, SchemaResult, DEFAULT_ROOT_KEY};
