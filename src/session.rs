//! Working session
//!
//! Holds the current graph between the generation stage and the query
//! stage, together with the random source used for growth. Callers pass the
//! session around explicitly; nothing here is global.

use crate::algo::{run_query, QueryError, QueryMethod, QueryOutcome, QueryParams};
use crate::graph::{DocumentError, HierGraph};
use crate::growth::{ConfigError, ExtensionReport, GraphExtender, GrowthConfig, GrowthError};
use crate::schema::{SchemaError, SchemaLoader};
use crate::viz::{GraphRenderer, VizError};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("No graph loaded")]
    NoGraph,

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Growth(#[from] GrowthError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Viz(#[from] VizError),
}

pub type SessionResult<T> = Result<T, SessionError>;

/// The graph being worked on and the randomness that grows it
#[derive(Debug)]
pub struct Session {
    graph: Option<HierGraph>,
    rng: StdRng,
    loader: SchemaLoader,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Session with an entropy-seeded random source
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Session whose growth is reproducible for a given seed
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            graph: None,
            rng,
            loader: SchemaLoader::default(),
        }
    }

    pub fn with_loader(mut self, loader: SchemaLoader) -> Self {
        self.loader = loader;
        self
    }

    /// Restart the random source from `seed`
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    pub fn has_graph(&self) -> bool {
        self.graph.is_some()
    }

    pub fn graph(&self) -> SessionResult<&HierGraph> {
        self.graph.as_ref().ok_or(SessionError::NoGraph)
    }

    /// Replace the current graph
    pub fn set_graph(&mut self, graph: HierGraph) {
        self.graph = Some(graph);
    }

    pub fn take_graph(&mut self) -> Option<HierGraph> {
        self.graph.take()
    }

    /// Seed the session from schema JSON text, replacing any current graph.
    ///
    /// A schema that fails to load leaves the current graph untouched.
    pub fn load_schema_str(&mut self, json: &str) -> SessionResult<&HierGraph> {
        let graph = self.loader.load_str(json)?;
        Ok(&*self.graph.insert(graph))
    }

    pub fn load_schema_path(&mut self, path: impl AsRef<Path>) -> SessionResult<&HierGraph> {
        let graph = self.loader.load_path(path)?;
        Ok(&*self.graph.insert(graph))
    }

    /// Load a previously saved graph document, replacing any current graph
    pub fn load_document(&mut self, path: impl AsRef<Path>) -> SessionResult<&HierGraph> {
        let graph = HierGraph::load_json(path)?;
        Ok(&*self.graph.insert(graph))
    }

    pub fn save_document(&self, path: impl AsRef<Path>) -> SessionResult<()> {
        self.graph()?.save_json(path)?;
        Ok(())
    }

    /// Grow the current graph by the levels of `config`.
    ///
    /// A seed in `config` restarts the session's random source first.
    pub fn extend(&mut self, config: &GrowthConfig) -> SessionResult<ExtensionReport> {
        let extender = GraphExtender::from_config(config)?;
        if let Some(seed) = config.seed {
            self.reseed(seed);
        }
        let graph = self.graph.as_mut().ok_or(SessionError::NoGraph)?;
        let report = extender.extend(graph, &config.levels, &mut self.rng)?;
        info!(
            "Extended graph by {} nodes and {} edges; now {} nodes, {} edges",
            report.nodes_added(),
            report.edges_added(),
            graph.node_count(),
            graph.edge_count()
        );
        Ok(report)
    }

    pub fn query(&self, method: QueryMethod, params: &QueryParams) -> SessionResult<QueryOutcome> {
        Ok(run_query(self.graph()?, method, params)?)
    }

    /// Draw the whole current graph
    pub fn render<R: GraphRenderer + ?Sized>(&self, renderer: &mut R, title: &str) -> SessionResult<()> {
        renderer.render(self.graph()?, None, title)?;
        Ok(())
    }

    /// Draw the part of the current graph a query outcome points at
    pub fn render_outcome<R: GraphRenderer + ?Sized>(
        &self,
        renderer: &mut R,
        outcome: &QueryOutcome,
    ) -> SessionResult<()> {
        let scoped = outcome.scoped_graph(self.graph()?);
        renderer.render(&scoped, Some(&outcome.highlight), &outcome.title)?;
        Ok(())
    }
}
