//! hiergraph CLI: generate, query and render synthesized hierarchy graphs
//!
//! Graphs are exchanged between commands as JSON graph documents.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use hiergraph::graph::node_type_for_level;
use hiergraph::growth::DEFAULT_FIRST_LEVEL;
use hiergraph::viz::MAX_RENDER_NODES;
use hiergraph::{
    DotRenderer, ExtensionReport, GrowthConfig, HierGraph, QueryMethod, QueryOutcome,
    QueryParams, Session,
};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::Level;

#[derive(Parser)]
#[command(name = "hiergraph", version, about = "Hierarchical graph synthesizer")]
struct Cli {
    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    /// Log level written to stderr
    #[arg(long, default_value = "warn", global = true)]
    log_level: Level,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a schema, grow it and write the graph document
    Generate {
        /// Schema JSON file
        #[arg(long)]
        schema: PathBuf,

        /// Growth config (.yaml, .yml or .json)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Number of levels to add, all of the same size
        #[arg(long, default_value_t = 1)]
        levels: u32,

        /// Nodes per added level
        #[arg(long, default_value_t = 10)]
        nodes_per_level: usize,

        /// Parents drawn from the level below for each new node
        #[arg(long)]
        connections: Option<usize>,

        /// Chance of one random jump edge per new node
        #[arg(long)]
        jump_probability: Option<f64>,

        /// Random seed
        #[arg(long)]
        seed: Option<u64>,

        /// Where to write the graph document
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Run a query method against a graph document
    Query {
        #[arg(long)]
        graph: PathBuf,

        /// dfs, bfs, shortest-path, all-simple-paths, descendants-ancestors,
        /// degree-centrality or subgraph
        #[arg(long, value_parser = parse_method)]
        method: QueryMethod,

        #[arg(long)]
        source: Option<String>,

        #[arg(long)]
        target: Option<String>,

        /// Hop radius for subgraph extraction
        #[arg(long)]
        max_depth: Option<usize>,

        /// Also write the outcome as DOT to this file
        #[arg(long)]
        dot: Option<PathBuf>,
    },
    /// Render a whole graph document as Graphviz DOT
    Render {
        #[arg(long)]
        graph: PathBuf,

        #[arg(long, short)]
        output: Option<PathBuf>,

        #[arg(long, default_value_t = MAX_RENDER_NODES)]
        max_nodes: usize,

        #[arg(long, default_value = "Schema to Graph")]
        title: String,
    },
    /// Show node and edge counts per level
    Stats {
        #[arg(long)]
        graph: PathBuf,
    },
    /// Start an interactive REPL
    Shell {
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_writer(io::stderr)
        .init();

    let result = match cli.command {
        Commands::Generate {
            schema,
            config,
            levels,
            nodes_per_level,
            connections,
            jump_probability,
            seed,
            output,
        } => {
            let config = match config {
                Some(path) => GrowthConfig::from_path(&path)
                    .with_context(|| format!("loading config {}", path.display())),
                None => GrowthConfig::uniform(DEFAULT_FIRST_LEVEL, levels, nodes_per_level)
                    .map_err(anyhow::Error::from),
            };
            config.and_then(|config| {
                let config = override_config(config, connections, jump_probability, seed);
                run_generate(&schema, &config, output.as_deref(), cli.format)
            })
        }
        Commands::Query {
            graph,
            method,
            source,
            target,
            max_depth,
            dot,
        } => {
            let params = QueryParams {
                source,
                target,
                max_depth,
                cutoff: None,
            };
            run_query(&graph, method, &params, dot.as_deref(), cli.format)
        }
        Commands::Render {
            graph,
            output,
            max_nodes,
            title,
        } => run_render(&graph, output.as_deref(), max_nodes, &title),
        Commands::Stats { graph } => load_graph(&graph).and_then(|g| print_stats(&g, cli.format)),
        Commands::Shell { seed } => run_shell(seed, cli.format),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn parse_method(s: &str) -> Result<QueryMethod, String> {
    s.parse().map_err(|e: hiergraph::QueryError| e.to_string())
}

fn override_config(
    mut config: GrowthConfig,
    connections: Option<usize>,
    jump_probability: Option<f64>,
    seed: Option<u64>,
) -> GrowthConfig {
    if let Some(connections) = connections {
        config.connections_per_node = connections;
    }
    if let Some(p) = jump_probability {
        config.jump_probability = p;
    }
    if seed.is_some() {
        config.seed = seed;
    }
    config
}

fn load_graph(path: &Path) -> Result<HierGraph> {
    HierGraph::load_json(path).with_context(|| format!("loading graph {}", path.display()))
}

fn run_generate(
    schema: &Path,
    config: &GrowthConfig,
    output: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    let mut session = Session::new();
    session
        .load_schema_path(schema)
        .with_context(|| format!("loading schema {}", schema.display()))?;
    let report = session.extend(config)?;

    print_report(&report, format)?;
    let graph = session.graph()?;
    if let Some(path) = output {
        graph
            .save_json(path)
            .with_context(|| format!("writing {}", path.display()))?;
        eprintln!("Wrote {} nodes, {} edges to {}", graph.node_count(), graph.edge_count(), path.display());
    } else {
        print_stats(graph, format)?;
    }
    Ok(())
}

fn run_query(
    graph_path: &Path,
    method: QueryMethod,
    params: &QueryParams,
    dot: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    let mut session = Session::new();
    session
        .load_document(graph_path)
        .with_context(|| format!("loading graph {}", graph_path.display()))?;
    let outcome = session.query(method, params)?;
    print_outcome(&outcome, format)?;

    if let Some(path) = dot {
        let mut renderer = DotRenderer::new(BufWriter::new(File::create(path)?));
        session.render_outcome(&mut renderer, &outcome)?;
    }
    Ok(())
}

fn run_render(graph_path: &Path, output: Option<&Path>, max_nodes: usize, title: &str) -> Result<()> {
    let mut session = Session::new();
    session
        .load_document(graph_path)
        .with_context(|| format!("loading graph {}", graph_path.display()))?;

    match output {
        Some(path) => {
            let file = BufWriter::new(File::create(path)?);
            let mut renderer = DotRenderer::new(file).with_max_nodes(max_nodes);
            session.render(&mut renderer, title)?;
        }
        None => {
            let mut renderer = DotRenderer::new(io::stdout().lock()).with_max_nodes(max_nodes);
            session.render(&mut renderer, title)?;
        }
    }
    Ok(())
}

fn print_report(report: &ExtensionReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(report)?);
        }
        OutputFormat::Table => {
            if report.levels.is_empty() {
                println!("(no levels added)");
                return Ok(());
            }
            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(vec!["Plan", "Level", "Nodes", "Parent edges", "Internal edges", "Jump edges", "Root fallback"]);
            for level in &report.levels {
                table.add_row(vec![
                    level.logical_index.to_string(),
                    level.level.to_string(),
                    level.nodes.len().to_string(),
                    level.parent_edges.to_string(),
                    level.internal_edges.to_string(),
                    level.jump_edges.to_string(),
                    level.root_fallback.to_string(),
                ]);
            }
            println!("{}", table);
        }
    }
    Ok(())
}

fn print_stats(graph: &HierGraph, format: OutputFormat) -> Result<()> {
    let histogram = graph.level_histogram();
    match format {
        OutputFormat::Json => {
            let stats = serde_json::json!({
                "nodes": graph.node_count(),
                "edges": graph.edge_count(),
                "levels": histogram,
            });
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(vec!["Level", "Node type", "Nodes"]);
            for (level, count) in &histogram {
                table.add_row(vec![
                    level.to_string(),
                    node_type_for_level(*level),
                    count.to_string(),
                ]);
            }
            println!("{}", table);
            println!("Nodes: {}", graph.node_count());
            println!("Edges: {}", graph.edge_count());
        }
    }
    Ok(())
}

fn print_outcome(outcome: &QueryOutcome, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(outcome)?),
        OutputFormat::Table => println!("{}", outcome.summary),
    }
    Ok(())
}

fn run_shell(seed: Option<u64>, format: OutputFormat) -> Result<()> {
    println!("hiergraph Interactive Shell");
    println!("Type :help for commands. :quit to exit.\n");

    let mut session = match seed {
        Some(seed) => Session::with_seed(seed),
        None => Session::new(),
    };
    let stdin = io::stdin();
    let mut line = String::new();

    loop {
        eprint!("hiergraph> ");
        io::stderr().flush()?;

        line.clear();
        if stdin.read_line(&mut line)? == 0 {
            break; // EOF
        }

        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            continue;
        };
        let args: Vec<&str> = words.collect();

        let result = match command {
            ":quit" | ":exit" | ":q" => break,
            ":help" | ":h" => {
                print_shell_help();
                Ok(())
            }
            ":load" => shell_load(&mut session, &args),
            ":open" => shell_open(&mut session, &args),
            ":extend" => shell_extend(&mut session, &args, format),
            ":query" => shell_query(&session, &args, format),
            ":stats" => session
                .graph()
                .map_err(anyhow::Error::from)
                .and_then(|graph| print_stats(graph, format)),
            ":save" => shell_save(&session, &args),
            ":dot" => shell_dot(&session, &args),
            other => Err(anyhow::anyhow!("Unknown command {} (try :help)", other)),
        };

        if let Err(e) = result {
            eprintln!("Error: {:#}", e);
        }
    }

    println!("Bye!");
    Ok(())
}

fn print_shell_help() {
    println!("Commands:");
    println!("  :load <schema.json>                       Load a schema as the current graph");
    println!("  :open <graph.json>                        Open a saved graph document");
    println!("  :extend <levels> <nodes> [conn] [jump]    Add levels of equal size");
    println!("  :query <method> [source] [target|depth]   Run a query method");
    println!("  :stats                                    Node counts per level");
    println!("  :save <graph.json>                        Save the current graph");
    println!("  :dot <file.dot>                           Render the current graph");
    println!("  :quit                                     Exit shell");
    println!();
    println!("Methods:");
    for method in QueryMethod::ALL {
        println!("  {:<22} {}", method.short_name(), method);
    }
}

fn one_path<'a>(args: &[&'a str], usage: &str) -> Result<&'a str> {
    match args {
        [path] => Ok(*path),
        _ => bail!("usage: {}", usage),
    }
}

fn shell_load(session: &mut Session, args: &[&str]) -> Result<()> {
    let graph = session.load_schema_path(one_path(args, ":load <schema.json>")?)?;
    println!("Loaded {} nodes, {} edges", graph.node_count(), graph.edge_count());
    Ok(())
}

fn shell_open(session: &mut Session, args: &[&str]) -> Result<()> {
    let graph = session.load_document(one_path(args, ":open <graph.json>")?)?;
    println!("Opened {} nodes, {} edges", graph.node_count(), graph.edge_count());
    Ok(())
}

fn shell_extend(session: &mut Session, args: &[&str], format: OutputFormat) -> Result<()> {
    let usage = ":extend <levels> <nodes> [connections] [jump_probability]";
    let (levels, nodes) = match args {
        [levels, nodes, ..] => (levels.parse::<u32>()?, nodes.parse::<usize>()?),
        _ => bail!("usage: {}", usage),
    };
    let mut config = GrowthConfig::uniform(DEFAULT_FIRST_LEVEL, levels, nodes)?;
    if let Some(connections) = args.get(2) {
        config.connections_per_node = connections.parse()?;
    }
    if let Some(p) = args.get(3) {
        config.jump_probability = p.parse()?;
    }
    let report = session.extend(&config)?;
    print_report(&report, format)
}

fn shell_query(session: &Session, args: &[&str], format: OutputFormat) -> Result<()> {
    let Some((method, rest)) = args.split_first() else {
        bail!("usage: :query <method> [source] [target|depth]");
    };
    let method: QueryMethod = method.parse()?;
    let mut params = QueryParams::new();
    params.source = rest.first().map(|s| s.to_string());
    if let Some(third) = rest.get(1) {
        if method == QueryMethod::SubgraphExtraction {
            params.max_depth = Some(third.parse()?);
        } else {
            params.target = Some(third.to_string());
        }
    }
    let outcome = session.query(method, &params)?;
    print_outcome(&outcome, format)
}

fn shell_save(session: &Session, args: &[&str]) -> Result<()> {
    let path = one_path(args, ":save <graph.json>")?;
    session.save_document(path)?;
    println!("Saved to {}", path);
    Ok(())
}

fn shell_dot(session: &Session, args: &[&str]) -> Result<()> {
    let path = one_path(args, ":dot <file.dot>")?;
    let mut renderer = DotRenderer::new(BufWriter::new(File::create(path)?));
    session.render(&mut renderer, "Schema to Graph")?;
    println!("Rendered to {}", path);
    Ok(())
}
