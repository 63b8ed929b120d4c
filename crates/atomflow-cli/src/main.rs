//! atomflow CLI - DNA, edges and journeys over extracted atoms

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

use atomflow_atom::{load_atoms, Atom};
use atomflow_dna::{compare_dna, DnaCache, DnaExtractor};
use atomflow_resolver::{CrossFileResolver, EdgeMap, ResolutionStats, ResolverConfig};

#[derive(Parser)]
#[command(name = "atomflow")]
#[command(about = "Atom identity and cross-file data-flow analysis", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Pretty print JSON output
    #[arg(short, long, global = true)]
    pretty: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute DNA for every atom
    Dna {
        /// Atom JSON files or directories
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Similarity of two atoms
    Compare {
        /// Atom JSON file or directory
        path: PathBuf,
        id_a: String,
        id_b: String,
    },
    /// Resolve cross-file edges
    Edges {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Resolver config (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Resolve callers on a thread pool
        #[arg(long)]
        parallel: bool,
        /// Include resolution counters
        #[arg(long)]
        stats: bool,
    },
    /// Follow edges depth-first from one atom
    Journey {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Starting atom id
        #[arg(long)]
        from: String,
        /// Maximum hops (defaults to the config's max_journey_depth)
        #[arg(short, long)]
        depth: Option<usize>,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {:#}", err);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let pretty = cli.pretty;
    match cli.command {
        Commands::Dna { paths } => cmd_dna(&paths, pretty),
        Commands::Compare { path, id_a, id_b } => cmd_compare(path, &id_a, &id_b, pretty),
        Commands::Edges {
            paths,
            config,
            parallel,
            stats,
        } => cmd_edges(&paths, config, parallel, stats, pretty),
        Commands::Journey {
            paths,
            from,
            depth,
            config,
        } => cmd_journey(&paths, &from, depth, config, pretty),
    }
}

fn load(paths: &[PathBuf]) -> Result<Vec<Atom>> {
    let atoms = load_atoms(paths).context("failed to load atoms")?;
    info!(atoms = atoms.len(), "loaded atoms");
    Ok(atoms)
}

fn load_config(path: Option<PathBuf>) -> Result<ResolverConfig> {
    match path {
        Some(path) => ResolverConfig::from_json_file(&path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(ResolverConfig::default()),
    }
}

fn find_atom<'a>(atoms: &'a [Atom], id: &str) -> Result<&'a Atom> {
    atoms
        .iter()
        .find(|a| a.id == id)
        .with_context(|| format!("no atom with id {id}"))
}

/// `edges --stats` output
#[derive(Serialize)]
struct EdgeReport<'a> {
    edges: &'a EdgeMap,
    stats: &'a ResolutionStats,
}

fn emit<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", out);
    Ok(())
}

fn cmd_dna(paths: &[PathBuf], pretty: bool) -> Result<()> {
    let atoms = load(paths)?;
    let extractor = DnaExtractor::new();

    let results: Vec<_> = atoms
        .iter()
        .map(|atom| json!({ "atom": atom.id, "dna": extractor.extract(atom) }))
        .collect();
    emit(&results, pretty)
}

fn cmd_compare(path: PathBuf, id_a: &str, id_b: &str, pretty: bool) -> Result<()> {
    let atoms = load(&[path])?;
    let (a, b) = (find_atom(&atoms, id_a)?, find_atom(&atoms, id_b)?);

    let mut cache = DnaCache::new();
    let dna_a = cache.get_or_extract(a).clone();
    let dna_b = cache.get_or_extract(b).clone();

    emit(
        &json!({
            "a": id_a,
            "b": id_b,
            "similarity": compare_dna(&dna_a, &dna_b),
            "sameStructure": dna_a.structural_hash == dna_b.structural_hash,
        }),
        pretty,
    )
}

fn cmd_edges(
    paths: &[PathBuf],
    config: Option<PathBuf>,
    parallel: bool,
    with_stats: bool,
    pretty: bool,
) -> Result<()> {
    let atoms = load(paths)?;
    let resolver = CrossFileResolver::new(&atoms).with_config(load_config(config)?);

    let (edges, stats) = if parallel {
        resolver.resolve_all_parallel_with_stats()
    } else {
        resolver.resolve_all_with_stats()
    };
    let map: EdgeMap = edges.into_iter().collect();

    if with_stats {
        emit(&EdgeReport { edges: &map, stats: &stats }, pretty)
    } else {
        emit(&map, pretty)
    }
}

fn cmd_journey(
    paths: &[PathBuf],
    from: &str,
    depth: Option<usize>,
    config: Option<PathBuf>,
    pretty: bool,
) -> Result<()> {
    let atoms = load(paths)?;
    let resolver = CrossFileResolver::new(&atoms).with_config(load_config(config)?);
    if resolver.index().get(from).is_none() {
        bail!("no atom with id {from}");
    }

    let depth = depth.unwrap_or(resolver.config().max_journey_depth);
    let map = resolver.build_edge_map();
    emit(&map.trace_journey(from, depth), pretty)
}
