use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing::debug;

use forge2rdf::cache::{CachePolicy, GraphCache};
use forge2rdf::cli::{init_logging, CommonArgs};
use forge2rdf::emitter::ntriples::NTriplesEmitter;
use forge2rdf::emitter::turtle::TurtleEmitter;
use forge2rdf::emitter::TriplesEmitter;
use forge2rdf::forge::github::GitHubClient;
use forge2rdf::harvest::ProjectHarvester;
use forge2rdf::model::iri::IriMinter;
use forge2rdf::model::ontology::PREFIXES;
use forge2rdf::overlay::{load_product_seeds, KnowledgeOverlay};
use forge2rdf::store::TripleStore;

/// Harvest project metadata from the forge into the RDF snapshot.
#[derive(Parser)]
#[command(name = "forge2rdf", version, about)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    /// Snapshot policy; overrides --no-cache.
    #[arg(long, value_enum, value_name = "POLICY")]
    cache_policy: Option<CachePolicy>,

    /// Product seed file (JSON array of {uri, name, category}).
    #[arg(short, long, value_name = "FILE")]
    products: Option<PathBuf>,

    /// Format of the --verbose graph dump: ntriples, turtle.
    #[arg(short, long, value_name = "FORMAT", default_value = "ntriples")]
    format: String,

    /// Quiet output.
    #[arg(short, long)]
    quiet: bool,
}

fn dump(store: &TripleStore, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let out = BufWriter::new(io::stdout().lock());
    match format.to_lowercase().as_str() {
        "ntriples" | "nt" => store.dump(&mut NTriplesEmitter::new(out))?,
        "turtle" | "ttl" => {
            let mut emitter = TurtleEmitter::new(out);
            for (prefix, ns) in PREFIXES {
                emitter.add_prefix(prefix, ns)?;
            }
            store.dump(&mut emitter)?;
        }
        other => {
            return Err(format!("Unknown format: {other}. Use 'ntriples' or 'turtle'.").into());
        }
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    init_logging(&cli.common);
    debug!(options = ?cli.common, "starting harvest");

    let config = cli.common.load_config()?;

    // Seed file problems are fatal, so read it before touching the network.
    let products = match config.products_path(cli.products.as_deref()) {
        Some(path) => load_product_seeds(&path)?,
        None => Vec::new(),
    };

    let policy = cli.common.cache_policy(cli.cache_policy);
    let cache = GraphCache::new(&config.cache_file, policy);
    let mut store = cache.load_or_empty();

    let client = GitHubClient::from_config(&config, cli.common.http_cache)?;
    let harvester = ProjectHarvester::new(&client, IriMinter::new(&config.api_base_url))
        .with_retry(config.retry.policy());
    let report = harvester.harvest_all(&mut store, &config.projects);

    let overlay = KnowledgeOverlay::standard().with_products(products);
    let overlaid = overlay.apply(&mut store);

    if cli.common.verbose {
        dump(&store, &cli.format)?;
    }

    cache.persist(&store)?;

    if !cli.quiet {
        let mut err = io::stderr().lock();
        writeln!(
            err,
            "Harvested {} project(s), {} from snapshot, {} failed; {overlaid} overlay statement(s) added; {} statements total",
            report.harvested(),
            report.cached(),
            report.failures.len(),
            store.len()
        )?;
        for failure in &report.failures {
            writeln!(err, "  failed: {failure}")?;
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
