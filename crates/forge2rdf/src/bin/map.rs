use std::io::{self, BufWriter, Write};
use std::process;

use clap::Parser;

use forge2rdf::cli::{init_logging, CommonArgs};
use forge2rdf::report::{render_project_map, run_query, PROJECT_MAP_QUERY};
use forge2rdf::store::TripleStore;

/// Print a Markdown map of the projects in the snapshot.
#[derive(Parser)]
#[command(name = "forge2rdf-map", version, about)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    init_logging(&cli.common);
    let config = cli.common.load_config()?;
    let store = TripleStore::load(&config.cache_file)?;

    let rows = run_query(&store, PROJECT_MAP_QUERY)?;
    let mut out = BufWriter::new(io::stdout().lock());
    render_project_map(&rows, &mut out)?;
    out.flush()?;
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
