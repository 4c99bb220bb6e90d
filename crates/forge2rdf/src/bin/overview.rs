use std::io::{self, BufWriter, Write};
use std::process;

use clap::Parser;

use forge2rdf::cli::{init_logging, CommonArgs};
use forge2rdf::report::{render_product_overview, run_query, PRODUCT_OVERVIEW_QUERY};
use forge2rdf::store::TripleStore;

/// List products with the projects and technologies they are built from.
#[derive(Parser)]
#[command(name = "forge2rdf-overview", version, about)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    init_logging(&cli.common);
    let config = cli.common.load_config()?;
    let store = TripleStore::load(&config.cache_file)?;

    let rows = run_query(&store, PRODUCT_OVERVIEW_QUERY)?;
    let mut out = BufWriter::new(io::stdout().lock());
    render_product_overview(&rows, &mut out)?;
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
