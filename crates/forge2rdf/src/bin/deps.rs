use std::io::{self, BufWriter, Write};
use std::process;

use clap::Parser;

use forge2rdf::cache::{CachePolicy, GraphCache};
use forge2rdf::cli::{init_logging, CommonArgs};
use forge2rdf::deps::{record_manifests, DependencyScanner, ManifestOutcome, DEFAULT_LANGUAGE};
use forge2rdf::forge::github::GitHubClient;
use forge2rdf::model::iri::IriMinter;
use forge2rdf::store::TripleStore;

/// Find the Godeps manifest of every project in the snapshot written in LANGUAGE.
#[derive(Parser)]
#[command(name = "forge2rdf-deps", version, about)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    /// Programming language whose projects are scanned.
    #[arg(short, long, value_name = "LANGUAGE", default_value = DEFAULT_LANGUAGE)]
    language: String,

    /// Write found manifests back into the snapshot as forge:dependencyManifest.
    #[arg(long)]
    record: bool,
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    init_logging(&cli.common);
    let config = cli.common.load_config()?;

    let mut store = TripleStore::load(&config.cache_file)?;

    let client = GitHubClient::from_config(&config, cli.common.http_cache)?;
    let scanner = DependencyScanner::new(&client, IriMinter::new(&config.api_base_url))
        .with_retry(config.retry.policy());
    let reports = scanner.scan(&store, &cli.language);

    let mut out = BufWriter::new(io::stdout().lock());
    for report in &reports {
        writeln!(out, "{}", report.summary())?;
    }
    out.flush()?;

    let failed = reports
        .iter()
        .filter(|r| matches!(r.outcome, ManifestOutcome::Failed { .. }))
        .count();
    if cli.common.verbose {
        eprintln!(
            "Scanned {} {} project(s), {failed} failed",
            reports.len(),
            cli.language
        );
    }

    if cli.record {
        let added = record_manifests(&mut store, &reports);
        GraphCache::new(&config.cache_file, CachePolicy::UseIfPresent).persist(&store)?;
        if cli.common.verbose {
            eprintln!("Recorded {added} manifest statement(s)");
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
