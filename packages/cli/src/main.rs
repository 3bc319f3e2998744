#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the suspicious-person notices map.
//!
//! Downloads the reference address table and the Ehime Prefectural Police
//! notices page, geocodes each notice, and writes `ehime.csv`, `nan.csv`
//! and `index.html` to the output directory.

use std::path::PathBuf;

use clap::Parser;
use fushinsha_map_cli::{config, pipeline};

#[derive(Parser)]
#[command(
    name = "fushinsha_map",
    about = "Map suspicious-person notices from the Ehime Prefectural Police"
)]
struct Cli {
    /// Directory the reference address CSV is cached in (default: `src`)
    #[arg(long)]
    cache_dir: Option<PathBuf>,
    /// Directory the CSV and map artifacts are written to (default: `map`)
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let profile = config::ehime().with_dirs(cli.cache_dir, cli.output_dir);
    let summary = pipeline::run(&profile).await?;

    println!(
        "{} records, {} unresolved, {} plotted -> {}",
        summary.records,
        summary.unresolved,
        summary.markers,
        profile.map_html_path().display()
    );

    Ok(())
}
