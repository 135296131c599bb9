//! Survey the tag vocabulary of an OSM extract: every key with the set of
//! values it takes, written as JSON with stable ordering.

use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use clap::Parser;
use env_logger::Env;
use log::{error, info};

use osm_busway::{extract, Error, Result};

#[derive(Parser)]
#[command(name = "list-keywords")]
#[command(about = "List every tag key of an OSM extract with its set of values")]
struct Cli {
    /// OSM XML extract to read
    osm_file: PathBuf,

    /// Output JSON file
    #[arg(short, long, default_value = "keywords.json")]
    output: PathBuf,
}

fn run(cli: Cli) -> Result<()> {
    let osm = extract::read_osm(&cli.osm_file)?;

    let mut keywords: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    let all_tags = osm
        .node
        .iter()
        .filter_map(|node| node.tag.as_ref())
        .chain(osm.way.iter().filter_map(|way| way.tag.as_ref()))
        .chain(osm.relation.iter().filter_map(|relation| relation.tag.as_ref()))
        .flatten();
    for tag in all_tags {
        keywords
            .entry(tag.k.clone())
            .or_default()
            .insert(tag.v.clone());
    }
    info!(
        "{} distinct keys across {} nodes, {} ways, {} relations",
        keywords.len(),
        osm.node.len(),
        osm.way.len(),
        osm.relation.len()
    );

    let file = File::create(&cli.output).map_err(|source| Error::Io {
        path: cli.output.clone(),
        source,
    })?;
    serde_json::to_writer_pretty(BufWriter::new(file), &keywords)?;
    info!("keywords written to {}", cli.output.display());
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    if let Err(err) = run(Cli::parse()) {
        error!("{err}");
        std::process::exit(1);
    }
}
