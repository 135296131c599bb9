//! One-shot bus-line pipeline: extract entities from an OSM XML extract
//! (or reload them from the JSON cache), reconstruct the bus lines inside
//! the selection box, and render them onto an interactive map document.

use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use env_logger::Env;
use log::{error, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use osm_busway::extract::{self, ExtractOptions};
use osm_busway::render::MapDocument;
use osm_busway::select::{self, BoundingBox};
use osm_busway::{cache, Result};

#[derive(Parser)]
#[command(name = "osm-busway")]
#[command(about = "Extract bus lines from an OSM extract and render them on an interactive map")]
struct Cli {
    /// OSM XML extract to read
    osm_file: PathBuf,

    /// Entity cache, built on the first run and trusted afterwards
    #[arg(long, default_value = "busway.json")]
    cache: PathBuf,

    /// Map center longitude
    #[arg(long, default_value_t = 120.1417)]
    lon: f64,

    /// Map center latitude
    #[arg(long, default_value_t = 30.2458)]
    lat: f64,

    /// Side length of the selection box, in degrees
    #[arg(long, default_value_t = 0.05)]
    region_size: f64,

    /// Keep at most this many bus lines, sampled at random; 0 keeps all
    #[arg(long, default_value_t = 10)]
    max_lines: usize,

    /// Seed for the bus-line sample; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Rendered map document
    #[arg(short, long, default_value = "map.html")]
    output: PathBuf,

    /// Label of the fixed marker at the map center
    #[arg(long, default_value = "west lake")]
    center_label: String,

    /// Skip nodes during extraction
    #[arg(long)]
    no_nodes: bool,

    /// Skip ways during extraction
    #[arg(long)]
    no_ways: bool,

    /// Skip relations during extraction
    #[arg(long)]
    no_relations: bool,
}

fn run(cli: Cli) -> Result<()> {
    let options = ExtractOptions {
        nodes: !cli.no_nodes,
        ways: !cli.no_ways,
        relations: !cli.no_relations,
        all_nodes: false,
    };

    let start = Instant::now();
    let entities = cache::load_or_build(&cli.cache, || {
        extract::extract_entities(&cli.osm_file, &options)
    })?;
    info!("{} entities ready in {:?}", entities.len(), start.elapsed());

    let bbox = BoundingBox::around(cli.lon, cli.lat, cli.region_size);
    let max_lines = (cli.max_lines > 0).then_some(cli.max_lines);
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let lines = select::select_bus_lines(&entities, &bbox, max_lines, &mut rng)?;
    info!("selected {} bus lines in {:?}", lines.len(), bbox);

    let mut document = MapDocument::new(cli.lon, cli.lat);
    document.add_bus_lines(&lines);
    document.add_center_marker(&cli.center_label);
    document.write(&cli.output)?;
    info!("map written to {}", cli.output.display());
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    if let Err(err) = run(Cli::parse()) {
        error!("{err}");
        std::process::exit(1);
    }
}
