//! Flat-selection variant of the pipeline: place one classified marker per
//! tagged entity inside the selection box, without bus-line reconstruction.

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use env_logger::Env;
use log::{error, info};

use osm_busway::extract::{self, ExtractOptions};
use osm_busway::render::MapDocument;
use osm_busway::select::{self, BoundingBox};
use osm_busway::{cache, Result};

#[derive(Parser)]
#[command(name = "render-stops")]
#[command(about = "Render tagged OSM entities inside a bounding box as classified map markers")]
struct Cli {
    /// OSM XML extract to read
    osm_file: PathBuf,

    /// Entity cache, built on the first run and trusted afterwards
    #[arg(long, default_value = "stops.json")]
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

    /// Keep only entities carrying at least one of these tag keys
    #[arg(long = "tag")]
    tags: Vec<String>,

    /// Keep at most this many markers, in input order; 0 keeps all
    #[arg(long, default_value_t = 0)]
    max_markers: usize,

    /// Extract every node, not only bus stops
    #[arg(long)]
    all_nodes: bool,

    /// Rendered map document
    #[arg(short, long, default_value = "map.html")]
    output: PathBuf,

    /// Label of the fixed marker at the map center
    #[arg(long, default_value = "west lake")]
    center_label: String,
}

fn run(cli: Cli) -> Result<()> {
    let options = ExtractOptions {
        all_nodes: cli.all_nodes,
        ..ExtractOptions::default()
    };

    let start = Instant::now();
    let entities = cache::load_or_build(&cli.cache, || {
        extract::extract_entities(&cli.osm_file, &options)
    })?;
    info!("{} entities ready in {:?}", entities.len(), start.elapsed());

    let bbox = BoundingBox::around(cli.lon, cli.lat, cli.region_size);
    let tag_filter: Option<HashSet<String>> =
        (!cli.tags.is_empty()).then(|| cli.tags.iter().cloned().collect());
    let max_markers = (cli.max_markers > 0).then_some(cli.max_markers);
    let selected = select::select(&entities, Some(&bbox), tag_filter.as_ref(), max_markers);
    info!("selected {} entities in {:?}", selected.len(), bbox);

    let mut document = MapDocument::new(cli.lon, cli.lat);
    document.add_entities(&selected);
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
