//! Generates synthetic customer locations from GeoJSON inputs.

#[macro_use]
extern crate log;

mod filter;
mod generate;

use anyhow::Result;
use structopt::StructOpt;

use abstutil::prettyprint_usize;
use synthdemand::source::AreaCatalog;
use synthdemand::{AreaProvider, Config};

#[derive(StructOpt)]
#[structopt(
    name = "synthdemand",
    about = "Places synthetic customers inside German administrative areas"
)]
enum Command {
    /// Print the daily demand of an area
    Demand {
        /// A GeoJSON file with every area's regkey, name, population and boundary
        #[structopt(long)]
        areas: String,
        /// A JSON file overriding the national constants
        #[structopt(long)]
        config: Option<String>,
        /// A regkey (like 09663) or part of an area's name
        #[structopt()]
        identifier: String,
    },
    /// Generate customers for an area and write them as GeoJSON points
    Generate {
        /// A GeoJSON file with every area's regkey, name, population and boundary
        #[structopt(long)]
        areas: String,
        /// A GeoJSON file with landuse and amenity polygons
        #[structopt(long)]
        land_use: String,
        /// A GeoJSON file with population grid cells
        #[structopt(long)]
        grid: String,
        /// Where to write the customers
        #[structopt(long)]
        output: String,
        /// A seed for generating random numbers
        #[structopt(long, default_value = "42")]
        rng_seed: u64,
        /// A JSON file with national constants and sampler settings. Anything missing keeps its
        /// default.
        #[structopt(long)]
        config: Option<String>,
        /// A regkey (like 09663) or part of an area's name
        #[structopt()]
        identifier: String,
    },
    /// Write the land use where an area's customers may appear, after removing everything
    /// outside the area and everything nested in something else
    Filter {
        /// A GeoJSON file with every area's regkey, name, population and boundary
        #[structopt(long)]
        areas: String,
        /// A GeoJSON file with landuse and amenity polygons
        #[structopt(long)]
        land_use: String,
        /// Where to write the filtered polygons
        #[structopt(long)]
        output: String,
        /// A regkey (like 09663) or part of an area's name
        #[structopt()]
        identifier: String,
    },
}

fn main() -> Result<()> {
    abstutil::logger::setup();

    match Command::from_args() {
        Command::Demand {
            areas,
            config,
            identifier,
        } => demand(areas, config, identifier),
        Command::Generate {
            areas,
            land_use,
            grid,
            output,
            rng_seed,
            config,
            identifier,
        } => generate::run(generate::Inputs {
            areas,
            land_use,
            grid,
            output,
            rng_seed,
            config,
            identifier,
        }),
        Command::Filter {
            areas,
            land_use,
            output,
            identifier,
        } => filter::run(areas, land_use, output, identifier),
    }
}

fn load_config(path: Option<String>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path),
        None => Ok(Config::default()),
    }
}

fn demand(areas: String, config: Option<String>, identifier: String) -> Result<()> {
    let config = load_config(config)?;
    let area = AreaCatalog::load(areas)?.resolve(&identifier)?;
    let demand = config.constants.daily_demand(area.population())?;
    println!(
        "{} ({}, population {}): {} customers per day",
        area,
        area.level(),
        prettyprint_usize(area.population() as usize),
        prettyprint_usize(demand)
    );
    Ok(())
}
