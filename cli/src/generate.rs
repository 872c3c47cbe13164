use anyhow::{Context, Result};
use rand::SeedableRng;
use rand_xorshift::XorShiftRng;

use abstutil::{prettyprint_usize, Timer};
use synthdemand::source::{AreaCatalog, LandUseFile, PopulationGridFile};
use synthdemand::DemandSynthesizer;

pub struct Inputs {
    pub areas: String,
    pub land_use: String,
    pub grid: String,
    pub output: String,
    pub rng_seed: u64,
    pub config: Option<String>,
    pub identifier: String,
}

pub fn run(inputs: Inputs) -> Result<()> {
    let mut timer = Timer::new(format!("generate customers for {}", inputs.identifier));
    let config = crate::load_config(inputs.config)?;

    timer.start("load inputs");
    let areas = AreaCatalog::load(&inputs.areas)?;
    let land_use = LandUseFile::load(&inputs.land_use)?;
    let grid = PopulationGridFile::load(&inputs.grid)?;
    timer.stop("load inputs");

    let synth = DemandSynthesizer {
        areas: &areas,
        land_use: &land_use,
        grid: &grid,
        config,
    };
    let mut rng = XorShiftRng::seed_from_u64(inputs.rng_seed);
    let customers = synth.customers_for(&inputs.identifier, &mut rng, &mut timer)?;
    timer.note(format!(
        "{} customers after {} rounds",
        prettyprint_usize(customers.len()),
        customers.rounds
    ));

    abstutil::write_json(&inputs.output, &customers.to_geojson())
        .with_context(|| format!("writing {}", inputs.output))?;
    info!("Wrote {}", inputs.output);
    Ok(())
}
