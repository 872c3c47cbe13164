use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::{NationalConstants, PopulationWeightedSampler};

/// Everything tunable about generating customers. Any field missing from a config file keeps its
/// default, so `{}` is a valid config.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub constants: NationalConstants,
    pub sampler: PopulationWeightedSampler,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Config> {
        let config: Config = abstutil::read_json(path)?;
        config.constants.validate()?;
        Ok(config)
    }
}
