use std::fmt;
use std::str::FromStr;

use geo::MultiPolygon;
use serde::{Deserialize, Serialize};

use crate::Regkey;

/// Administrative levels, ordered from the coarsest to the finest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdminLevel {
    Staat,
    #[serde(alias = "bundesland")]
    Land,
    Kreis,
    Gemeinde,
}

impl FromStr for AdminLevel {
    type Err = anyhow::Error;

    fn from_str(x: &str) -> anyhow::Result<AdminLevel> {
        match x.to_lowercase().as_ref() {
            "staat" => Ok(AdminLevel::Staat),
            "land" | "bundesland" => Ok(AdminLevel::Land),
            "kreis" => Ok(AdminLevel::Kreis),
            "gemeinde" => Ok(AdminLevel::Gemeinde),
            _ => anyhow::bail!("unknown administrative level {}", x),
        }
    }
}

impl fmt::Display for AdminLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            AdminLevel::Staat => "staat",
            AdminLevel::Land => "land",
            AdminLevel::Kreis => "kreis",
            AdminLevel::Gemeinde => "gemeinde",
        };
        write!(f, "{}", name)
    }
}

/// A resolved administrative area. Never changes once built; to look at a different area,
/// resolve a new one.
#[derive(Clone, Debug, PartialEq)]
pub struct Area {
    regkey: Regkey,
    name: String,
    population: u64,
    level: AdminLevel,
    boundary: MultiPolygon<f64>,
}

impl Area {
    pub fn new(
        regkey: Regkey,
        name: String,
        population: u64,
        level: AdminLevel,
        boundary: MultiPolygon<f64>,
    ) -> Area {
        Area {
            regkey,
            name,
            population,
            level,
            boundary,
        }
    }

    pub fn regkey(&self) -> &Regkey {
        &self.regkey
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The authoritative population. Prefer this over summing grid cells, which come from a
    /// different year and get clipped at the boundary.
    pub fn population(&self) -> u64 {
        self.population
    }

    pub fn level(&self) -> AdminLevel {
        self.level
    }

    pub fn boundary(&self) -> &MultiPolygon<f64> {
        &self.boundary
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.regkey)
    }
}
