use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Nationwide figures that turn an area's population into a number of customers. Demand is
/// assumed to be proportional to population, with every customer buying a single unit per day.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NationalConstants {
    /// Total population of the country, from the same census as the area populations
    pub population: u64,
    /// Units sold per year across the whole country
    pub annual_units: f64,
    pub days_per_year: f64,
}

impl Default for NationalConstants {
    fn default() -> NationalConstants {
        NationalConstants {
            // Zensus 2022
            population: 82_711_282,
            // Yearly pharmaceutical volume in Germany, 2023, in single packs
            annual_units: 1.388e9,
            days_per_year: 365.0,
        }
    }
}

impl NationalConstants {
    pub fn validate(&self) -> Result<()> {
        if self.population == 0 {
            return Err(Error::InvalidConstants(
                "the national population must be positive".to_string(),
            ));
        }
        if !(self.annual_units.is_finite() && self.annual_units >= 0.0) {
            return Err(Error::InvalidConstants(format!(
                "the annual volume must be a non-negative number, not {}",
                self.annual_units
            )));
        }
        if !(self.days_per_year.is_finite() && self.days_per_year > 0.0) {
            return Err(Error::InvalidConstants(format!(
                "days per year must be positive, not {}",
                self.days_per_year
            )));
        }
        Ok(())
    }

    /// The area's share of the national yearly volume.
    pub fn yearly_demand(&self, area_population: u64) -> Result<f64> {
        self.validate()?;
        Ok(area_population as f64 * self.annual_units / self.population as f64)
    }

    /// How many customers the area has per day: the yearly demand spread evenly over the year,
    /// rounded to the nearest whole customer. An unpopulated area simply has no customers.
    ///
    /// Always pass the authoritative population of the area, not the sum of its grid cells.
    pub fn daily_demand(&self, area_population: u64) -> Result<usize> {
        let yearly = self.yearly_demand(area_population)?;
        Ok((yearly / self.days_per_year).round() as usize)
    }
}
