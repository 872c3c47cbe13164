use abstutil::{prettyprint_usize, Timer};
use geo::Point;
use geojson::{Feature, FeatureCollection};
use rand::Rng;

use crate::provider::{AreaProvider, LandUseProvider, PopulationGridProvider};
use crate::{Area, Config, EligibleArea, Error, PopulationGrid, Regkey, Result};

/// The synthetic customers of one area for one day. There's nothing to update here; when the
/// area or its inputs change, generate a new set.
#[derive(Clone, Debug)]
pub struct CustomerSet {
    pub regkey: Regkey,
    /// How many customers the area should have
    pub demand: usize,
    pub locations: Vec<Point<f64>>,
    /// How many sampling rounds it took
    pub rounds: usize,
}

impl CustomerSet {
    /// Computes the area's daily demand, then places exactly that many customers inside the
    /// eligible area, distributed like the population. The grid doesn't have to be scaled yet.
    pub fn generate<R: Rng>(
        area: &Area,
        eligible: &EligibleArea,
        grid: &PopulationGrid,
        config: &Config,
        rng: &mut R,
    ) -> Result<CustomerSet> {
        let demand = config.constants.daily_demand(area.population())?;
        info!(
            "{} has a population of {}, so a daily demand of {}",
            area,
            prettyprint_usize(area.population() as usize),
            prettyprint_usize(demand)
        );
        if demand == 0 {
            return Ok(CustomerSet {
                regkey: area.regkey().clone(),
                demand,
                locations: Vec::new(),
                rounds: 0,
            });
        }

        if eligible.is_empty() {
            return Err(Error::NoEligibleArea { demand });
        }
        let scaled = grid
            .scaled_to(area.population())
            .ok_or(Error::NoPopulatedCells { demand })?;
        let report = config.sampler.sample(&scaled, eligible, demand, rng)?;
        Ok(CustomerSet {
            regkey: area.regkey().clone(),
            demand,
            locations: report.points,
            rounds: report.rounds,
        })
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// One Point feature per customer, in the coordinate system of the inputs.
    pub fn to_geojson(&self) -> FeatureCollection {
        let features = self
            .locations
            .iter()
            .map(|pt| Feature {
                bbox: None,
                geometry: Some(geojson::Geometry::new(geojson::Value::from(pt))),
                id: None,
                properties: None,
                foreign_members: None,
            })
            .collect();
        FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }
    }
}

/// Runs the whole pipeline for one area at a time: resolve it, fetch its inputs, filter the land
/// use, and generate customers.
pub struct DemandSynthesizer<'a> {
    pub areas: &'a dyn AreaProvider,
    pub land_use: &'a dyn LandUseProvider,
    pub grid: &'a dyn PopulationGridProvider,
    pub config: Config,
}

impl<'a> DemandSynthesizer<'a> {
    pub fn resolve(&self, identifier: &str) -> Result<Area> {
        self.areas.resolve(identifier)
    }

    /// The land use where customers of this area may appear.
    pub fn eligible_area(&self, area: &Area, timer: &mut Timer) -> Result<EligibleArea> {
        timer.start("fetch land use");
        let land_use = self.land_use.land_use_near(area.boundary())?;
        timer.stop("fetch land use");

        timer.start("filter land use");
        let eligible = EligibleArea::build(area.boundary(), land_use);
        timer.stop("filter land use");
        Ok(eligible)
    }

    pub fn customers_for<R: Rng>(
        &self,
        identifier: &str,
        rng: &mut R,
        timer: &mut Timer,
    ) -> Result<CustomerSet> {
        let area = self.resolve(identifier)?;
        let eligible = self.eligible_area(&area, timer)?;

        timer.start("fetch population grid");
        let grid = self.grid.grid_within(area.boundary())?;
        timer.stop("fetch population grid");

        timer.start("sample customers");
        let customers = CustomerSet::generate(&area, &eligible, &grid, &self.config, rng)?;
        timer.stop("sample customers");
        Ok(customers)
    }
}
