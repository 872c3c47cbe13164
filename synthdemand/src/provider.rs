//! Where the inputs come from. Fetching data (from files, remote APIs, a database) happens
//! behind these traits, before any customers are generated; the generation itself never does
//! I/O.

use geo::MultiPolygon;

use crate::{Area, LandUsePolygon, PopulationGrid, Result};

pub trait AreaProvider {
    /// Resolves a regkey, regkey prefix, or free-text name to exactly one area. Fails with
    /// `Error::InvalidAreaIdentifier` when nothing or more than one area matches.
    fn resolve(&self, identifier: &str) -> Result<Area>;
}

pub trait LandUseProvider {
    /// Land use near the boundary, already restricted to the eligible classes. This may include
    /// polygons that straddle or miss the boundary; the filters deal with those.
    fn land_use_near(&self, boundary: &MultiPolygon<f64>) -> Result<Vec<LandUsePolygon>>;
}

pub trait PopulationGridProvider {
    /// Population cells covering the boundary, clipped to it.
    fn grid_within(&self, boundary: &MultiPolygon<f64>) -> Result<PopulationGrid>;
}
