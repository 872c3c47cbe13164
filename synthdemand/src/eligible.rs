use geo::{Area, Contains, MultiPolygon, Point};

use crate::filter::{remove_enclosed, remove_out_of_bounds};
use crate::spatial::{well_formed_bounds, BoundsIndex};
use crate::LandUsePolygon;

/// Anything smaller than this (in squared units of the projection) can't hold customers.
const NEGLIGIBLE_AREA: f64 = 1e-9;

/// The places customers can appear: classified land use, entirely inside the area, with nothing
/// nested inside anything else. Point lookups go through a spatial index, so the union of all
/// polygons is never materialized.
pub struct EligibleArea {
    polygons: Vec<LandUsePolygon>,
    index: BoundsIndex,
    total_area: f64,
}

impl EligibleArea {
    /// Runs both filters over raw land use for an area.
    pub fn build(boundary: &MultiPolygon<f64>, land_use: Vec<LandUsePolygon>) -> EligibleArea {
        EligibleArea::new(remove_enclosed(remove_out_of_bounds(boundary, land_use)))
    }

    /// Trusts that the polygons are already filtered.
    pub fn new(polygons: Vec<LandUsePolygon>) -> EligibleArea {
        let index = BoundsIndex::new(
            polygons
                .iter()
                .enumerate()
                .filter_map(|(idx, p)| well_formed_bounds(&p.geometry).map(|b| (idx, b))),
        );
        let total_area = polygons.iter().map(|p| p.geometry.unsigned_area()).sum();
        EligibleArea {
            polygons,
            index,
            total_area,
        }
    }

    pub fn polygons(&self) -> &[LandUsePolygon] {
        &self.polygons
    }

    /// The summed area of all polygons. Overlapping parts count twice.
    pub fn total_area(&self) -> f64 {
        self.total_area
    }

    /// True when there's effectively nowhere to put customers.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty() || self.total_area <= NEGLIGIBLE_AREA
    }

    /// Is the point strictly inside at least one polygon?
    pub fn contains(&self, pt: &Point<f64>) -> bool {
        self.index
            .query_point(pt)
            .any(|idx| self.polygons[idx].geometry.contains(pt))
    }
}
