use abstutil::prettyprint_usize;
use geo::{Area, Contains, MultiPolygon, Point, Rect};
use rand::Rng;

use crate::spatial::well_formed_bounds;

/// One tile of population statistics. Usually a fixed-size square in a metric projection, but
/// cells clipped at the area boundary can have any shape.
#[derive(Clone, Debug)]
pub struct GridCell {
    population: f64,
    geometry: MultiPolygon<f64>,
    bounds: Rect<f64>,
}

impl GridCell {
    /// None if the population isn't a non-negative number or the shape is degenerate.
    pub fn new<G: Into<MultiPolygon<f64>>>(population: f64, geometry: G) -> Option<GridCell> {
        if !(population.is_finite() && population >= 0.0) {
            return None;
        }
        let geometry = geometry.into();
        let bounds = well_formed_bounds(&geometry)?;
        if bounds.width() <= 0.0 || bounds.height() <= 0.0 || geometry.unsigned_area() <= 0.0 {
            return None;
        }
        Some(GridCell {
            population,
            geometry,
            bounds,
        })
    }

    pub fn population(&self) -> f64 {
        self.population
    }

    pub fn geometry(&self) -> &MultiPolygon<f64> {
        &self.geometry
    }

    /// Draws up to `count` points uniformly inside the cell. Points come from the bounding box
    /// and are rejected if they land outside the cell, which never happens for unclipped
    /// squares. Each point gets `max_attempts` tries, so a cell that's a sliver of its bounding
    /// box can return fewer points than asked for.
    pub fn sample_points<R: Rng>(
        &self,
        count: usize,
        max_attempts: usize,
        rng: &mut R,
    ) -> Vec<Point<f64>> {
        let min = self.bounds.min();
        let max = self.bounds.max();
        let mut points = Vec::with_capacity(count);
        for _ in 0..count {
            for _ in 0..max_attempts {
                let pt = Point::new(rng.gen_range(min.x..max.x), rng.gen_range(min.y..max.y));
                if self.geometry.contains(&pt) {
                    points.push(pt);
                    break;
                }
            }
        }
        points
    }
}

/// All of the population cells covering one area.
#[derive(Clone, Debug, Default)]
pub struct PopulationGrid {
    cells: Vec<GridCell>,
}

impl PopulationGrid {
    pub fn new(cells: Vec<GridCell>) -> PopulationGrid {
        PopulationGrid { cells }
    }

    /// Builds cells from raw (population, shape) pairs, skipping the unusable ones with a
    /// warning.
    pub fn from_raw<G: Into<MultiPolygon<f64>>>(raw: Vec<(f64, G)>) -> PopulationGrid {
        let total = raw.len();
        let cells: Vec<GridCell> = raw
            .into_iter()
            .filter_map(|(population, geometry)| GridCell::new(population, geometry))
            .collect();
        if cells.len() != total {
            warn!(
                "Skipped {} grid cells with a bad population or shape",
                prettyprint_usize(total - cells.len())
            );
        }
        PopulationGrid { cells }
    }

    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn total_population(&self) -> f64 {
        self.cells.iter().map(|c| c.population).sum()
    }

    /// Grid figures come from a different year than the authoritative area population, and
    /// clipping at the boundary changes them too. Rescale every cell so the total matches.
    ///
    /// None if nobody lives in any cell, since there's nothing to scale. Populations so tiny
    /// that the factor overflows count as nobody too.
    pub fn scaled_to(&self, population: u64) -> Option<PopulationGrid> {
        let total = self.total_population();
        if !(total.is_finite() && total > 0.0) {
            return None;
        }
        let factor = population as f64 / total;
        if !factor.is_finite() {
            return None;
        }
        debug!(
            "Scaling {} grid cells by {:.4} to reach a population of {}",
            prettyprint_usize(self.cells.len()),
            factor,
            prettyprint_usize(population as usize)
        );
        Some(PopulationGrid {
            cells: self
                .cells
                .iter()
                .map(|cell| GridCell {
                    population: cell.population * factor,
                    geometry: cell.geometry.clone(),
                    bounds: cell.bounds,
                })
                .collect(),
        })
    }
}
