use std::path::Path;

use anyhow::Result;
use geo::{BooleanOps, BoundingRect, Intersects, MultiPolygon, Relate};

use super::{bboxes_overlap, feature_to_multipolygon, number_property, read_features};
use crate::provider::PopulationGridProvider;
use crate::{GridCell, PopulationGrid};

/// Census grid cells (like the Zensus 100m or 1km grids) with a `population` property.
pub struct PopulationGridFile {
    cells: Vec<(f64, MultiPolygon<f64>)>,
}

impl PopulationGridFile {
    pub fn new(cells: Vec<(f64, MultiPolygon<f64>)>) -> PopulationGridFile {
        PopulationGridFile { cells }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<PopulationGridFile> {
        let path = path.as_ref();
        let features = read_features(path)?;
        let total = features.len();
        let cells: Vec<(f64, MultiPolygon<f64>)> = features
            .iter()
            .filter_map(|f| {
                Some((
                    number_property(f, "population")?,
                    feature_to_multipolygon(f)?,
                ))
            })
            .collect();
        super::warn_skipped(
            path,
            total - cells.len(),
            "without a numeric population and a polygon",
        );
        info!(
            "Loaded {} grid cells from {}",
            abstutil::prettyprint_usize(cells.len()),
            path.display()
        );
        Ok(PopulationGridFile::new(cells))
    }
}

impl PopulationGridProvider for PopulationGridFile {
    /// Cells entirely inside the boundary are kept as they are. Cells crossing it are clipped,
    /// but keep their whole population; rescaling to the area's population happens later anyway.
    fn grid_within(&self, boundary: &MultiPolygon<f64>) -> crate::Result<PopulationGrid> {
        let bounds = match boundary.bounding_rect() {
            Some(bounds) => bounds,
            None => return Ok(PopulationGrid::default()),
        };
        let mut clipped = 0;
        let mut raw = Vec::new();
        for (population, geometry) in &self.cells {
            if !bboxes_overlap(&bounds, geometry) || !boundary.intersects(geometry) {
                continue;
            }
            if boundary.relate(geometry).is_contains() {
                raw.push((*population, geometry.clone()));
            } else {
                clipped += 1;
                raw.push((*population, boundary.intersection(geometry)));
            }
        }
        debug!(
            "{} grid cells touch the boundary, {} of them clipped",
            abstutil::prettyprint_usize(raw.len()),
            abstutil::prettyprint_usize(clipped)
        );
        // Cells that only touch the boundary become empty here and get dropped
        Ok(PopulationGrid::new(
            raw.into_iter()
                .filter_map(|(population, geometry)| GridCell::new(population, geometry))
                .collect(),
        ))
    }
}
