use std::path::Path;

use anyhow::Result;
use geo::{BoundingRect, MultiPolygon};
use geojson::Feature;

use super::{bboxes_overlap, feature_to_multipolygon, read_features};
use crate::provider::LandUseProvider;
use crate::{LandUseKind, LandUsePolygon};

/// Land-use and amenity polygons, for example exported from OSM with osmium or Overpass.
///
/// Tags are read from the feature's properties directly, or from a nested `tags` object.
/// Features that don't classify as any `LandUseKind` are dropped while loading.
pub struct LandUseFile {
    polygons: Vec<LandUsePolygon>,
}

impl LandUseFile {
    pub fn new(polygons: Vec<LandUsePolygon>) -> LandUseFile {
        LandUseFile { polygons }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<LandUseFile> {
        let path = path.as_ref();
        let features = read_features(path)?;
        let mut polygons = Vec::new();
        let mut unclassified = 0;
        let mut bad_geometry = 0;
        for feature in features {
            let kind = match LandUseKind::classify(
                tag(&feature, "landuse").as_deref(),
                tag(&feature, "amenity").as_deref(),
            ) {
                Some(kind) => kind,
                None => {
                    unclassified += 1;
                    continue;
                }
            };
            match feature_to_multipolygon(&feature) {
                Some(geometry) => polygons.push(LandUsePolygon {
                    kind,
                    name: tag(&feature, "name"),
                    geometry,
                }),
                None => {
                    bad_geometry += 1;
                }
            }
        }
        if unclassified > 0 {
            debug!(
                "Ignoring {} features in {} that aren't eligible land use",
                abstutil::prettyprint_usize(unclassified),
                path.display()
            );
        }
        super::warn_skipped(path, bad_geometry, "without a polygon geometry");
        info!(
            "Loaded {} land-use polygons from {}",
            abstutil::prettyprint_usize(polygons.len()),
            path.display()
        );
        Ok(LandUseFile::new(polygons))
    }

    pub fn polygons(&self) -> &[LandUsePolygon] {
        &self.polygons
    }
}

impl LandUseProvider for LandUseFile {
    fn land_use_near(&self, boundary: &MultiPolygon<f64>) -> crate::Result<Vec<LandUsePolygon>> {
        let bounds = match boundary.bounding_rect() {
            Some(bounds) => bounds,
            None => return Ok(Vec::new()),
        };
        Ok(self
            .polygons
            .iter()
            .filter(|p| bboxes_overlap(&bounds, &p.geometry))
            .cloned()
            .collect())
    }
}

fn tag(feature: &Feature, key: &str) -> Option<String> {
    let value = feature.property(key).or_else(|| {
        feature
            .property("tags")
            .and_then(|tags| tags.as_object())
            .and_then(|tags| tags.get(key))
    })?;
    value.as_str().map(|x| x.to_string())
}
