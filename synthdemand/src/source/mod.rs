//! Providers backed by GeoJSON files, for running without any external services. All three read
//! a whole FeatureCollection up front. A feature that can't be understood is skipped with a
//! warning; a file that can't be read or parsed at all is an error.

mod areas;
mod grid;
mod land_use;

use std::path::Path;

use anyhow::{bail, Context, Result};
use geo::{BoundingRect, Geometry, Intersects, MultiPolygon, Rect};
use geojson::{Feature, GeoJson};

pub use self::areas::AreaCatalog;
pub use self::grid::PopulationGridFile;
pub use self::land_use::LandUseFile;

fn read_features<P: AsRef<Path>>(path: P) -> Result<Vec<Feature>> {
    let path = path.as_ref();
    let raw = fs_err::read_to_string(path)?;
    let gj: GeoJson = raw
        .parse()
        .with_context(|| format!("parsing {}", path.display()))?;
    match gj {
        GeoJson::FeatureCollection(fc) => Ok(fc.features),
        _ => bail!("{} isn't a FeatureCollection", path.display()),
    }
}

/// Polygons and multipolygons only. Everything else (including a missing geometry) is None.
fn feature_to_multipolygon(feature: &Feature) -> Option<MultiPolygon<f64>> {
    let geometry = feature.geometry.as_ref()?;
    match Geometry::<f64>::try_from(geometry.value.clone()).ok()? {
        Geometry::Polygon(p) => Some(p.into()),
        Geometry::MultiPolygon(mp) => Some(mp),
        _ => None,
    }
}

/// Accepts strings and numbers, since regkeys in particular show up both ways.
fn string_property(feature: &Feature, key: &str) -> Option<String> {
    match feature.property(key)? {
        serde_json::Value::String(x) => Some(x.clone()),
        serde_json::Value::Number(x) => Some(x.to_string()),
        _ => None,
    }
}

fn number_property(feature: &Feature, key: &str) -> Option<f64> {
    match feature.property(key)? {
        serde_json::Value::Number(x) => x.as_f64(),
        serde_json::Value::String(x) => x.trim().parse().ok(),
        _ => None,
    }
}

fn bboxes_overlap(a: &Rect<f64>, b: &MultiPolygon<f64>) -> bool {
    match b.bounding_rect() {
        Some(b) => a.intersects(&b),
        None => false,
    }
}

fn warn_skipped(path: &Path, skipped: usize, what: &str) {
    if skipped > 0 {
        warn!(
            "Skipped {} features in {} {}",
            abstutil::prettyprint_usize(skipped),
            path.display(),
            what
        );
    }
}
