use anyhow::{Context, Result};
use geojson::{Feature, FeatureCollection};
use serde_json::{Map, Value};

use abstutil::Timer;
use synthdemand::source::{AreaCatalog, LandUseFile};
use synthdemand::{AreaProvider, LandUseProvider, LandUsePolygon};

pub fn run(areas: String, land_use: String, output: String, identifier: String) -> Result<()> {
    let mut timer = Timer::new(format!("filter land use for {}", identifier));
    let area = AreaCatalog::load(areas)?.resolve(&identifier)?;
    let land_use = LandUseFile::load(land_use)?;

    timer.start("filter");
    let eligible = synthdemand::EligibleArea::build(
        area.boundary(),
        land_use.land_use_near(area.boundary())?,
    );
    timer.stop("filter");

    let fc = FeatureCollection {
        bbox: None,
        features: eligible.polygons().iter().map(to_feature).collect(),
        foreign_members: None,
    };
    abstutil::write_json(&output, &fc).with_context(|| format!("writing {}", output))?;
    info!(
        "Wrote {} polygons covering {:.0} square units to {}",
        fc.features.len(),
        eligible.total_area(),
        output
    );
    Ok(())
}

fn to_feature(polygon: &LandUsePolygon) -> Feature {
    let mut properties = Map::new();
    properties.insert(
        polygon.kind.tag_key().to_string(),
        Value::String(polygon.kind.tag_value().to_string()),
    );
    if let Some(ref name) = polygon.name {
        properties.insert("name".to_string(), Value::String(name.clone()));
    }
    Feature {
        bbox: None,
        geometry: Some(geojson::Geometry::new(geojson::Value::from(&polygon.geometry))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}
