use std::fmt;

use geo::MultiPolygon;
use serde::{Deserialize, Serialize};

/// The land-use and amenity classes where customers plausibly live or spend their day. Anything
/// else (water, forest, farmland, parking...) never receives customers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LandUseKind {
    Residential,
    Commercial,
    Industrial,
    Educational,
    Retail,
    Institutional,
    School,
    University,
    Hospital,
    Kindergarten,
    College,
}

impl LandUseKind {
    pub fn all() -> Vec<LandUseKind> {
        vec![
            LandUseKind::Residential,
            LandUseKind::Commercial,
            LandUseKind::Industrial,
            LandUseKind::Educational,
            LandUseKind::Retail,
            LandUseKind::Institutional,
            LandUseKind::School,
            LandUseKind::University,
            LandUseKind::Hospital,
            LandUseKind::Kindergarten,
            LandUseKind::College,
        ]
    }

    /// Classify from OSM-style tags. `landuse` wins over `amenity` when both are present and
    /// allowed. None means the polygon isn't eligible.
    pub fn classify(landuse: Option<&str>, amenity: Option<&str>) -> Option<LandUseKind> {
        let from_landuse = landuse.and_then(|value| match value {
            "residential" => Some(LandUseKind::Residential),
            "commercial" => Some(LandUseKind::Commercial),
            "industrial" => Some(LandUseKind::Industrial),
            "education" | "educational" => Some(LandUseKind::Educational),
            "retail" => Some(LandUseKind::Retail),
            "institutional" => Some(LandUseKind::Institutional),
            _ => None,
        });
        from_landuse.or_else(|| {
            amenity.and_then(|value| match value {
                "school" => Some(LandUseKind::School),
                "university" => Some(LandUseKind::University),
                "hospital" => Some(LandUseKind::Hospital),
                "kindergarten" => Some(LandUseKind::Kindergarten),
                "college" => Some(LandUseKind::College),
                _ => None,
            })
        })
    }

    pub fn tag_value(self) -> &'static str {
        match self {
            LandUseKind::Residential => "residential",
            LandUseKind::Commercial => "commercial",
            LandUseKind::Industrial => "industrial",
            LandUseKind::Educational => "educational",
            LandUseKind::Retail => "retail",
            LandUseKind::Institutional => "institutional",
            LandUseKind::School => "school",
            LandUseKind::University => "university",
            LandUseKind::Hospital => "hospital",
            LandUseKind::Kindergarten => "kindergarten",
            LandUseKind::College => "college",
        }
    }

    /// Which tag key this class is read from.
    pub fn tag_key(self) -> &'static str {
        match self {
            LandUseKind::School
            | LandUseKind::University
            | LandUseKind::Hospital
            | LandUseKind::Kindergarten
            | LandUseKind::College => "amenity",
            _ => "landuse",
        }
    }
}

impl fmt::Display for LandUseKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}={}", self.tag_key(), self.tag_value())
    }
}

/// One classified land-use or amenity polygon.
#[derive(Clone, Debug, PartialEq)]
pub struct LandUsePolygon {
    pub kind: LandUseKind,
    pub name: Option<String>,
    pub geometry: MultiPolygon<f64>,
}

impl LandUsePolygon {
    pub fn new<G: Into<MultiPolygon<f64>>>(kind: LandUseKind, geometry: G) -> LandUsePolygon {
        LandUsePolygon {
            kind,
            name: None,
            geometry: geometry.into(),
        }
    }
}

/// Anything with an area on the map. The filters only care about the shape, so they work on
/// tagged land use and on bare multipolygons alike.
pub trait Footprint {
    fn footprint(&self) -> &MultiPolygon<f64>;
}

impl Footprint for LandUsePolygon {
    fn footprint(&self) -> &MultiPolygon<f64> {
        &self.geometry
    }
}

impl Footprint for MultiPolygon<f64> {
    fn footprint(&self) -> &MultiPolygon<f64> {
        self
    }
}
