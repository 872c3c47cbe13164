use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;

use super::{feature_to_multipolygon, number_property, read_features, string_property};
use crate::provider::AreaProvider;
use crate::{AdminLevel, Area, AreaIdentifier, IdentifierError, Regkey};

/// Every known area with its boundary and authoritative population.
///
/// Features need `regkey`, `name` and `population` properties. `level` is optional and defaults
/// to the coarsest level the regkey can describe.
pub struct AreaCatalog {
    areas: Vec<Area>,
}

impl AreaCatalog {
    pub fn new(areas: Vec<Area>) -> AreaCatalog {
        AreaCatalog { areas }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<AreaCatalog> {
        let path = path.as_ref();
        let features = read_features(path)?;
        let total = features.len();
        let mut areas = Vec::new();
        for feature in features {
            let regkey: Option<Regkey> =
                string_property(&feature, "regkey").and_then(|x| x.parse().ok());
            let name = string_property(&feature, "name");
            let population = number_property(&feature, "population")
                .filter(|x| x.is_finite() && *x >= 0.0);
            let boundary = feature_to_multipolygon(&feature);
            if let (Some(regkey), Some(name), Some(population), Some(boundary)) =
                (regkey, name, population, boundary)
            {
                let level = match string_property(&feature, "level") {
                    Some(x) => match x.parse::<AdminLevel>() {
                        Ok(level) => level,
                        Err(err) => {
                            warn!("{} ({}): {}", name, regkey, err);
                            continue;
                        }
                    },
                    None => regkey.implied_level(),
                };
                areas.push(Area::new(
                    regkey,
                    name,
                    population.round() as u64,
                    level,
                    boundary,
                ));
            }
        }
        super::warn_skipped(
            path,
            total - areas.len(),
            "without a usable regkey, name, population or boundary",
        );
        info!(
            "Loaded {} areas from {}",
            abstutil::prettyprint_usize(areas.len()),
            path.display()
        );
        Ok(AreaCatalog::new(areas))
    }

    pub fn areas(&self) -> &[Area] {
        &self.areas
    }

    /// Resolves what somebody typed to one area.
    ///
    /// Regkeys match exactly. Since short keys are padded, one key often names several levels at
    /// once (a kreisfreie Stadt is also its only Gemeinde); the coarsest one wins. Names match
    /// case-insensitively as a substring. When that finds several areas, an exact name match
    /// settles it; otherwise the identifier is ambiguous.
    pub fn lookup(&self, identifier: &str) -> std::result::Result<&Area, IdentifierError> {
        match AreaIdentifier::parse(identifier)? {
            AreaIdentifier::Regkey(regkey) => coarsest_per_regkey(
                self.areas.iter().filter(|a| *a.regkey() == regkey),
            )
            .into_values()
            .next()
            .ok_or_else(|| IdentifierError::NotFound(identifier.trim().to_string())),
            AreaIdentifier::Name(name) => {
                let needle = name.to_lowercase();
                let matches = coarsest_per_regkey(
                    self.areas
                        .iter()
                        .filter(|a| a.name().to_lowercase().contains(&needle)),
                );
                if matches.len() <= 1 {
                    return matches
                        .into_values()
                        .next()
                        .ok_or(IdentifierError::NotFound(name));
                }

                let exact: Vec<&Area> = matches
                    .values()
                    .filter(|a| a.name().to_lowercase() == needle)
                    .cloned()
                    .collect();
                if exact.len() == 1 {
                    return Ok(exact[0]);
                }
                Err(IdentifierError::Ambiguous {
                    identifier: name,
                    candidates: matches.values().map(|a| a.to_string()).collect(),
                })
            }
        }
    }
}

impl AreaProvider for AreaCatalog {
    fn resolve(&self, identifier: &str) -> crate::Result<Area> {
        Ok(self.lookup(identifier)?.clone())
    }
}

/// One area per regkey, keeping the coarsest level. Ties go to whichever came first.
fn coarsest_per_regkey<'a, I: Iterator<Item = &'a Area>>(
    areas: I,
) -> BTreeMap<&'a Regkey, &'a Area> {
    let mut result: BTreeMap<&Regkey, &Area> = BTreeMap::new();
    for area in areas {
        let keep = result
            .get(area.regkey())
            .map(|existing| area.level() < existing.level())
            .unwrap_or(true);
        if keep {
            result.insert(area.regkey(), area);
        }
    }
    result
}
