//! Runs the whole pipeline over small GeoJSON inputs written to a temporary directory.

use std::path::Path;

use abstutil::Timer;
use rand::SeedableRng;
use rand_xorshift::XorShiftRng;
use serde_json::{json, Value};

use synthdemand::source::{AreaCatalog, LandUseFile, PopulationGridFile};
use synthdemand::{
    Config, CustomerSet, DemandSynthesizer, Error, IdentifierError, NationalConstants,
};

fn rect(x1: f64, y1: f64, x2: f64, y2: f64) -> Value {
    json!({
        "type": "Polygon",
        "coordinates": [[[x1, y1], [x2, y1], [x2, y2], [x1, y2], [x1, y1]]],
    })
}

fn write_collection(path: &Path, features: Vec<(Value, Value)>) {
    let features: Vec<Value> = features
        .into_iter()
        .map(|(properties, geometry)| {
            json!({ "type": "Feature", "properties": properties, "geometry": geometry })
        })
        .collect();
    let fc = json!({ "type": "FeatureCollection", "features": features });
    fs_err::write(path, serde_json::to_string_pretty(&fc).unwrap()).unwrap();
}

struct Inputs {
    _dir: tempfile::TempDir,
    areas: AreaCatalog,
    land_use: LandUseFile,
    grid: PopulationGridFile,
}

/// Musterstadt is three 100m grid cells in a row. The left 80m of every cell is residential.
/// Leerdorf has people, but no eligible land use.
fn inputs() -> Inputs {
    let dir = tempfile::tempdir().unwrap();

    let areas_path = dir.path().join("areas.geojson");
    write_collection(
        &areas_path,
        vec![
            (
                json!({"regkey": "09663", "name": "Musterstadt", "population": 130000, "level": "kreis"}),
                rect(0.0, 0.0, 300.0, 100.0),
            ),
            (
                json!({"regkey": "09679", "name": "Musterstadt-Land", "population": 160000}),
                rect(300.0, 0.0, 600.0, 100.0),
            ),
            (
                json!({"regkey": "096640000000", "name": "Leerdorf", "population": 5000}),
                rect(1000.0, 1000.0, 1100.0, 1100.0),
            ),
        ],
    );

    let land_use_path = dir.path().join("land_use.geojson");
    let mut land_use = Vec::new();
    for i in 0..3 {
        let x = 100.0 * i as f64;
        land_use.push((
            json!({"landuse": "residential"}),
            rect(x, 0.0, x + 80.0, 100.0),
        ));
    }
    // Nested inside the first strip, so it must not count twice
    land_use.push((json!({"amenity": "hospital"}), rect(10.0, 10.0, 30.0, 30.0)));
    // Crosses into the neighboring area, so it's dropped entirely
    land_use.push((
        json!({"landuse": "commercial"}),
        rect(290.0, 0.0, 350.0, 100.0),
    ));
    // Not eligible at all
    land_use.push((json!({"landuse": "forest"}), rect(80.0, 0.0, 100.0, 100.0)));
    write_collection(&land_use_path, land_use);

    let grid_path = dir.path().join("grid.geojson");
    write_collection(
        &grid_path,
        vec![
            (json!({"population": 70000}), rect(0.0, 0.0, 100.0, 100.0)),
            (json!({"population": 40000}), rect(100.0, 0.0, 200.0, 100.0)),
            (json!({"population": 20000}), rect(200.0, 0.0, 300.0, 100.0)),
            (json!({"population": 900}), rect(1000.0, 1000.0, 1100.0, 1100.0)),
        ],
    );

    Inputs {
        areas: AreaCatalog::load(&areas_path).unwrap(),
        land_use: LandUseFile::load(&land_use_path).unwrap(),
        grid: PopulationGridFile::load(&grid_path).unwrap(),
        _dir: dir,
    }
}

fn config() -> Config {
    Config {
        constants: NationalConstants {
            population: 84_300_000,
            annual_units: 1.288e9,
            days_per_year: 365.0,
        },
        ..Default::default()
    }
}

fn synthesizer(inputs: &Inputs) -> DemandSynthesizer {
    DemandSynthesizer {
        areas: &inputs.areas,
        land_use: &inputs.land_use,
        grid: &inputs.grid,
        config: config(),
    }
}

fn generate(synth: &DemandSynthesizer, identifier: &str, seed: u64) -> synthdemand::Result<CustomerSet> {
    let mut rng = XorShiftRng::seed_from_u64(seed);
    synth.customers_for(identifier, &mut rng, &mut Timer::throwaway())
}

#[test]
fn exact_count_inside_eligible_land() {
    let inputs = inputs();
    let synth = synthesizer(&inputs);
    let area = synth.resolve("Musterstadt").unwrap();
    let eligible = synth
        .eligible_area(&area, &mut Timer::throwaway())
        .unwrap();
    assert_eq!(eligible.polygons().len(), 3);

    let customers = generate(&synth, "09663", 42).unwrap();
    assert_eq!(customers.demand, 5442);
    assert_eq!(customers.len(), 5442);
    for pt in &customers.locations {
        assert!(eligible.contains(pt), "{:?} isn't on residential land", pt);
        // Nothing lands in the unclassified gaps between strips
        assert!(pt.x() % 100.0 < 80.0);
    }

    assert_eq!(customers.to_geojson().features.len(), 5442);
}

#[test]
fn follows_population_shares() {
    let inputs = inputs();
    let synth = synthesizer(&inputs);
    let mut counts = [0.0; 3];
    for seed in 1..=5 {
        for pt in generate(&synth, "Musterstadt", seed).unwrap().locations {
            counts[(pt.x() / 100.0).floor() as usize] += 1.0;
        }
    }

    let total: f64 = counts.iter().sum();
    assert_eq!(total, 5.0 * 5442.0);
    let shares = [70.0 / 130.0, 40.0 / 130.0, 20.0 / 130.0];
    let chi_square: f64 = counts
        .iter()
        .zip(shares.iter())
        .map(|(observed, share)| {
            let expected = share * total;
            (observed - expected).powi(2) / expected
        })
        .sum();
    // Critical value for 2 degrees of freedom at p = 0.001
    assert!(chi_square < 13.82, "chi-square of {} for {:?}", chi_square, counts);
}

#[test]
fn seeded_runs_repeat() {
    let inputs = inputs();
    let synth = synthesizer(&inputs);
    let first = generate(&synth, "09663", 7).unwrap();
    let second = generate(&synth, "09663", 7).unwrap();
    assert_eq!(first.locations, second.locations);
    assert_eq!(first.rounds, second.rounds);

    let other = generate(&synth, "09663", 8).unwrap();
    assert_ne!(first.locations, other.locations);
}

#[test]
fn no_eligible_land() {
    let inputs = inputs();
    let synth = synthesizer(&inputs);
    match generate(&synth, "leerdorf", 42) {
        Err(Error::NoEligibleArea { demand }) => assert_eq!(demand, 209),
        x => panic!("expected NoEligibleArea, got {:?}", x.map(|c| c.len())),
    }
}

#[test]
fn unresolvable_identifiers() {
    let inputs = inputs();
    let synth = synthesizer(&inputs);

    for input in ["Hamburg", "08111"] {
        assert!(matches!(
            synth.resolve(input),
            Err(Error::InvalidAreaIdentifier(IdentifierError::NotFound(_)))
        ));
    }
    assert!(matches!(
        synth.resolve("123"),
        Err(Error::InvalidAreaIdentifier(
            IdentifierError::MalformedRegkey { .. }
        ))
    ));
    match synth.resolve("stadt") {
        Err(Error::InvalidAreaIdentifier(IdentifierError::Ambiguous { candidates, .. })) => {
            assert_eq!(
                candidates,
                vec![
                    "Musterstadt (096630000000)".to_string(),
                    "Musterstadt-Land (096790000000)".to_string(),
                ]
            );
        }
        x => panic!("expected an ambiguous match, got {:?}", x.map(|a| a.to_string())),
    }
}
