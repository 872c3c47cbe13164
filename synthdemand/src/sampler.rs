//! Places an exact number of customers, following population density, but only where the land
//! use makes sense.
//!
//! How many points a cell loses to the eligibility test isn't known in advance, and fractional
//! population shares never divide evenly into whole customers. So sampling happens in rounds.
//! Each round spreads the current shortfall over the cells by population share, rounds every
//! cell's fractional part up or down with a coin flip weighted by that fraction, draws the points
//! and throws away the ineligible ones. Targeting the shortfall (not the original total) means
//! every round is expected to make progress. The weighted coin flip keeps the long-run allocation
//! unbiased, where always rounding down or up wouldn't.

use abstutil::prettyprint_usize;
use geo::Point;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{EligibleArea, Error, PopulationGrid, Result};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationWeightedSampler {
    /// Give up after this many rounds. Inputs where almost nothing is eligible would otherwise
    /// run forever.
    pub max_rounds: usize,
    /// How many draws each point gets to land inside its (possibly clipped) cell
    pub max_point_attempts: usize,
}

impl Default for PopulationWeightedSampler {
    fn default() -> PopulationWeightedSampler {
        PopulationWeightedSampler {
            max_rounds: 1000,
            max_point_attempts: 1000,
        }
    }
}

/// The result of sampling.
#[derive(Clone, Debug)]
pub struct SampleReport {
    pub points: Vec<Point<f64>>,
    pub rounds: usize,
    /// How many surplus points the last round produced and were randomly thrown away
    pub downsampled: usize,
}

impl PopulationWeightedSampler {
    /// Returns exactly `target` points, all inside `eligible`. The grid should already be scaled
    /// to the area's authoritative population (see `PopulationGrid::scaled_to`).
    pub fn sample<R: Rng>(
        &self,
        grid: &PopulationGrid,
        eligible: &EligibleArea,
        target: usize,
        rng: &mut R,
    ) -> Result<SampleReport> {
        if target == 0 {
            return Ok(SampleReport {
                points: Vec::new(),
                rounds: 0,
                downsampled: 0,
            });
        }
        if eligible.is_empty() {
            return Err(Error::NoEligibleArea { demand: target });
        }
        let total_population = grid.total_population();
        if !(total_population.is_finite() && total_population > 0.0) {
            return Err(Error::NoPopulatedCells { demand: target });
        }

        let mut points: Vec<Point<f64>> = Vec::with_capacity(target);
        let mut rounds = 0;
        while points.len() < target {
            if rounds == self.max_rounds {
                return Err(Error::SamplingNonConvergence {
                    target,
                    produced: points.len(),
                    rounds,
                });
            }
            rounds += 1;

            let remaining = target - points.len();
            let mut drawn = 0;
            let mut accepted = 0;
            for cell in grid.cells() {
                let expected = cell.population() / total_population * (remaining as f64);
                if !expected.is_finite() {
                    continue;
                }
                let whole = expected.floor();
                let mut count = whole as usize;
                if rng.gen_bool((expected - whole).clamp(0.0, 1.0)) {
                    count += 1;
                }
                if count == 0 {
                    continue;
                }

                for pt in cell.sample_points(count, self.max_point_attempts, rng) {
                    drawn += 1;
                    if eligible.contains(&pt) {
                        points.push(pt);
                        accepted += 1;
                    }
                }
            }
            debug!(
                "Round {}: needed {}, drew {}, kept {}",
                rounds,
                prettyprint_usize(remaining),
                prettyprint_usize(drawn),
                prettyprint_usize(accepted)
            );
        }

        let downsampled = points.len() - target;
        if downsampled > 0 {
            debug!("Overshot by {}, downsampling", prettyprint_usize(downsampled));
            points = downsample(points, target, rng);
        }

        info!(
            "Placed {} customers in {} rounds",
            prettyprint_usize(points.len()),
            rounds
        );
        Ok(SampleReport {
            points,
            rounds,
            downsampled,
        })
    }
}

/// Uniformly picks `target` of the points, without replacement.
fn downsample<R: Rng>(points: Vec<Point<f64>>, target: usize, rng: &mut R) -> Vec<Point<f64>> {
    points.choose_multiple(rng, target).cloned().collect()
}

#[cfg(test)]
mod tests {
    use geo::{polygon, MultiPolygon};
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    use super::*;
    use crate::{LandUseKind, LandUsePolygon};

    fn square(x1: f64, y1: f64, x2: f64, y2: f64) -> MultiPolygon<f64> {
        polygon![(x: x1, y: y1), (x: x2, y: y1), (x: x2, y: y2), (x: x1, y: y2)].into()
    }

    /// Three 100m cells in a row with the given populations
    fn grid(populations: [f64; 3]) -> PopulationGrid {
        PopulationGrid::from_raw(
            populations
                .iter()
                .enumerate()
                .map(|(i, pop)| {
                    let x = 100.0 * i as f64;
                    (*pop, square(x, 0.0, x + 100.0, 100.0))
                })
                .collect(),
        )
    }

    /// Covers the left `pct` of every cell
    fn eligible_strips(pct: f64) -> EligibleArea {
        EligibleArea::new(
            (0..3)
                .map(|i| {
                    let x = 100.0 * i as f64;
                    LandUsePolygon::new(
                        LandUseKind::Residential,
                        square(x, 0.0, x + pct, 100.0),
                    )
                })
                .collect(),
        )
    }

    #[test]
    fn exact_count_and_containment() {
        let grid = grid([70.0, 40.0, 20.0]);
        let eligible = eligible_strips(80.0);
        let sampler = PopulationWeightedSampler::default();
        for (seed, target) in [(1, 1), (2, 7), (3, 100), (4, 999), (5, 5442)] {
            let mut rng = XorShiftRng::seed_from_u64(seed);
            let report = sampler.sample(&grid, &eligible, target, &mut rng).unwrap();
            assert_eq!(report.points.len(), target);
            assert!(report.points.iter().all(|pt| eligible.contains(pt)));
            assert!(report.rounds >= 1);
        }
    }

    #[test]
    fn nothing_requested() {
        let mut rng = XorShiftRng::seed_from_u64(42);
        // Even with unusable inputs, no rounds run
        let report = PopulationWeightedSampler::default()
            .sample(
                &PopulationGrid::default(),
                &EligibleArea::new(Vec::new()),
                0,
                &mut rng,
            )
            .unwrap();
        assert!(report.points.is_empty());
        assert_eq!(report.rounds, 0);
    }

    #[test]
    fn nowhere_eligible() {
        let mut rng = XorShiftRng::seed_from_u64(42);
        let result = PopulationWeightedSampler::default().sample(
            &grid([1.0, 1.0, 1.0]),
            &EligibleArea::new(Vec::new()),
            10,
            &mut rng,
        );
        assert!(matches!(result, Err(Error::NoEligibleArea { demand: 10 })));
    }

    #[test]
    fn nobody_lives_anywhere() {
        let mut rng = XorShiftRng::seed_from_u64(42);
        let result = PopulationWeightedSampler::default().sample(
            &grid([0.0, 0.0, 0.0]),
            &eligible_strips(80.0),
            10,
            &mut rng,
        );
        assert!(matches!(result, Err(Error::NoPopulatedCells { demand: 10 })));
    }

    #[test]
    fn overflowing_population() {
        let mut rng = XorShiftRng::seed_from_u64(42);
        // Every cell is fine, but the total isn't a number anymore
        let result = PopulationWeightedSampler::default().sample(
            &grid([1e308, 1e308, 1e308]),
            &eligible_strips(80.0),
            10,
            &mut rng,
        );
        assert!(matches!(result, Err(Error::NoPopulatedCells { demand: 10 })));
    }

    #[test]
    fn overshoot_is_trimmed() {
        // Ten equal, fully eligible cells and a target of 5: each cell expects half a point, so
        // the first round draws anywhere from 0 to 10 points and often too many.
        let cells: Vec<(f64, MultiPolygon<f64>)> = (0..10)
            .map(|i| {
                let x = 100.0 * i as f64;
                (1.0, square(x, 0.0, x + 100.0, 100.0))
            })
            .collect();
        let eligible = EligibleArea::new(
            cells
                .iter()
                .map(|(_, geom)| LandUsePolygon::new(LandUseKind::Residential, geom.clone()))
                .collect(),
        );
        let grid = PopulationGrid::from_raw(cells);
        let sampler = PopulationWeightedSampler::default();

        let mut overshot = 0;
        for seed in 0..32 {
            let mut rng = XorShiftRng::seed_from_u64(seed);
            let report = sampler.sample(&grid, &eligible, 5, &mut rng).unwrap();
            assert_eq!(report.points.len(), 5);
            assert!(report.rounds >= 1);
            if report.downsampled > 0 {
                overshot += 1;
                // At most 10 points are drawn per round
                assert!(report.downsampled < 10);
            }
        }
        // More than 5 of 10 fair coins come up heads about 38% of the time
        assert!(overshot > 0);
    }

    #[test]
    fn downsampling_picks_distinct_points() {
        let mut rng = XorShiftRng::seed_from_u64(42);
        let points: Vec<Point<f64>> = (0..10).map(|i| Point::new(i as f64, 0.0)).collect();
        for (target, expected) in [(10, 10), (4, 4), (0, 0)] {
            let mut picked = downsample(points.clone(), target, &mut rng);
            assert_eq!(picked.len(), expected);
            assert!(picked.iter().all(|pt| points.contains(pt)));
            picked.sort_by(|a, b| a.x().partial_cmp(&b.x()).unwrap());
            picked.dedup();
            assert_eq!(picked.len(), expected);
        }
    }

    #[test]
    fn gives_up_eventually() {
        // The eligible land is far away from every populated cell
        let eligible = EligibleArea::new(vec![LandUsePolygon::new(
            LandUseKind::Residential,
            square(1000.0, 1000.0, 1100.0, 1100.0),
        )]);
        let sampler = PopulationWeightedSampler {
            max_rounds: 25,
            ..Default::default()
        };
        let mut rng = XorShiftRng::seed_from_u64(42);
        match sampler.sample(&grid([5.0, 3.0, 2.0]), &eligible, 50, &mut rng) {
            Err(Error::SamplingNonConvergence {
                target,
                produced,
                rounds,
            }) => {
                assert_eq!(target, 50);
                assert_eq!(produced, 0);
                assert_eq!(rounds, 25);
            }
            x => panic!("expected non-convergence, got {:?}", x.map(|r| r.points.len())),
        }
    }

    #[test]
    fn deterministic_with_a_seed() {
        let grid = grid([70.0, 40.0, 20.0]);
        let eligible = eligible_strips(80.0);
        let sampler = PopulationWeightedSampler::default();
        let run = |seed| {
            let mut rng = XorShiftRng::seed_from_u64(seed);
            sampler.sample(&grid, &eligible, 300, &mut rng).unwrap().points
        };
        assert_eq!(run(7), run(7));
        assert_ne!(run(7), run(8));
    }

    #[test]
    fn unpopulated_cells_stay_empty() {
        let grid = grid([10.0, 0.0, 10.0]);
        let eligible = eligible_strips(80.0);
        let mut rng = XorShiftRng::seed_from_u64(3);
        let report = PopulationWeightedSampler::default()
            .sample(&grid, &eligible, 500, &mut rng)
            .unwrap();
        assert!(report
            .points
            .iter()
            .all(|pt| !(100.0..200.0).contains(&pt.x())));
    }
}
