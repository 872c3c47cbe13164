//! Turns raw land-use polygons into a clean set of places where customers can appear.
//!
//! Upstream land-use queries return whatever touches the area, and they often return nested
//! results too, like a hospital building fully inside a larger institutional parcel. Only the
//! outer polygon should count, or the nested area would get its density counted twice.

use std::collections::BTreeSet;

use abstutil::prettyprint_usize;
use geo::{Intersects, MultiPolygon, Relate};

use crate::spatial::{rect_within, well_formed_bounds, BoundsIndex};
use crate::Footprint;

/// Keeps only candidates entirely inside `boundary`. Something straddling the boundary is
/// dropped as a whole, never clipped. Malformed candidates are dropped with a warning. The
/// relative order of everything kept is preserved.
pub fn remove_out_of_bounds<T: Footprint>(
    boundary: &MultiPolygon<f64>,
    candidates: Vec<T>,
) -> Vec<T> {
    let boundary_bounds = match well_formed_bounds(boundary) {
        Some(bounds) => bounds,
        None => {
            warn!("The boundary is empty or malformed, so nothing can be inside it");
            return Vec::new();
        }
    };

    let total = candidates.len();
    let mut malformed = 0;
    let mut kept = Vec::new();
    for candidate in candidates {
        let bounds = match well_formed_bounds(candidate.footprint()) {
            Some(bounds) => bounds,
            None => {
                malformed += 1;
                continue;
            }
        };
        // Cheap test first
        if !rect_within(&bounds, &boundary_bounds) {
            continue;
        }
        if boundary.relate(candidate.footprint()).is_contains() {
            kept.push(candidate);
        }
    }

    if malformed > 0 {
        warn!(
            "Skipped {} malformed geometries while checking the boundary",
            prettyprint_usize(malformed)
        );
    }
    info!(
        "{} of {} geometries are fully inside the boundary",
        prettyprint_usize(kept.len()),
        prettyprint_usize(total)
    );
    kept
}

/// Removes every geometry that lies entirely within another one of the set. Geometries that
/// merely overlap are both kept. When two geometries are identical, the first one is kept.
///
/// Running this again on its own output changes nothing.
pub fn remove_enclosed<T: Footprint>(geometries: Vec<T>) -> Vec<T> {
    let bounds: Vec<_> = geometries
        .iter()
        .map(|g| well_formed_bounds(g.footprint()))
        .collect();
    let index = BoundsIndex::new(
        bounds
            .iter()
            .enumerate()
            .filter_map(|(idx, b)| b.map(|b| (idx, b))),
    );

    let mut to_drop = BTreeSet::new();
    let mut malformed = 0;
    for (outer_idx, outer) in geometries.iter().enumerate() {
        let outer_bounds = match bounds[outer_idx] {
            Some(b) => b,
            None => {
                to_drop.insert(outer_idx);
                malformed += 1;
                continue;
            }
        };
        let outer = outer.footprint();

        for inner_idx in index.query(&outer_bounds) {
            if inner_idx == outer_idx {
                continue;
            }
            match bounds[inner_idx] {
                Some(inner_bounds) if rect_within(&inner_bounds, &outer_bounds) => {}
                _ => continue,
            }

            let inner = geometries[inner_idx].footprint();
            if !outer.intersects(inner) {
                continue;
            }
            let matrix = inner.relate(outer);
            if !matrix.is_within() {
                continue;
            }
            // Duplicates are within each other
            if inner_idx < outer_idx && matrix.is_contains() {
                continue;
            }
            to_drop.insert(inner_idx);
        }
    }

    if malformed > 0 {
        warn!(
            "Skipped {} malformed geometries while looking for enclosed ones",
            prettyprint_usize(malformed)
        );
    }
    let enclosed = to_drop.len() - malformed;
    if enclosed > 0 {
        info!(
            "Removed {} geometries enclosed by others, {} remain",
            prettyprint_usize(enclosed),
            prettyprint_usize(geometries.len() - to_drop.len())
        );
    }

    geometries
        .into_iter()
        .enumerate()
        .filter(|(idx, _)| !to_drop.contains(idx))
        .map(|(_, g)| g)
        .collect()
}
