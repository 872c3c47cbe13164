use geo::{BoundingRect, Coord, CoordsIter, MultiPolygon, Point, Rect};
use rstar::{RTree, RTreeObject, AABB};

/// An R-tree over bounding boxes, answering "which of the original items might touch this?"
/// Items are identified by their index in the caller's list.
pub struct BoundsIndex {
    tree: RTree<IndexedBounds>,
}

struct IndexedBounds {
    idx: usize,
    bounds: Rect<f64>,
}

impl RTreeObject for IndexedBounds {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        envelope(&self.bounds)
    }
}

impl BoundsIndex {
    pub fn new<I: IntoIterator<Item = (usize, Rect<f64>)>>(items: I) -> BoundsIndex {
        BoundsIndex {
            tree: RTree::bulk_load(
                items
                    .into_iter()
                    .map(|(idx, bounds)| IndexedBounds { idx, bounds })
                    .collect(),
            ),
        }
    }

    /// Indices of everything whose bounding box intersects `bounds`, touching edges included.
    pub fn query(&self, bounds: &Rect<f64>) -> impl Iterator<Item = usize> + '_ {
        self.tree
            .locate_in_envelope_intersecting(&envelope(bounds))
            .map(|x| x.idx)
    }

    pub fn query_point(&self, pt: &Point<f64>) -> impl Iterator<Item = usize> + '_ {
        self.tree
            .locate_in_envelope_intersecting(&AABB::from_point([pt.x(), pt.y()]))
            .map(|x| x.idx)
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

fn envelope(bounds: &Rect<f64>) -> AABB<[f64; 2]> {
    AABB::from_corners(
        [bounds.min().x, bounds.min().y],
        [bounds.max().x, bounds.max().y],
    )
}

/// Only well-formed shapes are worth testing: every exterior ring has at least 3 corners, and
/// all coordinates are finite. Returns the bounding box of those that pass.
pub fn well_formed_bounds(geometry: &MultiPolygon<f64>) -> Option<Rect<f64>> {
    if geometry.0.is_empty() {
        return None;
    }
    for polygon in &geometry.0 {
        // Closed rings repeat the first point
        if polygon.exterior().0.len() < 4 {
            return None;
        }
    }
    if !geometry
        .coords_iter()
        .all(|Coord { x, y }| x.is_finite() && y.is_finite())
    {
        return None;
    }
    geometry.bounding_rect()
}

/// Is `inner` entirely inside `outer`, touching edges allowed?
pub fn rect_within(inner: &Rect<f64>, outer: &Rect<f64>) -> bool {
    inner.min().x >= outer.min().x
        && inner.min().y >= outer.min().y
        && inner.max().x <= outer.max().x
        && inner.max().y <= outer.max().y
}
