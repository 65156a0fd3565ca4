//! # Static Spatial Index
//!
//! An R-tree over zone bounding boxes, bulk-loaded once from the complete
//! dataset (`rstar` OMT packing, O(n log n)) and never mutated afterwards.
//!
//! Slots are positions in the build input: slot *i* is the *i*-th bounding
//! box handed to [`SpatialIndex::build`]. Callers keep their own
//! slot → record tables aligned with that order.

use rstar::{RTree, RTreeObject, AABB};
use vigieau_core::Coordinates;

use crate::geometry::{BoundingBox, ZoneGeometry};

/// Position of an entry in the index build order.
pub type Slot = usize;

#[derive(Debug, Clone, Copy, PartialEq)]
struct SlotEnvelope {
    slot: Slot,
    bbox: BoundingBox,
}

impl RTreeObject for SlotEnvelope {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(
            [self.bbox.min_lon, self.bbox.min_lat],
            [self.bbox.max_lon, self.bbox.max_lat],
        )
    }
}

/// Bulk-loaded, read-only R-tree over bounding boxes.
pub struct SpatialIndex {
    tree: RTree<SlotEnvelope>,
    bboxes: Vec<BoundingBox>,
}

impl std::fmt::Debug for SpatialIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpatialIndex")
            .field("slots", &self.bboxes.len())
            .finish()
    }
}

impl SpatialIndex {
    /// Bulk-load the tree. Slot *i* is `bboxes[i]`.
    pub fn build(bboxes: Vec<BoundingBox>) -> Self {
        let entries = bboxes
            .iter()
            .enumerate()
            .map(|(slot, bbox)| SlotEnvelope { slot, bbox: *bbox })
            .collect();
        Self {
            tree: RTree::bulk_load(entries),
            bboxes,
        }
    }

    /// Bulk-load from geometries, in iteration order.
    pub fn from_geometries<'a>(geometries: impl IntoIterator<Item = &'a ZoneGeometry>) -> Self {
        Self::build(geometries.into_iter().map(ZoneGeometry::bbox).collect())
    }

    /// Slots whose bounding box intersects `query` (touching included).
    ///
    /// The result is a superset of exact hits and comes back unordered.
    pub fn query_bbox(&self, query: BoundingBox) -> Vec<Slot> {
        let envelope = AABB::from_corners(
            [query.min_lon, query.min_lat],
            [query.max_lon, query.max_lat],
        );
        self.tree
            .locate_in_envelope_intersecting(&envelope)
            .map(|entry| entry.slot)
            .collect()
    }

    /// Candidate slots for a point: a query with a degenerate box.
    pub fn query_point(&self, point: Coordinates) -> Vec<Slot> {
        self.query_bbox(BoundingBox::point(point))
    }

    /// Bounding box stored at `slot`.
    pub fn bbox(&self, slot: Slot) -> Option<BoundingBox> {
        self.bboxes.get(slot).copied()
    }

    /// All bounding boxes in slot order.
    pub fn bboxes(&self) -> &[BoundingBox] {
        &self.bboxes
    }

    pub fn len(&self) -> usize {
        self.bboxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bboxes.is_empty()
    }
}
