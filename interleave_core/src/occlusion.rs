// Copyright 2026 the Interleave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Spatial occlusion index for one composition slot.
//!
//! Each slot records the bounding rectangle of every primitive drawn into it.
//! At submit time the compositor asks, for every earlier platform view, which
//! parts of the slot's content sit above that view:
//! [`OcclusionIndex::search_non_overlapping`] answers with a set of pairwise
//! disjoint rectangles covering all drawn bounds that intersect the query.
//!
//! Storage is a flat list scanned linearly. Slots hold the primitives drawn
//! between two platform views, which is small enough that a tree does not pay
//! for its construction cost.

use alloc::vec::Vec;

use kurbo::Rect;
use smallvec::SmallVec;

use crate::geometry;

/// Result of an occlusion query. Most queries produce one or two regions.
pub type OcclusionRects = SmallVec<[Rect; 4]>;

/// Records drawn bounds for one slot and answers occlusion queries.
#[derive(Clone, Debug)]
pub struct OcclusionIndex {
    bounds: Rect,
    drawn: Vec<Rect>,
}

impl OcclusionIndex {
    /// Creates an empty index scoped to `bounds` (normally the full frame).
    #[must_use]
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            drawn: Vec::new(),
        }
    }

    /// Returns the area this index is scoped to.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Records the bounds of one drawn primitive.
    ///
    /// Bounds are clipped to the index scope. Primitives that cover no area
    /// inside the scope draw nothing visible and are not recorded.
    pub fn insert(&mut self, bounds: Rect) {
        let clipped = bounds.intersect(self.bounds);
        if !geometry::is_empty(clipped) {
            self.drawn.push(clipped);
        }
    }

    /// Returns the number of recorded primitives.
    #[must_use]
    pub fn len(&self) -> usize {
        self.drawn.len()
    }

    /// Returns `true` if nothing was drawn into this slot.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.drawn.is_empty()
    }

    /// Returns the recorded bounds in insertion order.
    #[must_use]
    pub fn drawn_rects(&self) -> &[Rect] {
        &self.drawn
    }

    /// Returns pairwise non-overlapping rectangles that together cover every
    /// recorded primitive intersecting `query`.
    ///
    /// Intersecting primitives are joined: whenever a primitive overlaps an
    /// already collected region, the two are replaced by their union, and the
    /// union keeps absorbing regions until it overlaps none of the others.
    /// Returned rectangles are the joined drawn bounds, not clipped to
    /// `query`.
    #[must_use]
    pub fn search_non_overlapping(&self, query: Rect) -> OcclusionRects {
        let mut regions = OcclusionRects::new();
        for &drawn in self.drawn.iter().filter(|r| geometry::overlaps(**r, query)) {
            let mut merged = drawn;
            while let Some(i) = regions.iter().position(|r| geometry::overlaps(*r, merged)) {
                merged = merged.union(regions.remove(i));
            }
            regions.push(merged);
        }
        regions
    }
}
