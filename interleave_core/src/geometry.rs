// Copyright 2026 the Interleave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rectangle helpers shared by the occlusion index and the compositor.
//!
//! All rectangles are expected to be normalized (`x0 <= x1`, `y0 <= y1`).

use kurbo::Rect;

/// Rounds `rect` outward to integer pixel bounds.
///
/// The result always contains the input, so a background clip and the
/// matching overlay never leave a seam between them. For example
/// `{0.3, 0.5, 3.1, 4.7}` becomes `{0, 0, 4, 5}`.
#[inline]
#[must_use]
pub fn round_out(rect: Rect) -> Rect {
    rect.expand()
}

/// Returns whether `a` and `b` share a region of positive area.
///
/// Rectangles that merely touch along an edge do not overlap, and an empty
/// rectangle overlaps nothing.
#[inline]
#[must_use]
pub fn overlaps(a: Rect, b: Rect) -> bool {
    a.x0 < b.x1 && b.x0 < a.x1 && a.y0 < b.y1 && b.y0 < a.y1 && !is_empty(a) && !is_empty(b)
}

/// Returns whether `outer` fully contains `inner`.
#[inline]
#[must_use]
pub fn contains(outer: Rect, inner: Rect) -> bool {
    outer.x0 <= inner.x0 && outer.y0 <= inner.y0 && outer.x1 >= inner.x1 && outer.y1 >= inner.y1
}

/// Returns whether `rect` has no area.
#[inline]
#[must_use]
pub fn is_empty(rect: Rect) -> bool {
    !(rect.x0 < rect.x1 && rect.y0 < rect.y1)
}

/// Returns the smallest rectangle containing every rectangle in `rects`, or
/// `None` if the iterator is empty.
#[must_use]
pub fn union_all(rects: impl IntoIterator<Item = Rect>) -> Option<Rect> {
    rects.into_iter().reduce(|acc, r| acc.union(r))
}
