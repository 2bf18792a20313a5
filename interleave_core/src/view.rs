// Copyright 2026 the Interleave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Platform view identity and per-frame placement parameters.

use alloc::vec::Vec;
use core::fmt;

use kurbo::{Affine, Point, Rect, RoundedRect, Size};

/// Identifies a native platform view.
///
/// Assigned by the embedder and stable across frames. Within one frame's
/// composition order each id appears at most once.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ViewId(pub i64);

impl fmt::Debug for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ViewId({})", self.0)
    }
}

/// Identifies a native overlay view created by the
/// [`PlatformViewHost`](crate::host::PlatformViewHost).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OverlayId(pub i64);

impl fmt::Debug for OverlayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OverlayId({})", self.0)
    }
}

/// A shape used to clip a platform view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ClipShape {
    /// An axis-aligned rectangle.
    Rect(Rect),
    /// A rectangle with rounded corners.
    RoundedRect(RoundedRect),
}

/// One entry of the transform/clip stack applied to a platform view.
///
/// The compositor treats mutators as opaque; they only take part in change
/// detection between frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Mutator {
    /// A 2D affine transform.
    Transform(Affine),
    /// A clip shape in the view's local coordinates.
    Clip(ClipShape),
    /// An opacity multiplier (0.0–1.0).
    Opacity(f32),
}

/// Immutable per-frame descriptor of a platform view's placement.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewParams {
    /// Top-left corner of the final bounding rectangle, in physical pixels.
    pub offset: Point,
    /// Size of the view in logical pixels.
    pub size: Size,
    /// Transform/clip stack, outermost first.
    pub mutators: Vec<Mutator>,
}

impl ViewParams {
    /// Creates parameters with an empty mutator stack.
    #[must_use]
    pub fn new(offset: Point, size: Size) -> Self {
        Self {
            offset,
            size,
            mutators: Vec::new(),
        }
    }

    /// Appends a mutator to the stack.
    #[must_use]
    pub fn with_mutator(mut self, mutator: Mutator) -> Self {
        self.mutators.push(mutator);
        self
    }

    /// Returns the on-screen rectangle of the view in physical pixels.
    ///
    /// The origin is taken as-is; only the size is scaled by
    /// `device_pixel_ratio`.
    #[must_use]
    pub fn placement_rect(&self, device_pixel_ratio: f64) -> Rect {
        Rect::from_origin_size(
            self.offset,
            Size::new(
                self.size.width * device_pixel_ratio,
                self.size.height * device_pixel_ratio,
            ),
        )
    }
}
