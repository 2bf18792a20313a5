// Copyright 2026 the Interleave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! GPU drawing backend contract.
//!
//! The compositor never issues draw commands of its own. It needs exactly
//! four capabilities from the drawing layer:
//!
//! - **Record**: open a [`Recorder`] bound to a region and finalize it into
//!   an immutable picture ([`DrawBackend::begin_recording`],
//!   [`Recorder::finish`]).
//! - **Play back**: draw a picture onto a frame under a difference clip or a
//!   translation ([`SurfaceFrame`]).
//! - **Acquire and submit**: obtain a frame from a drawing target and hand it
//!   to the display pipeline ([`OverlaySurface::acquire_frame`],
//!   [`SurfaceFrame::submit`]).
//! - **Bind overlay surfaces**: create a GPU surface for a native overlay
//!   view, or rebind a recycled one to a different drawing context
//!   ([`DrawBackend::create_surface`], [`DrawBackend::rebind_surface`]).
//!
//! Everything the backend records must go through
//! [`Recording::draw`](crate::recording::Recording::draw) so that the
//! occlusion index sees the bounds of each primitive.

use core::fmt;

use kurbo::{Rect, Size, Vec2};

use crate::view::OverlayId;

/// Identity of the GPU drawing context a surface renders with.
///
/// Backends assign these; the compositor only compares them to decide when a
/// recycled overlay surface must be rebound.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct DrawContextId(pub u64);

impl fmt::Debug for DrawContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DrawContextId({})", self.0)
    }
}

/// An open recording of draw commands.
pub trait Recorder {
    /// The immutable snapshot produced by [`finish`](Self::finish).
    type Picture;

    /// Finalizes the recording.
    fn finish(self) -> Self::Picture;
}

/// A frame acquired from a drawing target, ready to be drawn into.
pub trait SurfaceFrame {
    /// The picture type this frame can play back.
    type Picture;

    /// Pushes the current clip and transform state.
    fn save(&mut self);

    /// Pops the state pushed by the matching [`save`](Self::save).
    fn restore(&mut self);

    /// Removes `rect` from the drawable region (difference clip).
    fn clip_out(&mut self, rect: Rect);

    /// Clears the frame to transparent.
    fn clear(&mut self);

    /// Translates subsequent drawing by `offset`.
    fn translate(&mut self, offset: Vec2);

    /// Plays back `picture` under the current clip and transform.
    fn draw_picture(&mut self, picture: &Self::Picture);

    /// Hands the frame to the display pipeline. Returns `false` if the
    /// backend dropped it.
    fn submit(self) -> bool;
}

/// A GPU drawing target bound to one native overlay view.
pub trait OverlaySurface {
    /// The frame type produced by [`acquire_frame`](Self::acquire_frame).
    type Frame: SurfaceFrame;

    /// Acquires a frame of the given size in physical pixels.
    fn acquire_frame(&mut self, size: Size) -> Self::Frame;
}

/// The GPU drawing backend consumed by the compositor.
pub trait DrawBackend {
    /// The immutable snapshot type shared by recordings and frames.
    type Picture;
    /// Open recording type.
    type Recorder: Recorder<Picture = Self::Picture>;
    /// Frame type of both the background target and overlay surfaces.
    type Frame: SurfaceFrame<Picture = Self::Picture>;
    /// Overlay surface type.
    type Surface: OverlaySurface<Frame = Self::Frame>;

    /// Opens a recording bound to `bounds`.
    fn begin_recording(&mut self, bounds: Rect) -> Self::Recorder;

    /// Creates a GPU surface for the native overlay `overlay`.
    fn create_surface(&mut self, overlay: OverlayId, context: DrawContextId) -> Self::Surface;

    /// Recreates the GPU side of `surface` for a different drawing context.
    fn rebind_surface(&mut self, surface: &mut Self::Surface, context: DrawContextId);
}
