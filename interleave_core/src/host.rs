// Copyright 2026 the Interleave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Platform view host contract.
//!
//! The host owns the native view hierarchy: the platform views themselves
//! and the overlay views that carry GPU content drawn above them. The
//! compositor never creates or destroys platform views; it only tells the
//! host where each one goes this frame.
//!
//! # Threading
//!
//! Every method here must run on the platform context. The compositor calls
//! [`frame_begin`](PlatformViewHost::frame_begin) and
//! [`frame_end`](PlatformViewHost::frame_end) only after checking
//! [`ThreadMerger::is_on_platform_thread`](crate::merge::ThreadMerger::is_on_platform_thread).
//! Placement calls happen during
//! [`submit_frame`](crate::compositor::Compositor::submit_frame), which a
//! frame with platform views only reaches once the raster and platform
//! contexts are merged.
//!
//! # Frame pseudocode
//!
//! ```rust,ignore
//! host.frame_begin();
//! host.display_platform_view(ViewId(3), Rect::new(0.0, 0.0, 300.0, 200.0));
//! host.display_overlay_surface(OverlayId(1), Rect::new(10.0, 10.0, 50.0, 30.0));
//! host.frame_end(); // views not displayed since frame_begin are hidden
//! ```

use kurbo::Rect;

use crate::view::{OverlayId, ViewId};

/// Places native views and overlay surfaces on screen.
pub trait PlatformViewHost {
    /// Marks the start of one frame's view-list mutations.
    fn frame_begin(&mut self);

    /// Marks the end of one frame's view-list mutations.
    fn frame_end(&mut self);

    /// Shows platform view `view` at `rect` (physical pixels). If the view
    /// is already displayed it is only moved and resized.
    fn display_platform_view(&mut self, view: ViewId, rect: Rect);

    /// Shows overlay `overlay` at `rect` (physical pixels). If the overlay
    /// is already displayed it is only moved and resized.
    fn display_overlay_surface(&mut self, overlay: OverlayId, rect: Rect);

    /// Creates a new native overlay view and returns its id.
    fn create_overlay_surface(&mut self) -> OverlayId;
}
