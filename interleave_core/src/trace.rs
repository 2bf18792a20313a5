// Copyright 2026 the Interleave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the compositor frame loop.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! [`Compositor`](crate::compositor::Compositor) calls at each stage. All
//! method bodies default to no-ops, so implementing only the events you care
//! about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! Human-oriented logging goes through the `tracing` facade instead; sinks
//! are for machine-readable per-frame records.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`): gates [`OcclusionQueryEvent`] and
//!   [`OverlayPlacementEvent`] plus the corresponding `TraceSink` methods.

use alloc::rc::Rc;
use core::cell::RefCell;

use kurbo::{Rect, Size};

#[cfg(feature = "trace-rich")]
use crate::view::OverlayId;
use crate::view::ViewId;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// What the compositor asked of the thread merger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MergeAction {
    /// The contexts were already merged; the lease was extended.
    ExtendLease,
    /// The contexts were not merged; the frame was cancelled for resubmission.
    RequestMerge,
    /// The resubmitted frame ended; the merge was committed with a lease.
    CommitMerge,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted by `begin_frame`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameBeginEvent {
    /// Monotonic frame counter.
    pub frame_index: u64,
    /// Frame size in physical pixels.
    pub frame_size: Size,
    /// Logical to physical scale factor.
    pub device_pixel_ratio: f64,
    /// Whether the host was notified (only possible on the platform context).
    pub on_platform_thread: bool,
}

/// Emitted for each preroll call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PrerollEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// The prerolled view.
    pub view: ViewId,
    /// Position of the view in the composition order.
    pub slot: u32,
    /// Whether the stored params differed from the supplied ones.
    pub params_changed: bool,
}

/// Emitted for each (slot, earlier view) occlusion query that found content.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OcclusionQueryEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// View owning the queried slot.
    pub slot_view: ViewId,
    /// View whose placement rectangle was the query.
    pub below: ViewId,
    /// Disjoint regions found before collapsing.
    pub found: u32,
    /// Whether the regions were collapsed into their union.
    pub collapsed: bool,
}

/// Emitted once the background frame has been submitted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BackgroundSubmitEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Slots drawn onto the background.
    pub slots: u32,
    /// Rectangles clipped out of the background.
    pub clip_rects: u32,
    /// Whether the backend accepted the frame.
    pub submitted: bool,
}

/// Emitted when a platform view is placed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewPlacementEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// The placed view.
    pub view: ViewId,
    /// Placement rectangle in physical pixels.
    pub rect: Rect,
}

/// Emitted when an overlay surface is placed and drawn.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayPlacementEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// View whose slot content the overlay carries.
    pub view: ViewId,
    /// The overlay used.
    pub overlay: OverlayId,
    /// Overlay rectangle in physical pixels.
    pub rect: Rect,
}

/// Emitted when the compositor talks to the thread merger.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MergeEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// What was requested.
    pub action: MergeAction,
    /// Lease length passed to the merger (0 for [`MergeAction::RequestMerge`]).
    pub lease_frames: u64,
}

/// Emitted by `end_frame`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameEndEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Whether the caller reported the frame as resubmitted.
    pub resubmitted: bool,
    /// Overlay layers returned to the pool.
    pub overlays_recycled: u32,
    /// Layers owned by the pool after recycling.
    pub pool_size: u32,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the compositor.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a frame begins.
    fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
        _ = e;
    }

    /// Called for each preroll.
    fn on_preroll(&mut self, e: &PrerollEvent) {
        _ = e;
    }

    /// Called after an occlusion query (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_occlusion_query(&mut self, e: &OcclusionQueryEvent) {
        _ = e;
    }

    /// Called after the background frame is submitted.
    fn on_background_submit(&mut self, e: &BackgroundSubmitEvent) {
        _ = e;
    }

    /// Called when a platform view is placed.
    fn on_view_placement(&mut self, e: &ViewPlacementEvent) {
        _ = e;
    }

    /// Called when an overlay is placed (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_overlay_placement(&mut self, e: &OverlayPlacementEvent) {
        _ = e;
    }

    /// Called when the compositor talks to the thread merger.
    fn on_merge(&mut self, e: &MergeEvent) {
        _ = e;
    }

    /// Called when a frame ends.
    fn on_frame_end(&mut self, e: &FrameEndEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

/// Forwards to a shared sink, so the caller can keep reading a sink it has
/// installed with [`Compositor::set_trace_sink`](crate::compositor::Compositor::set_trace_sink).
impl<S: TraceSink + ?Sized> TraceSink for Rc<RefCell<S>> {
    fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
        self.borrow_mut().on_frame_begin(e);
    }

    fn on_preroll(&mut self, e: &PrerollEvent) {
        self.borrow_mut().on_preroll(e);
    }

    #[cfg(feature = "trace-rich")]
    fn on_occlusion_query(&mut self, e: &OcclusionQueryEvent) {
        self.borrow_mut().on_occlusion_query(e);
    }

    fn on_background_submit(&mut self, e: &BackgroundSubmitEvent) {
        self.borrow_mut().on_background_submit(e);
    }

    fn on_view_placement(&mut self, e: &ViewPlacementEvent) {
        self.borrow_mut().on_view_placement(e);
    }

    #[cfg(feature = "trace-rich")]
    fn on_overlay_placement(&mut self, e: &OverlayPlacementEvent) {
        self.borrow_mut().on_overlay_placement(e);
    }

    fn on_merge(&mut self, e: &MergeEvent) {
        self.borrow_mut().on_merge(e);
    }

    fn on_frame_end(&mut self, e: &FrameEndEvent) {
        self.borrow_mut().on_frame_end(e);
    }
}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`FrameBeginEvent`].
    #[inline]
    pub fn frame_begin(&mut self, e: &FrameBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_frame_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PrerollEvent`].
    #[inline]
    pub fn preroll(&mut self, e: &PrerollEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_preroll(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`OcclusionQueryEvent`] (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn occlusion_query(&mut self, e: &OcclusionQueryEvent) {
        if let Some(s) = &mut self.sink {
            s.on_occlusion_query(e);
        }
    }

    /// Emits a [`BackgroundSubmitEvent`].
    #[inline]
    pub fn background_submit(&mut self, e: &BackgroundSubmitEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_background_submit(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`ViewPlacementEvent`].
    #[inline]
    pub fn view_placement(&mut self, e: &ViewPlacementEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_view_placement(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`OverlayPlacementEvent`] (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn overlay_placement(&mut self, e: &OverlayPlacementEvent) {
        if let Some(s) = &mut self.sink {
            s.on_overlay_placement(e);
        }
    }

    /// Emits a [`MergeEvent`].
    #[inline]
    pub fn merge(&mut self, e: &MergeEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_merge(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`FrameEndEvent`].
    #[inline]
    pub fn frame_end(&mut self, e: &FrameEndEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_frame_end(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
