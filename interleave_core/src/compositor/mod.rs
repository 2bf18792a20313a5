// Copyright 2026 the Interleave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-frame compositor.
//!
//! A [`Compositor`] is driven once per frame by the raster context:
//!
//! 1. [`begin_frame`](Compositor::begin_frame) resets per-frame state.
//! 2. [`preroll`](Compositor::preroll) is called once per platform view in
//!    paint order. Each call opens a composition slot whose recording collects
//!    the UI painted after that view.
//! 3. [`post_preroll_action`](Compositor::post_preroll_action) asks the
//!    thread merger whether placement calls can be issued this frame. If not,
//!    the frame is cancelled and [`PostPrerollResult::ResubmitFrame`] tells
//!    the caller to drive it again once the contexts are merged.
//! 4. [`composite`](Compositor::composite) hands out each slot's recording.
//! 5. [`submit_frame`](Compositor::submit_frame) runs the occlusion pass,
//!    submits the background and places views and overlays.
//! 6. [`end_frame`](Compositor::end_frame) commits a pending merge and
//!    recycles overlay layers.

mod registry;
mod submit;

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use hashbrown::HashMap;
use kurbo::{Rect, Size};

use crate::backend::DrawBackend;
use crate::config::{CompositorConfig, ConfigError};
use crate::host::PlatformViewHost;
use crate::merge::{PostPrerollResult, ThreadMerger};
use crate::pool::{OverlayPool, PoolStats};
use crate::recording::Recording;
use crate::trace::{
    FrameBeginEvent, FrameEndEvent, MergeAction, MergeEvent, PrerollEvent, TraceSink, Tracer,
};
use crate::view::{ViewId, ViewParams};

use registry::SlotRegistry;

/// Where the compositor is in its frame cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FramePhase {
    /// No frame is open.
    Idle,
    /// Between `begin_frame` and `submit_frame`: slots are being prerolled
    /// and recorded.
    Accumulating,
    /// `submit_frame` ran; waiting for `end_frame`.
    Submitting,
    /// The frame was cancelled by a merge request and must be driven again.
    AwaitingResubmit,
}

/// Interleaves GPU-drawn content with platform views for one output surface.
///
/// The compositor owns the drawing backend `B`, the platform view host `H`,
/// and the overlay layers created through them. Stored [`ViewParams`] persist
/// across frames so that repeated identical params are not re-stored; every
/// other piece of slot state is rebuilt each frame.
pub struct Compositor<B: DrawBackend, H: PlatformViewHost> {
    config: CompositorConfig,
    backend: B,
    host: H,
    pool: OverlayPool<B::Surface>,
    params: HashMap<ViewId, ViewParams>,
    slots: SlotRegistry<B::Recorder>,
    frame_size: Size,
    device_pixel_ratio: f64,
    phase: FramePhase,
    resubmit_pending: bool,
    frame_index: u64,
    trace_sink: Option<Box<dyn TraceSink>>,
}

impl<B: DrawBackend, H: PlatformViewHost> fmt::Debug for Compositor<B, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Compositor")
            .field("config", &self.config)
            .field("phase", &self.phase)
            .field("frame_index", &self.frame_index)
            .field("frame_size", &self.frame_size)
            .field("device_pixel_ratio", &self.device_pixel_ratio)
            .field("composition_order", &self.slots.order())
            .field("resubmit_pending", &self.resubmit_pending)
            .field("pool", &self.pool.stats())
            .finish_non_exhaustive()
    }
}

impl<B: DrawBackend, H: PlatformViewHost> Compositor<B, H> {
    /// Creates a compositor after validating `config`.
    pub fn new(config: CompositorConfig, backend: B, host: H) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            backend,
            host,
            pool: OverlayPool::new(),
            params: HashMap::new(),
            slots: SlotRegistry::new(),
            frame_size: Size::ZERO,
            device_pixel_ratio: 1.0,
            phase: FramePhase::Idle,
            resubmit_pending: false,
            frame_index: 0,
            trace_sink: None,
        })
    }

    /// Installs (or removes) the sink receiving frame-loop events.
    ///
    /// Events are only dispatched when the `trace` feature is enabled.
    pub fn set_trace_sink(&mut self, sink: Option<Box<dyn TraceSink>>) {
        self.trace_sink = sink;
    }

    /// Starts a new frame of `frame_size` physical pixels.
    ///
    /// Clears the previous frame's slots. The host is told a frame began
    /// only when called on the platform context.
    pub fn begin_frame(
        &mut self,
        frame_size: Size,
        device_pixel_ratio: f64,
        merger: &dyn ThreadMerger,
    ) {
        self.reset();
        self.frame_index += 1;
        self.frame_size = frame_size;
        self.device_pixel_ratio = device_pixel_ratio;
        self.phase = FramePhase::Accumulating;

        let on_platform_thread = merger.is_on_platform_thread();
        if on_platform_thread {
            self.host.frame_begin();
        }
        tracing::debug!(
            frame = self.frame_index,
            width = frame_size.width,
            height = frame_size.height,
            device_pixel_ratio,
            on_platform_thread,
            "begin frame"
        );
        tracer(&mut self.trace_sink).frame_begin(&FrameBeginEvent {
            frame_index: self.frame_index,
            frame_size,
            device_pixel_ratio,
            on_platform_thread,
        });
    }

    /// Opens a composition slot for `view`.
    ///
    /// The slot's recording covers the whole frame. `params` replaces the
    /// stored params for `view` only if it differs from them.
    ///
    /// # Panics
    ///
    /// Panics if no frame is accumulating or if `view` was already prerolled
    /// this frame.
    pub fn preroll(&mut self, view: ViewId, params: ViewParams) {
        assert!(
            self.phase == FramePhase::Accumulating,
            "preroll of {view:?} outside of a frame (phase {:?})",
            self.phase
        );
        let bounds = Rect::from_origin_size((0.0, 0.0), self.frame_size);
        let recording = Recording::new(self.backend.begin_recording(bounds), bounds);
        let slot = self.slots.insert(view, recording);

        let params_changed = self.params.get(&view) != Some(&params);
        if params_changed {
            self.params.insert(view, params);
        }
        tracer(&mut self.trace_sink).preroll(&PrerollEvent {
            frame_index: self.frame_index,
            view,
            slot: u32::try_from(slot).unwrap_or(u32::MAX),
            params_changed,
        });
    }

    /// Returns the open recording of `view`, or `None` if `view` was not
    /// prerolled this frame (or its recording was already consumed by
    /// [`submit_frame`](Self::submit_frame)).
    pub fn composite(&mut self, view: ViewId) -> Option<&mut Recording<B::Recorder>> {
        self.slots.recording_mut(view)
    }

    /// Returns every open recording in composition order.
    pub fn current_recordings(&mut self) -> Vec<&mut Recording<B::Recorder>> {
        self.slots.recordings_mut().collect()
    }

    /// The base presentation target is owned by the embedder, so there is no
    /// root recording.
    pub fn root_recording(&mut self) -> Option<&mut Recording<B::Recorder>> {
        None
    }

    /// Returns the placement rectangle of `view` in physical pixels.
    ///
    /// # Panics
    ///
    /// Panics if `view` was not prerolled this frame.
    #[must_use]
    pub fn view_rect(&self, view: ViewId) -> Rect {
        let Some(params) = self
            .params
            .get(&view)
            .filter(|_| self.slots.contains(view))
        else {
            panic!("view {view:?} was not prerolled this frame");
        };
        params.placement_rect(self.device_pixel_ratio)
    }

    /// Returns the views prerolled this frame, in preroll order.
    #[must_use]
    pub fn composition_order(&self) -> &[ViewId] {
        self.slots.order()
    }

    /// Returns the overlay rectangles assigned to `view`'s slot by this
    /// frame's [`submit_frame`](Self::submit_frame). Empty before submit.
    ///
    /// # Panics
    ///
    /// Panics if `view` was not prerolled this frame.
    #[must_use]
    pub fn overlay_rects(&self, view: ViewId) -> &[Rect] {
        let Some(slot) = self.slots.slot_of(view) else {
            panic!("view {view:?} was not prerolled this frame");
        };
        self.slots.overlay_rects(slot)
    }

    /// Runs the merge-request protocol after all views were prerolled.
    ///
    /// A frame without platform views always succeeds and leaves the merger
    /// untouched. Otherwise, if the contexts are merged, the lease is
    /// extended. If they are not, the frame is cancelled and must be driven
    /// again; the merge itself is committed by [`end_frame`](Self::end_frame).
    pub fn post_preroll_action(&mut self, merger: &dyn ThreadMerger) -> PostPrerollResult {
        if self.slots.is_empty() {
            return PostPrerollResult::Success;
        }
        let lease = self.config.merged_lease_frames;
        if merger.is_merged() {
            merger.extend_lease_to(lease);
            tracing::trace!(frame = self.frame_index, lease, "extended merge lease");
            tracer(&mut self.trace_sink).merge(&MergeEvent {
                frame_index: self.frame_index,
                action: MergeAction::ExtendLease,
                lease_frames: lease as u64,
            });
            return PostPrerollResult::Success;
        }

        tracing::debug!(
            frame = self.frame_index,
            views = self.slots.len(),
            "contexts not merged; cancelling frame for resubmission"
        );
        self.resubmit_pending = true;
        self.cancel_frame();
        self.phase = FramePhase::AwaitingResubmit;
        tracer(&mut self.trace_sink).merge(&MergeEvent {
            frame_index: self.frame_index,
            action: MergeAction::RequestMerge,
            lease_frames: 0,
        });
        PostPrerollResult::ResubmitFrame
    }

    /// Finishes the frame.
    ///
    /// When `resubmitted` is set and a merge was requested this frame, the
    /// merge is committed for the configured lease. Overlay layers are
    /// always recycled. The host is told the frame ended only when called on
    /// the platform context.
    pub fn end_frame(&mut self, resubmitted: bool, merger: &dyn ThreadMerger) {
        if resubmitted && self.resubmit_pending {
            let lease = self.config.merged_lease_frames;
            merger.merge_with_lease(lease);
            self.resubmit_pending = false;
            tracing::debug!(frame = self.frame_index, lease, "merged raster and platform contexts");
            tracer(&mut self.trace_sink).merge(&MergeEvent {
                frame_index: self.frame_index,
                action: MergeAction::CommitMerge,
                lease_frames: lease as u64,
            });
        }

        let recycled = self.pool.stats().in_use;
        self.pool.recycle_layers();

        if self.phase == FramePhase::Submitting && !resubmitted {
            let slots = &self.slots;
            self.params.retain(|view, _| slots.contains(*view));
        }
        if merger.is_on_platform_thread() {
            self.host.frame_end();
        }
        self.phase = FramePhase::Idle;

        tracer(&mut self.trace_sink).frame_end(&FrameEndEvent {
            frame_index: self.frame_index,
            resubmitted,
            overlays_recycled: u32::try_from(recycled).unwrap_or(u32::MAX),
            pool_size: u32::try_from(self.pool.len()).unwrap_or(u32::MAX),
        });
    }

    /// Drops this frame's slots without drawing anything.
    pub fn cancel_frame(&mut self) {
        self.reset();
        self.phase = FramePhase::Idle;
    }

    /// Clears the composition order and every open recording.
    pub fn reset(&mut self) {
        self.slots.clear();
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &CompositorConfig {
        &self.config
    }

    /// Returns the current frame phase.
    #[must_use]
    pub fn phase(&self) -> FramePhase {
        self.phase
    }

    /// Returns the size of the current frame in physical pixels.
    #[must_use]
    pub fn frame_size(&self) -> Size {
        self.frame_size
    }

    /// Returns the current frame's device pixel ratio.
    #[must_use]
    pub fn device_pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio
    }

    /// Returns the number of frames begun so far.
    #[must_use]
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Returns `true` while a merge was requested and not yet committed.
    #[must_use]
    pub fn resubmit_pending(&self) -> bool {
        self.resubmit_pending
    }

    /// Returns the overlay pool counters.
    #[must_use]
    pub fn pool_stats(&self) -> PoolStats {
        self.pool.stats()
    }

    /// Returns the platform view host.
    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Returns the platform view host mutably.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Returns the drawing backend.
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Returns the drawing backend mutably.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}

fn tracer(sink: &mut Option<Box<dyn TraceSink>>) -> Tracer<'_> {
    match sink {
        Some(sink) => Tracer::new(sink.as_mut()),
        None => Tracer::none(),
    }
}

#[cfg(test)]
mod tests;
