// Copyright 2026 the Interleave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use interleave_core::trace::{
    BackgroundSubmitEvent, FrameBeginEvent, FrameEndEvent, MergeAction, MergeEvent,
    OcclusionQueryEvent, OverlayPlacementEvent, PrerollEvent, TraceSink, ViewPlacementEvent,
};
use kurbo::Rect;

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns its writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn action_name(action: MergeAction) -> &'static str {
    match action {
        MergeAction::ExtendLease => "extend",
        MergeAction::RequestMerge => "request",
        MergeAction::CommitMerge => "commit",
    }
}

struct R(Rect);

impl std::fmt::Display for R {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let r = self.0;
        write!(f, "({},{} {}x{})", r.x0, r.y0, r.width(), r.height())
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[begin] frame={} size={}x{} dpr={} platform={}",
            e.frame_index,
            e.frame_size.width,
            e.frame_size.height,
            e.device_pixel_ratio,
            e.on_platform_thread,
        );
    }

    fn on_preroll(&mut self, e: &PrerollEvent) {
        let changed = if e.params_changed { " params changed" } else { "" };
        let _ = writeln!(
            self.writer,
            "[preroll] frame={} view={} slot={}{changed}",
            e.frame_index, e.view.0, e.slot,
        );
    }

    fn on_occlusion_query(&mut self, e: &OcclusionQueryEvent) {
        let collapsed = if e.collapsed { " (collapsed)" } else { "" };
        let _ = writeln!(
            self.writer,
            "[occlusion] frame={} slot-view={} over-view={} found={}{collapsed}",
            e.frame_index, e.slot_view.0, e.below.0, e.found,
        );
    }

    fn on_background_submit(&mut self, e: &BackgroundSubmitEvent) {
        let status = if e.submitted { "ok" } else { "FAILED" };
        let _ = writeln!(
            self.writer,
            "[background] frame={} slots={} clips={} {status}",
            e.frame_index, e.slots, e.clip_rects,
        );
    }

    fn on_view_placement(&mut self, e: &ViewPlacementEvent) {
        let _ = writeln!(
            self.writer,
            "[view] frame={} view={} at {}",
            e.frame_index,
            e.view.0,
            R(e.rect),
        );
    }

    fn on_overlay_placement(&mut self, e: &OverlayPlacementEvent) {
        let _ = writeln!(
            self.writer,
            "[overlay] frame={} view={} overlay={} at {}",
            e.frame_index,
            e.view.0,
            e.overlay.0,
            R(e.rect),
        );
    }

    fn on_merge(&mut self, e: &MergeEvent) {
        let _ = writeln!(
            self.writer,
            "[merge] frame={} {} lease={}",
            e.frame_index,
            action_name(e.action),
            e.lease_frames,
        );
    }

    fn on_frame_end(&mut self, e: &FrameEndEvent) {
        let resubmitted = if e.resubmitted { " resubmitted" } else { "" };
        let _ = writeln!(
            self.writer,
            "[end] frame={} recycled={} pool={}{resubmitted}",
            e.frame_index, e.overlays_recycled, e.pool_size,
        );
    }
}
