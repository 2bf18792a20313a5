// Copyright 2026 the Interleave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes compositor events
//! into a `Vec<u8>` as fixed-size little-endian records. [`decode`] reads
//! them back as an iterator of [`RecordedEvent`].

use interleave_core::trace::{
    BackgroundSubmitEvent, FrameBeginEvent, FrameEndEvent, MergeAction, MergeEvent,
    OcclusionQueryEvent, OverlayPlacementEvent, PrerollEvent, TraceSink, ViewPlacementEvent,
};
use interleave_core::view::{OverlayId, ViewId};
use kurbo::{Rect, Size};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_FRAME_BEGIN: u8 = 1;
const TAG_PREROLL: u8 = 2;
const TAG_OCCLUSION_QUERY: u8 = 3;
const TAG_BACKGROUND_SUBMIT: u8 = 4;
const TAG_VIEW_PLACEMENT: u8 = 5;
const TAG_OVERLAY_PLACEMENT: u8 = 6;
const TAG_MERGE: u8 = 7;
const TAG_FRAME_END: u8 = 8;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_bool(&mut self, v: bool) {
        self.write_u8(u8::from(v));
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_i64(&mut self, v: i64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_rect(&mut self, r: Rect) {
        self.write_f64(r.x0);
        self.write_f64(r.y0);
        self.write_f64(r.x1);
        self.write_f64(r.y1);
    }

    fn write_action(&mut self, a: MergeAction) {
        self.write_u8(match a {
            MergeAction::ExtendLease => 0,
            MergeAction::RequestMerge => 1,
            MergeAction::CommitMerge => 2,
        });
    }
}

impl TraceSink for RecorderSink {
    fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
        self.write_u8(TAG_FRAME_BEGIN);
        self.write_u64(e.frame_index);
        self.write_f64(e.frame_size.width);
        self.write_f64(e.frame_size.height);
        self.write_f64(e.device_pixel_ratio);
        self.write_bool(e.on_platform_thread);
    }

    fn on_preroll(&mut self, e: &PrerollEvent) {
        self.write_u8(TAG_PREROLL);
        self.write_u64(e.frame_index);
        self.write_i64(e.view.0);
        self.write_u32(e.slot);
        self.write_bool(e.params_changed);
    }

    fn on_occlusion_query(&mut self, e: &OcclusionQueryEvent) {
        self.write_u8(TAG_OCCLUSION_QUERY);
        self.write_u64(e.frame_index);
        self.write_i64(e.slot_view.0);
        self.write_i64(e.below.0);
        self.write_u32(e.found);
        self.write_bool(e.collapsed);
    }

    fn on_background_submit(&mut self, e: &BackgroundSubmitEvent) {
        self.write_u8(TAG_BACKGROUND_SUBMIT);
        self.write_u64(e.frame_index);
        self.write_u32(e.slots);
        self.write_u32(e.clip_rects);
        self.write_bool(e.submitted);
    }

    fn on_view_placement(&mut self, e: &ViewPlacementEvent) {
        self.write_u8(TAG_VIEW_PLACEMENT);
        self.write_u64(e.frame_index);
        self.write_i64(e.view.0);
        self.write_rect(e.rect);
    }

    fn on_overlay_placement(&mut self, e: &OverlayPlacementEvent) {
        self.write_u8(TAG_OVERLAY_PLACEMENT);
        self.write_u64(e.frame_index);
        self.write_i64(e.view.0);
        self.write_i64(e.overlay.0);
        self.write_rect(e.rect);
    }

    fn on_merge(&mut self, e: &MergeEvent) {
        self.write_u8(TAG_MERGE);
        self.write_u64(e.frame_index);
        self.write_action(e.action);
        self.write_u64(e.lease_frames);
    }

    fn on_frame_end(&mut self, e: &FrameEndEvent) {
        self.write_u8(TAG_FRAME_END);
        self.write_u64(e.frame_index);
        self.write_bool(e.resubmitted);
        self.write_u32(e.overlays_recycled);
        self.write_u32(e.pool_size);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug, PartialEq)]
pub enum RecordedEvent {
    /// A [`FrameBeginEvent`].
    FrameBegin(FrameBeginEvent),
    /// A [`PrerollEvent`].
    Preroll(PrerollEvent),
    /// An [`OcclusionQueryEvent`].
    OcclusionQuery(OcclusionQueryEvent),
    /// A [`BackgroundSubmitEvent`].
    BackgroundSubmit(BackgroundSubmitEvent),
    /// A [`ViewPlacementEvent`].
    ViewPlacement(ViewPlacementEvent),
    /// An [`OverlayPlacementEvent`].
    OverlayPlacement(OverlayPlacementEvent),
    /// A [`MergeEvent`].
    Merge(MergeEvent),
    /// A [`FrameEndEvent`].
    FrameEnd(FrameEndEvent),
}

impl RecordedEvent {
    /// Returns the frame counter the event belongs to.
    #[must_use]
    pub fn frame_index(&self) -> u64 {
        match self {
            Self::FrameBegin(e) => e.frame_index,
            Self::Preroll(e) => e.frame_index,
            Self::OcclusionQuery(e) => e.frame_index,
            Self::BackgroundSubmit(e) => e.frame_index,
            Self::ViewPlacement(e) => e.frame_index,
            Self::OverlayPlacement(e) => e.frame_index,
            Self::Merge(e) => e.frame_index,
            Self::FrameEnd(e) => e.frame_index,
        }
    }
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
///
/// Iteration stops at the first unknown tag or truncated record.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
        let bytes = self.data.get(self.pos..self.pos + N)?.try_into().ok()?;
        self.pos += N;
        Some(bytes)
    }

    fn read_u8(&mut self) -> Option<u8> {
        self.take::<1>().map(|[v]| v)
    }

    fn read_bool(&mut self) -> Option<bool> {
        Some(self.read_u8()? != 0)
    }

    fn read_u32(&mut self) -> Option<u32> {
        self.take().map(u32::from_le_bytes)
    }

    fn read_u64(&mut self) -> Option<u64> {
        self.take().map(u64::from_le_bytes)
    }

    fn read_i64(&mut self) -> Option<i64> {
        self.take().map(i64::from_le_bytes)
    }

    fn read_f64(&mut self) -> Option<f64> {
        self.take().map(f64::from_le_bytes)
    }

    fn read_rect(&mut self) -> Option<Rect> {
        Some(Rect::new(
            self.read_f64()?,
            self.read_f64()?,
            self.read_f64()?,
            self.read_f64()?,
        ))
    }

    fn read_action(&mut self) -> Option<MergeAction> {
        Some(match self.read_u8()? {
            0 => MergeAction::ExtendLease,
            1 => MergeAction::RequestMerge,
            _ => MergeAction::CommitMerge,
        })
    }

    fn decode_frame_begin(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::FrameBegin(FrameBeginEvent {
            frame_index: self.read_u64()?,
            frame_size: Size::new(self.read_f64()?, self.read_f64()?),
            device_pixel_ratio: self.read_f64()?,
            on_platform_thread: self.read_bool()?,
        }))
    }

    fn decode_preroll(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Preroll(PrerollEvent {
            frame_index: self.read_u64()?,
            view: ViewId(self.read_i64()?),
            slot: self.read_u32()?,
            params_changed: self.read_bool()?,
        }))
    }

    fn decode_occlusion_query(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::OcclusionQuery(OcclusionQueryEvent {
            frame_index: self.read_u64()?,
            slot_view: ViewId(self.read_i64()?),
            below: ViewId(self.read_i64()?),
            found: self.read_u32()?,
            collapsed: self.read_bool()?,
        }))
    }

    fn decode_background_submit(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::BackgroundSubmit(BackgroundSubmitEvent {
            frame_index: self.read_u64()?,
            slots: self.read_u32()?,
            clip_rects: self.read_u32()?,
            submitted: self.read_bool()?,
        }))
    }

    fn decode_view_placement(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::ViewPlacement(ViewPlacementEvent {
            frame_index: self.read_u64()?,
            view: ViewId(self.read_i64()?),
            rect: self.read_rect()?,
        }))
    }

    fn decode_overlay_placement(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::OverlayPlacement(OverlayPlacementEvent {
            frame_index: self.read_u64()?,
            view: ViewId(self.read_i64()?),
            overlay: OverlayId(self.read_i64()?),
            rect: self.read_rect()?,
        }))
    }

    fn decode_merge(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Merge(MergeEvent {
            frame_index: self.read_u64()?,
            action: self.read_action()?,
            lease_frames: self.read_u64()?,
        }))
    }

    fn decode_frame_end(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::FrameEnd(FrameEndEvent {
            frame_index: self.read_u64()?,
            resubmitted: self.read_bool()?,
            overlays_recycled: self.read_u32()?,
            pool_size: self.read_u32()?,
        }))
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_FRAME_BEGIN => self.decode_frame_begin(),
            TAG_PREROLL => self.decode_preroll(),
            TAG_OCCLUSION_QUERY => self.decode_occlusion_query(),
            TAG_BACKGROUND_SUBMIT => self.decode_background_submit(),
            TAG_VIEW_PLACEMENT => self.decode_view_placement(),
            TAG_OVERLAY_PLACEMENT => self.decode_overlay_placement(),
            TAG_MERGE => self.decode_merge(),
            TAG_FRAME_END => self.decode_frame_end(),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
