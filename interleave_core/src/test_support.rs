// Copyright 2026 the Interleave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Test doubles for the compositor's collaborators.
//!
//! Pictures are lists of labels. Frames log every call and append their log
//! to a shared [`Log`] when submitted, so tests can assert on exactly what
//! reached the background and each overlay.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

use kurbo::{Rect, Size, Vec2};

use crate::backend::{DrawBackend, DrawContextId, OverlaySurface, Recorder, SurfaceFrame};
use crate::host::PlatformViewHost;
use crate::merge::ThreadMerger;
use crate::view::{OverlayId, ViewId};

pub(crate) type Picture = Vec<&'static str>;

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Op {
    Save,
    Restore,
    ClipOut(Rect),
    Clear,
    Translate(Vec2),
    Draw(Picture),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Target {
    Background,
    Overlay(OverlayId),
}

#[derive(Debug, Default)]
pub(crate) struct Log {
    pub(crate) submitted: Vec<(Target, Vec<Op>)>,
    pub(crate) acquired_sizes: Vec<Size>,
    pub(crate) surfaces_created: Vec<(OverlayId, DrawContextId)>,
    pub(crate) rebinds: Vec<(OverlayId, DrawContextId)>,
}

impl Log {
    pub(crate) fn background(&self) -> Vec<&[Op]> {
        self.submitted
            .iter()
            .filter(|(t, _)| *t == Target::Background)
            .map(|(_, ops)| ops.as_slice())
            .collect()
    }

    pub(crate) fn overlays(&self) -> Vec<(OverlayId, &[Op])> {
        self.submitted
            .iter()
            .filter_map(|(t, ops)| match t {
                Target::Overlay(id) => Some((*id, ops.as_slice())),
                Target::Background => None,
            })
            .collect()
    }
}

#[derive(Debug, Default)]
pub(crate) struct FakeRecorder(pub(crate) Picture);

impl FakeRecorder {
    pub(crate) fn push(&mut self, label: &'static str) {
        self.0.push(label);
    }
}

impl Recorder for FakeRecorder {
    type Picture = Picture;

    fn finish(self) -> Picture {
        self.0
    }
}

#[derive(Debug)]
pub(crate) struct FakeFrame {
    target: Target,
    ops: Vec<Op>,
    log: Rc<RefCell<Log>>,
}

impl FakeFrame {
    pub(crate) fn background(log: &Rc<RefCell<Log>>) -> Self {
        Self {
            target: Target::Background,
            ops: Vec::new(),
            log: Rc::clone(log),
        }
    }
}

impl SurfaceFrame for FakeFrame {
    type Picture = Picture;

    fn save(&mut self) {
        self.ops.push(Op::Save);
    }

    fn restore(&mut self) {
        self.ops.push(Op::Restore);
    }

    fn clip_out(&mut self, rect: Rect) {
        self.ops.push(Op::ClipOut(rect));
    }

    fn clear(&mut self) {
        self.ops.push(Op::Clear);
    }

    fn translate(&mut self, offset: Vec2) {
        self.ops.push(Op::Translate(offset));
    }

    fn draw_picture(&mut self, picture: &Picture) {
        self.ops.push(Op::Draw(picture.clone()));
    }

    fn submit(self) -> bool {
        self.log.borrow_mut().submitted.push((self.target, self.ops));
        true
    }
}

#[derive(Debug)]
pub(crate) struct FakeSurface {
    overlay: OverlayId,
    log: Rc<RefCell<Log>>,
}

impl OverlaySurface for FakeSurface {
    type Frame = FakeFrame;

    fn acquire_frame(&mut self, size: Size) -> FakeFrame {
        self.log.borrow_mut().acquired_sizes.push(size);
        FakeFrame {
            target: Target::Overlay(self.overlay),
            ops: Vec::new(),
            log: Rc::clone(&self.log),
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct FakeBackend {
    pub(crate) log: Rc<RefCell<Log>>,
}

impl FakeBackend {
    pub(crate) fn frame(&self) -> FakeFrame {
        FakeFrame::background(&self.log)
    }
}

impl DrawBackend for FakeBackend {
    type Picture = Picture;
    type Recorder = FakeRecorder;
    type Frame = FakeFrame;
    type Surface = FakeSurface;

    fn begin_recording(&mut self, _bounds: Rect) -> FakeRecorder {
        FakeRecorder::default()
    }

    fn create_surface(&mut self, overlay: OverlayId, context: DrawContextId) -> FakeSurface {
        self.log
            .borrow_mut()
            .surfaces_created
            .push((overlay, context));
        FakeSurface {
            overlay,
            log: Rc::clone(&self.log),
        }
    }

    fn rebind_surface(&mut self, surface: &mut FakeSurface, context: DrawContextId) {
        self.log.borrow_mut().rebinds.push((surface.overlay, context));
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum HostCall {
    FrameBegin,
    FrameEnd,
    DisplayView(ViewId, Rect),
    DisplayOverlay(OverlayId, Rect),
    CreateOverlay(OverlayId),
}

#[derive(Debug, Default)]
pub(crate) struct FakeHost {
    pub(crate) calls: Vec<HostCall>,
    next_overlay: i64,
}

impl FakeHost {
    pub(crate) fn placements(&self) -> Vec<&HostCall> {
        self.calls
            .iter()
            .filter(|c| matches!(c, HostCall::DisplayView(..) | HostCall::DisplayOverlay(..)))
            .collect()
    }
}

impl PlatformViewHost for FakeHost {
    fn frame_begin(&mut self) {
        self.calls.push(HostCall::FrameBegin);
    }

    fn frame_end(&mut self) {
        self.calls.push(HostCall::FrameEnd);
    }

    fn display_platform_view(&mut self, view: ViewId, rect: Rect) {
        self.calls.push(HostCall::DisplayView(view, rect));
    }

    fn display_overlay_surface(&mut self, overlay: OverlayId, rect: Rect) {
        self.calls.push(HostCall::DisplayOverlay(overlay, rect));
    }

    fn create_overlay_surface(&mut self) -> OverlayId {
        self.next_overlay += 1;
        let id = OverlayId(self.next_overlay);
        self.calls.push(HostCall::CreateOverlay(id));
        id
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum MergerCall {
    ExtendLease(usize),
    MergeWithLease(usize),
}

/// A merger whose state is set directly by the test.
#[derive(Debug, Default)]
pub(crate) struct ScriptedMerger {
    pub(crate) merged: Cell<bool>,
    pub(crate) on_platform: Cell<bool>,
    pub(crate) calls: RefCell<Vec<MergerCall>>,
}

impl ScriptedMerger {
    pub(crate) fn merged() -> Self {
        let m = Self::default();
        m.merged.set(true);
        m
    }

    pub(crate) fn calls(&self) -> Vec<MergerCall> {
        self.calls.borrow().clone()
    }
}

impl ThreadMerger for ScriptedMerger {
    fn is_merged(&self) -> bool {
        self.merged.get()
    }

    fn extend_lease_to(&self, frames: usize) {
        self.calls.borrow_mut().push(MergerCall::ExtendLease(frames));
    }

    fn merge_with_lease(&self, frames: usize) {
        self.calls
            .borrow_mut()
            .push(MergerCall::MergeWithLease(frames));
        self.merged.set(true);
    }

    fn is_on_platform_thread(&self) -> bool {
        self.on_platform.get()
    }
}
