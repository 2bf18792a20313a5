// Copyright 2026 the Interleave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-frame slot storage keyed by view id.

use alloc::vec::Vec;

use hashbrown::HashMap;
use kurbo::Rect;
use smallvec::SmallVec;

use crate::recording::Recording;
use crate::view::ViewId;

/// Overlay rectangles assigned to one slot.
pub(crate) type OverlayRects = SmallVec<[Rect; 2]>;

/// Composition slots of the current frame.
///
/// Slots live in parallel arrays indexed by composition position; `by_view`
/// maps a view id to its position. Everything is cleared at the start of each
/// frame and on cancel. Recordings are moved out at submit time, after which
/// only the order and overlay assignments remain.
#[derive(Debug)]
pub(crate) struct SlotRegistry<R> {
    order: Vec<ViewId>,
    by_view: HashMap<ViewId, usize>,
    recordings: Vec<Recording<R>>,
    overlay_rects: Vec<OverlayRects>,
}

impl<R> SlotRegistry<R> {
    pub(crate) fn new() -> Self {
        Self {
            order: Vec::new(),
            by_view: HashMap::new(),
            recordings: Vec::new(),
            overlay_rects: Vec::new(),
        }
    }

    /// Appends a slot for `view` and returns its composition position.
    ///
    /// # Panics
    ///
    /// Panics if `view` already has a slot this frame.
    pub(crate) fn insert(&mut self, view: ViewId, recording: Recording<R>) -> usize {
        let slot = self.order.len();
        let previous = self.by_view.insert(view, slot);
        assert!(
            previous.is_none(),
            "view {view:?} prerolled twice in one frame"
        );
        self.order.push(view);
        self.recordings.push(recording);
        self.overlay_rects.push(OverlayRects::new());
        slot
    }

    pub(crate) fn clear(&mut self) {
        self.order.clear();
        self.by_view.clear();
        self.recordings.clear();
        self.overlay_rects.clear();
    }

    pub(crate) fn order(&self) -> &[ViewId] {
        &self.order
    }

    pub(crate) fn len(&self) -> usize {
        self.order.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub(crate) fn contains(&self, view: ViewId) -> bool {
        self.by_view.contains_key(&view)
    }

    pub(crate) fn slot_of(&self, view: ViewId) -> Option<usize> {
        self.by_view.get(&view).copied()
    }

    /// Returns the open recording of `view`, if it has one.
    pub(crate) fn recording_mut(&mut self, view: ViewId) -> Option<&mut Recording<R>> {
        let slot = self.slot_of(view)?;
        self.recordings.get_mut(slot)
    }

    pub(crate) fn recordings_mut(&mut self) -> core::slice::IterMut<'_, Recording<R>> {
        self.recordings.iter_mut()
    }

    /// Moves every open recording out, in composition order.
    pub(crate) fn take_recordings(&mut self) -> Vec<Recording<R>> {
        core::mem::take(&mut self.recordings)
    }

    pub(crate) fn overlay_rects(&self, slot: usize) -> &[Rect] {
        &self.overlay_rects[slot]
    }

    pub(crate) fn set_overlay_rects(&mut self, slot: usize, rects: OverlayRects) {
        self.overlay_rects[slot] = rects;
    }
}
