// Copyright 2026 the Interleave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Open recordings paired with their occlusion index.

use kurbo::Rect;

use crate::backend::Recorder;
use crate::occlusion::OcclusionIndex;

/// The open recording of one composition slot.
///
/// Wraps a backend [`Recorder`] so that every primitive is registered with
/// the slot's [`OcclusionIndex`] as it is recorded.
#[derive(Debug)]
pub struct Recording<R> {
    recorder: R,
    index: OcclusionIndex,
}

impl<R: Recorder> Recording<R> {
    pub(crate) fn new(recorder: R, bounds: Rect) -> Self {
        Self {
            recorder,
            index: OcclusionIndex::new(bounds),
        }
    }

    /// Records one primitive covering `bounds`.
    ///
    /// `bounds` is inserted into the occlusion index, then `f` receives the
    /// backend recorder to emit the actual draw commands.
    pub fn draw<T>(&mut self, bounds: Rect, f: impl FnOnce(&mut R) -> T) -> T {
        self.index.insert(bounds);
        f(&mut self.recorder)
    }

    /// Returns the occlusion index accumulated so far.
    #[must_use]
    pub fn index(&self) -> &OcclusionIndex {
        &self.index
    }

    /// Finalizes the recording into its picture and occlusion index.
    pub(crate) fn finish(self) -> (R::Picture, OcclusionIndex) {
        (self.recorder.finish(), self.index)
    }
}
