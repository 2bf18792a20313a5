// Copyright 2026 the Interleave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Raster/platform thread merging contract.
//!
//! Drawing runs on the *raster* context; native view placement may only run
//! on the *platform* context. While a frame contains platform views the two
//! must be unified so that placement and drawing stay ordered. The merger
//! that performs the unification is external: it owns the lease bookkeeping
//! and its expiry. The compositor only uses the four operations of
//! [`ThreadMerger`] and never blocks on them.
//!
//! A merger is passed into each call that needs it, so the compositor holds
//! no reference to it between frames.

/// The four-operation capability exposed by a raster/platform thread merger.
///
/// Methods take `&self`: implementations are expected to be internally
/// synchronized, as they are shared with the frame-driving code.
pub trait ThreadMerger {
    /// Returns whether the raster and platform contexts are currently merged.
    fn is_merged(&self) -> bool;

    /// Extends an existing merge so it lasts at least `frames` more frames.
    fn extend_lease_to(&self, frames: usize);

    /// Merges the contexts for `frames` frames.
    fn merge_with_lease(&self, frames: usize);

    /// Returns whether the caller is running on the platform context.
    fn is_on_platform_thread(&self) -> bool;
}

/// Outcome of [`Compositor::post_preroll_action`](crate::compositor::Compositor::post_preroll_action).
#[must_use]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PostPrerollResult {
    /// Continue with composite and submit.
    Success,
    /// The frame was cancelled. Once the contexts merge, the caller must
    /// re-drive preroll and composite for the same content.
    ResubmitFrame,
}
