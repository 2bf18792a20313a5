// Copyright 2026 the Interleave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compositor configuration.

/// Errors reported by [`CompositorConfig::validate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// `max_overlay_rects_per_query` was zero.
    #[error("max_overlay_rects_per_query must be at least 1")]
    ZeroOverlayRectCap,
    /// `merged_lease_frames` was zero.
    #[error("merged_lease_frames must be at least 1 to keep the contexts merged past the last platform view")]
    ZeroLeaseDuration,
}

/// Tunables for a [`Compositor`](crate::compositor::Compositor).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CompositorConfig {
    /// Overlay rectangles a single occlusion query may produce before they
    /// are collapsed into their union.
    pub max_overlay_rects_per_query: usize,
    /// Frames the raster and platform contexts stay merged after each frame
    /// that contained platform views.
    pub merged_lease_frames: usize,
}

impl CompositorConfig {
    /// Default for [`max_overlay_rects_per_query`](Self::max_overlay_rects_per_query).
    pub const DEFAULT_MAX_OVERLAY_RECTS_PER_QUERY: usize = 2;
    /// Default for [`merged_lease_frames`](Self::merged_lease_frames).
    pub const DEFAULT_MERGED_LEASE_FRAMES: usize = 10;

    /// Sets [`max_overlay_rects_per_query`](Self::max_overlay_rects_per_query).
    #[must_use]
    pub fn with_max_overlay_rects_per_query(mut self, cap: usize) -> Self {
        self.max_overlay_rects_per_query = cap;
        self
    }

    /// Sets [`merged_lease_frames`](Self::merged_lease_frames).
    #[must_use]
    pub fn with_merged_lease_frames(mut self, frames: usize) -> Self {
        self.merged_lease_frames = frames;
        self
    }

    /// Checks that every field is in range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_overlay_rects_per_query == 0 {
            return Err(ConfigError::ZeroOverlayRectCap);
        }
        if self.merged_lease_frames == 0 {
            return Err(ConfigError::ZeroLeaseDuration);
        }
        Ok(())
    }
}

impl Default for CompositorConfig {
    fn default() -> Self {
        Self {
            max_overlay_rects_per_query: Self::DEFAULT_MAX_OVERLAY_RECTS_PER_QUERY,
            merged_lease_frames: Self::DEFAULT_MERGED_LEASE_FRAMES,
        }
    }
}
