// Copyright 2026 the Interleave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-frame compositor for GPU-drawn content interleaved with native views.
//!
//! `interleave_core` decides, every frame, which pieces of GPU-drawn content
//! sit above a natively hosted *platform view* and therefore cannot be drawn
//! on the shared background surface. Those pieces are routed to separate,
//! position-matched overlay surfaces. It is `no_std` compatible (with
//! `alloc`) and owns no platform or GPU resources itself: every collaborator
//! is reached through a narrow trait.
//!
//! # Architecture
//!
//! ```text
//!   begin_frame ──► preroll(view, params) ──► composite(view) ──► Recording
//!                          │                                         │
//!                          ▼                                         ▼
//!               post_preroll_action(merger)               OcclusionIndex (per slot)
//!                   │              │
//!          ResubmitFrame        Success
//!                   │              │
//!                   │              ▼
//!                   │      submit_frame ──► background frame (clipped)
//!                   │              │
//!                   │              ├──► PlatformViewHost::display_platform_view
//!                   │              └──► OverlayPool ──► overlay frames
//!                   ▼              ▼
//!               end_frame(resubmitted, merger) ──► recycle overlays
//! ```
//!
//! **[`compositor`]**: The [`Compositor`](compositor::Compositor) state
//! machine: composition order, per-slot recordings, the occlusion and
//! overlay-routing pass, and the merge-request protocol.
//!
//! **[`occlusion`]**: Per-slot spatial index answering "which disjoint
//! regions of my drawn content intersect this rectangle".
//!
//! **[`pool`]**: Reusable overlay surfaces with acquire-or-create and bulk
//! recycle.
//!
//! **[`backend`]**, **[`host`]**, **[`merge`]**: Contracts for the GPU
//! drawing backend, the native view host, and the raster/platform thread
//! merger.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! frame instrumentation, with a zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `serde` (disabled by default): Serialization for
//!   [`CompositorConfig`](config::CompositorConfig).
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-rectangle
//!   overlay placement events.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod backend;
pub mod compositor;
pub mod config;
pub mod geometry;
pub mod host;
pub mod merge;
pub mod occlusion;
pub mod pool;
pub mod recording;
pub mod trace;
pub mod view;

#[cfg(test)]
mod test_support;
