// Copyright 2026 the Interleave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Occlusion resolution and overlay placement.

use alloc::vec::Vec;

use kurbo::Rect;

use super::registry::OverlayRects;
use super::{Compositor, FramePhase, tracer};
use crate::backend::{DrawBackend, DrawContextId, OverlaySurface, SurfaceFrame};
use crate::geometry;
use crate::host::PlatformViewHost;
use crate::pool::OverlayFactory;
use crate::trace::{BackgroundSubmitEvent, ViewPlacementEvent};
#[cfg(feature = "trace-rich")]
use crate::trace::{OcclusionQueryEvent, OverlayPlacementEvent};
use crate::view::OverlayId;

/// Creates overlay layers through the host (native view) and the backend
/// (drawing target).
struct LayerFactory<'a, B, H> {
    backend: &'a mut B,
    host: &'a mut H,
}

impl<B: DrawBackend, H: PlatformViewHost> OverlayFactory for LayerFactory<'_, B, H> {
    type Surface = B::Surface;

    fn create_layer(&mut self, context: DrawContextId) -> (OverlayId, B::Surface) {
        let id = self.host.create_overlay_surface();
        (id, self.backend.create_surface(id, context))
    }

    fn rebind(&mut self, surface: &mut B::Surface, context: DrawContextId) {
        self.backend.rebind_surface(surface, context);
    }
}

impl<B: DrawBackend, H: PlatformViewHost> Compositor<B, H> {
    /// Draws the frame onto `frame` and the overlay layers, and places every
    /// platform view and overlay through the host.
    ///
    /// For each slot, in composition order, the slot's drawn content is
    /// queried against the placement rectangle of its own view and of every
    /// earlier view. Each hit is rounded out to whole pixels, clipped out of
    /// the background and assigned to the slot as an overlay rectangle. When
    /// a single query yields more rectangles than
    /// [`max_overlay_rects_per_query`](crate::config::CompositorConfig::max_overlay_rects_per_query),
    /// they are replaced by their union. A rectangle already covered by one
    /// the slot was assigned is skipped, so no slot places two overlays
    /// showing the same pixels.
    ///
    /// The background is submitted once, before any overlay is drawn.
    /// Overlay layers are bound to `context`.
    ///
    /// Returns the background submit result. While a resubmission is
    /// pending nothing is drawn and `true` is returned.
    pub fn submit_frame(&mut self, context: DrawContextId, mut frame: B::Frame) -> bool {
        if self.resubmit_pending {
            tracing::trace!(frame = self.frame_index, "frame will be resubmitted; skipping submit");
            return true;
        }
        self.phase = FramePhase::Submitting;

        let view_rects: Vec<Rect> = self
            .slots
            .order()
            .iter()
            .map(|view| self.view_rect(*view))
            .collect();
        let recordings = self.slots.take_recordings();
        let cap = self.config.max_overlay_rects_per_query;
        let frame_index = self.frame_index;
        let mut tracer = tracer(&mut self.trace_sink);

        frame.save();
        let mut pictures = Vec::with_capacity(recordings.len());
        let mut clip_rects = 0_u32;
        for (slot, recording) in recordings.into_iter().enumerate() {
            let (picture, index) = recording.finish();
            let mut assigned = OverlayRects::new();

            for below in (0..=slot).rev() {
                let mut found = index.search_non_overlapping(view_rects[below]);
                let count = found.len();
                let collapsed = count > cap;
                if collapsed && let Some(joined) = geometry::union_all(found.iter().copied()) {
                    tracing::trace!(frame = frame_index, slot, count, "collapsing overlay rects");
                    found.clear();
                    found.push(joined);
                }
                #[cfg(feature = "trace-rich")]
                if count > 0 {
                    let order = self.slots.order();
                    tracer.occlusion_query(&OcclusionQueryEvent {
                        frame_index,
                        slot_view: order[slot],
                        below: order[below],
                        found: u32::try_from(count).unwrap_or(u32::MAX),
                        collapsed,
                    });
                }

                for rect in found {
                    let rect = geometry::round_out(rect);
                    if assigned.iter().any(|r| geometry::contains(*r, rect)) {
                        continue;
                    }
                    assigned.push(rect);
                    frame.clip_out(rect);
                    clip_rects += 1;
                }
            }

            frame.draw_picture(&picture);
            self.slots.set_overlay_rects(slot, assigned);
            pictures.push(picture);
        }
        frame.restore();

        let submitted = frame.submit();
        if !submitted {
            tracing::warn!(frame = frame_index, "background frame was not submitted");
        }
        tracer.background_submit(&BackgroundSubmitEvent {
            frame_index,
            slots: u32::try_from(pictures.len()).unwrap_or(u32::MAX),
            clip_rects,
            submitted,
        });

        let frame_size = self.frame_size;
        let order = self.slots.order();
        let mut factory = LayerFactory {
            backend: &mut self.backend,
            host: &mut self.host,
        };
        for (slot, picture) in pictures.iter().enumerate() {
            let view = order[slot];
            let view_rect = view_rects[slot];
            factory.host.display_platform_view(view, view_rect);
            tracer.view_placement(&ViewPlacementEvent {
                frame_index,
                view,
                rect: view_rect,
            });

            for &rect in self.slots.overlay_rects(slot) {
                let layer = self.pool.get_layer(context, &mut factory);
                let overlay = layer.id();
                let mut overlay_frame = layer.surface_mut().acquire_frame(frame_size);
                factory.host.display_overlay_surface(overlay, rect);

                overlay_frame.clear();
                overlay_frame.translate(-rect.origin().to_vec2());
                overlay_frame.draw_picture(picture);
                if !overlay_frame.submit() {
                    tracing::warn!(frame = frame_index, overlay = overlay.0, "overlay frame was not submitted");
                }
                #[cfg(feature = "trace-rich")]
                tracer.overlay_placement(&OverlayPlacementEvent {
                    frame_index,
                    view,
                    overlay,
                    rect,
                });
            }
        }
        submitted
    }
}
