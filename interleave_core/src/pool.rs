// Copyright 2026 the Interleave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reusable overlay surfaces.
//!
//! Creating a native overlay view is expensive, so overlays outlive the frame
//! that created them. The pool is an owned list of layers plus a cursor: every
//! layer before the cursor is in use this frame, every layer from the cursor
//! on is free. [`OverlayPool::get_layer`] hands out the layer at the cursor
//! (creating one when the list is exhausted) and
//! [`OverlayPool::recycle_layers`] rewinds the cursor.
//!
//! The pool never shrinks. Its size is the largest number of overlays any
//! single frame has needed so far.

use alloc::vec::Vec;

use crate::backend::DrawContextId;
use crate::view::OverlayId;

/// Creates overlay layers on demand and rebinds recycled ones.
pub trait OverlayFactory {
    /// The drawing target bound to each overlay.
    type Surface;

    /// Creates a native overlay view and a surface bound to `context`.
    fn create_layer(&mut self, context: DrawContextId) -> (OverlayId, Self::Surface);

    /// Rebinds an existing surface to `context`.
    fn rebind(&mut self, surface: &mut Self::Surface, context: DrawContextId);
}

/// One native overlay view and the drawing target bound to it.
#[derive(Debug)]
pub struct OverlayLayer<S> {
    id: OverlayId,
    surface: S,
    context: DrawContextId,
}

impl<S> OverlayLayer<S> {
    /// Returns the host-assigned overlay id.
    #[must_use]
    pub fn id(&self) -> OverlayId {
        self.id
    }

    /// Returns the drawing context the surface is bound to.
    #[must_use]
    pub fn context(&self) -> DrawContextId {
        self.context
    }

    /// Returns the drawing target.
    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Returns the drawing target mutably.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}

/// Pool counters, for diagnostics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Layers owned by the pool.
    pub layers: usize,
    /// Layers handed out since the last recycle.
    pub in_use: usize,
    /// Layers created over the pool's lifetime.
    pub created: u64,
    /// Recycled layers rebound to a new drawing context.
    pub rebinds: u64,
}

impl PoolStats {
    /// Layers available to the next [`OverlayPool::get_layer`] calls without
    /// creating new ones.
    #[must_use]
    pub fn free(&self) -> usize {
        self.layers - self.in_use
    }
}

/// Cache of overlay layers, partitioned each frame into in-use and free.
#[derive(Debug)]
pub struct OverlayPool<S> {
    layers: Vec<OverlayLayer<S>>,
    available: usize,
    created: u64,
    rebinds: u64,
}

impl<S> Default for OverlayPool<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> OverlayPool<S> {
    /// Creates an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self {
            layers: Vec::new(),
            available: 0,
            created: 0,
            rebinds: 0,
        }
    }

    /// Returns a free layer bound to `context`, creating one with `factory`
    /// if every existing layer is in use.
    ///
    /// A recycled layer whose surface was bound to a different context is
    /// rebound first.
    pub fn get_layer<F>(&mut self, context: DrawContextId, factory: &mut F) -> &mut OverlayLayer<S>
    where
        F: OverlayFactory<Surface = S>,
    {
        if self.available == self.layers.len() {
            let (id, surface) = factory.create_layer(context);
            tracing::debug!(overlay = id.0, pool_size = self.layers.len() + 1, "created overlay layer");
            self.layers.push(OverlayLayer {
                id,
                surface,
                context,
            });
            self.created += 1;
        }

        let layer = &mut self.layers[self.available];
        if layer.context != context {
            tracing::debug!(
                overlay = layer.id.0,
                from = layer.context.0,
                to = context.0,
                "rebinding overlay surface"
            );
            factory.rebind(&mut layer.surface, context);
            layer.context = context;
            self.rebinds += 1;
        }
        self.available += 1;
        layer
    }

    /// Marks every layer free for the next frame. Layers are kept, not
    /// destroyed.
    pub fn recycle_layers(&mut self) {
        self.available = 0;
    }

    /// Returns the number of layers owned by the pool.
    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Returns `true` if no layer was ever created.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Returns the layers handed out since the last recycle, in acquisition
    /// order.
    #[must_use]
    pub fn in_use(&self) -> &[OverlayLayer<S>] {
        &self.layers[..self.available]
    }

    /// Returns the pool counters.
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            layers: self.layers.len(),
            in_use: self.available,
            created: self.created,
            rebinds: self.rebinds,
        }
    }
}
