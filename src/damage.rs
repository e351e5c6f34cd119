//! Damage requests: which screen regions need repainting.
//!
//! This crate records damage; draining and painting it is the embedding
//! renderer's job. Bounds are global coordinates.

use crate::geometry::Rect;
use crate::view::ViewId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageScope {
    /// The view's entire bounds, borders included. Used on map, unmap,
    /// and geometry changes.
    Whole,
    /// An incremental update within the view, typically from a commit.
    Region,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageRequest {
    pub view: ViewId,
    pub scope: DamageScope,
    pub bounds: Rect,
}

/// Queue of pending damage, drained once per frame by the consumer.
#[derive(Debug, Default)]
pub struct DamageTracker {
    pending: Vec<DamageRequest>,
}

impl DamageTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn damage_whole(&mut self, view: ViewId, bounds: Rect) {
        self.pending.push(DamageRequest {
            view,
            scope: DamageScope::Whole,
            bounds,
        });
    }

    pub fn damage_region(&mut self, view: ViewId, bounds: Rect) {
        self.pending.push(DamageRequest {
            view,
            scope: DamageScope::Region,
            bounds,
        });
    }

    pub fn pending(&self) -> &[DamageRequest] {
        &self.pending
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn take_pending(&mut self) -> Vec<DamageRequest> {
        std::mem::take(&mut self.pending)
    }
}
