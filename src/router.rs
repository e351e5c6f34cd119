//! Routing views between the tiled window tree and the unmanaged
//! overlay.
//!
//! A mapped view lives in exactly one of the two structures. Every
//! insertion here removes from the other structure first, so the
//! exclusion holds by construction even when a surface remaps with a
//! different classification than last time.

use log::{debug, warn};

use crate::seat::Seat;
use crate::tree::{NodeId, WindowTree};
use crate::view::{ViewId, ViewRegistry};

/// Owns the unmanaged overlay list and performs all placement moves.
///
/// Overlay order is paint order, back to front: the most recently mapped
/// unmanaged view draws on top.
#[derive(Debug, Default)]
pub struct RegistryRouter {
    unmanaged: Vec<ViewId>,
}

impl RegistryRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a view on the unmanaged overlay.
    ///
    /// Any stale tree attachment is destroyed and any existing overlay
    /// entry is removed before inserting, so re-entry moves the view to
    /// the top instead of duplicating it.
    pub fn route_to_overlay(
        &mut self,
        tree: &mut WindowTree,
        views: &mut ViewRegistry,
        seat: &mut Seat,
        id: ViewId,
    ) {
        if views.get(id).is_none() {
            warn!("Overlay routing for dead {}", id);
            return;
        }
        self.detach_node(tree, views, seat, id);
        self.unmanaged.retain(|entry| *entry != id);
        self.unmanaged.push(id);
        debug!("{} routed to unmanaged overlay (top)", id);
    }

    /// Place a view in the tiled tree under the seat's insertion target.
    ///
    /// Removes any overlay entry and destroys any stale node first, then
    /// creates the container and records the backreference.
    pub fn route_to_tree(
        &mut self,
        tree: &mut WindowTree,
        views: &mut ViewRegistry,
        seat: &mut Seat,
        id: ViewId,
    ) -> Option<NodeId> {
        if views.get(id).is_none() {
            warn!("Tree routing for dead {}", id);
            return None;
        }
        self.unmanaged.retain(|entry| *entry != id);
        self.detach_node(tree, views, seat, id);

        let target = seat.insertion_target(tree);
        let node = tree.create_view_node(views, target, id);
        debug!("{} routed to tree as {}", id, node);
        Some(node)
    }

    /// Remove a view from both structures. Idempotent; used on unmap and
    /// on destroy-while-mapped.
    pub fn detach(
        &mut self,
        tree: &mut WindowTree,
        views: &mut ViewRegistry,
        seat: &mut Seat,
        id: ViewId,
    ) {
        self.unmanaged.retain(|entry| *entry != id);
        self.detach_node(tree, views, seat, id);
    }

    fn detach_node(
        &mut self,
        tree: &mut WindowTree,
        views: &mut ViewRegistry,
        seat: &mut Seat,
        id: ViewId,
    ) {
        let node = views.get(id).and_then(|view| view.node);
        if let Some(node) = node {
            tree.destroy_node(views, node);
            seat.node_destroyed(node);
        }
    }

    pub fn is_unmanaged(&self, id: ViewId) -> bool {
        self.unmanaged.contains(&id)
    }

    /// Unmanaged views in paint order, back to front.
    pub fn unmanaged_views(&self) -> impl Iterator<Item = ViewId> + '_ {
        self.unmanaged.iter().copied()
    }

    pub fn unmanaged_count(&self) -> usize {
        self.unmanaged.len()
    }
}
