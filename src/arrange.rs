//! Deferred re-layout requests.
//!
//! Mapping or moving a window dirties its parent container; the layout
//! pass itself runs later, once, driven by the embedding compositor
//! draining this queue.

use log::debug;

use crate::tree::NodeId;

/// Queue of containers whose children need re-arranging.
#[derive(Debug, Default)]
pub struct ArrangeScheduler {
    pending: Vec<NodeId>,
}

impl ArrangeScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a container dirty. Scheduling the same container twice before
    /// a drain is collapsed into one entry.
    pub fn schedule(&mut self, node: NodeId) {
        if self.pending.contains(&node) {
            return;
        }
        debug!("Arrange scheduled for {}", node);
        self.pending.push(node);
    }

    pub fn pending(&self) -> &[NodeId] {
        &self.pending
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn take_pending(&mut self) -> Vec<NodeId> {
        std::mem::take(&mut self.pending)
    }
}
