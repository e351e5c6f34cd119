//! Seat focus state.
//!
//! Tracks the focused container and a bounded focus history. The history
//! answers the "focus-inactive" question: where should a newly mapped
//! window be inserted when focus is elsewhere or already gone.

use log::debug;

use crate::tree::{NodeId, WindowTree};

/// Focus history entries kept per seat.
const FOCUS_HISTORY_LIMIT: usize = 10;

#[derive(Debug, Default)]
pub struct Seat {
    focused: Option<NodeId>,
    /// Most-recent-last; never holds the same node twice.
    focus_history: Vec<NodeId>,
}

impl Seat {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    pub fn history_len(&self) -> usize {
        self.focus_history.len()
    }

    /// Focus a container and record it in history.
    pub fn set_focus(&mut self, node: NodeId) {
        debug!("Focus -> {}", node);
        self.focused = Some(node);
        self.focus_history.retain(|entry| *entry != node);
        self.focus_history.push(node);
        if self.focus_history.len() > FOCUS_HISTORY_LIMIT {
            self.focus_history.remove(0);
        }
    }

    /// The container a newly tiled window should be inserted under: the
    /// most recently focused node still alive in the tree, else the first
    /// workspace, else the root.
    pub fn insertion_target(&self, tree: &WindowTree) -> NodeId {
        for entry in self.focus_history.iter().rev() {
            if tree.contains(*entry) {
                return *entry;
            }
        }
        tree.first_workspace().unwrap_or_else(|| tree.root())
    }

    /// Purge a destroyed container so focus never points at a freed node.
    pub fn node_destroyed(&mut self, node: NodeId) {
        if self.focused == Some(node) {
            debug!("Focused {} destroyed, clearing focus", node);
            self.focused = None;
        }
        self.focus_history.retain(|entry| *entry != node);
    }
}
