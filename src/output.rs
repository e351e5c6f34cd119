//! Output layout: which outputs exist and where they sit in global
//! coordinate space.
//!
//! Tree-local positions become global ones by adding the owning output's
//! layout offset. Legacy X11 surfaces are configured in global
//! coordinates, so the mapper here sits on the resize/move path of every
//! compatibility-layer window.

use std::collections::HashMap;
use std::fmt;

use log::error;

use crate::geometry::{Point, Size};
use crate::tree::{NodeId, WindowTree};

/// Stable handle to an output. Never reused within one layout's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OutputId(pub u64);

impl fmt::Display for OutputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "output-{}", self.0)
    }
}

/// One connected output and its place in the global layout.
#[derive(Debug, Clone)]
pub struct Output {
    pub id: OutputId,
    pub name: String,
    /// Top-left corner in global coordinates.
    pub position: Point,
    pub size: Size,
}

/// Registry of outputs and their global offsets.
#[derive(Debug, Default)]
pub struct OutputLayout {
    outputs: HashMap<OutputId, Output>,
    next_id: u64,
}

impl OutputLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: impl Into<String>, position: Point, size: Size) -> OutputId {
        self.next_id += 1;
        let id = OutputId(self.next_id);
        self.outputs.insert(
            id,
            Output {
                id,
                name: name.into(),
                position,
                size,
            },
        );
        id
    }

    pub fn remove(&mut self, id: OutputId) -> Option<Output> {
        self.outputs.remove(&id)
    }

    pub fn get(&self, id: OutputId) -> Option<&Output> {
        self.outputs.get(&id)
    }

    /// Global offset of an output, if it is still registered.
    pub fn offset_of(&self, id: OutputId) -> Option<Point> {
        self.outputs.get(&id).map(|output| output.position)
    }

    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }
}

/// Map a node's tree-local position into global coordinates.
///
/// Every precondition failure is logged and answered with `None`; callers
/// degrade to a no-op rather than configuring a surface with garbage
/// coordinates.
pub fn global_position(
    tree: &WindowTree,
    layout: &OutputLayout,
    node: NodeId,
    local: Point,
) -> Option<Point> {
    if !tree.contains(node) {
        error!("Global position requested for unknown {}", node);
        return None;
    }
    let output = match tree.output_of(node) {
        Some(output) => output,
        None => {
            error!("{} has no output ancestor, cannot map to global", node);
            return None;
        }
    };
    let offset = match layout.offset_of(output) {
        Some(offset) => offset,
        None => {
            error!("{} sits on unregistered {}", node, output);
            return None;
        }
    };
    Some(local.offset(offset.x, offset.y))
}
