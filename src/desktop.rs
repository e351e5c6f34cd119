//! The desktop aggregate: every process-scoped registry, owned in one
//! place with explicit construction and teardown ordering.

use log::info;

use crate::arrange::ArrangeScheduler;
use crate::damage::DamageTracker;
use crate::geometry::{Point, Size};
use crate::output::{OutputId, OutputLayout};
use crate::router::RegistryRouter;
use crate::seat::Seat;
use crate::tree::{NodeId, WindowTree};
use crate::view::ViewRegistry;

/// Shared window-management state.
///
/// Protocol backends (the X11 compatibility manager included) borrow the
/// registries they need per call; nothing here is global or `'static`.
/// Teardown order matters: call `XWaylandManager::shutdown` before
/// dropping the desktop so every binding unhooks while the registries are
/// still alive.
#[derive(Debug)]
pub struct Desktop {
    pub tree: WindowTree,
    pub outputs: OutputLayout,
    pub seat: Seat,
    pub views: ViewRegistry,
    pub router: RegistryRouter,
    pub damage: DamageTracker,
    pub arrange: ArrangeScheduler,
}

impl Desktop {
    pub fn new() -> Self {
        info!("🌳 Initializing desktop state");
        Self {
            tree: WindowTree::new(),
            outputs: OutputLayout::new(),
            seat: Seat::new(),
            views: ViewRegistry::new(),
            router: RegistryRouter::new(),
            damage: DamageTracker::new(),
            arrange: ArrangeScheduler::new(),
        }
    }

    /// Register an output and grow the tree under it: one output node,
    /// one initial workspace. Returns the output and its workspace node.
    pub fn add_output(
        &mut self,
        name: impl Into<String>,
        position: Point,
        size: Size,
    ) -> (OutputId, NodeId) {
        let name = name.into();
        info!(
            "🖥️ Output '{}' at {},{} ({}x{})",
            name, position.x, position.y, size.width, size.height
        );
        let output = self.outputs.add(name, position, size);
        let output_node = self.tree.create_output_node(output);
        let workspace = self.tree.create_workspace_node(output_node);
        (output, workspace)
    }
}

impl Default for Desktop {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::ContainerKind;

    #[test]
    fn test_add_output_builds_tree_and_layout() {
        let mut desktop = Desktop::new();
        let (output, workspace) = desktop.add_output(
            "DP-1",
            Point::new(0, 0),
            Size::new(1920, 1080),
        );

        let record = desktop.outputs.get(output).unwrap();
        assert_eq!(record.name, "DP-1");
        assert_eq!(record.size, Size::new(1920, 1080));
        assert_eq!(desktop.outputs.offset_of(output), Some(Point::new(0, 0)));
        assert_eq!(
            desktop.tree.node(workspace).unwrap().kind,
            ContainerKind::Workspace
        );
        assert_eq!(desktop.tree.output_of(workspace), Some(output));
        assert_eq!(desktop.tree.first_workspace(), Some(workspace));
    }

    #[test]
    fn test_outputs_keep_layout_offsets() {
        let mut desktop = Desktop::new();
        desktop.add_output("DP-1", Point::new(0, 0), Size::new(1920, 1080));
        let (right, right_ws) =
            desktop.add_output("DP-2", Point::new(1920, 0), Size::new(2560, 1440));

        assert_eq!(desktop.outputs.len(), 2);
        assert_eq!(
            crate::output::global_position(
                &desktop.tree,
                &desktop.outputs,
                right_ws,
                Point::new(100, 50)
            ),
            Some(Point::new(2020, 50))
        );
        assert_eq!(desktop.tree.output_of(right_ws), Some(right));
    }
}
