//! The window tree: root, outputs, workspaces, and view containers.
//!
//! Nodes live in an arena keyed by [`NodeId`]; parent/child links are ids,
//! never references, so a stale handle degrades to a logged no-op instead
//! of dangling. The root node exists for the tree's whole lifetime.


use std::collections::HashMap;
use std::fmt;

use log::{debug, warn};

use crate::geometry::Point;
use crate::output::OutputId;
use crate::view::{ViewId, ViewRegistry};

/// Stable handle to a tree node. Never reused within one tree's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    Root,
    Output,
    Workspace,
    View,
}

/// One container in the window tree.
#[derive(Debug)]
pub struct TreeNode {
    pub id: NodeId,
    pub kind: ContainerKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,

    /// Position relative to the parent container.
    pub position: Point,

    /// The output this node represents. Set for `Output` nodes only.
    pub output: Option<OutputId>,

    /// The view this node hosts. Set for `View` nodes only.
    pub view: Option<ViewId>,
}

/// Arena-backed container tree.
#[derive(Debug)]
pub struct WindowTree {
    nodes: HashMap<NodeId, TreeNode>,
    root: NodeId,
    next_id: u64,
}

impl WindowTree {
    pub fn new() -> Self {
        let mut tree = Self {
            nodes: HashMap::new(),
            root: NodeId(0),
            next_id: 0,
        };
        tree.root = tree.alloc(ContainerKind::Root, None);
        tree
    }

    fn alloc(&mut self, kind: ContainerKind, parent: Option<NodeId>) -> NodeId {
        self.next_id += 1;
        let id = NodeId(self.next_id);
        self.nodes.insert(
            id,
            TreeNode {
                id,
                kind,
                parent,
                children: Vec::new(),
                position: Point::default(),
                output: None,
                view: None,
            },
        );
        if let Some(parent_id) = parent {
            if let Some(parent_node) = self.nodes.get_mut(&parent_id) {
                parent_node.children.push(id);
            }
        }
        id
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Create the container representing an output, directly under root.
    pub fn create_output_node(&mut self, output: OutputId) -> NodeId {
        let root = self.root;
        let id = self.alloc(ContainerKind::Output, Some(root));
        if let Some(node) = self.nodes.get_mut(&id) {
            node.output = Some(output);
        }
        id
    }

    /// Create a workspace container under an output node.
    pub fn create_workspace_node(&mut self, output_node: NodeId) -> NodeId {
        let parent = match self.nodes.get(&output_node) {
            Some(node) if node.kind == ContainerKind::Output => output_node,
            _ => {
                warn!(
                    "Workspace requested under missing or non-output {}, placing under root",
                    output_node
                );
                self.root
            }
        };
        self.alloc(ContainerKind::Workspace, Some(parent))
    }

    /// Create a container hosting a view and record the backreference.
    ///
    /// A `View`-kind parent resolves to its own parent, so insertion next
    /// to the focused window lands as a sibling rather than a child.
    pub fn create_view_node(
        &mut self,
        views: &mut ViewRegistry,
        parent: NodeId,
        view: ViewId,
    ) -> NodeId {
        let parent = self.resolve_view_parent(parent);
        let id = self.alloc(ContainerKind::View, Some(parent));
        if let Some(node) = self.nodes.get_mut(&id) {
            node.view = Some(view);
        }
        if let Some(record) = views.get_mut(view) {
            record.node = Some(id);
        }
        debug!("Created {} for {} under {}", id, view, parent);
        id
    }

    fn resolve_view_parent(&self, requested: NodeId) -> NodeId {
        match self.nodes.get(&requested) {
            Some(node) if node.kind == ContainerKind::View => {
                node.parent.unwrap_or(self.root)
            }
            Some(_) => requested,
            None => {
                warn!(
                    "View container requested under missing {}, placing under root",
                    requested
                );
                self.root
            }
        }
    }

    /// Remove a node and its whole subtree, clearing every view
    /// backreference underneath. The root is never destroyed.
    pub fn destroy_node(&mut self, views: &mut ViewRegistry, id: NodeId) {
        if id == self.root {
            warn!("Refusing to destroy the tree root");
            return;
        }
        if !self.nodes.contains_key(&id) {
            debug!("Destroy of unknown {} ignored", id);
            return;
        }

        // Detach from the parent first so the subtree is unreachable.
        if let Some(parent_id) = self.nodes.get(&id).and_then(|n| n.parent) {
            if let Some(parent) = self.nodes.get_mut(&parent_id) {
                parent.children.retain(|child| *child != id);
            }
        }

        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(&current) {
                if let Some(view) = node.view {
                    if let Some(record) = views.get_mut(view) {
                        record.node = None;
                    }
                }
                stack.extend(node.children);
            }
        }
    }

    pub fn node(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn set_position(&mut self, id: NodeId, position: Point) {
        match self.nodes.get_mut(&id) {
            Some(node) => node.position = position,
            None => warn!("Position update for unknown {}", id),
        }
    }

    /// Nearest ancestor of the given kind, the node itself included.
    pub fn ancestor_of_kind(&self, id: NodeId, kind: ContainerKind) -> Option<NodeId> {
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.nodes.get(&node_id)?;
            if node.kind == kind {
                return Some(node_id);
            }
            current = node.parent;
        }
        None
    }

    /// The output a node is attached under, if any.
    pub fn output_of(&self, id: NodeId) -> Option<OutputId> {
        let output_node = self.ancestor_of_kind(id, ContainerKind::Output)?;
        self.nodes.get(&output_node).and_then(|node| node.output)
    }

    /// First workspace in tree order. Fallback insertion point when no
    /// focus history survives.
    pub fn first_workspace(&self) -> Option<NodeId> {
        let root = self.nodes.get(&self.root)?;
        for output_id in &root.children {
            if let Some(output_node) = self.nodes.get(output_id) {
                for child in &output_node.children {
                    if let Some(node) = self.nodes.get(child) {
                        if node.kind == ContainerKind::Workspace {
                            return Some(*child);
                        }
                    }
                }
            }
        }
        None
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn view_node_count(&self) -> usize {
        self.nodes
            .values()
            .filter(|node| node.kind == ContainerKind::View)
            .count()
    }
}

impl Default for WindowTree {
    fn default() -> Self {
        Self::new()
    }
}
