//! View records and capability dispatch.
//!
//! A view is the compositor-side identity of one toplevel window,
//! whatever protocol backs it. The backing variant is carried as a tag
//! plus a capability table (`ViewDriver`), so the rest of the compositor
//! can query metadata, resize, position, activate, and close a view
//! without knowing which protocol it speaks.

use std::fmt;

use log::warn;

use crate::geometry::Size;
use crate::output::OutputLayout;
use crate::tree::{NodeId, WindowTree};
use crate::xwayland::SurfaceStore;

/// Stable handle to a view. Never reused within one registry's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(pub u64);

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "view-{}", self.0)
    }
}

/// Which protocol backs a view. Set at creation, immutable after.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    /// X11 window bridged through the compatibility layer.
    LegacyCompat,
    /// First-class Wayland toplevel.
    Native,
}

/// Metadata properties a view can be asked for. Not every backing
/// variant recognizes every kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewProp {
    Title,
    Class,
    Instance,
    AppId,
}

/// Per-variant capability table. Exactly one implementation exists per
/// `ViewKind`; every implementation starts by checking the view's tag
/// and degrades to a logged no-op on mismatch.
///
/// Operations are never called re-entrantly from one another; callers go
/// through [`ViewRegistry`], which hands each call the collaborators it
/// needs.
pub trait ViewDriver: Send + Sync {
    /// The variant this table serves.
    fn kind(&self) -> ViewKind;

    /// Title, class, or similar. `None` for kinds this variant does not
    /// recognize.
    fn metadata(&self, surfaces: &SurfaceStore, view: &View, prop: ViewProp) -> Option<String>;

    /// Request the backing surface adopt a new size. Takes effect when the
    /// surface commits; until then the size lives in `View::pending_size`.
    fn set_size(&self, surfaces: &mut SurfaceStore, view: &mut View, width: u32, height: u32);

    /// Move the view to a tree-local position, translating to global
    /// coordinates for backends that require them.
    fn set_position(
        &self,
        tree: &mut WindowTree,
        layout: &OutputLayout,
        surfaces: &mut SurfaceStore,
        view: &View,
        x: i32,
        y: i32,
    );

    /// Forward keyboard-focus activation state to the backing surface.
    fn set_activated(&self, surfaces: &mut SurfaceStore, view: &View, activated: bool);

    /// Ask the backing surface to close. Politeness only: teardown happens
    /// when the surface's destroy event arrives, not here.
    fn close(&self, surfaces: &mut SurfaceStore, view: &View);
}

/// One toplevel window as the compositor sees it.
pub struct View {
    pub id: ViewId,
    pub kind: ViewKind,
    pub driver: &'static dyn ViewDriver,

    /// Backing protocol object handle, set for the binding's whole
    /// lifetime. How to interpret it is the driver's business.
    pub backing: Option<u32>,

    /// Backing surface id. `Some` exactly while the surface is mapped.
    pub surface: Option<u32>,

    /// Window-tree attachment. `Some` excludes membership in the
    /// unmanaged overlay, and vice versa.
    pub node: Option<NodeId>,

    /// Committed, authoritative size.
    pub size: Size,

    /// Size the compositor asked for but the surface has not committed.
    pub pending_size: Size,
}

impl fmt::Debug for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("View")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("backing", &self.backing)
            .field("surface", &self.surface)
            .field("node", &self.node)
            .field("size", &self.size)
            .field("pending_size", &self.pending_size)
            .finish()
    }
}

/// Arena of all live views, and the entry point for capability calls.
///
/// Calls against an id that is no longer (or never was) in the arena log
/// a warning and no-op; handles are cheap to hold but carry no liveness
/// guarantee.
#[derive(Debug, Default)]
pub struct ViewRegistry {
    views: std::collections::HashMap<ViewId, View>,
    next_id: u64,
}

impl ViewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a view of the given kind with its capability table.
    pub fn create(&mut self, kind: ViewKind, driver: &'static dyn ViewDriver) -> ViewId {
        self.next_id += 1;
        let id = ViewId(self.next_id);
        self.views.insert(
            id,
            View {
                id,
                kind,
                driver,
                backing: None,
                surface: None,
                node: None,
                size: Size::default(),
                pending_size: Size::default(),
            },
        );
        id
    }

    pub fn remove(&mut self, id: ViewId) -> Option<View> {
        self.views.remove(&id)
    }

    pub fn get(&self, id: ViewId) -> Option<&View> {
        self.views.get(&id)
    }

    pub fn get_mut(&mut self, id: ViewId) -> Option<&mut View> {
        self.views.get_mut(&id)
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// Query a metadata property through the view's capability table.
    pub fn metadata(&self, surfaces: &SurfaceStore, id: ViewId, prop: ViewProp) -> Option<String> {
        match self.views.get(&id) {
            Some(view) => view.driver.metadata(surfaces, view, prop),
            None => {
                warn!("Metadata query for dead {}", id);
                None
            }
        }
    }

    pub fn set_size(&mut self, surfaces: &mut SurfaceStore, id: ViewId, width: u32, height: u32) {
        match self.views.get_mut(&id) {
            Some(view) => {
                let driver = view.driver;
                driver.set_size(surfaces, view, width, height);
            }
            None => warn!("Resize request for dead {}", id),
        }
    }

    pub fn set_position(
        &mut self,
        tree: &mut WindowTree,
        layout: &OutputLayout,
        surfaces: &mut SurfaceStore,
        id: ViewId,
        x: i32,
        y: i32,
    ) {
        match self.views.get(&id) {
            Some(view) => view.driver.set_position(tree, layout, surfaces, view, x, y),
            None => warn!("Position request for dead {}", id),
        }
    }

    pub fn set_activated(&mut self, surfaces: &mut SurfaceStore, id: ViewId, activated: bool) {
        match self.views.get(&id) {
            Some(view) => view.driver.set_activated(surfaces, view, activated),
            None => warn!("Activation change for dead {}", id),
        }
    }

    pub fn close(&self, surfaces: &mut SurfaceStore, id: ViewId) {
        match self.views.get(&id) {
            Some(view) => view.driver.close(surfaces, view),
            None => warn!("Close request for dead {}", id),
        }
    }
}
