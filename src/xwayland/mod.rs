//! X11 compatibility-layer surface binding.
//!
//! Legacy X11 windows reach the compositor through a compatibility layer
//! that announces surfaces and streams lifecycle events for them. This
//! module binds each announced surface to a [`View`] and drives the
//! binding through its lifecycle: map events classify the window as
//! tiled (into the window tree) or unmanaged (onto the overlay), commits
//! update authoritative geometry, and destroy tears everything down with
//! no dangling references.
//!
//! Event delivery is single-threaded and run-to-completion: a handler
//! finishes before the next event is examined, and delivery consults the
//! subscription registry first, so nothing ever runs against a binding
//! that has been torn down.


use std::collections::HashMap;

use anyhow::Result;
use log::{debug, error, info, warn};
use thiserror::Error;

use crate::config::XWaylandConfig;
use crate::desktop::Desktop;
use crate::geometry::{Point, Rect, Size};
use crate::output::{global_position, OutputLayout};
use crate::tree::WindowTree;
use crate::view::{View, ViewDriver, ViewId, ViewKind, ViewProp, ViewRegistry};

/// `_NET_WM_WINDOW_TYPE` as reported by the compatibility layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum X11WindowType {
    Normal,
    Dialog,
    Utility,
    Toolbar,
    Splash,
    Menu,
    DropdownMenu,
    PopupMenu,
    Tooltip,
    Notification,
    Combo,
    Dnd,
}

impl X11WindowType {
    /// Whether windows of this type bypass tiling and live on the
    /// unmanaged overlay even without the override-redirect flag.
    pub fn wants_unmanaged(self) -> bool {
        matches!(
            self,
            Self::Combo
                | Self::Dnd
                | Self::DropdownMenu
                | Self::Menu
                | Self::Notification
                | Self::PopupMenu
                | Self::Splash
                | Self::Tooltip
                | Self::Utility
        )
    }
}

/// The compatibility layer's record of one X11 window, plus the requests
/// the compositor has sent back to it. The bridge flushes those requests
/// to the X server; tests read them directly.
#[derive(Debug, Clone)]
pub struct X11Surface {
    pub xid: u32,
    pub title: Option<String>,
    pub class: Option<String>,
    pub instance: Option<String>,

    /// Current geometry in global coordinates, as the layer reported it.
    pub geometry: Rect,
    pub override_redirect: bool,
    pub window_type: X11WindowType,
    pub mapped: bool,

    /// Most recent configure sent by the compositor, if any.
    pub last_configure: Option<Rect>,
    pub configures_sent: u32,
    pub activated: bool,
    pub maximized: bool,
    pub close_requested: bool,
}

impl X11Surface {
    pub fn new(xid: u32) -> Self {
        Self {
            xid,
            title: None,
            class: None,
            instance: None,
            geometry: Rect::default(),
            override_redirect: false,
            window_type: X11WindowType::Normal,
            mapped: false,
            last_configure: None,
            configures_sent: 0,
            activated: false,
            maximized: false,
            close_requested: false,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn with_instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = Some(instance.into());
        self
    }

    pub fn with_geometry(mut self, geometry: Rect) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn with_override_redirect(mut self, override_redirect: bool) -> Self {
        self.override_redirect = override_redirect;
        self
    }

    pub fn with_window_type(mut self, window_type: X11WindowType) -> Self {
        self.window_type = window_type;
        self
    }

    pub fn with_mapped(mut self, mapped: bool) -> Self {
        self.mapped = mapped;
        self
    }

    pub fn bounds(&self) -> Rect {
        self.geometry
    }
}

/// All surfaces the compatibility layer currently knows about, keyed by
/// X11 window id.
#[derive(Debug, Default)]
pub struct SurfaceStore {
    surfaces: HashMap<u32, X11Surface>,
}

impl SurfaceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, surface: X11Surface) {
        self.surfaces.insert(surface.xid, surface);
    }

    pub fn remove(&mut self, xid: u32) -> Option<X11Surface> {
        self.surfaces.remove(&xid)
    }

    pub fn get(&self, xid: u32) -> Option<&X11Surface> {
        self.surfaces.get(&xid)
    }

    pub fn get_mut(&mut self, xid: u32) -> Option<&mut X11Surface> {
        self.surfaces.get_mut(&xid)
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    /// Ask the surface to adopt a new geometry.
    pub fn send_configure(&mut self, xid: u32, rect: Rect) {
        match self.surfaces.get_mut(&xid) {
            Some(surface) => {
                debug!(
                    "📐 Configure surface {} -> {},{} {}x{}",
                    xid, rect.x, rect.y, rect.width, rect.height
                );
                surface.last_configure = Some(rect);
                surface.configures_sent += 1;
            }
            None => warn!("Configure for unknown surface {}", xid),
        }
    }

    /// Forward keyboard-focus activation state.
    pub fn send_activate(&mut self, xid: u32, activated: bool) {
        match self.surfaces.get_mut(&xid) {
            Some(surface) => {
                debug!("Surface {} activated={}", xid, activated);
                surface.activated = activated;
            }
            None => warn!("Activation change for unknown surface {}", xid),
        }
    }

    /// Set the maximize hint. Tiled windows get this on map so legacy
    /// clients stop drawing restore decorations.
    pub fn set_maximized(&mut self, xid: u32, maximized: bool) {
        match self.surfaces.get_mut(&xid) {
            Some(surface) => surface.maximized = maximized,
            None => warn!("Maximize hint for unknown surface {}", xid),
        }
    }

    /// Politely ask the window to close. No teardown happens until the
    /// destroy event comes back.
    pub fn send_close(&mut self, xid: u32) {
        match self.surfaces.get_mut(&xid) {
            Some(surface) => {
                debug!("Close requested for surface {}", xid);
                surface.close_requested = true;
            }
            None => warn!("Close request for unknown surface {}", xid),
        }
    }
}

/// Lifecycle event for a bound surface, as delivered by the
/// compatibility layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEvent {
    Map,
    Unmap,
    /// The surface committed a buffer of the given size.
    Commit { width: u32, height: u32 },
    /// The surface asks for a geometry of its own choosing.
    RequestConfigure {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },
    Destroy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceEventKind {
    Map,
    Unmap,
    Commit,
    RequestConfigure,
    Destroy,
}

impl SurfaceEventKind {
    pub const ALL: [SurfaceEventKind; 5] = [
        SurfaceEventKind::Map,
        SurfaceEventKind::Unmap,
        SurfaceEventKind::Commit,
        SurfaceEventKind::RequestConfigure,
        SurfaceEventKind::Destroy,
    ];
}

impl SurfaceEvent {
    pub fn kind(&self) -> SurfaceEventKind {
        match self {
            SurfaceEvent::Map => SurfaceEventKind::Map,
            SurfaceEvent::Unmap => SurfaceEventKind::Unmap,
            SurfaceEvent::Commit { .. } => SurfaceEventKind::Commit,
            SurfaceEvent::RequestConfigure { .. } => SurfaceEventKind::RequestConfigure,
            SurfaceEvent::Destroy => SurfaceEventKind::Destroy,
        }
    }
}

/// Handle to one event subscription. Revoking it guarantees the handler
/// behind it never runs again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Explicit observer registrations: which (surface, event kind) pairs
/// have a live handler. Delivery checks here before touching any binding
/// state, so a revoked subscription is an absolute barrier.
#[derive(Debug, Default)]
pub struct SubscriptionRegistry {
    by_target: HashMap<(u32, SurfaceEventKind), SubscriptionId>,
    by_id: HashMap<SubscriptionId, (u32, SurfaceEventKind)>,
    next_id: u64,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, xid: u32, kind: SurfaceEventKind) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        if let Some(previous) = self.by_target.insert((xid, kind), id) {
            warn!(
                "Replacing live subscription {:?} for surface {} {:?}",
                previous, xid, kind
            );
            self.by_id.remove(&previous);
        }
        self.by_id.insert(id, (xid, kind));
        id
    }

    /// Returns whether the subscription was live.
    pub fn revoke(&mut self, id: SubscriptionId) -> bool {
        match self.by_id.remove(&id) {
            Some(target) => {
                self.by_target.remove(&target);
                true
            }
            None => false,
        }
    }

    pub fn is_subscribed(&self, xid: u32, kind: SurfaceEventKind) -> bool {
        self.by_target.contains_key(&(xid, kind))
    }

    pub fn active_count(&self) -> usize {
        self.by_id.len()
    }
}

/// Where a binding is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingState {
    /// Bound, surface not yet mapped.
    Unbound,
    /// Mapped and tiled into the window tree.
    MappedManaged,
    /// Mapped onto the unmanaged overlay.
    MappedUnmanaged,
    /// Was mapped, currently is not. May map again.
    Unmapped,
    /// Terminal. The binding is about to be freed.
    Destroyed,
}

/// One surface's binding: the view it owns and the subscriptions that
/// feed it. Created whole at bind, freed whole at destroy.
#[derive(Debug)]
struct SurfaceBinding {
    view: ViewId,
    state: BindingState,
    subscriptions: [SubscriptionId; 5],
}

/// Why a surface could not be bound. A refused surface acquires no
/// state at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BindError {
    #[error("X11 compatibility layer is disabled by configuration")]
    Disabled,
    #[error("surface {0} is already bound")]
    AlreadyBound(u32),
}

/// XWayland statistics
#[derive(Debug, Clone, Default)]
pub struct XWaylandStats {
    pub surfaces_bound: u64,
    pub windows_mapped: u64,
    pub windows_destroyed: u64,
    pub active_bindings: usize,
    pub unmanaged_count: usize,
}

/// Binds compatibility-layer surfaces to views and routes their
/// lifecycle events into the desktop.
#[derive(Debug)]
pub struct XWaylandManager {
    /// XWayland configuration
    config: XWaylandConfig,

    /// Surfaces the compatibility layer has announced
    surfaces: SurfaceStore,

    /// Live bindings keyed by X11 window id
    bindings: HashMap<u32, SurfaceBinding>,

    /// Observer registrations feeding the bindings
    subscriptions: SubscriptionRegistry,

    /// Statistics
    stats: XWaylandStats,
}

impl XWaylandManager {
    /// Create a new XWayland manager
    pub fn new(config: &XWaylandConfig) -> Result<Self> {
        info!(
            "🔗 Initializing XWayland manager (enabled={})",
            config.enabled
        );

        Ok(Self {
            config: config.clone(),
            surfaces: SurfaceStore::new(),
            bindings: HashMap::new(),
            subscriptions: SubscriptionRegistry::new(),
            stats: XWaylandStats::default(),
        })
    }

    pub fn surfaces(&self) -> &SurfaceStore {
        &self.surfaces
    }

    pub fn surfaces_mut(&mut self) -> &mut SurfaceStore {
        &mut self.surfaces
    }

    pub fn is_bound(&self, xid: u32) -> bool {
        self.bindings.contains_key(&xid)
    }

    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    pub fn binding_state(&self, xid: u32) -> Option<BindingState> {
        self.bindings.get(&xid).map(|binding| binding.state)
    }

    pub fn view_for(&self, xid: u32) -> Option<ViewId> {
        self.bindings.get(&xid).map(|binding| binding.view)
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.active_count()
    }

    /// Counter snapshot plus current registry sizes.
    pub fn stats(&self, desktop: &Desktop) -> XWaylandStats {
        XWaylandStats {
            active_bindings: self.bindings.len(),
            unmanaged_count: desktop.router.unmanaged_count(),
            ..self.stats.clone()
        }
    }

    /// Bind a newly announced surface: create its view, subscribe to all
    /// five lifecycle events, and evaluate the initial map state.
    ///
    /// If the surface is already mapped when announced, the map handler
    /// runs synchronously before this returns, so the caller observes a
    /// fully routed window.
    pub fn bind_surface(
        &mut self,
        desktop: &mut Desktop,
        surface: X11Surface,
    ) -> Result<ViewId, BindError> {
        if !self.config.enabled {
            return Err(BindError::Disabled);
        }
        let xid = surface.xid;
        if self.bindings.contains_key(&xid) {
            return Err(BindError::AlreadyBound(xid));
        }

        info!(
            "🪟 New X11 surface {} (title={:?}, class={:?})",
            xid, surface.title, surface.class
        );

        let view = desktop.views.create(ViewKind::LegacyCompat, &LEGACY_DRIVER);
        if let Some(record) = desktop.views.get_mut(view) {
            record.backing = Some(xid);
        }

        let subscriptions =
            SurfaceEventKind::ALL.map(|kind| self.subscriptions.subscribe(xid, kind));

        let already_mapped = surface.mapped;
        self.surfaces.insert(surface);
        self.bindings.insert(
            xid,
            SurfaceBinding {
                view,
                state: BindingState::Unbound,
                subscriptions,
            },
        );
        self.stats.surfaces_bound += 1;

        if already_mapped {
            debug!("Surface {} already mapped at bind time", xid);
            self.on_map(desktop, xid);
        }

        Ok(view)
    }

    /// Deliver one lifecycle event.
    ///
    /// Delivery is run-to-completion: the handler finishes before this
    /// returns. An event whose subscription has been revoked is dropped
    /// here, before any binding state is touched.
    pub fn dispatch(&mut self, desktop: &mut Desktop, xid: u32, event: SurfaceEvent) {
        let kind = event.kind();
        if !self.subscriptions.is_subscribed(xid, kind) {
            debug!(
                "Dropping {:?} for surface {} with no live subscription",
                kind, xid
            );
            return;
        }

        self.apply_to_surface(xid, &event);

        match event {
            SurfaceEvent::Map => self.on_map(desktop, xid),
            SurfaceEvent::Unmap => self.on_unmap(desktop, xid),
            SurfaceEvent::Commit { width, height } => self.on_commit(desktop, xid, width, height),
            SurfaceEvent::RequestConfigure {
                x,
                y,
                width,
                height,
            } => self.on_request_configure(xid, x, y, width, height),
            SurfaceEvent::Destroy => self.on_destroy(desktop, xid),
        }
    }

    /// Mirror the event into the surface record before the handler runs,
    /// so handlers always see the layer's current truth.
    fn apply_to_surface(&mut self, xid: u32, event: &SurfaceEvent) {
        if let Some(surface) = self.surfaces.get_mut(xid) {
            match event {
                SurfaceEvent::Map => surface.mapped = true,
                SurfaceEvent::Unmap => surface.mapped = false,
                SurfaceEvent::Commit { width, height } => {
                    surface.geometry.width = *width;
                    surface.geometry.height = *height;
                }
                SurfaceEvent::RequestConfigure { .. } | SurfaceEvent::Destroy => {}
            }
        }
    }

    fn on_map(&mut self, desktop: &mut Desktop, xid: u32) {
        let view_id = match self.bindings.get(&xid) {
            Some(binding) => binding.view,
            None => {
                warn!("Map for unbound surface {}", xid);
                return;
            }
        };
        let unmanaged = match self.surfaces.get(xid) {
            Some(surface) => surface.override_redirect || surface.window_type.wants_unmanaged(),
            None => {
                warn!("Map for unknown surface {}", xid);
                return;
            }
        };

        // The surface reference comes first so both branches, and the
        // damage at the end, see a mapped view.
        match desktop.views.get_mut(view_id) {
            Some(record) => record.surface = Some(xid),
            None => {
                error!("Binding for surface {} holds dead {}", xid, view_id);
                return;
            }
        }

        let Desktop {
            tree,
            seat,
            views,
            router,
            arrange,
            damage,
            ..
        } = desktop;

        if unmanaged {
            router.route_to_overlay(tree, views, seat, view_id);
            if let Some(binding) = self.bindings.get_mut(&xid) {
                binding.state = BindingState::MappedUnmanaged;
            }
            debug!("👁️ Surface {} mapped unmanaged as {}", xid, view_id);
        } else {
            // Tiled windows cover their whole slot; the hint stops legacy
            // clients from drawing restore decorations.
            self.surfaces.set_maximized(xid, true);

            if let Some(node) = router.route_to_tree(tree, views, seat, view_id) {
                let parent = tree
                    .node(node)
                    .and_then(|n| n.parent)
                    .unwrap_or_else(|| tree.root());
                arrange.schedule(parent);
                seat.set_focus(node);
            }
            if let Some(binding) = self.bindings.get_mut(&xid) {
                binding.state = BindingState::MappedManaged;
            }
            debug!("👁️ Surface {} mapped tiled as {}", xid, view_id);
        }

        self.stats.windows_mapped += 1;
        let bounds = view_bounds(&self.surfaces, views, view_id);
        damage.damage_whole(view_id, bounds);
    }

    fn on_unmap(&mut self, desktop: &mut Desktop, xid: u32) {
        let view_id = match self.bindings.get(&xid) {
            Some(binding) => binding.view,
            None => {
                warn!("Unmap for unbound surface {}", xid);
                return;
            }
        };
        let was_mapped = desktop
            .views
            .get(view_id)
            .map(|record| record.surface.is_some())
            .unwrap_or(false);
        if !was_mapped {
            debug!("Unmap for already-unmapped surface {}", xid);
            return;
        }

        // Damage the old bounds before anything detaches; those pixels
        // need cleaning even though the window is going away.
        let bounds = view_bounds(&self.surfaces, &desktop.views, view_id);
        desktop.damage.damage_whole(view_id, bounds);

        let Desktop {
            tree,
            seat,
            views,
            router,
            ..
        } = desktop;
        router.detach(tree, views, seat, view_id);
        if let Some(record) = views.get_mut(view_id) {
            record.surface = None;
        }

        if let Some(binding) = self.bindings.get_mut(&xid) {
            binding.state = BindingState::Unmapped;
        }
        debug!("👁️‍🗨️ Surface {} unmapped, {} detached", xid, view_id);
    }

    fn on_commit(&mut self, desktop: &mut Desktop, xid: u32, width: u32, height: u32) {
        let view_id = match self.bindings.get(&xid) {
            Some(binding) => binding.view,
            None => {
                warn!("Commit for unbound surface {}", xid);
                return;
            }
        };
        let record = match desktop.views.get_mut(view_id) {
            Some(record) => record,
            None => return,
        };
        if record.surface.is_none() {
            debug!("Commit for unmapped surface {} ignored", xid);
            return;
        }

        // Geometry policy: by default the surface's self-reported size is
        // authoritative. Legacy clients that refuse a size would fight
        // the layout forever if the compositor insisted on its own.
        record.size = if self.config.honor_client_geometry {
            Size::new(width, height)
        } else {
            record.pending_size
        };

        let bounds = view_bounds(&self.surfaces, &desktop.views, view_id);
        desktop.damage.damage_region(view_id, bounds);
    }

    fn on_request_configure(&mut self, xid: u32, x: i32, y: i32, width: u32, height: u32) {
        if !self.bindings.contains_key(&xid) {
            warn!("Configure request from unbound surface {}", xid);
            return;
        }
        if self.config.honor_client_geometry {
            // Honored verbatim; legacy clients misrender if the request
            // is modified or silently dropped.
            self.surfaces
                .send_configure(xid, Rect::new(x, y, width, height));
        } else {
            debug!(
                "Ignoring configure request from surface {} (compositor-managed geometry)",
                xid
            );
        }
    }

    fn on_destroy(&mut self, desktop: &mut Desktop, xid: u32) {
        let (view_id, subscriptions) = match self.bindings.get(&xid) {
            Some(binding) => (binding.view, binding.subscriptions),
            None => {
                warn!("Destroy for unbound surface {}", xid);
                return;
            }
        };

        // Revoked before any teardown: from here on, no event for this
        // surface can reach a handler.
        for subscription in subscriptions {
            self.subscriptions.revoke(subscription);
        }

        let still_mapped = desktop
            .views
            .get(view_id)
            .map(|record| record.surface.is_some())
            .unwrap_or(false);
        if still_mapped {
            let Desktop {
                tree,
                seat,
                views,
                router,
                ..
            } = desktop;
            router.detach(tree, views, seat, view_id);
            if let Some(record) = views.get_mut(view_id) {
                record.surface = None;
            }
        }

        desktop.views.remove(view_id);
        if let Some(binding) = self.bindings.get_mut(&xid) {
            binding.state = BindingState::Destroyed;
        }
        self.bindings.remove(&xid);
        self.surfaces.remove(xid);
        self.stats.windows_destroyed += 1;
        debug!("🗑️ Surface {} destroyed, released {}", xid, view_id);
    }

    /// Tear down every live binding. Run this before dropping the
    /// desktop so bindings unhook while the registries still exist.
    pub fn shutdown(&mut self, desktop: &mut Desktop) {
        let xids: Vec<u32> = self.bindings.keys().copied().collect();
        info!(
            "🔽 Shutting down XWayland manager ({} live bindings)",
            xids.len()
        );
        for xid in xids {
            self.on_destroy(desktop, xid);
        }

        info!(
            "📊 XWayland final stats: {} surfaces bound, {} mapped, {} destroyed",
            self.stats.surfaces_bound, self.stats.windows_mapped, self.stats.windows_destroyed
        );
        info!("✅ XWayland manager shutdown complete");
    }
}

/// On-screen bounds for damage purposes. The surface's own geometry is
/// what is actually painted, for tiled and unmanaged windows alike.
fn view_bounds(surfaces: &SurfaceStore, views: &ViewRegistry, view: ViewId) -> Rect {
    views
        .get(view)
        .and_then(|record| record.backing)
        .and_then(|xid| surfaces.get(xid))
        .map(|surface| surface.bounds())
        .unwrap_or_default()
}

/// Capability table for [`ViewKind::LegacyCompat`] views.
pub struct LegacyDriver;

pub(crate) static LEGACY_DRIVER: LegacyDriver = LegacyDriver;

impl LegacyDriver {
    /// Tag guard: every capability call verifies the view really is
    /// legacy-backed before touching the surface store.
    fn guard(&self, view: &View) -> bool {
        if view.kind != ViewKind::LegacyCompat {
            error!(
                "Legacy capability table invoked for {:?} {}",
                view.kind, view.id
            );
            return false;
        }
        true
    }
}

impl ViewDriver for LegacyDriver {
    fn kind(&self) -> ViewKind {
        ViewKind::LegacyCompat
    }

    fn metadata(&self, surfaces: &SurfaceStore, view: &View, prop: ViewProp) -> Option<String> {
        if !self.guard(view) {
            return None;
        }
        let surface = surfaces.get(view.backing?)?;
        match prop {
            ViewProp::Title => surface.title.clone(),
            ViewProp::Class => surface.class.clone(),
            ViewProp::Instance => surface.instance.clone(),
            // X11 windows have no app id.
            ViewProp::AppId => None,
        }
    }

    fn set_size(&self, surfaces: &mut SurfaceStore, view: &mut View, width: u32, height: u32) {
        if !self.guard(view) {
            return;
        }
        view.pending_size = Size::new(width, height);
        let xid = match view.backing {
            Some(xid) => xid,
            None => {
                warn!("Resize for {} with no backing surface", view.id);
                return;
            }
        };
        // Configure at the current position; only the size changes here.
        let position = match surfaces.get(xid) {
            Some(surface) => surface.geometry.position(),
            None => {
                warn!("Resize for missing surface {}", xid);
                return;
            }
        };
        surfaces.send_configure(xid, Rect::new(position.x, position.y, width, height));
    }

    fn set_position(
        &self,
        tree: &mut WindowTree,
        layout: &OutputLayout,
        surfaces: &mut SurfaceStore,
        view: &View,
        x: i32,
        y: i32,
    ) {
        if !self.guard(view) {
            return;
        }
        let node = match view.node {
            Some(node) => node,
            None => {
                warn!("Position for detached {}", view.id);
                return;
            }
        };
        // Legacy surfaces expect global coordinates. Resolve the full
        // node-to-output chain before touching the tree: a view whose
        // output left the layout keeps its old position.
        let global = match global_position(tree, layout, node, Point::new(x, y)) {
            Some(global) => global,
            None => return,
        };
        let xid = match view.backing {
            Some(xid) => xid,
            None => {
                warn!("Position for {} with no backing surface", view.id);
                return;
            }
        };
        let size = match surfaces.get(xid) {
            Some(surface) => surface.geometry.size(),
            None => {
                warn!("Position for missing surface {}", xid);
                return;
            }
        };
        tree.set_position(node, Point::new(x, y));
        surfaces.send_configure(xid, Rect::from_parts(global, size));
    }

    fn set_activated(&self, surfaces: &mut SurfaceStore, view: &View, activated: bool) {
        if !self.guard(view) {
            return;
        }
        if let Some(xid) = view.backing {
            surfaces.send_activate(xid, activated);
        }
    }

    fn close(&self, surfaces: &mut SurfaceStore, view: &View) {
        if !self.guard(view) {
            return;
        }
        if let Some(xid) = view.backing {
            surfaces.send_close(xid);
        }
    }
}
