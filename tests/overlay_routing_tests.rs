//! Integration tests for unmanaged-overlay routing
//!
//! Override-redirect windows and popup-like window types bypass tiling
//! entirely. These tests verify the classification, the mutual exclusion
//! between tree and overlay, and the overlay's paint order.

use anyhow::Result;

use arbor::config::XWaylandConfig;
use arbor::geometry::{Point, Rect, Size};
use arbor::view::ViewId;
use arbor::xwayland::{BindingState, SurfaceEvent, X11Surface, X11WindowType};
use arbor::{Desktop, XWaylandManager};

fn desktop_with_output() -> Desktop {
    let mut desktop = Desktop::new();
    desktop.add_output("DP-1", Point::new(0, 0), Size::new(1920, 1080));
    desktop
}

fn setup() -> Result<(Desktop, XWaylandManager)> {
    let _ = env_logger::builder().is_test(true).try_init();
    let desktop = desktop_with_output();
    let xwm = XWaylandManager::new(&XWaylandConfig::default())?;
    Ok((desktop, xwm))
}

/// Test that an override-redirect window never enters the tree
#[test]
fn test_override_redirect_stays_out_of_the_tree() -> Result<()> {
    let (mut desktop, mut xwm) = setup()?;

    let surface = X11Surface::new(1)
        .with_override_redirect(true)
        .with_geometry(Rect::new(500, 300, 200, 150))
        .with_mapped(true);
    let view = xwm.bind_surface(&mut desktop, surface)?;

    assert_eq!(xwm.binding_state(1), Some(BindingState::MappedUnmanaged));
    assert!(desktop.router.is_unmanaged(view));
    assert!(desktop.views.get(view).unwrap().node.is_none());
    assert_eq!(desktop.tree.view_node_count(), 0);
    // Overlay windows never steal keyboard focus.
    assert_eq!(desktop.seat.focused(), None);

    Ok(())
}

/// Test classification by window type without the override-redirect flag
#[test]
fn test_window_type_classification() -> Result<()> {
    let (mut desktop, mut xwm) = setup()?;

    let floating = [
        X11WindowType::Tooltip,
        X11WindowType::DropdownMenu,
        X11WindowType::Notification,
        X11WindowType::Splash,
        X11WindowType::Dnd,
    ];
    for (i, window_type) in floating.iter().enumerate() {
        let xid = (i + 1) as u32;
        let surface = X11Surface::new(xid)
            .with_window_type(*window_type)
            .with_mapped(true);
        xwm.bind_surface(&mut desktop, surface)?;
        assert_eq!(
            xwm.binding_state(xid),
            Some(BindingState::MappedUnmanaged),
            "{:?} should float",
            window_type
        );
    }
    assert_eq!(desktop.router.unmanaged_count(), floating.len());

    // Normal and dialog windows tile.
    for (i, window_type) in [X11WindowType::Normal, X11WindowType::Dialog]
        .iter()
        .enumerate()
    {
        let xid = (i + 100) as u32;
        let surface = X11Surface::new(xid)
            .with_window_type(*window_type)
            .with_mapped(true);
        xwm.bind_surface(&mut desktop, surface)?;
        assert_eq!(xwm.binding_state(xid), Some(BindingState::MappedManaged));
    }
    assert_eq!(desktop.tree.view_node_count(), 2);

    Ok(())
}

/// Test that remapping an overlay window raises it to the top
#[test]
fn test_overlay_paint_order_remap_to_top() -> Result<()> {
    let (mut desktop, mut xwm) = setup()?;

    let a = xwm.bind_surface(
        &mut desktop,
        X11Surface::new(1).with_override_redirect(true).with_mapped(true),
    )?;
    let b = xwm.bind_surface(
        &mut desktop,
        X11Surface::new(2).with_override_redirect(true).with_mapped(true),
    )?;

    let order: Vec<ViewId> = desktop.router.unmanaged_views().collect();
    assert_eq!(order, vec![a, b]);

    xwm.dispatch(&mut desktop, 1, SurfaceEvent::Unmap);
    assert_eq!(desktop.router.unmanaged_count(), 1);

    xwm.dispatch(&mut desktop, 1, SurfaceEvent::Map);
    let order: Vec<ViewId> = desktop.router.unmanaged_views().collect();
    assert_eq!(order, vec![b, a]);

    Ok(())
}

/// Test that a window reclassifies when its flags change between maps
#[test]
fn test_remap_reclassifies() -> Result<()> {
    let (mut desktop, mut xwm) = setup()?;

    let view = xwm.bind_surface(&mut desktop, X11Surface::new(1).with_mapped(true))?;
    assert_eq!(xwm.binding_state(1), Some(BindingState::MappedManaged));
    assert_eq!(desktop.tree.view_node_count(), 1);

    xwm.dispatch(&mut desktop, 1, SurfaceEvent::Unmap);
    xwm.surfaces_mut().get_mut(1).unwrap().override_redirect = true;
    xwm.dispatch(&mut desktop, 1, SurfaceEvent::Map);

    assert_eq!(xwm.binding_state(1), Some(BindingState::MappedUnmanaged));
    assert!(desktop.router.is_unmanaged(view));
    assert_eq!(desktop.tree.view_node_count(), 0);

    // And back again.
    xwm.dispatch(&mut desktop, 1, SurfaceEvent::Unmap);
    xwm.surfaces_mut().get_mut(1).unwrap().override_redirect = false;
    xwm.dispatch(&mut desktop, 1, SurfaceEvent::Map);

    assert_eq!(xwm.binding_state(1), Some(BindingState::MappedManaged));
    assert!(!desktop.router.is_unmanaged(view));
    assert_eq!(desktop.tree.view_node_count(), 1);

    Ok(())
}

/// Test that destroying an overlay window clears its slot
#[test]
fn test_overlay_destroy_clears_slot() -> Result<()> {
    let (mut desktop, mut xwm) = setup()?;

    let view = xwm.bind_surface(
        &mut desktop,
        X11Surface::new(1).with_override_redirect(true).with_mapped(true),
    )?;
    xwm.dispatch(&mut desktop, 1, SurfaceEvent::Destroy);

    assert_eq!(desktop.router.unmanaged_count(), 0);
    assert!(desktop.views.get(view).is_none());
    assert!(!xwm.is_bound(1));

    Ok(())
}

/// Test a mixed population of tiled and overlay windows
#[test]
fn test_mixed_tree_and_overlay_population() -> Result<()> {
    let (mut desktop, mut xwm) = setup()?;

    for xid in 1..=3 {
        xwm.bind_surface(&mut desktop, X11Surface::new(xid).with_mapped(true))?;
    }
    for xid in 10..=11 {
        let surface = X11Surface::new(xid)
            .with_window_type(X11WindowType::Notification)
            .with_mapped(true);
        xwm.bind_surface(&mut desktop, surface)?;
    }

    assert_eq!(desktop.tree.view_node_count(), 3);
    assert_eq!(desktop.router.unmanaged_count(), 2);
    assert_eq!(desktop.views.len(), 5);
    assert_eq!(xwm.binding_count(), 5);

    // Tearing down one of each leaves the other population untouched.
    xwm.dispatch(&mut desktop, 2, SurfaceEvent::Destroy);
    xwm.dispatch(&mut desktop, 10, SurfaceEvent::Destroy);

    assert_eq!(desktop.tree.view_node_count(), 2);
    assert_eq!(desktop.router.unmanaged_count(), 1);
    assert_eq!(desktop.views.len(), 3);

    Ok(())
}
