//! # Arbor Window Management Library
//!
//! A window-tree core for Wayland compositors: arena-backed registries,
//! explicit event subscriptions, and an X11 compatibility layer that
//! routes legacy windows into the tiling tree.
//!
//! ## Architecture
//!
//! Arbor is built on a modular architecture:
//! - `desktop`: Process-scoped window-management state, owned in one place
//! - `tree`: The window tree of outputs, workspaces, and views
//! - `view`: View records and per-kind capability dispatch
//! - `output`: Output layout and local-to-global coordinate mapping
//! - `seat`: Focus history and insertion targets
//! - `router`: Mutual exclusion between tree placement and the overlay list
//! - `damage`: Pending repaint requests
//! - `arrange`: Deferred relayout scheduling
//! - `xwayland`: X11 compatibility layer
//! - `config`: Configuration parsing and management
//!
//! ## Usage
//!
//! ```rust,no_run
//! use arbor::geometry::{Point, Size};
//! use arbor::xwayland::{SurfaceEvent, X11Surface};
//! use arbor::{ArborConfig, Desktop, XWaylandManager};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = ArborConfig::default();
//!     let mut desktop = Desktop::new();
//!     desktop.add_output("DP-1", Point::new(0, 0), Size::new(1920, 1080));
//!
//!     let mut xwm = XWaylandManager::new(&config.xwayland)?;
//!     xwm.bind_surface(&mut desktop, X11Surface::new(0x40_0001))?;
//!     xwm.dispatch(&mut desktop, 0x40_0001, SurfaceEvent::Map);
//!     // ... deliver further events from the X11 connection ...
//!     xwm.shutdown(&mut desktop);
//!     Ok(())
//! }
//! ```

pub mod arrange;
pub mod config;
pub mod damage;
pub mod desktop;
pub mod geometry;
pub mod output;
pub mod router;
pub mod seat;
pub mod tree;
pub mod view;
pub mod xwayland;

// Re-export main types for easy access
pub use config::ArborConfig;
pub use desktop::Desktop;
pub use geometry::{Point, Rect, Size};
pub use tree::{NodeId, WindowTree};
pub use view::{ViewId, ViewKind, ViewRegistry};
pub use xwayland::XWaylandManager;

// Re-export common error types
pub use anyhow::{Context, Error, Result};

/// Version information for Arbor
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
