//! Expandable navigation tree for documentation pages.
//!
//! This crate provides:
//! - [`MenuTree`]: Menu hierarchy reconstructed from rendered structure
//! - [`NavigationController`]: Expansion state, scroll restoration, theme
//!   selection and the search overlay, bound to a [`Surface`]
//! - [`ExpandedGroups`] and [`ScrollPosition`]: The state persisted in a
//!   [`SessionStore`](sidebar_store::SessionStore) between page loads
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use sidebar_nav::{ControllerConfig, MemorySurface, MenuTreeBuilder, NavigationController, StructuralLookup, UiEvent};
//! use sidebar_store::MemoryStore;
//!
//! let mut builder = MenuTreeBuilder::new();
//! builder.add_node("guide", None);
//! builder.add_node("guide-install", Some("guide"));
//! builder.set_active("guide-install");
//! let tree = builder.build();
//!
//! let surface = MemorySurface::new(tree.groups());
//! let store = Arc::new(MemoryStore::new());
//! let mut nav = NavigationController::new(ControllerConfig::default(), store, tree, surface);
//!
//! nav.initialize();
//! assert!(nav.expanded_groups().contains("guide"));
//!
//! nav.handle(UiEvent::Toggle("guide".to_owned()));
//! assert!(!nav.expanded_groups().contains("guide"));
//! ```

mod controller;
mod overlay;
mod state;
mod surface;
mod tree;

pub use controller::{ControllerConfig, NavigationController, UiEvent};
pub use overlay::{
    Key, KeyPress, MobileMenu, NO_RESULTS_TEXT, OverlayAction, ResultEntry, SearchHit,
    SearchOverlay, result_entries,
};
pub use state::{ExpandedGroups, ScrollPosition, toggle};
pub use surface::{ColorScheme, GroupView, MemorySurface, Surface};
pub use tree::{MenuNode, MenuTree, MenuTreeBuilder, StructuralLookup, ancestors_of};
