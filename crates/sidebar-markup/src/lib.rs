//! Navigation structure from rendered documentation pages.
//!
//! The menu hierarchy is not stored anywhere; it is whatever the page renders.
//! [`read_page`] streams the HTML once and rebuilds it as a
//! [`MenuTree`](sidebar_nav::MenuTree), together with an inventory of the
//! elements the navigation controller talks to.
//!
//! # Example
//!
//! ```
//! use sidebar_markup::{MarkupOptions, read_menu};
//! use sidebar_nav::StructuralLookup;
//!
//! let html = r#"<nav id="left-sidebar">
//!   <div class="menu" data-doc-id="guide"><a class="sidebar-nav-item">Guide</a></div>
//!   <div class="menu-group hidden" data-group-id="guide">
//!     <div class="menu" data-doc-id="install"><a class="sidebar-nav-item active">Install</a></div>
//!   </div>
//! </nav>"#;
//!
//! let tree = read_menu(html, &MarkupOptions::default()).unwrap();
//! assert_eq!(tree.parent_group("install"), Some("guide"));
//! assert_eq!(tree.active_node(), Some("install"));
//! ```

mod error;
mod reader;

pub use error::MarkupError;
pub use reader::{MarkupOptions, PageElements, RenderedPage, read_menu, read_page};
