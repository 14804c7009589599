//! Session-scoped key-value persistence for sidebar navigation state.
//!
//! This crate provides a [`SessionStore`] trait that stands in for the browser's
//! session storage slot. The navigation controller reads its expansion set and
//! scroll offset from it once per page load and writes them back on every
//! mutation.
//!
//! # Implementations
//!
//! - [`MemoryStore`]: In-memory map, one per simulated browsing session
//! - [`NullStore`]: Storage disabled by policy (reads miss, writes fail)
//! - [`FileStore`]: JSON file holding every key, for sessions that outlive a process
//!
//! # Example
//!
//! ```
//! use sidebar_store::{MemoryStore, SessionStore, SessionStoreExt};
//!
//! let store = MemoryStore::new();
//! store.set_json("expandedGroups", &vec!["intro".to_owned()]).unwrap();
//!
//! let groups: Option<Vec<String>> = store.get_json("expandedGroups");
//! assert_eq!(groups, Some(vec!["intro".to_owned()]));
//! ```

mod ext;
mod file;
mod memory;
mod store;

pub use ext::SessionStoreExt;
pub use file::FileStore;
pub use memory::MemoryStore;
pub use store::{NullStore, SessionStore, StoreError, StoreErrorKind};
