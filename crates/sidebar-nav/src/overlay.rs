//! Search overlay, mobile slide-over and search result entries.
//!
//! Both overlays are two-state machines. They only decide what should happen;
//! the controller pushes the outcome onto the surface.

use serde::{Deserialize, Serialize};

/// Key reported by a key-up event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    /// Escape key.
    Escape,
    /// Printable character key.
    Char(char),
    /// Any other key.
    Other,
}

/// A key-up event with modifier state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyPress {
    /// Released key.
    pub key: Key,
    /// Whether Ctrl was held.
    pub ctrl: bool,
}

impl KeyPress {
    /// Escape without modifiers.
    #[must_use]
    pub fn escape() -> Self {
        Self {
            key: Key::Escape,
            ctrl: false,
        }
    }

    /// Ctrl + `c`.
    #[must_use]
    pub fn ctrl(c: char) -> Self {
        Self {
            key: Key::Char(c),
            ctrl: true,
        }
    }

    /// `c` without modifiers.
    #[must_use]
    pub fn plain(c: char) -> Self {
        Self {
            key: Key::Char(c),
            ctrl: false,
        }
    }
}

/// Surface change requested by the search overlay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverlayAction {
    /// Show the overlay, lock body scrolling and focus the input.
    Open,
    /// Hide the overlay and release the body scroll lock.
    Close,
}

/// Open/closed state of the modal search overlay.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchOverlay {
    open: bool,
}

impl SearchOverlay {
    /// Whether the overlay is open.
    #[must_use]
    pub fn is_open(self) -> bool {
        self.open
    }

    /// React to a key-up event.
    ///
    /// Escape always closes and Ctrl + `shortcut` (case-insensitive) always
    /// opens, even when the overlay is already in that state, so the surface is
    /// re-synchronized on every shortcut. Other keys are ignored.
    pub fn on_key(&mut self, press: KeyPress, shortcut: char) -> Option<OverlayAction> {
        match press.key {
            Key::Escape => Some(self.close()),
            Key::Char(c) if press.ctrl && c.eq_ignore_ascii_case(&shortcut) => Some(self.open()),
            _ => None,
        }
    }

    /// Open the overlay (e.g., the search box was clicked).
    pub fn open(&mut self) -> OverlayAction {
        self.open = true;
        OverlayAction::Open
    }

    /// Close the overlay.
    pub fn close(&mut self) -> OverlayAction {
        self.open = false;
        OverlayAction::Close
    }
}

/// Open/closed state of the mobile navigation slide-over.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MobileMenu {
    open: bool,
}

impl MobileMenu {
    /// Whether the slide-over is open.
    #[must_use]
    pub fn is_open(self) -> bool {
        self.open
    }

    /// Flip the slide-over. Returns the new state.
    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    /// Close the slide-over.
    pub fn close(&mut self) {
        self.open = false;
    }
}

/// A hit returned by the external search index.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Page title.
    pub title: String,
    /// Page link.
    pub link: String,
}

/// One rendered entry of the search results list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResultEntry {
    /// Displayed text.
    pub title: String,
    /// Link target.
    pub href: String,
    /// True for the "no results" placeholder.
    pub placeholder: bool,
}

/// Text of the entry shown when a search has no hits.
pub const NO_RESULTS_TEXT: &str = "No results found";

/// Build the results list for a set of hits.
///
/// An empty hit list yields exactly one placeholder entry linking to `#`.
/// Otherwise there is one entry per hit, in order.
#[must_use]
pub fn result_entries(hits: &[SearchHit]) -> Vec<ResultEntry> {
    if hits.is_empty() {
        return vec![ResultEntry {
            title: NO_RESULTS_TEXT.to_owned(),
            href: "#".to_owned(),
            placeholder: true,
        }];
    }

    hits.iter()
        .map(|hit| ResultEntry {
            title: hit.title.clone(),
            href: hit.link.clone(),
            placeholder: false,
        })
        .collect()
}
