//! Rendering surface abstraction.
//!
//! A [`Surface`] is whatever displays the navigation: a browser DOM, a
//! terminal preview, or the in-memory [`MemorySurface`] used by tests. It owns
//! element addressing (ids, class names) and must treat operations on missing
//! elements as no-ops.

use std::collections::BTreeMap;

use crate::overlay::ResultEntry;

/// Reported color-scheme preference.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorScheme {
    /// Light preference, or no preference reported.
    #[default]
    Light,
    /// Dark preference.
    Dark,
}

/// Rendering surface for the navigation controller.
///
/// Every setter is absolute (set, not flip) so repeated application converges
/// on the controller's state.
pub trait Surface {
    /// Render a group expanded or collapsed.
    ///
    /// Expanded means every node whose parent group is `group_id` is visible
    /// and every arrow inside the controls for `group_id` is rotated.
    /// Collapsed is the opposite.
    fn set_group_expanded(&mut self, group_id: &str, expanded: bool);

    /// Current scroll offset of the navigation panel, `None` if it is missing.
    fn scroll_offset(&self) -> Option<f64>;

    /// Scroll the navigation panel to `offset`.
    fn set_scroll_offset(&mut self, offset: f64);

    /// Color scheme reported by the user agent.
    fn color_scheme(&self) -> ColorScheme;

    /// Enable or disable the alternate stylesheet titled `title`.
    fn set_stylesheet_enabled(&mut self, title: &str, enabled: bool);

    /// Show or hide the search overlay.
    fn set_search_overlay_visible(&mut self, visible: bool);

    /// Move keyboard focus to the search input.
    fn focus_search_input(&mut self);

    /// Lock or release scrolling of the page body.
    fn set_body_scroll_locked(&mut self, locked: bool);

    /// Scroll the page itself back to the top.
    fn scroll_page_to_top(&mut self);

    /// Replace the search results list.
    fn set_search_results(&mut self, entries: &[ResultEntry]);

    /// Open or close the mobile navigation slide-over.
    fn set_mobile_menu_open(&mut self, open: bool);
}

/// Visual state of one group's elements.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GroupView {
    /// Member nodes are visible (no "hidden" marker).
    pub content_visible: bool,
    /// Toggle arrow is rotated.
    pub arrow_rotated: bool,
}

/// In-memory surface that records what a DOM would show.
///
/// Groups start collapsed, elements start present. Use the `without_*`
/// builders to simulate pages that lack an element.
#[derive(Clone, Debug)]
pub struct MemorySurface {
    groups: BTreeMap<String, GroupView>,
    sidebar_scroll: Option<f64>,
    color_scheme: ColorScheme,
    stylesheets: BTreeMap<String, bool>,
    search_overlay_visible: Option<bool>,
    search_input_present: bool,
    search_input_focused: bool,
    body_scroll_locked: bool,
    page_scrolled_to_top: usize,
    search_results: Option<Vec<ResultEntry>>,
    mobile_menu_open: Option<bool>,
}

impl MemorySurface {
    /// Create a surface with collapsed `groups` and both highlight stylesheets
    /// present and enabled.
    #[must_use]
    pub fn new<'a>(groups: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            groups: groups
                .into_iter()
                .map(|g| (g.to_owned(), GroupView::default()))
                .collect(),
            sidebar_scroll: Some(0.0),
            color_scheme: ColorScheme::Light,
            stylesheets: BTreeMap::from([
                ("highlight_light".to_owned(), true),
                ("highlight_dark".to_owned(), true),
            ]),
            search_overlay_visible: Some(false),
            search_input_present: true,
            search_input_focused: false,
            body_scroll_locked: false,
            page_scrolled_to_top: 0,
            search_results: Some(Vec::new()),
            mobile_menu_open: Some(false),
        }
    }

    /// Report `scheme` as the user agent preference.
    #[must_use]
    pub fn with_color_scheme(mut self, scheme: ColorScheme) -> Self {
        self.color_scheme = scheme;
        self
    }

    /// Replace the set of stylesheet titles present on the page.
    #[must_use]
    pub fn with_stylesheets<'a>(mut self, titles: impl IntoIterator<Item = &'a str>) -> Self {
        self.stylesheets = titles.into_iter().map(|t| (t.to_owned(), true)).collect();
        self
    }

    /// Remove the navigation panel.
    #[must_use]
    pub fn without_sidebar(mut self) -> Self {
        self.sidebar_scroll = None;
        self
    }

    /// Remove the search overlay, its input and its results list.
    #[must_use]
    pub fn without_search(self) -> Self {
        self.without_search_overlay()
            .without_search_input()
            .without_search_results()
    }

    /// Remove the search overlay container.
    #[must_use]
    pub fn without_search_overlay(mut self) -> Self {
        self.search_overlay_visible = None;
        self
    }

    /// Remove the search input.
    #[must_use]
    pub fn without_search_input(mut self) -> Self {
        self.search_input_present = false;
        self.search_input_focused = false;
        self
    }

    /// Remove the search results list.
    #[must_use]
    pub fn without_search_results(mut self) -> Self {
        self.search_results = None;
        self
    }

    /// Remove the mobile slide-over.
    #[must_use]
    pub fn without_mobile_menu(mut self) -> Self {
        self.mobile_menu_open = None;
        self
    }

    /// Visual state of a group, `None` if the page has no elements for it.
    #[must_use]
    pub fn group(&self, group_id: &str) -> Option<GroupView> {
        self.groups.get(group_id).copied()
    }

    /// All groups with their visual state.
    #[must_use]
    pub fn groups(&self) -> &BTreeMap<String, GroupView> {
        &self.groups
    }

    /// Groups currently rendered expanded.
    #[must_use]
    pub fn expanded_groups(&self) -> Vec<&str> {
        self.groups
            .iter()
            .filter(|(_, v)| v.content_visible)
            .map(|(id, _)| id.as_str())
            .collect()
    }

    /// Whether a stylesheet is enabled, `None` if it is missing.
    #[must_use]
    pub fn stylesheet_enabled(&self, title: &str) -> Option<bool> {
        self.stylesheets.get(title).copied()
    }

    /// Whether the search overlay is visible, `None` if it is missing.
    #[must_use]
    pub fn search_overlay_visible(&self) -> Option<bool> {
        self.search_overlay_visible
    }

    /// Whether the search input has focus.
    #[must_use]
    pub fn search_input_focused(&self) -> bool {
        self.search_input_focused
    }

    /// Whether body scrolling is locked.
    #[must_use]
    pub fn body_scroll_locked(&self) -> bool {
        self.body_scroll_locked
    }

    /// How many times the page was scrolled back to the top.
    #[must_use]
    pub fn page_scrolled_to_top(&self) -> usize {
        self.page_scrolled_to_top
    }

    /// Rendered search results, `None` if the list is missing.
    #[must_use]
    pub fn search_results(&self) -> Option<&[ResultEntry]> {
        self.search_results.as_deref()
    }

    /// Whether the mobile slide-over is open, `None` if it is missing.
    #[must_use]
    pub fn mobile_menu_open(&self) -> Option<bool> {
        self.mobile_menu_open
    }
}

impl Surface for MemorySurface {
    fn set_group_expanded(&mut self, group_id: &str, expanded: bool) {
        if let Some(view) = self.groups.get_mut(group_id) {
            view.content_visible = expanded;
            view.arrow_rotated = expanded;
        }
    }

    fn scroll_offset(&self) -> Option<f64> {
        self.sidebar_scroll
    }

    fn set_scroll_offset(&mut self, offset: f64) {
        if let Some(scroll) = self.sidebar_scroll.as_mut() {
            *scroll = offset;
        }
    }

    fn color_scheme(&self) -> ColorScheme {
        self.color_scheme
    }

    fn set_stylesheet_enabled(&mut self, title: &str, enabled: bool) {
        if let Some(state) = self.stylesheets.get_mut(title) {
            *state = enabled;
        }
    }

    fn set_search_overlay_visible(&mut self, visible: bool) {
        if let Some(state) = self.search_overlay_visible.as_mut() {
            *state = visible;
        }
        if !visible {
            self.search_input_focused = false;
        }
    }

    fn focus_search_input(&mut self) {
        if self.search_input_present {
            self.search_input_focused = true;
        }
    }

    fn set_body_scroll_locked(&mut self, locked: bool) {
        self.body_scroll_locked = locked;
    }

    fn scroll_page_to_top(&mut self) {
        self.page_scrolled_to_top += 1;
    }

    fn set_search_results(&mut self, entries: &[ResultEntry]) {
        if let Some(results) = self.search_results.as_mut() {
            *results = entries.to_vec();
        }
    }

    fn set_mobile_menu_open(&mut self, open: bool) {
        if let Some(state) = self.mobile_menu_open.as_mut() {
            *state = open;
        }
    }
}
