//! Navigation tree controller.
//!
//! [`NavigationController`] is constructed once per page load. It reads the
//! expansion set and scroll offset from a [`SessionStore`], forces the active
//! page's ancestors open, renders the result onto a [`Surface`], and then
//! reacts to [`UiEvent`]s, writing every state change straight back to the
//! store.
//!
//! No failure escapes the controller: store errors degrade to "nothing
//! remembered" and missing elements are the surface's no-ops.

use std::sync::Arc;

use sidebar_store::SessionStore;

use crate::overlay::{KeyPress, MobileMenu, OverlayAction, SearchHit, SearchOverlay, result_entries};
use crate::state::{ExpandedGroups, ScrollPosition, toggle};
use crate::surface::{ColorScheme, Surface};
use crate::tree::{StructuralLookup, ancestors_of};

/// Configuration for [`NavigationController`].
#[derive(Clone, Debug)]
pub struct ControllerConfig {
    /// Store key holding the expanded group ids.
    pub expanded_groups_key: String,
    /// Store key holding the sidebar scroll offset.
    pub scroll_position_key: String,
    /// Title of the light highlighting stylesheet.
    pub light_stylesheet: String,
    /// Title of the dark highlighting stylesheet.
    pub dark_stylesheet: String,
    /// Letter that opens the search overlay together with Ctrl.
    pub search_shortcut: char,
    /// Also expand the active node's own group, not only its ancestors.
    pub expand_active: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            expanded_groups_key: "expandedGroups".to_owned(),
            scroll_position_key: "sidebarScrollPos".to_owned(),
            light_stylesheet: "highlight_light".to_owned(),
            dark_stylesheet: "highlight_dark".to_owned(),
            search_shortcut: 'x',
            expand_active: false,
        }
    }
}

/// User interaction delivered to the controller.
#[derive(Clone, Debug, PartialEq)]
pub enum UiEvent {
    /// A navigable item or its arrow was clicked; carries the group it controls.
    Toggle(String),
    /// The navigation panel scrolled to the given offset.
    Scroll(f64),
    /// A key was released anywhere on the page.
    KeyUp(KeyPress),
    /// The search box was clicked.
    SearchBoxClick,
    /// The search input changed; an empty query is ignored.
    SearchInput(String),
    /// The external search index produced hits for the current query.
    SearchResults(Vec<SearchHit>),
    /// The mobile navigation toggle was clicked.
    MobileMenuToggle,
    /// The mobile slide-over close control was clicked.
    MobileMenuClose,
}

/// Controller for the collapsible navigation tree.
pub struct NavigationController<L, S> {
    config: ControllerConfig,
    store: Arc<dyn SessionStore>,
    lookup: L,
    surface: S,
    expanded: ExpandedGroups,
    scroll: Option<ScrollPosition>,
    search: SearchOverlay,
    query: Option<String>,
    mobile_menu: MobileMenu,
    initialized: bool,
}

impl<L: StructuralLookup, S: Surface> NavigationController<L, S> {
    /// Create a controller for one page load.
    ///
    /// Nothing is read or rendered until [`initialize`](Self::initialize).
    #[must_use]
    pub fn new(
        config: ControllerConfig,
        store: Arc<dyn SessionStore>,
        lookup: L,
        surface: S,
    ) -> Self {
        Self {
            config,
            store,
            lookup,
            surface,
            expanded: ExpandedGroups::new(),
            scroll: None,
            search: SearchOverlay::default(),
            query: None,
            mobile_menu: MobileMenu::default(),
            initialized: false,
        }
    }

    /// Restore state and render it. Run once the page structure is ready.
    ///
    /// Loads the expansion set (seeding it with the first group when absent,
    /// empty, malformed, or missing that group), expands every ancestor of
    /// the active node, renders all groups, restores the scroll offset and
    /// selects the highlighting theme. Events are accepted afterwards.
    pub fn initialize(&mut self) {
        let loaded = self.load_expanded_groups();
        let mut expanded = self.seed(loaded.clone());
        self.expand_to_active(&mut expanded);
        self.expanded = expanded;

        if loaded.as_ref() != Some(&self.expanded) {
            self.persist_expanded_groups();
        }

        self.render_groups();
        self.restore_scroll_position();
        self.apply_theme();

        self.initialized = true;
        tracing::debug!(
            expanded = self.expanded.len(),
            active = self.lookup.active_node().unwrap_or(""),
            "Navigation initialized"
        );
    }

    /// Flip a group between expanded and collapsed.
    ///
    /// Updates membership, renders the group with its new state and persists
    /// the set immediately. Ignored before [`initialize`](Self::initialize).
    pub fn on_toggle(&mut self, group_id: &str) {
        if !self.initialized {
            tracing::debug!(group = %group_id, "Ignoring toggle before initialize");
            return;
        }

        self.expanded = toggle(std::mem::take(&mut self.expanded), group_id);
        let expanded = self.expanded.contains(group_id);
        self.surface.set_group_expanded(group_id, expanded);
        self.persist_expanded_groups();
    }

    /// Dispatch a user interaction.
    ///
    /// Events that arrive before [`initialize`](Self::initialize) are dropped,
    /// which keeps the auto-expand pass ahead of any user toggle.
    pub fn handle(&mut self, event: UiEvent) {
        if !self.initialized {
            tracing::debug!(?event, "Ignoring event before initialize");
            return;
        }

        match event {
            UiEvent::Toggle(group_id) => self.on_toggle(&group_id),
            UiEvent::Scroll(offset) => self.on_scroll(offset),
            UiEvent::KeyUp(press) => {
                if let Some(action) = self.search.on_key(press, self.config.search_shortcut) {
                    self.apply_overlay(action);
                }
            }
            UiEvent::SearchBoxClick => {
                let action = self.search.open();
                self.apply_overlay(action);
            }
            UiEvent::SearchInput(query) => {
                if query.is_empty() {
                    tracing::debug!("Ignoring empty search query");
                } else {
                    self.query = Some(query);
                }
            }
            UiEvent::SearchResults(hits) => {
                self.surface.set_search_results(&result_entries(&hits));
            }
            UiEvent::MobileMenuToggle => {
                let open = self.mobile_menu.toggle();
                self.surface.set_mobile_menu_open(open);
            }
            UiEvent::MobileMenuClose => {
                self.mobile_menu.close();
                self.surface.set_mobile_menu_open(false);
            }
        }
    }

    /// Current expansion set.
    #[must_use]
    pub fn expanded_groups(&self) -> &ExpandedGroups {
        &self.expanded
    }

    /// Last known scroll offset (restored or saved).
    #[must_use]
    pub fn scroll_position(&self) -> Option<ScrollPosition> {
        self.scroll
    }

    /// Last non-empty query typed into the search input.
    #[must_use]
    pub fn search_query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Whether the search overlay is open.
    #[must_use]
    pub fn search_open(&self) -> bool {
        self.search.is_open()
    }

    /// Whether the mobile slide-over is open.
    #[must_use]
    pub fn mobile_menu_open(&self) -> bool {
        self.mobile_menu.is_open()
    }

    /// Whether [`initialize`](Self::initialize) has run.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Structure the controller works on.
    #[must_use]
    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    /// Surface the controller renders to.
    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Consume the controller, returning its surface.
    #[must_use]
    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Read the persisted set. Missing, unreadable, malformed and empty values
    /// all count as absent.
    fn load_expanded_groups(&self) -> Option<ExpandedGroups> {
        let key = &self.config.expanded_groups_key;
        let raw = match self.store.get(key) {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::debug!(key = %key, error = %e, "Failed to read expanded groups");
                return None;
            }
        };

        let Some(groups) = ExpandedGroups::from_json(&raw) else {
            tracing::debug!(key = %key, "Discarding malformed expanded groups");
            return None;
        };
        (!groups.is_empty()).then_some(groups)
    }

    /// Apply the default-seed rule to the loaded set.
    fn seed(&self, loaded: Option<ExpandedGroups>) -> ExpandedGroups {
        let Some(first) = self.lookup.first_group() else {
            return loaded.unwrap_or_default();
        };

        match loaded {
            Some(groups) if groups.contains(first) => groups,
            _ => ExpandedGroups::seeded(first),
        }
    }

    /// Add every enclosing group of the active node.
    fn expand_to_active(&self, expanded: &mut ExpandedGroups) {
        let Some(active) = self.lookup.active_node() else {
            return;
        };

        if self.config.expand_active && self.lookup.is_group(active) {
            expanded.insert(active);
        }
        for group in ancestors_of(active, &self.lookup) {
            expanded.insert(&group);
        }
    }

    /// Render every known group plus any remembered id.
    fn render_groups(&mut self) {
        let groups: Vec<String> = self.lookup.groups().into_iter().map(str::to_owned).collect();
        for group in &groups {
            self.surface
                .set_group_expanded(group, self.expanded.contains(group));
        }
        for group in self.expanded.iter() {
            if !groups.iter().any(|g| g == group) {
                self.surface.set_group_expanded(group, true);
            }
        }
    }

    fn restore_scroll_position(&mut self) {
        let key = &self.config.scroll_position_key;
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return,
            Err(e) => {
                tracing::debug!(key = %key, error = %e, "Failed to read scroll position");
                return;
            }
        };

        match ScrollPosition::parse(&raw) {
            Some(position) => {
                self.surface.set_scroll_offset(position.offset());
                self.scroll = Some(position);
            }
            None => tracing::debug!(key = %key, value = %raw, "Discarding malformed scroll position"),
        }
    }

    fn apply_theme(&mut self) {
        let dark = self.surface.color_scheme() == ColorScheme::Dark;
        self.surface
            .set_stylesheet_enabled(&self.config.dark_stylesheet, dark);
        self.surface
            .set_stylesheet_enabled(&self.config.light_stylesheet, !dark);
    }

    fn on_scroll(&mut self, offset: f64) {
        let Some(position) = ScrollPosition::new(offset) else {
            tracing::debug!(offset, "Ignoring invalid scroll offset");
            return;
        };
        self.scroll = Some(position);

        let key = &self.config.scroll_position_key;
        if let Err(e) = self.store.set(key, &position.to_string()) {
            tracing::debug!(key = %key, error = %e, "Failed to persist scroll position");
        }
    }

    fn apply_overlay(&mut self, action: OverlayAction) {
        match action {
            OverlayAction::Open => {
                self.surface.set_body_scroll_locked(true);
                self.surface.scroll_page_to_top();
                self.surface.set_search_overlay_visible(true);
                self.surface.focus_search_input();
            }
            OverlayAction::Close => {
                self.surface.set_body_scroll_locked(false);
                self.surface.set_search_overlay_visible(false);
            }
        }
    }

    fn persist_expanded_groups(&self) {
        let key = &self.config.expanded_groups_key;
        if let Err(e) = self.store.set(key, &self.expanded.to_json()) {
            tracing::debug!(key = %key, error = %e, "Failed to persist expanded groups");
        }
    }
}
