//! CLI command implementations.

pub(crate) mod inspect;
pub(crate) mod reset;
pub(crate) mod scroll;
pub(crate) mod toggle;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, ValueEnum};
use serde::Serialize;
use sidebar_config::{CliSettings, Config};
use sidebar_markup::{MarkupOptions, PageElements, read_page};
use sidebar_nav::{
    ColorScheme, ControllerConfig, MemorySurface, MenuTree, NavigationController, ScrollPosition,
    StructuralLookup, Surface,
};
use sidebar_store::FileStore;

pub(crate) use inspect::InspectArgs;
pub(crate) use reset::ResetArgs;
pub(crate) use scroll::ScrollArgs;
pub(crate) use toggle::ToggleArgs;

use crate::error::CliError;
use crate::output::{Output, tree_rows};

/// Options shared by every command.
#[derive(Args)]
pub(crate) struct CommonArgs {
    /// Path to configuration file (default: auto-discover sidebar.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Session file holding the persisted state (overrides config).
    #[arg(short, long, env = "SIDEBAR_SESSION")]
    session: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl CommonArgs {
    /// Load configuration with CLI overrides applied.
    pub(crate) fn load_config(&self, settings: CliSettings) -> Result<Config, CliError> {
        let settings = CliSettings {
            session_path: self.session.clone(),
            ..settings
        };
        Ok(Config::load(self.config.as_deref(), Some(&settings))?)
    }
}

/// Options for commands that load a rendered page.
#[derive(Args)]
pub(crate) struct PageArgs {
    /// Rendered HTML page to load.
    page: PathBuf,

    /// Color scheme reported for the page.
    #[arg(long, value_enum, default_value_t = SchemeArg::Light)]
    color_scheme: SchemeArg,

    /// Also expand the active page's own group (overrides config).
    #[arg(long)]
    expand_active: bool,

    /// Print the resulting state as JSON.
    #[arg(long)]
    json: bool,
}

impl PageArgs {
    /// CLI settings contributed by page options.
    pub(crate) fn cli_settings(&self) -> CliSettings {
        CliSettings {
            expand_active: self.expand_active.then_some(true),
            ..CliSettings::default()
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum SchemeArg {
    Light,
    Dark,
}

impl From<SchemeArg> for ColorScheme {
    fn from(arg: SchemeArg) -> Self {
        match arg {
            SchemeArg::Light => Self::Light,
            SchemeArg::Dark => Self::Dark,
        }
    }
}

/// One page load: a controller bound to the session file.
pub(crate) struct PageSession {
    pub controller: NavigationController<MenuTree, MemorySurface>,
    pub elements: PageElements,
    pub config: Config,
}

impl PageSession {
    /// Read the page, open the session and run `initialize`.
    pub(crate) fn open(page: &PageArgs, config: Config) -> Result<Self, CliError> {
        let html = read_html(&page.page)?;
        let rendered = read_page(&html, &markup_options(&config))?;
        let surface = rendered.surface().with_color_scheme(page.color_scheme.into());
        let store = Arc::new(FileStore::new(&config.session_resolved.path));

        tracing::info!(
            page = %page.page.display(),
            session = %config.session_resolved.path.display(),
            nodes = rendered.tree.len(),
            "Loading page"
        );

        let mut controller =
            NavigationController::new(controller_config(&config), store, rendered.tree, surface);
        controller.initialize();

        Ok(Self {
            controller,
            elements: rendered.elements,
            config,
        })
    }

    /// Print the tree (or JSON state) after all events ran.
    pub(crate) fn print(&self, page: &PageArgs, output: &Output) -> Result<(), CliError> {
        if page.json {
            let report = StateReport::new(self);
            output.report(&serde_json::to_string_pretty(&report)?);
            return Ok(());
        }

        let controller = &self.controller;
        output.tree(&tree_rows(controller.lookup(), controller.expanded_groups()));

        let theme = if controller.surface().color_scheme() == ColorScheme::Dark {
            &self.config.theme.dark_stylesheet
        } else {
            &self.config.theme.light_stylesheet
        };
        output.info(&format!("Theme: {theme}"));
        match controller.scroll_position() {
            Some(position) => output.info(&format!("Scroll position: {position}")),
            None => output.info("Scroll position: top"),
        }
        if !self.elements.sidebar {
            output.warning(&format!(
                "No #{} element; scroll position is not applied",
                self.config.elements.sidebar
            ));
        }
        Ok(())
    }
}

/// JSON form of the navigation state.
#[derive(Serialize)]
struct StateReport<'a> {
    expanded_groups: Vec<&'a str>,
    groups: Vec<GroupReport<'a>>,
    active: Option<&'a str>,
    scroll_position: Option<f64>,
    color_scheme: &'static str,
    elements: &'a PageElements,
}

#[derive(Serialize)]
struct GroupReport<'a> {
    id: &'a str,
    expanded: bool,
}

impl<'a> StateReport<'a> {
    fn new(session: &'a PageSession) -> Self {
        let controller = &session.controller;
        let expanded = controller.expanded_groups();
        let tree = controller.lookup();

        Self {
            expanded_groups: expanded.iter().collect(),
            groups: tree
                .groups()
                .into_iter()
                .map(|id| GroupReport {
                    id,
                    expanded: expanded.contains(id),
                })
                .collect(),
            active: tree.active_node(),
            scroll_position: controller.scroll_position().map(ScrollPosition::offset),
            color_scheme: match controller.surface().color_scheme() {
                ColorScheme::Light => "light",
                ColorScheme::Dark => "dark",
            },
            elements: &session.elements,
        }
    }
}

fn read_html(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|e| {
        CliError::Validation(format!("Failed to read {}: {e}", path.display()))
    })
}

/// Map configuration onto controller settings.
pub(crate) fn controller_config(config: &Config) -> ControllerConfig {
    ControllerConfig {
        expanded_groups_key: config.storage.expanded_groups_key.clone(),
        scroll_position_key: config.storage.scroll_position_key.clone(),
        light_stylesheet: config.theme.light_stylesheet.clone(),
        dark_stylesheet: config.theme.dark_stylesheet.clone(),
        search_shortcut: config.search.shortcut_key(),
        expand_active: config.navigation.expand_active,
    }
}

/// Map configuration onto markup reader settings.
pub(crate) fn markup_options(config: &Config) -> MarkupOptions {
    MarkupOptions {
        menu_class: config.markup.menu_class.clone(),
        group_class: config.markup.group_class.clone(),
        item_class: config.markup.item_class.clone(),
        active_class: config.markup.active_class.clone(),
        sidebar_id: config.elements.sidebar.clone(),
        search_overlay_id: config.elements.search_overlay.clone(),
        search_input_id: config.elements.search_input.clone(),
        search_results_id: config.elements.search_results.clone(),
        mobile_toggle_id: config.elements.mobile_toggle.clone(),
        mobile_menu_id: config.elements.mobile_menu.clone(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use sidebar_nav::UiEvent;

    use super::*;

    const PAGE: &str = r#"<html>
<head><script>if (1 < 2 && ready) { init("<nav>"); }</script></head>
<body>
  <nav id="left-sidebar">
    <div class="menu" data-doc-id="guide"><a class="sidebar-nav-item">Guide &amp; Tips</a></div>
    <div class="menu-group hidden" data-group-id="guide">
      <div class="menu" data-doc-id="guide-basics">
        <a class="sidebar-nav-item active">Basics & More</a>
      </div>
    </div>
    <div class="menu" data-doc-id="api"><a class="sidebar-nav-item">API</a></div>
    <div class="menu-group hidden" data-group-id="api">
      <div class="menu" data-doc-id="api-ref"><a class="sidebar-nav-item">Reference</a></div>
    </div>
  </nav>
</body>
</html>"#;

    fn page_args(page: PathBuf, json: bool) -> PageArgs {
        PageArgs {
            page,
            color_scheme: SchemeArg::Dark,
            expand_active: false,
            json,
        }
    }

    #[test]
    fn test_controller_config_from_defaults() {
        let config = Config::default_with_base(Path::new("/site"));

        let controller = controller_config(&config);

        assert_eq!(controller.expanded_groups_key, "expandedGroups");
        assert_eq!(controller.scroll_position_key, "sidebarScrollPos");
        assert_eq!(controller.search_shortcut, 'x');
        assert!(!controller.expand_active);
    }

    #[test]
    fn test_markup_options_follow_config() {
        let mut config = Config::default_with_base(Path::new("/site"));
        config.elements.sidebar = "nav-panel".to_owned();
        config.markup.menu_class = "entry".to_owned();

        let options = markup_options(&config);

        assert_eq!(options.sidebar_id, "nav-panel");
        assert_eq!(options.menu_class, "entry");
        assert_eq!(options.group_class, "menu-group");
    }

    #[test]
    fn test_page_session_persists_toggles_to_session_file() {
        let dir = tempfile::tempdir().unwrap();
        let page_path = dir.path().join("index.html");
        fs::write(&page_path, PAGE).unwrap();
        let page = page_args(page_path, false);

        let mut session = PageSession::open(&page, Config::default_with_base(dir.path())).unwrap();
        session.controller.handle(UiEvent::Toggle("api".to_owned()));
        session.print(&page, &Output::new()).unwrap();

        assert_eq!(session.controller.surface().color_scheme(), ColorScheme::Dark);
        assert!(dir.path().join(".sidebar/session.json").exists());

        let reopened = PageSession::open(&page, Config::default_with_base(dir.path())).unwrap();
        let expanded: Vec<&str> = reopened.controller.expanded_groups().iter().collect();
        assert_eq!(expanded, vec!["guide", "api"]);
    }

    #[test]
    fn test_state_report_json() {
        let dir = tempfile::tempdir().unwrap();
        let page_path = dir.path().join("index.html");
        fs::write(&page_path, PAGE).unwrap();
        let page = page_args(page_path, true);

        let session = PageSession::open(&page, Config::default_with_base(dir.path())).unwrap();
        session.print(&page, &Output::new()).unwrap();
        let report = serde_json::to_value(StateReport::new(&session)).unwrap();

        assert_eq!(report["expanded_groups"], serde_json::json!(["guide"]));
        assert_eq!(report["active"], "guide-basics");
        assert_eq!(report["color_scheme"], "dark");
        assert_eq!(report["elements"]["sidebar"], true);
    }
}
