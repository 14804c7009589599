//! Configuration management for sidebar navigation.
//!
//! Parses `sidebar.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! Site templates differ in element ids, class names and the search shortcut
//! letter. All of those are configuration, so one controller serves every
//! template.
//!
//! ## Environment Variable Expansion
//!
//! `session.path` supports `${VAR}` and `${VAR:-default}` expansion.

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override session file path.
    pub session_path: Option<PathBuf>,
    /// Override search shortcut letter.
    pub shortcut: Option<String>,
    /// Override whether the active node's own group is expanded on load.
    pub expand_active: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "sidebar.toml";

/// Default session file, relative to the config directory.
const DEFAULT_SESSION_PATH: &str = ".sidebar/session.json";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Element ids of the rendering surface.
    pub elements: ElementsConfig,
    /// Class names used to find menu structure in rendered markup.
    pub markup: MarkupConfig,
    /// Session storage keys.
    pub storage: StorageConfig,
    /// Syntax-highlighting stylesheet titles.
    pub theme: ThemeConfig,
    /// Search overlay settings.
    pub search: SearchConfig,
    /// Navigation behavior.
    pub navigation: NavigationConfig,
    /// Session file configuration (paths are relative strings from TOML).
    session: SessionConfigRaw,

    /// Resolved session configuration (set after loading).
    #[serde(skip)]
    pub session_resolved: SessionConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Element ids addressed on the rendering surface.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ElementsConfig {
    /// Scrollable navigation panel.
    pub sidebar: String,
    /// Modal search overlay.
    pub search_overlay: String,
    /// Text input inside the search overlay.
    pub search_input: String,
    /// Search results list container.
    pub search_results: String,
    /// Control that opens the mobile navigation slide-over.
    pub mobile_toggle: String,
    /// Mobile navigation slide-over panel.
    pub mobile_menu: String,
}

impl Default for ElementsConfig {
    fn default() -> Self {
        Self {
            sidebar: "left-sidebar".to_owned(),
            search_overlay: "search-model".to_owned(),
            search_input: "search-model-input".to_owned(),
            search_results: "search-results".to_owned(),
            mobile_toggle: "toggle".to_owned(),
            mobile_menu: "mobile-menu".to_owned(),
        }
    }
}

/// Class names that identify menu structure in rendered markup.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MarkupConfig {
    /// Class of a menu entry carrying `data-doc-id`.
    pub menu_class: String,
    /// Class of a group container carrying `data-group-id`.
    pub group_class: String,
    /// Class of a navigable item inside a menu entry.
    pub item_class: String,
    /// Marker class of the item for the current page.
    pub active_class: String,
}

impl Default for MarkupConfig {
    fn default() -> Self {
        Self {
            menu_class: "menu".to_owned(),
            group_class: "menu-group".to_owned(),
            item_class: "sidebar-nav-item".to_owned(),
            active_class: "active".to_owned(),
        }
    }
}

/// Session storage keys.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Key holding the expanded group ids.
    pub expanded_groups_key: String,
    /// Key holding the sidebar scroll offset.
    pub scroll_position_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            expanded_groups_key: "expandedGroups".to_owned(),
            scroll_position_key: "sidebarScrollPos".to_owned(),
        }
    }
}

/// Alternate stylesheet titles for syntax highlighting.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Title of the light stylesheet link.
    pub light_stylesheet: String,
    /// Title of the dark stylesheet link.
    pub dark_stylesheet: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            light_stylesheet: "highlight_light".to_owned(),
            dark_stylesheet: "highlight_dark".to_owned(),
        }
    }
}

/// Search overlay settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Letter that opens the overlay together with Ctrl.
    pub shortcut: String,
}

impl SearchConfig {
    /// Shortcut letter, lowercased.
    ///
    /// Falls back to `x` when the configured value is empty.
    #[must_use]
    pub fn shortcut_key(&self) -> char {
        self.shortcut
            .chars()
            .next()
            .map_or('x', |c| c.to_ascii_lowercase())
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            shortcut: "x".to_owned(),
        }
    }
}

/// Navigation behavior.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Also expand the active node's own group on load, not only its ancestors.
    pub expand_active: bool,
}

/// Raw session configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct SessionConfigRaw {
    path: Option<String>,
}

/// Resolved session configuration with absolute paths.
#[derive(Debug, Default)]
pub struct SessionConfig {
    /// File holding the persisted session keys.
    pub path: PathBuf,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`session.path`").
        field: String,
        /// Error message (e.g., "${`SESSION_DIR`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `sidebar.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the resulting configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(path) = &settings.session_path {
            self.session_resolved.path.clone_from(path);
        }
        if let Some(shortcut) = &settings.shortcut {
            self.search.shortcut.clone_from(shortcut);
        }
        if let Some(expand_active) = settings.expand_active {
            self.navigation.expand_active = expand_active;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        Self::discover_from(current)
    }

    fn discover_from(mut current: PathBuf) -> Option<PathBuf> {
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    #[must_use]
    pub fn default_with_base(base: &Path) -> Self {
        Self {
            elements: ElementsConfig::default(),
            markup: MarkupConfig::default(),
            storage: StorageConfig::default(),
            theme: ThemeConfig::default(),
            search: SearchConfig::default(),
            navigation: NavigationConfig::default(),
            session: SessionConfigRaw::default(),
            session_resolved: SessionConfig {
                path: base.join(DEFAULT_SESSION_PATH),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file and after CLI overrides.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_elements()?;
        self.validate_storage()?;
        self.validate_search()?;
        require_non_empty(&self.theme.light_stylesheet, "theme.light_stylesheet")?;
        require_non_empty(&self.theme.dark_stylesheet, "theme.dark_stylesheet")?;
        Ok(())
    }

    fn validate_elements(&self) -> Result<(), ConfigError> {
        let elements = &self.elements;
        require_non_empty(&elements.sidebar, "elements.sidebar")?;
        require_non_empty(&elements.search_overlay, "elements.search_overlay")?;
        require_non_empty(&elements.search_input, "elements.search_input")?;
        require_non_empty(&elements.search_results, "elements.search_results")?;
        require_non_empty(&elements.mobile_toggle, "elements.mobile_toggle")?;
        require_non_empty(&elements.mobile_menu, "elements.mobile_menu")?;

        let markup = &self.markup;
        require_non_empty(&markup.menu_class, "markup.menu_class")?;
        require_non_empty(&markup.group_class, "markup.group_class")?;
        require_non_empty(&markup.item_class, "markup.item_class")?;
        require_non_empty(&markup.active_class, "markup.active_class")?;
        Ok(())
    }

    fn validate_storage(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.storage.expanded_groups_key, "storage.expanded_groups_key")?;
        require_non_empty(&self.storage.scroll_position_key, "storage.scroll_position_key")?;
        if self.storage.expanded_groups_key == self.storage.scroll_position_key {
            return Err(ConfigError::Validation(
                "storage.expanded_groups_key and storage.scroll_position_key must differ"
                    .to_owned(),
            ));
        }
        Ok(())
    }

    fn validate_search(&self) -> Result<(), ConfigError> {
        let mut chars = self.search.shortcut.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_alphabetic() => Ok(()),
            _ => Err(ConfigError::Validation(format!(
                "search.shortcut must be a single ASCII letter, got {:?}",
                self.search.shortcut
            ))),
        }
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref path) = self.session.path {
            self.session.path = Some(expand::expand_env(path, "session.path")?);
        }
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let path = self
            .session
            .path
            .as_deref()
            .unwrap_or(DEFAULT_SESSION_PATH);
        self.session_resolved = SessionConfig {
            path: config_dir.join(path),
        };
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(config.elements.sidebar, "left-sidebar");
        assert_eq!(config.elements.search_overlay, "search-model");
        assert_eq!(config.storage.expanded_groups_key, "expandedGroups");
        assert_eq!(config.storage.scroll_position_key, "sidebarScrollPos");
        assert_eq!(config.theme.dark_stylesheet, "highlight_dark");
        assert_eq!(config.search.shortcut_key(), 'x');
        assert!(!config.navigation.expand_active);
        assert_eq!(
            config.session_resolved.path,
            PathBuf::from("/test/.sidebar/session.json")
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.elements.search_input, "search-model-input");
        assert_eq!(config.markup.group_class, "menu-group");
    }

    #[test]
    fn test_parse_variant_config() {
        let toml = r#"
[elements]
sidebar = "docs-nav"
search_overlay = "search-dialog"

[search]
shortcut = "K"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.elements.sidebar, "docs-nav");
        assert_eq!(config.elements.search_overlay, "search-dialog");
        assert_eq!(config.elements.search_results, "search-results"); // Default
        assert_eq!(config.search.shortcut_key(), 'k');
    }

    #[test]
    fn test_resolve_paths_default_session() {
        let mut config: Config = toml::from_str("").unwrap();
        config.resolve_paths(Path::new("/project"));
        assert_eq!(
            config.session_resolved.path,
            PathBuf::from("/project/.sidebar/session.json")
        );
    }

    #[test]
    fn test_resolve_paths_custom_session() {
        let mut config: Config = toml::from_str(
            r#"
[session]
path = "state/nav.json"
"#,
        )
        .unwrap();
        config.resolve_paths(Path::new("/project"));
        assert_eq!(
            config.session_resolved.path,
            PathBuf::from("/project/state/nav.json")
        );
    }

    #[test]
    fn test_validate_rejects_multi_letter_shortcut() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.search.shortcut = "ctrl+x".to_owned();

        let err = config.validate().unwrap_err();

        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("search.shortcut"));
    }

    #[test]
    fn test_validate_rejects_non_letter_shortcut() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.search.shortcut = "1".to_owned();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_element_id() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.elements.sidebar = "  ".to_owned();

        let err = config.validate().unwrap_err();

        assert!(err.to_string().contains("elements.sidebar cannot be empty"));
    }

    #[test]
    fn test_validate_rejects_shared_storage_key() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.storage.scroll_position_key = "expandedGroups".to_owned();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            session_path: Some(PathBuf::from("/tmp/session.json")),
            shortcut: Some("k".to_owned()),
            expand_active: Some(true),
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(
            config.session_resolved.path,
            PathBuf::from("/tmp/session.json")
        );
        assert_eq!(config.search.shortcut_key(), 'k');
        assert!(config.navigation.expand_active);
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));

        config.apply_cli_settings(&CliSettings::default());

        assert_eq!(
            config.session_resolved.path,
            PathBuf::from("/test/.sidebar/session.json")
        );
        assert_eq!(config.search.shortcut, "x");
    }

    #[test]
    fn test_load_explicit_missing_file() {
        let err = Config::load(Some(Path::new("/nonexistent/sidebar.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_from_file_resolves_against_config_dir() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sidebar.toml");
        std::fs::write(
            &path,
            r#"
[session]
path = "nav.json"

[navigation]
expand_active = true
"#,
        )
        .unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.session_resolved.path, dir.path().join("nav.json"));
        assert_eq!(config.config_path, Some(path));
        assert!(config.navigation.expand_active);
    }

    #[test]
    fn test_load_from_file_invalid_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sidebar.toml");
        std::fs::write(&path, "[elements\nsidebar = 1").unwrap();

        let err = Config::load(Some(&path), None).unwrap_err();

        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_rejects_invalid_cli_shortcut() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sidebar.toml");
        std::fs::write(&path, "").unwrap();
        let overrides = CliSettings {
            shortcut: Some("??".to_owned()),
            ..Default::default()
        };

        let err = Config::load(Some(&path), Some(&overrides)).unwrap_err();

        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_discover_from_parent_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("site").join("pages");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(CONFIG_FILENAME), "").unwrap();

        let found = Config::discover_from(nested);

        assert_eq!(found, Some(dir.path().join(CONFIG_FILENAME)));
    }

    #[test]
    fn test_expand_env_vars_session_path() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("SIDEBAR_TEST_STATE_DIR", "/var/state");
        }

        let mut config: Config = toml::from_str(
            r#"
[session]
path = "${SIDEBAR_TEST_STATE_DIR}/nav.json"
"#,
        )
        .unwrap();
        config.expand_env_vars().unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(
            config.session_resolved.path,
            PathBuf::from("/var/state/nav.json")
        );

        unsafe {
            std::env::remove_var("SIDEBAR_TEST_STATE_DIR");
        }
    }
}
