//! End-to-end behavior of the navigation controller across page loads.

use std::collections::HashSet;
use std::sync::Arc;

use pretty_assertions::assert_eq;
use sidebar_nav::{
    ControllerConfig, ExpandedGroups, MemorySurface, MenuTree, MenuTreeBuilder,
    NavigationController, StructuralLookup, Surface, UiEvent, ancestors_of,
};
use sidebar_store::{MemoryStore, NullStore, SessionStore};

type Controller = NavigationController<MenuTree, MemorySurface>;

/// `root -> mid -> leaf` plus two top-level groups `grp-1` and `grp-2`.
fn site(active: &str) -> MenuTree {
    let mut builder = MenuTreeBuilder::new();
    builder.add_node("grp-1", None);
    builder.add_node("grp-1-page", Some("grp-1"));
    builder.add_node("grp-2", None);
    builder.add_node("grp-2-page", Some("grp-2"));
    builder.add_node("root", None);
    builder.add_node("mid", Some("root"));
    builder.add_node("leaf", Some("mid"));
    builder.add_node("leaf-child", Some("leaf"));
    builder.set_active(active);
    builder.build()
}

fn load_page(store: &Arc<MemoryStore>, active: &str) -> Controller {
    let tree = site(active);
    let surface = MemorySurface::new(tree.groups());
    let store: Arc<dyn SessionStore> = store.clone();
    let mut nav = NavigationController::new(ControllerConfig::default(), store, tree, surface);
    nav.initialize();
    nav
}

fn membership(nav: &Controller) -> HashSet<String> {
    nav.expanded_groups().iter().map(str::to_owned).collect()
}

fn set(ids: &[&str]) -> HashSet<String> {
    ids.iter().map(|&id| id.to_owned()).collect()
}

fn stored_groups(store: &MemoryStore) -> HashSet<String> {
    let raw = store.get("expandedGroups").unwrap().unwrap();
    ExpandedGroups::from_json(&raw)
        .unwrap()
        .iter()
        .map(str::to_owned)
        .collect()
}

/// Every group rendered expanded is in the set, and every group in the set
/// that has elements is rendered expanded.
fn assert_surface_matches_state(nav: &Controller) {
    for (group, view) in nav.surface().groups() {
        let expanded = nav.expanded_groups().contains(group);
        assert_eq!(view.content_visible, expanded, "content of {group}");
        assert_eq!(view.arrow_rotated, expanded, "arrow of {group}");
    }
}

#[test]
fn test_empty_state_seeds_first_top_level_group() {
    let store = Arc::new(MemoryStore::new());

    let nav = load_page(&store, "grp-1-page");

    assert_eq!(membership(&nav), set(&["grp-1"]));
    assert_eq!(stored_groups(&store), set(&["grp-1"]));
}

#[test]
fn test_active_leaf_expands_ancestors_only() {
    let store = Arc::new(MemoryStore::new().with_value("expandedGroups", r#"["grp-1","root"]"#));

    let nav = load_page(&store, "leaf");

    assert_eq!(membership(&nav), set(&["grp-1", "root", "mid"]));
    assert!(!nav.expanded_groups().contains("leaf"));
}

#[test]
fn test_stored_root_expands_path_to_active_leaf() {
    let mut builder = MenuTreeBuilder::new();
    builder.add_node("root", None);
    builder.add_node("mid", Some("root"));
    builder.add_node("leaf", Some("mid"));
    builder.set_active("leaf");
    let tree = builder.build();
    let surface = MemorySurface::new(tree.groups());
    let store = Arc::new(MemoryStore::new().with_value("expandedGroups", r#"["root"]"#));
    let mut nav =
        NavigationController::new(ControllerConfig::default(), store.clone(), tree, surface);

    nav.initialize();

    assert_eq!(membership(&nav), set(&["root", "mid"]));
    assert_eq!(stored_groups(&store), set(&["root", "mid"]));
    assert_eq!(nav.surface().expanded_groups(), vec!["mid", "root"]);
}

#[test]
fn test_ancestors_present_at_every_depth() {
    for active in ["grp-1-page", "grp-2-page", "root", "mid", "leaf", "leaf-child"] {
        let store = Arc::new(MemoryStore::new());
        let nav = load_page(&store, active);

        for group in ancestors_of(active, nav.lookup()) {
            assert!(
                nav.expanded_groups().contains(&group),
                "{group} missing for active {active}"
            );
        }
    }
}

#[test]
fn test_toggle_absent_group_then_back() {
    let store = Arc::new(MemoryStore::new());
    let mut nav = load_page(&store, "grp-1-page");

    nav.handle(UiEvent::Toggle("grp-2".to_owned()));
    assert!(nav.expanded_groups().contains("grp-2"));
    assert!(stored_groups(&store).contains("grp-2"));

    nav.handle(UiEvent::Toggle("grp-2".to_owned()));
    assert!(!nav.expanded_groups().contains("grp-2"));
    assert!(!stored_groups(&store).contains("grp-2"));
}

#[test]
fn test_double_toggle_restores_membership() {
    let store = Arc::new(MemoryStore::new());
    let mut nav = load_page(&store, "leaf");
    let before = membership(&nav);

    for group in ["grp-1", "grp-2", "root", "mid", "leaf"] {
        nav.on_toggle(group);
        nav.on_toggle(group);
        assert_eq!(membership(&nav), before, "after toggling {group} twice");
    }
}

#[test]
fn test_object_in_storage_falls_back_to_seed() {
    let store = Arc::new(MemoryStore::new().with_value("expandedGroups", r#"{"root":true}"#));

    let nav = load_page(&store, "grp-1-page");

    assert_eq!(membership(&nav), set(&["grp-1"]));
    assert_eq!(stored_groups(&store), set(&["grp-1"]));
}

#[test]
fn test_state_without_first_group_is_reseeded() {
    let store = Arc::new(MemoryStore::new().with_value("expandedGroups", r#"["grp-2"]"#));

    let nav = load_page(&store, "grp-2-page");

    assert_eq!(membership(&nav), set(&["grp-1", "grp-2"]));
}

#[test]
fn test_reload_reproduces_membership() {
    let store = Arc::new(MemoryStore::new());
    let mut nav = load_page(&store, "grp-1-page");

    nav.on_toggle("grp-2");
    nav.on_toggle("root");
    nav.on_toggle("mid");
    nav.on_toggle("root");
    let before = membership(&nav);

    let reloaded = load_page(&store, "grp-1-page");

    assert_eq!(membership(&reloaded), before);
}

#[test]
fn test_surface_matches_state_after_every_step() {
    let store = Arc::new(MemoryStore::new());
    let mut nav = load_page(&store, "leaf-child");
    assert_surface_matches_state(&nav);

    for group in ["grp-2", "mid", "grp-1", "leaf", "mid"] {
        nav.handle(UiEvent::Toggle(group.to_owned()));
        assert_surface_matches_state(&nav);
    }
}

#[test]
fn test_scroll_survives_reload() {
    let store = Arc::new(MemoryStore::new());
    let mut nav = load_page(&store, "grp-1-page");

    nav.handle(UiEvent::Scroll(75.5));

    let reloaded = load_page(&store, "grp-1-page");
    assert_eq!(reloaded.surface().scroll_offset(), Some(75.5));
}

#[test]
fn test_events_before_initialize_are_dropped() {
    let tree = site("leaf");
    let surface = MemorySurface::new(tree.groups());
    let store = Arc::new(MemoryStore::new());
    let mut nav =
        NavigationController::new(ControllerConfig::default(), store.clone(), tree, surface);

    nav.handle(UiEvent::Toggle("root".to_owned()));
    nav.initialize();

    // The early toggle would have collapsed root; it must not have run.
    assert!(nav.expanded_groups().contains("root"));
    assert!(nav.expanded_groups().contains("mid"));
}

#[test]
fn test_storage_disabled_runs_in_memory() {
    let tree = site("leaf");
    let surface = MemorySurface::new(tree.groups());
    let mut nav =
        NavigationController::new(ControllerConfig::default(), Arc::new(NullStore), tree, surface);

    nav.initialize();
    nav.handle(UiEvent::Toggle("grp-2".to_owned()));

    assert_eq!(membership(&nav), set(&["grp-1", "mid", "root", "grp-2"]));
    assert_surface_matches_state(&nav);
}
