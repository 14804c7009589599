//! Streaming reader for rendered navigation markup.
//!
//! Pages are HTML, not XML, so the tokenizer runs with end-name checks off,
//! void elements never open a scope, and `<script>`/`<style>` bodies are
//! skipped as raw text.

use quick_xml::Error;
use quick_xml::errors::IllFormedError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use serde::Serialize;
use sidebar_nav::{MemorySurface, MenuTree, MenuTreeBuilder, StructuralLookup};

use crate::error::MarkupError;

/// HTML elements that never have content or an end tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Elements whose content is raw text.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Class names and element ids the reader looks for.
#[derive(Clone, Debug)]
pub struct MarkupOptions {
    /// Class of navigable entries carrying `data-doc-id`.
    pub menu_class: String,
    /// Class of group containers carrying `data-group-id`.
    pub group_class: String,
    /// Class of clickable navigation items.
    pub item_class: String,
    /// Class marking the current page's item.
    pub active_class: String,
    /// Id of the navigation panel.
    pub sidebar_id: String,
    /// Id of the search overlay.
    pub search_overlay_id: String,
    /// Id of the search input.
    pub search_input_id: String,
    /// Id of the search results list.
    pub search_results_id: String,
    /// Id of the mobile navigation toggle.
    pub mobile_toggle_id: String,
    /// Id of the mobile slide-over.
    pub mobile_menu_id: String,
}

impl Default for MarkupOptions {
    fn default() -> Self {
        Self {
            menu_class: "menu".to_owned(),
            group_class: "menu-group".to_owned(),
            item_class: "sidebar-nav-item".to_owned(),
            active_class: "active".to_owned(),
            sidebar_id: "left-sidebar".to_owned(),
            search_overlay_id: "search-model".to_owned(),
            search_input_id: "search-model-input".to_owned(),
            search_results_id: "search-results".to_owned(),
            mobile_toggle_id: "toggle".to_owned(),
            mobile_menu_id: "mobile-menu".to_owned(),
        }
    }
}

/// Which controller-facing elements a page contains.
#[allow(clippy::struct_excessive_bools)]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PageElements {
    /// Navigation panel.
    pub sidebar: bool,
    /// Search overlay.
    pub search_overlay: bool,
    /// Search input.
    pub search_input: bool,
    /// Search results list.
    pub search_results: bool,
    /// Mobile navigation toggle.
    pub mobile_toggle: bool,
    /// Mobile slide-over.
    pub mobile_menu: bool,
    /// Titles of `<link>` elements, in document order.
    pub stylesheets: Vec<String>,
}

/// Navigation structure and element inventory of one page.
#[derive(Debug)]
pub struct RenderedPage {
    /// Menu hierarchy.
    pub tree: MenuTree,
    /// Elements present on the page.
    pub elements: PageElements,
}

impl RenderedPage {
    /// Build an in-memory surface shaped like this page.
    ///
    /// Every group starts collapsed and every element the page lacks is
    /// missing from the surface as well.
    #[must_use]
    pub fn surface(&self) -> MemorySurface {
        let mut surface = MemorySurface::new(self.tree.groups())
            .with_stylesheets(self.elements.stylesheets.iter().map(String::as_str));
        if !self.elements.sidebar {
            surface = surface.without_sidebar();
        }
        if !self.elements.search_overlay {
            surface = surface.without_search_overlay();
        }
        if !self.elements.search_input {
            surface = surface.without_search_input();
        }
        if !self.elements.search_results {
            surface = surface.without_search_results();
        }
        if !self.elements.mobile_menu {
            surface = surface.without_mobile_menu();
        }
        surface
    }
}

/// Read the menu hierarchy from a rendered page.
///
/// # Errors
///
/// Returns [`MarkupError::Parse`] if the page cannot be tokenized.
pub fn read_menu(html: &str, options: &MarkupOptions) -> Result<MenuTree, MarkupError> {
    read_page(html, options).map(|page| page.tree)
}

/// Read the menu hierarchy and element inventory from a rendered page.
///
/// Menus are `.menu[data-doc-id]` elements; their parent group is the nearest
/// enclosing `.menu-group[data-group-id]`. The active page is the nearest menu
/// enclosing the first `.sidebar-nav-item.active`. When the page has a
/// navigation panel, only entries inside it are read.
///
/// # Errors
///
/// Returns [`MarkupError::Parse`] if the page cannot be tokenized.
pub fn read_page(html: &str, options: &MarkupOptions) -> Result<RenderedPage, MarkupError> {
    // Offset of the slice the current reader was started on.
    let mut base = 0_u64;
    let mut reader = tokenizer(html);
    let mut scanner = Scanner::new(options);

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            // Stray `&` in text; the reader resumes after it.
            Err(Error::IllFormed(IllFormedError::UnclosedReference)) => continue,
            Err(source) => {
                return Err(MarkupError::Parse {
                    position: base + reader.error_position(),
                    source,
                });
            }
        };

        match event {
            Event::Start(e) => {
                let name = local_name(&e);
                if RAW_TEXT_ELEMENTS.contains(&name.as_str()) {
                    scanner.element(&e, &name, false);
                    let body = usize::try_from(base + reader.buffer_position())
                        .unwrap_or(html.len());
                    let resume = raw_text_end(html, body, &name);
                    base = resume as u64;
                    reader = tokenizer(html.get(resume..).unwrap_or_default());
                } else {
                    let opens = !VOID_ELEMENTS.contains(&name.as_str());
                    scanner.element(&e, &name, opens);
                }
            }
            Event::Empty(e) => {
                let name = local_name(&e);
                scanner.element(&e, &name, false);
            }
            Event::End(e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_ascii_lowercase();
                scanner.close(&name);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(scanner.finish())
}

/// HTML-tolerant tokenizer over `html`.
fn tokenizer(html: &str) -> Reader<&[u8]> {
    let mut reader = Reader::from_str(html);
    let config = reader.config_mut();
    config.trim_text(false);
    config.check_end_names = false;
    config.allow_unmatched_ends = true;
    config.allow_dangling_amp = true;
    reader
}

/// Byte offset just past the `</name>` tag that ends the raw text body
/// starting at `from`, or the end of input if the body is never closed.
///
/// The end tag name is matched case-insensitively and must be followed by
/// `>`, `/` or whitespace, so `</scripts>` does not end a script.
fn raw_text_end(html: &str, from: usize, name: &str) -> usize {
    let bytes = html.as_bytes();
    let mut pos = from;

    while let Some(lt) = bytes
        .get(pos..)
        .and_then(|rest| rest.iter().position(|&b| b == b'<'))
    {
        let tag = pos + lt;
        let name_start = tag + 2;
        let name_end = name_start + name.len();
        let closes = bytes.get(tag + 1) == Some(&b'/')
            && bytes
                .get(name_start..name_end)
                .is_some_and(|n| n.eq_ignore_ascii_case(name.as_bytes()))
            && bytes
                .get(name_end)
                .is_none_or(|&b| b == b'>' || b == b'/' || b.is_ascii_whitespace());
        if closes {
            return bytes
                .get(name_end..)
                .and_then(|rest| rest.iter().position(|&b| b == b'>'))
                .map_or(bytes.len(), |gt| name_end + gt + 1);
        }
        pos = tag + 1;
    }

    bytes.len()
}

fn local_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).to_ascii_lowercase()
}

/// An element that is still open.
struct Frame {
    name: String,
    menu: Option<String>,
    group: Option<String>,
    sidebar: bool,
}

enum Entry {
    Node { id: String, parent: Option<String> },
    Group { id: String, parent: Option<String> },
    Active(String),
}

/// Attributes of one element the reader cares about.
#[derive(Default)]
struct Attrs {
    id: Option<String>,
    classes: Vec<String>,
    doc_id: Option<String>,
    group_id: Option<String>,
    title: Option<String>,
}

impl Attrs {
    fn read(e: &BytesStart<'_>) -> Self {
        let mut attrs = Self::default();
        for attr in e.html_attributes().flatten() {
            let value = attr.unescape_value().map_or_else(
                |_| String::from_utf8_lossy(&attr.value).into_owned(),
                std::borrow::Cow::into_owned,
            );
            match attr.key.local_name().as_ref() {
                b"id" => attrs.id = Some(value),
                b"class" => {
                    attrs.classes = value.split_whitespace().map(str::to_owned).collect();
                }
                b"data-doc-id" => attrs.doc_id = Some(value),
                b"data-group-id" => attrs.group_id = Some(value),
                b"title" => attrs.title = Some(value),
                _ => {}
            }
        }
        attrs
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

struct Scanner<'a> {
    options: &'a MarkupOptions,
    stack: Vec<Frame>,
    entries: Vec<(Entry, bool)>,
    elements: PageElements,
}

impl<'a> Scanner<'a> {
    fn new(options: &'a MarkupOptions) -> Self {
        Self {
            options,
            stack: Vec::new(),
            entries: Vec::new(),
            elements: PageElements::default(),
        }
    }

    fn element(&mut self, e: &BytesStart<'_>, name: &str, opens: bool) {
        let attrs = Attrs::read(e);
        let options = self.options;

        let sidebar = attrs.id.as_deref() == Some(options.sidebar_id.as_str());
        if let Some(id) = attrs.id.as_deref() {
            self.record_element(id);
        }
        if name == "link"
            && let Some(title) = &attrs.title
        {
            self.elements.stylesheets.push(title.clone());
        }

        let in_sidebar = sidebar || self.stack.iter().any(|f| f.sidebar);
        let menu = attrs
            .doc_id
            .clone()
            .filter(|_| attrs.has_class(&options.menu_class));
        let group = attrs
            .group_id
            .clone()
            .filter(|_| attrs.has_class(&options.group_class));

        if let Some(id) = &menu {
            let parent = self.enclosing_group();
            self.entries.push((
                Entry::Node {
                    id: id.clone(),
                    parent,
                },
                in_sidebar,
            ));
        }
        if let Some(id) = &group {
            // A container sits next to or inside its menu, so both share a parent.
            let parent = self.enclosing_group();
            self.entries.push((
                Entry::Group {
                    id: id.clone(),
                    parent,
                },
                in_sidebar,
            ));
        }
        if attrs.has_class(&options.item_class) && attrs.has_class(&options.active_class) {
            let active = menu.clone().or_else(|| self.enclosing_menu());
            if let Some(id) = active {
                self.entries.push((Entry::Active(id), in_sidebar));
            }
        }

        if opens {
            self.stack.push(Frame {
                name: name.to_owned(),
                menu,
                group,
                sidebar,
            });
        }
    }

    fn record_element(&mut self, id: &str) {
        let options = self.options;
        let elements = &mut self.elements;
        if id == options.sidebar_id {
            elements.sidebar = true;
        } else if id == options.search_overlay_id {
            elements.search_overlay = true;
        } else if id == options.search_input_id {
            elements.search_input = true;
        } else if id == options.search_results_id {
            elements.search_results = true;
        } else if id == options.mobile_toggle_id {
            elements.mobile_toggle = true;
        } else if id == options.mobile_menu_id {
            elements.mobile_menu = true;
        }
    }

    /// Close the innermost open element named `name` and everything inside it.
    fn close(&mut self, name: &str) {
        if let Some(pos) = self.stack.iter().rposition(|f| f.name == name) {
            self.stack.truncate(pos);
        }
    }

    fn enclosing_group(&self) -> Option<String> {
        self.stack.iter().rev().find_map(|f| f.group.clone())
    }

    fn enclosing_menu(&self) -> Option<String> {
        self.stack.iter().rev().find_map(|f| f.menu.clone())
    }

    fn finish(self) -> RenderedPage {
        let scoped = self.elements.sidebar;
        let mut builder = MenuTreeBuilder::new();
        let mut groups = Vec::new();
        let mut active = None;

        for (entry, in_sidebar) in self.entries {
            if scoped && !in_sidebar {
                continue;
            }
            match entry {
                Entry::Node { id, parent } => {
                    builder.add_node(id, parent.as_deref());
                }
                Entry::Group { id, parent } => groups.push((id, parent)),
                Entry::Active(id) => {
                    active.get_or_insert(id);
                }
            }
        }

        // Containers are declared after all menus so a menu's own position wins.
        for (id, parent) in groups {
            builder.declare_group(id, parent.as_deref());
        }
        if let Some(id) = active
            && !builder.set_active(&id)
        {
            tracing::debug!(id = %id, "Active item outside any known menu");
        }

        let tree = builder.build();
        tracing::debug!(
            nodes = tree.len(),
            groups = tree.groups().len(),
            active = tree.active_node().unwrap_or(""),
            "Read navigation markup"
        );

        RenderedPage {
            tree,
            elements: self.elements,
        }
    }
}
