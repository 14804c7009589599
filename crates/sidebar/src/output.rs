//! Colored terminal output utilities.

use console::{Style, Term};
use sidebar_nav::{ExpandedGroups, MenuTree, StructuralLookup};

/// Terminal output formatter.
///
/// Reports go to stdout, status messages to stderr.
pub(crate) struct Output {
    out: Term,
    term: Term,
    green: Style,
    yellow: Style,
    red: Style,
    cyan_bold: Style,
    dim: Style,
}

impl Output {
    /// Create a new output formatter.
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            out: Term::stdout(),
            term: Term::stderr(),
            green: Style::new().green(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
            cyan_bold: Style::new().cyan().bold(),
            dim: Style::new().dim(),
        }
    }

    /// Print an info message.
    pub(crate) fn info(&self, msg: &str) {
        let _ = self.term.write_line(msg);
    }

    /// Print a success message (green).
    pub(crate) fn success(&self, msg: &str) {
        let _ = self.term.write_line(&self.green.apply_to(msg).to_string());
    }

    /// Print a warning message (yellow).
    pub(crate) fn warning(&self, msg: &str) {
        let _ = self.term.write_line(&self.yellow.apply_to(msg).to_string());
    }

    /// Print an error message (red).
    pub(crate) fn error(&self, msg: &str) {
        let _ = self.term.write_line(&self.red.apply_to(msg).to_string());
    }

    /// Print report text to stdout.
    pub(crate) fn report(&self, text: &str) {
        let _ = self.out.write_line(text);
    }

    /// Print the navigation tree to stdout.
    pub(crate) fn tree(&self, rows: &[TreeRow]) {
        for row in rows {
            let label = if row.active {
                self.cyan_bold.apply_to(&row.label).to_string()
            } else if row.marker == Marker::Collapsed {
                self.dim.apply_to(&row.label).to_string()
            } else {
                row.label.clone()
            };
            let _ = self
                .out
                .write_line(&format!("{}{} {label}", row.guide, row.marker.symbol()));
        }
    }
}

/// Expansion marker shown in front of a tree row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Marker {
    Expanded,
    Collapsed,
    Leaf,
}

impl Marker {
    fn symbol(self) -> &'static str {
        match self {
            Self::Expanded => "[-]",
            Self::Collapsed => "[+]",
            Self::Leaf => "   ",
        }
    }
}

/// One printed line of the navigation tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct TreeRow {
    pub guide: String,
    pub marker: Marker,
    pub label: String,
    pub active: bool,
}

const BRANCH: &str = "\u{251C}\u{2500}\u{2500} ";
const LAST: &str = "\u{2514}\u{2500}\u{2500} ";
const VERTICAL: &str = "\u{2502}   ";
const SPACE: &str = "    ";

/// Lay out the tree as the sidebar would show it.
///
/// Members of collapsed groups are not listed.
pub(crate) fn tree_rows(tree: &MenuTree, expanded: &ExpandedGroups) -> Vec<TreeRow> {
    let mut top: Vec<&str> = tree.roots().map(|n| n.id.as_str()).collect();
    // Groups referenced by members but never rendered as menus.
    top.extend(tree.groups().into_iter().filter(|g| tree.get(g).is_none()));

    let mut rows = Vec::new();
    let mut is_last = Vec::new();
    let count = top.len();
    for (i, id) in top.into_iter().enumerate() {
        is_last.push(i + 1 == count);
        push_rows(tree, expanded, id, &mut is_last, &mut rows);
        is_last.pop();
    }
    rows
}

fn push_rows(
    tree: &MenuTree,
    expanded: &ExpandedGroups,
    id: &str,
    is_last: &mut Vec<bool>,
    rows: &mut Vec<TreeRow>,
) {
    let depth = is_last.len() - 1;
    let mut guide = String::new();
    for (d, &last) in is_last.iter().enumerate().skip(1) {
        guide.push_str(match (d == depth, last) {
            (true, true) => LAST,
            (true, false) => BRANCH,
            (false, true) => SPACE,
            (false, false) => VERTICAL,
        });
    }

    let is_open = expanded.contains(id);
    let marker = if !tree.is_group(id) {
        Marker::Leaf
    } else if is_open {
        Marker::Expanded
    } else {
        Marker::Collapsed
    };
    rows.push(TreeRow {
        guide,
        marker,
        label: id.to_owned(),
        active: tree.active_node() == Some(id),
    });

    if marker != Marker::Expanded {
        return;
    }

    let members = tree.members(id);
    let count = members.len();
    for (i, member) in members.into_iter().enumerate() {
        is_last.push(i + 1 == count);
        push_rows(tree, expanded, member, is_last, rows);
        is_last.pop();
    }
}
