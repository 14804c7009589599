//! Menu hierarchy and structural lookups.
//!
//! The hierarchy is never held as an owned graph of children. Each node only
//! names its enclosing group, and the members of a group are whatever nodes
//! point at it. [`MenuTree`] is the in-memory rendition of that contract,
//! rebuilt from rendered markup on every page load.
//!
//! # Architecture
//!
//! Nodes are stored in a flat `Vec<MenuNode>` in document order with:
//! - O(1) id lookups via an id index `HashMap`
//! - O(1) group membership lookups via a members `HashMap`
//! - O(d) ancestor walks where d is the node depth

use std::collections::{HashMap, HashSet};

use serde::Serialize;

/// One entry of the navigation hierarchy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MenuNode {
    /// Opaque identifier, unique within the tree.
    pub id: String,
    /// Id of the enclosing group, `None` for top-level entries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_group_id: Option<String>,
    /// True only for the entry of the page currently being viewed.
    pub is_active: bool,
}

/// Read-only view of the menu hierarchy.
///
/// The controller and [`ancestors_of`] only see the tree through this trait,
/// so they can run against markup, fixtures, or any other source of structure.
pub trait StructuralLookup {
    /// Enclosing group of `node_id`, or `None` for top-level or unknown nodes.
    fn parent_group(&self, node_id: &str) -> Option<&str>;

    /// Id of the node marked active, if any.
    fn active_node(&self) -> Option<&str>;

    /// All group ids in document order.
    fn groups(&self) -> Vec<&str>;

    /// Direct members of `group_id` in document order.
    fn members(&self, group_id: &str) -> Vec<&str>;

    /// First top-level group, falling back to the first group of any depth.
    fn first_group(&self) -> Option<&str> {
        let groups = self.groups();
        groups
            .iter()
            .copied()
            .find(|g| self.parent_group(g).is_none())
            .or_else(|| groups.first().copied())
    }

    /// Check whether `id` names a group.
    fn is_group(&self, id: &str) -> bool {
        self.groups().contains(&id)
    }
}

/// Enclosing group ids of `node_id`, nearest first.
///
/// Walks `parent_group` upward until a top-level entry is reached. The node
/// itself is never part of the result. Unknown nodes have no ancestors, and a
/// repeated id ends the walk so malformed markup with cyclic parents still
/// terminates.
pub fn ancestors_of<L: StructuralLookup + ?Sized>(node_id: &str, lookup: &L) -> Vec<String> {
    let mut ancestors = Vec::new();
    let mut seen: HashSet<&str> = HashSet::from([node_id]);
    let mut current = lookup.parent_group(node_id);

    while let Some(group) = current {
        if !seen.insert(group) {
            tracing::warn!(node = %node_id, group = %group, "Cyclic group nesting, stopping ancestor walk");
            break;
        }
        ancestors.push(group.to_owned());
        current = lookup.parent_group(group);
    }

    ancestors
}

/// Navigation hierarchy reconstructed from rendered structure.
#[derive(Debug, Default)]
pub struct MenuTree {
    nodes: Vec<MenuNode>,
    index: HashMap<String, usize>,
    members: HashMap<String, Vec<usize>>,
    groups: Vec<String>,
    active: Option<usize>,
}

impl MenuTree {
    /// All nodes in document order.
    #[must_use]
    pub fn nodes(&self) -> &[MenuNode] {
        &self.nodes
    }

    /// Get node by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&MenuNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    /// Top-level nodes in document order.
    pub fn roots(&self) -> impl Iterator<Item = &MenuNode> {
        self.nodes.iter().filter(|n| n.parent_group_id.is_none())
    }

    /// Direct members of a group as nodes.
    #[must_use]
    pub fn member_nodes(&self, group_id: &str) -> Vec<&MenuNode> {
        self.members
            .get(group_id)
            .map(|idxs| idxs.iter().map(|&i| &self.nodes[i]).collect())
            .unwrap_or_default()
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check whether the tree has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl StructuralLookup for MenuTree {
    fn parent_group(&self, node_id: &str) -> Option<&str> {
        self.get(node_id)?.parent_group_id.as_deref()
    }

    fn active_node(&self) -> Option<&str> {
        self.active.map(|i| self.nodes[i].id.as_str())
    }

    fn groups(&self) -> Vec<&str> {
        self.groups.iter().map(String::as_str).collect()
    }

    fn members(&self, group_id: &str) -> Vec<&str> {
        self.members
            .get(group_id)
            .map(|idxs| idxs.iter().map(|&i| self.nodes[i].id.as_str()).collect())
            .unwrap_or_default()
    }

    fn is_group(&self, id: &str) -> bool {
        self.members.contains_key(id) || self.groups.iter().any(|g| g == id)
    }
}

/// Builder for constructing [`MenuTree`] instances.
#[derive(Debug, Default)]
pub struct MenuTreeBuilder {
    nodes: Vec<MenuNode>,
    index: HashMap<String, usize>,
    declared_groups: HashSet<usize>,
    active: Option<usize>,
}

impl MenuTreeBuilder {
    /// Create a new tree builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node in document order.
    ///
    /// Ids are unique: adding an id that already exists keeps the first node
    /// and returns its index.
    ///
    /// # Arguments
    ///
    /// * `id` - Node identifier
    /// * `parent_group` - Enclosing group id, `None` for top-level entries
    ///
    /// # Returns
    ///
    /// Index of the node.
    pub fn add_node(&mut self, id: impl Into<String>, parent_group: Option<&str>) -> usize {
        let id = id.into();
        if let Some(&idx) = self.index.get(&id) {
            tracing::debug!(id = %id, "Duplicate menu id, keeping first occurrence");
            return idx;
        }

        let idx = self.nodes.len();
        self.index.insert(id.clone(), idx);
        self.nodes.push(MenuNode {
            id,
            parent_group_id: parent_group.map(str::to_owned),
            is_active: false,
        });
        idx
    }

    /// Declare `id` as a group container, adding its node if missing.
    ///
    /// Groups are also inferred from membership; declaring one makes an empty
    /// group visible to [`StructuralLookup::groups`].
    pub fn declare_group(&mut self, id: impl Into<String>, parent_group: Option<&str>) -> usize {
        let idx = self.add_node(id, parent_group);
        self.declared_groups.insert(idx);
        idx
    }

    /// Mark a node as the active page. The first active node wins.
    ///
    /// Returns `false` if the id is unknown or another node is already active.
    pub fn set_active(&mut self, id: &str) -> bool {
        if self.active.is_some() {
            return false;
        }
        let Some(&idx) = self.index.get(id) else {
            return false;
        };
        self.nodes[idx].is_active = true;
        self.active = Some(idx);
        true
    }

    /// Build the [`MenuTree`] instance.
    #[must_use]
    pub fn build(self) -> MenuTree {
        let mut members: HashMap<String, Vec<usize>> = HashMap::new();
        let mut dangling = Vec::new();
        for (idx, node) in self.nodes.iter().enumerate() {
            if let Some(parent) = &node.parent_group_id {
                if !self.index.contains_key(parent) && !members.contains_key(parent) {
                    dangling.push(parent.clone());
                }
                members.entry(parent.clone()).or_default().push(idx);
            }
        }

        let mut groups: Vec<String> = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(idx, node)| {
                self.declared_groups.contains(idx) || members.contains_key(&node.id)
            })
            .map(|(_, node)| node.id.clone())
            .collect();
        groups.extend(dangling);

        MenuTree {
            nodes: self.nodes,
            index: self.index,
            members,
            groups,
            active: self.active,
        }
    }
}
