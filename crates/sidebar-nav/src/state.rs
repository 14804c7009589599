//! Persisted navigation state.
//!
//! [`ExpandedGroups`] and [`ScrollPosition`] are the two values that survive
//! page loads. Both are plain data; reading and writing them is the
//! controller's job, and deciding how they change is done by pure functions
//! such as [`toggle`].

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Ordered set of expanded group ids.
///
/// Membership is what matters; the order is insertion order and only exists so
/// the serialized form is stable. Serialized as a JSON array of strings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpandedGroups {
    ids: Vec<String>,
}

impl ExpandedGroups {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a set holding exactly `group_id`.
    #[must_use]
    pub fn seeded(group_id: &str) -> Self {
        Self {
            ids: vec![group_id.to_owned()],
        }
    }

    /// Parse the persisted form.
    ///
    /// Returns `None` unless `raw` is a JSON array whose entries are all
    /// strings. Duplicate entries are collapsed, keeping the first occurrence.
    #[must_use]
    pub fn from_json(raw: &str) -> Option<Self> {
        let ids: Vec<String> = serde_json::from_str(raw).ok()?;
        Some(ids.into_iter().collect())
    }

    /// Serialize to the persisted form.
    #[must_use]
    pub fn to_json(&self) -> String {
        // A Vec<String> always serializes.
        serde_json::to_string(&self.ids).unwrap_or_else(|_| "[]".to_owned())
    }

    /// Check membership.
    #[must_use]
    pub fn contains(&self, group_id: &str) -> bool {
        self.ids.iter().any(|id| id == group_id)
    }

    /// Append `group_id` if absent. Returns `true` if it was added.
    pub fn insert(&mut self, group_id: &str) -> bool {
        if self.contains(group_id) {
            return false;
        }
        self.ids.push(group_id.to_owned());
        true
    }

    /// Remove `group_id` if present. Returns `true` if it was removed.
    pub fn remove(&mut self, group_id: &str) -> bool {
        let before = self.ids.len();
        self.ids.retain(|id| id != group_id);
        self.ids.len() != before
    }

    /// Ids in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    /// Number of expanded groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Check whether no group is expanded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Membership as an unordered set, for comparisons that ignore order.
    #[must_use]
    pub fn membership(&self) -> HashSet<&str> {
        self.iter().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for ExpandedGroups {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut groups = Self::new();
        for id in iter {
            let id = id.into();
            if !groups.contains(&id) {
                groups.ids.push(id);
            }
        }
        groups
    }
}

/// Flip membership of `group_id`.
///
/// Removes the id when present and appends it when absent. Applying it twice
/// with the same id restores the original membership.
#[must_use]
pub fn toggle(mut state: ExpandedGroups, group_id: &str) -> ExpandedGroups {
    if !state.remove(group_id) {
        state.ids.push(group_id.to_owned());
    }
    state
}

/// Scroll offset of the navigation panel.
///
/// Always finite and non-negative. Persisted as a numeric string; integral
/// offsets have no fractional part (`"120"`, not `"120.0"`).
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct ScrollPosition(f64);

impl ScrollPosition {
    /// Top of the panel.
    pub const TOP: Self = Self(0.0);

    /// Create a position, rejecting negative or non-finite offsets.
    #[must_use]
    pub fn new(offset: f64) -> Option<Self> {
        if !offset.is_finite() || offset < 0.0 {
            return None;
        }
        // Normalizes -0.0.
        Some(Self(offset.abs()))
    }

    /// Parse the persisted form.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        raw.trim().parse::<f64>().ok().and_then(Self::new)
    }

    /// Offset in pixels.
    #[must_use]
    pub fn offset(self) -> f64 {
        self.0
    }
}

impl fmt::Display for ScrollPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_seeded_contains_only_seed() {
        let groups = ExpandedGroups::seeded("grp-1");

        assert_eq!(groups.len(), 1);
        assert!(groups.contains("grp-1"));
    }

    #[test]
    fn test_insert_is_idempotent() {
        let mut groups = ExpandedGroups::new();

        assert!(groups.insert("a"));
        assert!(!groups.insert("a"));
        assert_eq!(groups.len(), 1);
    }

    #[test]
    fn test_remove_missing_returns_false() {
        let mut groups = ExpandedGroups::seeded("a");

        assert!(!groups.remove("b"));
        assert!(groups.remove("a"));
        assert!(groups.is_empty());
    }

    #[test]
    fn test_from_json_array_of_strings() {
        let groups = ExpandedGroups::from_json(r#"["root","mid"]"#).unwrap();

        assert_eq!(groups.iter().collect::<Vec<_>>(), vec!["root", "mid"]);
    }

    #[test]
    fn test_from_json_collapses_duplicates() {
        let groups = ExpandedGroups::from_json(r#"["a","b","a"]"#).unwrap();

        assert_eq!(groups.iter().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_from_json_rejects_object() {
        assert!(ExpandedGroups::from_json(r#"{"root": true}"#).is_none());
    }

    #[test]
    fn test_from_json_rejects_non_string_entries() {
        assert!(ExpandedGroups::from_json(r#"["root", 3, null]"#).is_none());
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(ExpandedGroups::from_json("not json").is_none());
        assert!(ExpandedGroups::from_json("null").is_none());
        assert!(ExpandedGroups::from_json("").is_none());
    }

    #[test]
    fn test_to_json_preserves_order() {
        let groups: ExpandedGroups = ["b", "a"].into_iter().collect();

        assert_eq!(groups.to_json(), r#"["b","a"]"#);
    }

    #[test]
    fn test_toggle_adds_absent() {
        let groups = toggle(ExpandedGroups::seeded("a"), "b");

        assert_eq!(groups.iter().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_toggle_removes_present() {
        let groups = toggle(ExpandedGroups::from_iter(["a", "b"]), "a");

        assert_eq!(groups.iter().collect::<Vec<_>>(), vec!["b"]);
    }

    #[test]
    fn test_toggle_twice_restores_membership() {
        let original: ExpandedGroups = ["x", "y"].into_iter().collect();

        for id in ["x", "z"] {
            let twice = toggle(toggle(original.clone(), id), id);
            assert_eq!(twice.membership(), original.membership());
        }
    }

    #[test]
    fn test_scroll_position_parse() {
        assert_eq!(ScrollPosition::parse("120").unwrap().offset(), 120.0);
        assert_eq!(ScrollPosition::parse(" 42.5 ").unwrap().offset(), 42.5);
    }

    #[test]
    fn test_scroll_position_rejects_invalid() {
        assert!(ScrollPosition::parse("").is_none());
        assert!(ScrollPosition::parse("abc").is_none());
        assert!(ScrollPosition::parse("-5").is_none());
        assert!(ScrollPosition::parse("NaN").is_none());
        assert!(ScrollPosition::parse("inf").is_none());
    }

    #[test]
    fn test_scroll_position_display() {
        assert_eq!(ScrollPosition::new(120.0).unwrap().to_string(), "120");
        assert_eq!(ScrollPosition::new(12.25).unwrap().to_string(), "12.25");
        assert_eq!(ScrollPosition::new(-0.0).unwrap().to_string(), "0");
    }
}
