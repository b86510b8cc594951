//! Selection helpers over a set of record ids.
//!
//! Every helper takes the currently visible id set so the selection can never
//! name a record the user cannot see.

use std::collections::{BTreeSet, HashSet};

/// Pure operations on a selected-id set.
pub struct SelectionManager;

impl SelectionManager {
    /// Flip membership of `id`. Ids outside `visible` are ignored.
    pub fn toggle(
        selected: &BTreeSet<String>,
        id: &str,
        visible: &HashSet<String>,
    ) -> BTreeSet<String> {
        let mut next = selected.clone();
        if !visible.contains(id) {
            return next;
        }
        if !next.remove(id) {
            next.insert(id.to_string());
        }
        next
    }

    /// Add every visible id in `ids` to the selection.
    pub fn select_all<I, S>(
        selected: &BTreeSet<String>,
        ids: I,
        visible: &HashSet<String>,
    ) -> BTreeSet<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut next = selected.clone();
        next.extend(
            ids.into_iter()
                .map(|id| id.as_ref().to_string())
                .filter(|id| visible.contains(id)),
        );
        next
    }

    pub fn clear() -> BTreeSet<String> {
        BTreeSet::new()
    }

    /// Drop ids no longer visible.
    pub fn prune(selected: &BTreeSet<String>, visible: &HashSet<String>) -> BTreeSet<String> {
        selected
            .iter()
            .filter(|id| visible.contains(id.as_str()))
            .cloned()
            .collect()
    }
}
