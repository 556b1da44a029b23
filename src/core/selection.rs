/*
 * The user's pick list: an insertion-ordered, duplicate-free sequence of data
 * item names. Order matters for display and for `remove_last`, so the set is
 * backed by an `IndexSet` which keeps membership tests O(1) while preserving
 * the position of the first insertion.
 */
use super::catalog::ItemCatalog;
use indexmap::IndexSet;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SelectionSet {
    names: IndexSet<String>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /*
     * Appends `name` if the catalog knows it and it is not selected yet.
     * Returns whether the selection changed.
     */
    pub fn add(&mut self, name: &str, catalog: &ItemCatalog) -> bool {
        if !catalog.contains(name) {
            log::debug!("SelectionSet: Ignoring unknown data item '{name}'.");
            return false;
        }
        if self.names.contains(name) {
            return false;
        }
        self.names.insert(name.to_string())
    }

    /// Appends every catalog name not yet selected, in catalog order.
    pub fn add_all(&mut self, catalog: &ItemCatalog) -> usize {
        let before = self.names.len();
        for name in catalog.names() {
            self.names.insert(name);
        }
        self.names.len() - before
    }

    pub fn remove_last(&mut self) -> Option<String> {
        self.names.pop()
    }

    /// Removes each given name that is selected. Relative order of the rest is kept.
    pub fn remove_named<I, S>(&mut self, names: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .filter_map(|name| self.names.shift_take(name.as_ref()))
            .collect()
    }

    /*
     * The "remove" button: an explicitly marked subset takes precedence; with
     * nothing marked, the most recently added name goes.
     */
    pub fn apply_remove<I, S>(&mut self, marked: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let marked: Vec<S> = marked.into_iter().collect();
        if marked.is_empty() {
            self.remove_last().into_iter().collect()
        } else {
            self.remove_named(marked)
        }
    }

    pub fn clear(&mut self) {
        self.names.clear();
    }

    pub fn to_ordered_list(&self) -> Vec<String> {
        self.names.iter().cloned().collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
