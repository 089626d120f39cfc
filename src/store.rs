// src/store.rs
//! The canonical tab collection: [`TabStore`].
//!
//! The store owns every live tab plus, per ordering scope, the dense ID
//! sequence that gives each tab its `index`. All shifting happens inside a
//! single call, so readers never observe an index sequence with gaps or
//! duplicates.

use std::collections::HashMap;

use log::trace;

use crate::config::OrderingScope;
use crate::errors::RegistryError;
use crate::tab::{Tab, TabId, TabProperties};

/// Ordering domain a tab belongs to, derived from the configured scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum ScopeKey {
    Extension(String),
    Global,
}

pub struct TabStore {
    ordering: OrderingScope,
    /// All live tabs, keyed by ID
    tabs: HashMap<TabId, Tab>,
    /// Scopes in the order they were first seen
    scope_order: Vec<ScopeKey>,
    /// Dense ID sequence per scope; a tab's position is its index
    sequences: HashMap<ScopeKey, Vec<TabId>>,
}

impl TabStore {
    pub fn new(ordering: OrderingScope) -> Self {
        Self {
            ordering,
            tabs: HashMap::new(),
            scope_order: Vec::new(),
            sequences: HashMap::new(),
        }
    }

    fn scope_of(&self, extension: &str) -> ScopeKey {
        match self.ordering {
            OrderingScope::PerExtension => ScopeKey::Extension(extension.to_string()),
            OrderingScope::Global => ScopeKey::Global,
        }
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn contains(&self, id: TabId) -> bool {
        self.tabs.contains_key(&id)
    }

    pub fn get(&self, id: TabId) -> Result<&Tab, RegistryError> {
        self.tabs.get(&id).ok_or(RegistryError::NotFound(id))
    }

    /// Number of tabs in the scope that `extension` maps to. This is also
    /// the index a freshly appended tab would get.
    pub fn scope_len(&self, extension: &str) -> usize {
        self.sequences.get(&self.scope_of(extension)).map_or(0, Vec::len)
    }

    /// Insert `tab` at `index` within its scope, shifting every tab at or
    /// after `index` one position up. `index == scope_len` appends.
    pub fn insert_at(&mut self, tab: Tab, index: usize) -> Result<&Tab, RegistryError> {
        let scope = self.scope_of(&tab.extension);
        let len = self.sequences.get(&scope).map_or(0, Vec::len);
        if index > len {
            return Err(RegistryError::InvalidIndex { index, len });
        }

        if !self.scope_order.contains(&scope) {
            self.scope_order.push(scope.clone());
        }

        let id = tab.id;
        self.tabs.insert(id, tab);
        self.sequences.entry(scope.clone()).or_default().insert(index, id);
        self.renumber(&scope);

        trace!("store: inserted tab {id} at index {index}");
        Ok(&self.tabs[&id])
    }

    /// Remove the tab with `id`, shifting every subsequent tab in its scope
    /// one position down. Returns the record as it was at removal time.
    pub fn remove_by_id(&mut self, id: TabId) -> Result<Tab, RegistryError> {
        let tab = self.tabs.remove(&id).ok_or(RegistryError::NotFound(id))?;

        let scope = self.scope_of(&tab.extension);
        if let Some(seq) = self.sequences.get_mut(&scope) {
            seq.retain(|held| *held != id);
        }
        self.renumber(&scope);

        trace!("store: removed tab {id} from index {}", tab.index);
        Ok(tab)
    }

    /// Relocate the tab with `id` to `new_index` within its scope, shifting
    /// the tabs in between. Returns whether the tab actually moved.
    pub fn set_index(&mut self, id: TabId, new_index: usize) -> Result<bool, RegistryError> {
        let extension = self.get(id)?.extension.clone();
        let scope = self.scope_of(&extension);

        let seq = self.sequences.get_mut(&scope).expect("tab outside any scope");
        let len = seq.len();
        if new_index >= len {
            return Err(RegistryError::InvalidIndex { index: new_index, len });
        }

        let current = seq.iter().position(|held| *held == id).expect("tab missing from its scope");
        if current == new_index {
            return Ok(false);
        }

        seq.remove(current);
        seq.insert(new_index, id);
        self.renumber(&scope);

        trace!("store: moved tab {id} from index {current} to {new_index}");
        Ok(true)
    }

    /// Merge the non-index, non-identity fields of `properties` into the
    /// tab. Returns whether any field actually changed.
    pub fn update(&mut self, id: TabId, properties: &TabProperties) -> Result<bool, RegistryError> {
        let tab = self.tabs.get_mut(&id).ok_or(RegistryError::NotFound(id))?;
        let mut changed = false;

        if let Some(icon) = &properties.icon {
            if tab.icon.as_ref() != Some(icon) {
                tab.icon = Some(icon.clone());
                changed = true;
            }
        }
        if let Some(icon_dark) = &properties.icon_dark {
            if tab.icon_dark.as_ref() != Some(icon_dark) {
                tab.icon_dark = Some(icon_dark.clone());
                changed = true;
            }
        }
        if let Some(text) = &properties.text {
            if tab.text != *text {
                tab.text = text.clone();
                changed = true;
            }
        }
        if let Some(muted) = properties.muted {
            if tab.muted != muted {
                tab.muted = muted;
                changed = true;
            }
        }
        if let Some(mutable) = properties.mutable {
            if tab.mutable != mutable {
                tab.mutable = mutable;
                changed = true;
            }
        }
        if let Some(closable) = properties.closable {
            if tab.closable != closable {
                tab.closable = closable;
                changed = true;
            }
        }

        Ok(changed)
    }

    /// Tabs in result order: ascending index within each scope, scopes in
    /// the order they were first seen.
    pub fn iter_ordered(&self) -> impl Iterator<Item = &Tab> + '_ {
        self.scope_order
            .iter()
            .filter_map(|scope| self.sequences.get(scope))
            .flatten()
            .map(|id| &self.tabs[id])
    }

    // Rewrite the index of every tab in the scope from its sequence
    // position, keeping the dense 0..n-1 invariant.
    fn renumber(&mut self, scope: &ScopeKey) {
        let Some(seq) = self.sequences.get(scope) else {
            return;
        };

        for (position, id) in seq.iter().enumerate() {
            if let Some(tab) = self.tabs.get_mut(id) {
                tab.index = position;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tab::TabId;

    fn tab(extension: &str, text: &str) -> Tab {
        TabProperties {
            text: Some(text.into()),
            ..Default::default()
        }
        .into_tab(TabId::new(), extension.into())
    }

    fn indices(store: &TabStore, extension: &str) -> Vec<(String, usize)> {
        store
            .iter_ordered()
            .filter(|t| t.extension == extension)
            .map(|t| (t.text.clone(), t.index))
            .collect()
    }

    /// Indices within a scope stay exactly 0..n-1 across inserts and
    /// removals.
    #[test]
    fn indices_stay_dense_across_insert_and_remove() {
        let mut store = TabStore::new(OrderingScope::PerExtension);

        let a = store.insert_at(tab("ext.a", "a0"), 0).unwrap().id;
        let b = store.insert_at(tab("ext.a", "a1"), 1).unwrap().id;
        let c = store.insert_at(tab("ext.a", "a2"), 2).unwrap().id;
        assert_eq!(
            indices(&store, "ext.a"),
            vec![("a0".into(), 0), ("a1".into(), 1), ("a2".into(), 2)]
        );

        store.remove_by_id(b).unwrap();
        assert_eq!(indices(&store, "ext.a"), vec![("a0".into(), 0), ("a2".into(), 1)]);
        assert_eq!(store.get(a).unwrap().index, 0);
        assert_eq!(store.get(c).unwrap().index, 1);

        store.remove_by_id(a).unwrap();
        assert_eq!(indices(&store, "ext.a"), vec![("a2".into(), 0)]);
    }

    #[test]
    fn insert_in_the_middle_shifts_later_tabs() {
        let mut store = TabStore::new(OrderingScope::PerExtension);

        store.insert_at(tab("ext.a", "first"), 0).unwrap();
        store.insert_at(tab("ext.a", "last"), 1).unwrap();
        store.insert_at(tab("ext.a", "middle"), 1).unwrap();

        assert_eq!(
            indices(&store, "ext.a"),
            vec![("first".into(), 0), ("middle".into(), 1), ("last".into(), 2)]
        );
    }

    #[test]
    fn insert_past_the_end_is_invalid() {
        let mut store = TabStore::new(OrderingScope::PerExtension);
        store.insert_at(tab("ext.a", "only"), 0).unwrap();

        let err = store.insert_at(tab("ext.a", "beyond"), 5).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidIndex { index: 5, len: 1 }));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn set_index_relocates_and_reports_movement() {
        let mut store = TabStore::new(OrderingScope::PerExtension);
        let a = store.insert_at(tab("ext.a", "a"), 0).unwrap().id;
        let b = store.insert_at(tab("ext.a", "b"), 1).unwrap().id;
        let c = store.insert_at(tab("ext.a", "c"), 2).unwrap().id;

        assert!(store.set_index(a, 2).unwrap());
        assert_eq!(store.get(b).unwrap().index, 0);
        assert_eq!(store.get(c).unwrap().index, 1);
        assert_eq!(store.get(a).unwrap().index, 2);

        // Moving to the current position is a no-op.
        assert!(!store.set_index(a, 2).unwrap());

        let err = store.set_index(a, 3).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidIndex { index: 3, len: 3 }));
    }

    #[test]
    fn removal_of_unknown_id_reports_not_found() {
        let mut store = TabStore::new(OrderingScope::PerExtension);
        let stranger = TabId::new();
        assert!(matches!(
            store.remove_by_id(stranger),
            Err(RegistryError::NotFound(id)) if id == stranger
        ));
    }

    #[test]
    fn update_merges_fields_and_detects_change() {
        let mut store = TabStore::new(OrderingScope::PerExtension);
        let id = store.insert_at(tab("ext.a", "old"), 0).unwrap().id;

        let props = TabProperties {
            text: Some("new".into()),
            muted: Some(true),
            ..Default::default()
        };
        assert!(store.update(id, &props).unwrap());

        let tab = store.get(id).unwrap();
        assert_eq!(tab.text, "new");
        assert!(tab.muted);
        // Untouched fields keep their values.
        assert!(tab.mutable);

        // Re-applying the same values changes nothing.
        assert!(!store.update(id, &props).unwrap());
    }

    #[test]
    fn scopes_are_independent_per_extension() {
        let mut store = TabStore::new(OrderingScope::PerExtension);

        store.insert_at(tab("ext.a", "a0"), 0).unwrap();
        store.insert_at(tab("ext.b", "b0"), 0).unwrap();
        store.insert_at(tab("ext.a", "a1"), 1).unwrap();

        assert_eq!(indices(&store, "ext.a"), vec![("a0".into(), 0), ("a1".into(), 1)]);
        assert_eq!(indices(&store, "ext.b"), vec![("b0".into(), 0)]);

        // Result order: scopes in first-seen order, index order inside.
        let texts: Vec<_> = store.iter_ordered().map(|t| t.text.clone()).collect();
        assert_eq!(texts, vec!["a0", "a1", "b0"]);
    }

    #[test]
    fn global_scope_orders_across_extensions() {
        let mut store = TabStore::new(OrderingScope::Global);

        store.insert_at(tab("ext.a", "a0"), 0).unwrap();
        store.insert_at(tab("ext.b", "b0"), 1).unwrap();

        let texts: Vec<_> = store.iter_ordered().map(|t| (t.text.clone(), t.index)).collect();
        assert_eq!(texts, vec![("a0".into(), 0), ("b0".into(), 1)]);
    }
}
