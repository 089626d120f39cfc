// src/registry.rs
//! The mutation service: [`TabRegistry`].
//!
//! The registry is the only writer to the [`TabStore`]. Every successful
//! mutation emits exactly one event per affected tab through the
//! [`EventDispatcher`]; listener failures are collected into the returned
//! value and never abort the mutation that triggered them.

use log::{debug, warn};

use crate::config::OrderingScope;
use crate::errors::RegistryError;
use crate::events::{EventDispatcher, ListenerError, TabEventKind, TabListener};
use crate::query::TabFilter;
use crate::store::TabStore;
use crate::tab::{IdAllocator, Tab, TabId, TabIds, TabProperties};

/// Outcome of a create call: the new tab snapshot plus any failures raised
/// by `Created` listeners while the event was delivered.
#[derive(Debug)]
pub struct Created {
    pub tab: Tab,
    pub listener_errors: Vec<ListenerError>,
}

/// Combined outcome of a batch operation. IDs are processed independently
/// and in input order; a failing ID never aborts the rest.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// IDs whose operation completed
    pub completed: Vec<TabId>,
    /// IDs skipped by an affordance gate (`mutable` / `closable`)
    pub skipped: Vec<TabId>,
    /// Per-ID failures
    pub errors: Vec<(TabId, RegistryError)>,
    /// Failures raised by listeners while events were delivered
    pub listener_errors: Vec<ListenerError>,
}

impl BatchReport {
    /// True when every ID completed (or was gated off) and no listener
    /// failed.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty() && self.listener_errors.is_empty()
    }
}

pub struct TabRegistry {
    ids: IdAllocator,
    store: TabStore,
    dispatcher: EventDispatcher,
}

impl TabRegistry {
    pub fn new(ordering: OrderingScope) -> Self {
        Self {
            ids: IdAllocator,
            store: TabStore::new(ordering),
            dispatcher: EventDispatcher::new(),
        }
    }

    /// Snapshot of the tab with `id`.
    pub fn get(&self, id: TabId) -> Result<Tab, RegistryError> {
        self.store.get(id).cloned()
    }

    /// Snapshots of every tab matching `filter`, ascending by index within
    /// each scope, scopes in first-seen order. Never an error; an empty
    /// result means nothing matched.
    pub fn query(&self, filter: &TabFilter) -> Vec<Tab> {
        self.store
            .iter_ordered()
            .filter(|tab| filter.matches(tab))
            .cloned()
            .collect()
    }

    /// Number of live tabs.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Create a tab owned by `extension`. Missing properties get their
    /// defaults; a missing `index` appends to the end of the scope. Emits
    /// one `Created` event.
    pub fn create(
        &mut self,
        extension: impl Into<String>,
        properties: TabProperties,
    ) -> Result<Created, RegistryError> {
        let extension = extension.into();
        let wanted_index = properties.index;

        let id = self.ids.allocate();
        let tab = properties.into_tab(id, extension);
        let index = wanted_index.unwrap_or_else(|| self.store.scope_len(&tab.extension));

        let tab = self.store.insert_at(tab, index)?.clone();
        debug!("created tab {id} for {} at index {}", tab.extension, tab.index);

        let listener_errors = self.dispatcher.dispatch(TabEventKind::Created, &tab);
        Ok(Created { tab, listener_errors })
    }

    /// Apply `properties` to each tab in `ids`. Per ID this is
    /// all-or-nothing: an invalid `index` fails the ID without touching its
    /// other fields. One `Updated` event fires per tab actually changed.
    pub fn update(&mut self, ids: impl Into<TabIds>, properties: &TabProperties) -> BatchReport {
        let mut report = BatchReport::default();

        for id in ids.into().into_vec() {
            match self.update_one(id, properties) {
                Ok(Some(tab)) => {
                    debug!("updated tab {id}");
                    report
                        .listener_errors
                        .extend(self.dispatcher.dispatch(TabEventKind::Updated, &tab));
                    report.completed.push(id);
                }
                Ok(None) => {
                    // Nothing changed, nothing to announce.
                    report.completed.push(id);
                }
                Err(e) => {
                    warn!("update of tab {id} failed: {e}");
                    report.errors.push((id, e));
                }
            }
        }

        report
    }

    // All-or-nothing per ID: the index move is validated and applied before
    // any other field is merged, so a failing ID keeps its record
    // untouched. Returns the new snapshot when something changed.
    fn update_one(
        &mut self,
        id: TabId,
        properties: &TabProperties,
    ) -> Result<Option<Tab>, RegistryError> {
        if !self.store.contains(id) {
            return Err(RegistryError::NotFound(id));
        }

        let mut changed = false;
        if let Some(index) = properties.index {
            changed |= self.store.set_index(id, index)?;
        }
        changed |= self.store.update(id, properties)?;

        if changed {
            Ok(Some(self.store.get(id)?.clone()))
        } else {
            Ok(None)
        }
    }

    /// Remove each tab in `ids`, re-densifying indices as it goes. The
    /// `Removed` event for a tab fires before the next ID in the batch is
    /// processed.
    pub fn remove(&mut self, ids: impl Into<TabIds>) -> BatchReport {
        let mut report = BatchReport::default();

        for id in ids.into().into_vec() {
            match self.store.remove_by_id(id) {
                Ok(tab) => {
                    debug!("removed tab {id} from {}", tab.extension);
                    report
                        .listener_errors
                        .extend(self.dispatcher.dispatch(TabEventKind::Removed, &tab));
                    report.completed.push(id);
                }
                Err(e) => {
                    warn!("removal of tab {id} failed: {e}");
                    report.errors.push((id, e));
                }
            }
        }

        report
    }

    /// Register `listener` on the channel for `kind`. Idempotent per
    /// listener identity.
    pub fn add_listener(&mut self, kind: TabEventKind, listener: TabListener) {
        self.dispatcher.add_listener(kind, listener);
    }

    /// Unregister `listener` from the channel for `kind`.
    pub fn remove_listener(&mut self, kind: TabEventKind, listener: &TabListener) {
        self.dispatcher.remove_listener(kind, listener);
    }

    // Dispatch seam for the click façade; everything else goes through the
    // mutation methods above.
    pub(crate) fn dispatch_event(&self, kind: TabEventKind, tab: &Tab) -> Vec<ListenerError> {
        self.dispatcher.dispatch(kind, tab)
    }
}
