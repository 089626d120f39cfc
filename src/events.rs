//! Event channels: [`TabEventKind`], [`TabEvent`], and the [`EventDispatcher`].
//!
//! The dispatcher owns one ordered listener list per event channel. Dispatch
//! is synchronous and runs in registration order; a failing listener never
//! prevents the remaining listeners from running. Failures are collected
//! and handed back to the dispatch caller once every listener has run.

use std::collections::HashMap;
use std::fmt::Display;
use std::sync::Arc;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::tab::{Tab, TabId};

/// The six event channels of the tabs API.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TabEventKind {
    /// A tab was created
    Created,
    /// A tab was removed
    Removed,
    /// Tab properties changed
    Updated,
    /// A tab was clicked, or the click was dispatched manually
    Clicked,
    /// The mute affordance was clicked, or the event was dispatched manually
    ClickedMute,
    /// The close affordance was clicked, or the event was dispatched manually
    ClickedClose,
}

impl Display for TabEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TabEventKind::Created => write!(f, "created"),
            TabEventKind::Removed => write!(f, "removed"),
            TabEventKind::Updated => write!(f, "updated"),
            TabEventKind::Clicked => write!(f, "clicked"),
            TabEventKind::ClickedMute => write!(f, "clicked-mute"),
            TabEventKind::ClickedClose => write!(f, "clicked-close"),
        }
    }
}

/// Event descriptor handed to listeners, next to a snapshot of the tab
/// taken at dispatch time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabEvent {
    /// ID of the tab the event concerns
    pub id: TabId,
    /// ID of the extension owning that tab
    pub extension: String,
}

/// A registered listener. Identity is the `Arc` allocation: registering the
/// same `Arc` twice is a no-op and removal matches by pointer.
pub type TabListener = Arc<dyn Fn(&TabEvent, &Tab) -> anyhow::Result<()> + Send + Sync>;

/// A failure raised by a single listener during dispatch. Collected per
/// dispatch, never fatal to the triggering mutation.
#[derive(Debug)]
pub struct ListenerError {
    /// Channel the listener was registered on
    pub kind: TabEventKind,
    /// Tab the event was about
    pub tab_id: TabId,
    /// What the listener reported
    pub source: anyhow::Error,
}

impl Display for ListenerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} listener failed for tab {}: {}", self.kind, self.tab_id, self.source)
    }
}

/// Per-channel ordered listener lists with identity-based registration.
pub struct EventDispatcher {
    listeners: HashMap<TabEventKind, Vec<TabListener>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self {
            listeners: HashMap::new(),
        }
    }

    /// Append `listener` to the channel for `kind`. Adding a listener that
    /// is already registered on that channel is a no-op, so one listener
    /// fires at most once per event however often it was added.
    pub fn add_listener(&mut self, kind: TabEventKind, listener: TabListener) {
        let list = self.listeners.entry(kind).or_default();
        if list.iter().any(|known| Arc::ptr_eq(known, &listener)) {
            return;
        }
        list.push(listener);
    }

    /// Remove `listener` from the channel for `kind`. No-op when it was
    /// never registered.
    pub fn remove_listener(&mut self, kind: TabEventKind, listener: &TabListener) {
        if let Some(list) = self.listeners.get_mut(&kind) {
            list.retain(|known| !Arc::ptr_eq(known, listener));
        }
    }

    /// Number of listeners currently registered for `kind`.
    pub fn listener_count(&self, kind: TabEventKind) -> usize {
        self.listeners.get(&kind).map_or(0, Vec::len)
    }

    /// Invoke every listener registered for `kind` in registration order,
    /// passing the event descriptor and the tab snapshot. Failures are
    /// collected and returned after all listeners have run.
    pub fn dispatch(&self, kind: TabEventKind, tab: &Tab) -> Vec<ListenerError> {
        let Some(list) = self.listeners.get(&kind) else {
            return Vec::new();
        };

        let event = TabEvent {
            id: tab.id,
            extension: tab.extension.clone(),
        };

        let mut failures = Vec::new();
        for listener in list {
            if let Err(source) = listener(&event, tab) {
                warn!("{kind} listener failed for tab {}: {source}", tab.id);
                failures.push(ListenerError {
                    kind,
                    tab_id: tab.id,
                    source,
                });
            }
        }

        failures
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
