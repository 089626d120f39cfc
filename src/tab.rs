// src/tab.rs
//! Tab records: [`TabId`], [`Tab`], and [`TabProperties`].
//!

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A unique identifier for a tab, represented as a UUID.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TabId(Uuid);

impl TabId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl From<Uuid> for TabId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Display for TabId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hands out tab identifiers. Backed by v4 UUIDs, so no two allocations
/// collide within the process and allocation itself cannot fail.
#[derive(Debug, Default)]
pub struct IdAllocator;

impl IdAllocator {
    pub fn allocate(&self) -> TabId {
        TabId::new()
    }
}

/// A single managed tab. Tabs are created, mutated, and destroyed only
/// through the registry; everyone else works with snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tab {
    /// ID of the tab
    pub id: TabId,
    /// ID of the extension that owns this tab
    pub extension: String,
    /// Zero based position within the tab's ordering scope
    pub index: usize,
    /// Icon URL or local path
    pub icon: Option<String>,
    /// Icon used when the host renders a dark theme
    pub icon_dark: Option<String>,
    /// Tab text
    pub text: String,
    /// Muted state
    pub muted: bool,
    /// Whether the mute affordance is honored for click dispatch
    pub mutable: bool,
    /// Whether the close affordance is honored for click dispatch
    pub closable: bool,
}

/// Optional tab properties, used both for creation and updates. Absent
/// fields fall back to their defaults on create and are left untouched on
/// update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TabProperties {
    /// Zero based tab index
    pub index: Option<usize>,
    /// Icon URL or local path
    pub icon: Option<String>,
    /// Dark theme icon URL or local path
    pub icon_dark: Option<String>,
    /// Tab text
    pub text: Option<String>,
    /// Muted state
    pub muted: Option<bool>,
    /// Mute affordance visibility
    pub mutable: Option<bool>,
    /// Close affordance visibility
    pub closable: Option<bool>,
}

impl TabProperties {
    /// Resolve the properties into a full tab record, applying the creation
    /// defaults in one place. `index` is resolved by the store on insert,
    /// not here.
    pub(crate) fn into_tab(self, id: TabId, extension: String) -> Tab {
        Tab {
            id,
            extension,
            index: 0, // placed by the store
            icon: self.icon,
            icon_dark: self.icon_dark,
            text: self.text.unwrap_or_default(),
            muted: self.muted.unwrap_or(false),
            mutable: self.mutable.unwrap_or(true),
            closable: self.closable.unwrap_or(true),
        }
    }
}

/// One tab ID or a sequence of them. Batch calls accept either.
#[derive(Debug, Clone)]
pub enum TabIds {
    One(TabId),
    Many(Vec<TabId>),
}

impl TabIds {
    pub fn into_vec(self) -> Vec<TabId> {
        match self {
            TabIds::One(id) => vec![id],
            TabIds::Many(ids) => ids,
        }
    }
}

impl From<TabId> for TabIds {
    fn from(id: TabId) -> Self {
        TabIds::One(id)
    }
}

impl From<Vec<TabId>> for TabIds {
    fn from(ids: Vec<TabId>) -> Self {
        TabIds::Many(ids)
    }
}

impl From<&[TabId]> for TabIds {
    fn from(ids: &[TabId]) -> Self {
        TabIds::Many(ids.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocated_ids_are_unique() {
        let ids = IdAllocator;
        let a = ids.allocate();
        let b = ids.allocate();
        assert_ne!(a, b);
    }

    #[test]
    fn into_tab_applies_creation_defaults() {
        let tab = TabProperties::default().into_tab(TabId::new(), "ext.demo".into());
        assert_eq!(tab.text, "");
        assert!(!tab.muted);
        assert!(tab.mutable);
        assert!(tab.closable);
        assert!(tab.icon.is_none());
        assert!(tab.icon_dark.is_none());
    }

    #[test]
    fn into_tab_keeps_explicit_properties() {
        let props = TabProperties {
            text: Some("downloads".into()),
            muted: Some(true),
            mutable: Some(false),
            icon: Some("icons/dl.png".into()),
            ..Default::default()
        };

        let tab = props.into_tab(TabId::new(), "ext.demo".into());
        assert_eq!(tab.text, "downloads");
        assert!(tab.muted);
        assert!(!tab.mutable);
        assert!(tab.closable);
        assert_eq!(tab.icon.as_deref(), Some("icons/dl.png"));
    }

    #[test]
    fn tab_ids_accept_one_or_many() {
        let id = TabId::new();
        assert_eq!(TabIds::from(id).into_vec(), vec![id]);

        let ids = vec![TabId::new(), TabId::new()];
        assert_eq!(TabIds::from(ids.clone()).into_vec(), ids);
        assert_eq!(TabIds::from(ids.as_slice()).into_vec(), ids);
    }

    /// Snapshots must survive a serde round trip so a host can persist or
    /// ship them.
    #[test]
    fn tab_serde_round_trip() {
        let tab = TabProperties {
            text: Some("news".into()),
            icon_dark: Some("icons/dark.png".into()),
            ..Default::default()
        }
        .into_tab(TabId::new(), "ext.news".into());

        let json = serde_json::to_string(&tab).unwrap();
        let back: Tab = serde_json::from_str(&json).unwrap();
        assert_eq!(tab, back);
    }
}
