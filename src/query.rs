// src/query.rs
//! Partial-match filters over tab fields.

use serde::{Deserialize, Serialize};

use crate::tab::{Tab, TabId};

/// Filter for `query`. Absent fields are wildcards; present fields require
/// exact equality with the tab's value. An empty filter matches every tab.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TabFilter {
    pub id: Option<TabId>,
    pub extension: Option<String>,
    pub index: Option<usize>,
    pub icon: Option<String>,
    pub icon_dark: Option<String>,
    pub text: Option<String>,
    pub muted: Option<bool>,
    pub mutable: Option<bool>,
    pub closable: Option<bool>,
}

impl TabFilter {
    /// True when every supplied field equals the tab's value.
    pub fn matches(&self, tab: &Tab) -> bool {
        if self.id.is_some_and(|id| id != tab.id) {
            return false;
        }
        if self.extension.as_ref().is_some_and(|ext| *ext != tab.extension) {
            return false;
        }
        if self.index.is_some_and(|index| index != tab.index) {
            return false;
        }
        if self.icon.as_ref().is_some_and(|icon| tab.icon.as_ref() != Some(icon)) {
            return false;
        }
        if self
            .icon_dark
            .as_ref()
            .is_some_and(|icon| tab.icon_dark.as_ref() != Some(icon))
        {
            return false;
        }
        if self.text.as_ref().is_some_and(|text| *text != tab.text) {
            return false;
        }
        if self.muted.is_some_and(|muted| muted != tab.muted) {
            return false;
        }
        if self.mutable.is_some_and(|mutable| mutable != tab.mutable) {
            return false;
        }
        if self.closable.is_some_and(|closable| closable != tab.closable) {
            return false;
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tab::{TabId, TabProperties};

    fn sample_tab() -> Tab {
        TabProperties {
            text: Some("inbox".into()),
            icon: Some("icons/mail.png".into()),
            muted: Some(true),
            ..Default::default()
        }
        .into_tab(TabId::new(), "ext.mail".into())
    }

    #[test]
    fn empty_filter_matches_everything() {
        assert!(TabFilter::default().matches(&sample_tab()));
    }

    #[test]
    fn supplied_fields_require_exact_equality() {
        let tab = sample_tab();

        let hit = TabFilter {
            extension: Some("ext.mail".into()),
            muted: Some(true),
            ..Default::default()
        };
        assert!(hit.matches(&tab));

        let miss = TabFilter {
            extension: Some("ext.mail".into()),
            muted: Some(false),
            ..Default::default()
        };
        assert!(!miss.matches(&tab));
    }

    #[test]
    fn optional_icon_matches_against_present_value() {
        let tab = sample_tab();

        let hit = TabFilter {
            icon: Some("icons/mail.png".into()),
            ..Default::default()
        };
        assert!(hit.matches(&tab));

        // The tab has no dark icon, so an icon_dark filter cannot match it.
        let miss = TabFilter {
            icon_dark: Some("icons/mail-dark.png".into()),
            ..Default::default()
        };
        assert!(!miss.matches(&tab));
    }

    #[test]
    fn id_filter_selects_a_single_tab() {
        let tab = sample_tab();

        let hit = TabFilter {
            id: Some(tab.id),
            ..Default::default()
        };
        assert!(hit.matches(&tab));

        let miss = TabFilter {
            id: Some(TabId::new()),
            ..Default::default()
        };
        assert!(!miss.matches(&tab));
    }
}
