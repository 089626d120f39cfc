// src/clicks.rs
//! Synthetic click dispatch: [`ClickDispatch`].
//!
//! Clicks simulated through the API route through this façade instead of
//! the mutation path, since the affordance gates (`mutable`, `closable`)
//! only apply to clicks. The façade never writes the store itself; the one
//! side effect it has (toggling `muted` on a mute click) goes through the
//! registry's update path, so the usual `Updated` event fires first.

use log::debug;

use crate::events::TabEventKind;
use crate::registry::{BatchReport, TabRegistry};
use crate::tab::{TabIds, TabProperties};

pub struct ClickDispatch<'a> {
    registry: &'a mut TabRegistry,
}

impl<'a> ClickDispatch<'a> {
    pub fn new(registry: &'a mut TabRegistry) -> Self {
        Self { registry }
    }

    /// Dispatch `Clicked` for every tab in `ids`, unconditionally.
    pub fn click(&mut self, ids: impl Into<TabIds>) -> BatchReport {
        let mut report = BatchReport::default();

        for id in ids.into().into_vec() {
            match self.registry.get(id) {
                Ok(tab) => {
                    debug!("dispatching click on tab {id}");
                    report
                        .listener_errors
                        .extend(self.registry.dispatch_event(TabEventKind::Clicked, &tab));
                    report.completed.push(id);
                }
                Err(e) => report.errors.push((id, e)),
            }
        }

        report
    }

    /// Toggle `muted` through the mutation path (which emits `Updated`) and
    /// then dispatch `ClickedMute`. Tabs whose `mutable` flag is off are
    /// skipped silently, mirroring a disabled affordance.
    pub fn click_mute(&mut self, ids: impl Into<TabIds>) -> BatchReport {
        let mut report = BatchReport::default();

        for id in ids.into().into_vec() {
            let tab = match self.registry.get(id) {
                Ok(tab) => tab,
                Err(e) => {
                    report.errors.push((id, e));
                    continue;
                }
            };

            if !tab.mutable {
                debug!("mute click on tab {id} ignored, affordance disabled");
                report.skipped.push(id);
                continue;
            }

            let toggle = TabProperties {
                muted: Some(!tab.muted),
                ..Default::default()
            };
            let inner = self.registry.update(id, &toggle);
            report.listener_errors.extend(inner.listener_errors);

            match self.registry.get(id) {
                Ok(tab) => {
                    report
                        .listener_errors
                        .extend(self.registry.dispatch_event(TabEventKind::ClickedMute, &tab));
                    report.completed.push(id);
                }
                Err(e) => report.errors.push((id, e)),
            }
        }

        report
    }

    /// Dispatch `ClickedClose` for closable tabs. The façade only signals
    /// intent; actually removing the tab is the listener's responsibility.
    /// Tabs whose `closable` flag is off are skipped silently.
    pub fn click_close(&mut self, ids: impl Into<TabIds>) -> BatchReport {
        let mut report = BatchReport::default();

        for id in ids.into().into_vec() {
            let tab = match self.registry.get(id) {
                Ok(tab) => tab,
                Err(e) => {
                    report.errors.push((id, e));
                    continue;
                }
            };

            if !tab.closable {
                debug!("close click on tab {id} ignored, affordance disabled");
                report.skipped.push(id);
                continue;
            }

            report
                .listener_errors
                .extend(self.registry.dispatch_event(TabEventKind::ClickedClose, &tab));
            report.completed.push(id);
        }

        report
    }
}
