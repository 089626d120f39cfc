// src/handle.rs
//! Caller-facing front-end: [`RegistryHandle`].

use tokio::sync::{mpsc, oneshot};

use crate::errors::RegistryError;
use crate::events::{TabEventKind, TabListener};
use crate::query::TabFilter;
use crate::registry::{BatchReport, Created};
use crate::service::RegistryCommand;
use crate::tab::{Tab, TabId, TabIds, TabProperties};

/// Cloneable front-end over the registry service. Every call round-trips
/// through the service's command loop, so calls from any number of handles
/// are processed one at a time in arrival order.
#[derive(Clone)]
pub struct RegistryHandle {
    cmd_tx: mpsc::Sender<RegistryCommand>,
}

impl std::fmt::Debug for RegistryHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryHandle").field("cmd_tx", &self.cmd_tx).finish()
    }
}

impl RegistryHandle {
    pub(crate) fn new(cmd_tx: mpsc::Sender<RegistryCommand>) -> Self {
        Self { cmd_tx }
    }

    /// Get a snapshot of the tab with `id`.
    pub async fn get(&self, id: TabId) -> Result<Tab, RegistryError> {
        let (tx, rx) = oneshot::channel();

        self.cmd_tx
            .send(RegistryCommand::Get { id, reply: tx })
            .await
            .map_err(|_| RegistryError::ChannelClosed)?;

        rx.await.map_err(|_| RegistryError::ChannelClosed)?
    }

    /// Get snapshots of every tab matching `filter`.
    pub async fn query(&self, filter: TabFilter) -> Result<Vec<Tab>, RegistryError> {
        let (tx, rx) = oneshot::channel();

        self.cmd_tx
            .send(RegistryCommand::Query { filter, reply: tx })
            .await
            .map_err(|_| RegistryError::ChannelClosed)?;

        rx.await.map_err(|_| RegistryError::ChannelClosed)
    }

    /// Create a tab owned by `extension`.
    pub async fn create(
        &self,
        extension: impl Into<String>,
        properties: TabProperties,
    ) -> Result<Created, RegistryError> {
        let (tx, rx) = oneshot::channel();

        self.cmd_tx
            .send(RegistryCommand::Create {
                extension: extension.into(),
                properties,
                reply: tx,
            })
            .await
            .map_err(|_| RegistryError::ChannelClosed)?;

        rx.await.map_err(|_| RegistryError::ChannelClosed)?
    }

    /// Update one or more tabs.
    pub async fn update(
        &self,
        ids: impl Into<TabIds>,
        properties: TabProperties,
    ) -> Result<BatchReport, RegistryError> {
        let (tx, rx) = oneshot::channel();

        self.cmd_tx
            .send(RegistryCommand::Update {
                ids: ids.into(),
                properties,
                reply: tx,
            })
            .await
            .map_err(|_| RegistryError::ChannelClosed)?;

        rx.await.map_err(|_| RegistryError::ChannelClosed)
    }

    /// Remove one or more tabs.
    pub async fn remove(&self, ids: impl Into<TabIds>) -> Result<BatchReport, RegistryError> {
        let (tx, rx) = oneshot::channel();

        self.cmd_tx
            .send(RegistryCommand::Remove {
                ids: ids.into(),
                reply: tx,
            })
            .await
            .map_err(|_| RegistryError::ChannelClosed)?;

        rx.await.map_err(|_| RegistryError::ChannelClosed)
    }

    /// Manually dispatch a tab click event.
    pub async fn click(&self, ids: impl Into<TabIds>) -> Result<BatchReport, RegistryError> {
        let (tx, rx) = oneshot::channel();

        self.cmd_tx
            .send(RegistryCommand::Click {
                ids: ids.into(),
                reply: tx,
            })
            .await
            .map_err(|_| RegistryError::ChannelClosed)?;

        rx.await.map_err(|_| RegistryError::ChannelClosed)
    }

    /// Manually dispatch a mute click event.
    pub async fn click_mute(&self, ids: impl Into<TabIds>) -> Result<BatchReport, RegistryError> {
        let (tx, rx) = oneshot::channel();

        self.cmd_tx
            .send(RegistryCommand::ClickMute {
                ids: ids.into(),
                reply: tx,
            })
            .await
            .map_err(|_| RegistryError::ChannelClosed)?;

        rx.await.map_err(|_| RegistryError::ChannelClosed)
    }

    /// Manually dispatch a close click event.
    pub async fn click_close(&self, ids: impl Into<TabIds>) -> Result<BatchReport, RegistryError> {
        let (tx, rx) = oneshot::channel();

        self.cmd_tx
            .send(RegistryCommand::ClickClose {
                ids: ids.into(),
                reply: tx,
            })
            .await
            .map_err(|_| RegistryError::ChannelClosed)?;

        rx.await.map_err(|_| RegistryError::ChannelClosed)
    }

    /// Register a listener on the channel for `kind`.
    pub async fn add_listener(
        &self,
        kind: TabEventKind,
        listener: TabListener,
    ) -> Result<(), RegistryError> {
        let (tx, rx) = oneshot::channel();

        self.cmd_tx
            .send(RegistryCommand::AddListener {
                kind,
                listener,
                reply: tx,
            })
            .await
            .map_err(|_| RegistryError::ChannelClosed)?;

        rx.await.map_err(|_| RegistryError::ChannelClosed)
    }

    /// Unregister a listener from the channel for `kind`.
    pub async fn remove_listener(
        &self,
        kind: TabEventKind,
        listener: TabListener,
    ) -> Result<(), RegistryError> {
        let (tx, rx) = oneshot::channel();

        self.cmd_tx
            .send(RegistryCommand::RemoveListener {
                kind,
                listener,
                reply: tx,
            })
            .await
            .map_err(|_| RegistryError::ChannelClosed)?;

        rx.await.map_err(|_| RegistryError::ChannelClosed)
    }

    /// Gracefully stop the service loop.
    pub async fn shutdown(&self) -> Result<(), RegistryError> {
        let (tx, rx) = oneshot::channel();

        self.cmd_tx
            .send(RegistryCommand::Shutdown { reply: tx })
            .await
            .map_err(|_| RegistryError::ChannelClosed)?;

        rx.await.map_err(|_| RegistryError::ChannelClosed)
    }
}
