// src/service.rs
//! The registry service: [`TabService`] and its command protocol.
//!
//! The service owns the [`TabRegistry`] and drives it from a single command
//! loop, so every mutation is serialized and readers always see a fully
//! shifted index sequence. A mutation enqueued from inside a listener (via
//! a handle clone) lands behind the in-flight mutation, never inside it.

use log::{debug, trace};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::clicks::ClickDispatch;
use crate::config::RegistryConfig;
use crate::errors::RegistryError;
use crate::events::{TabEventKind, TabListener};
use crate::handle::RegistryHandle;
use crate::query::TabFilter;
use crate::registry::{BatchReport, Created, TabRegistry};
use crate::tab::{Tab, TabId, TabIds, TabProperties};

/// Commands accepted by the service loop. Every variant carries a reply
/// channel; the reply is sent once the operation has fully completed,
/// event dispatch included.
pub enum RegistryCommand {
    Get {
        id: TabId,
        reply: oneshot::Sender<Result<Tab, RegistryError>>,
    },
    Query {
        filter: TabFilter,
        reply: oneshot::Sender<Vec<Tab>>,
    },
    Create {
        extension: String,
        properties: TabProperties,
        reply: oneshot::Sender<Result<Created, RegistryError>>,
    },
    Update {
        ids: TabIds,
        properties: TabProperties,
        reply: oneshot::Sender<BatchReport>,
    },
    Remove {
        ids: TabIds,
        reply: oneshot::Sender<BatchReport>,
    },
    Click {
        ids: TabIds,
        reply: oneshot::Sender<BatchReport>,
    },
    ClickMute {
        ids: TabIds,
        reply: oneshot::Sender<BatchReport>,
    },
    ClickClose {
        ids: TabIds,
        reply: oneshot::Sender<BatchReport>,
    },
    AddListener {
        kind: TabEventKind,
        listener: TabListener,
        reply: oneshot::Sender<()>,
    },
    RemoveListener {
        kind: TabEventKind,
        listener: TabListener,
        reply: oneshot::Sender<()>,
    },
    /// Gracefully stop the service loop
    Shutdown { reply: oneshot::Sender<()> },
}

impl RegistryCommand {
    fn name(&self) -> &'static str {
        match self {
            RegistryCommand::Get { .. } => "get",
            RegistryCommand::Query { .. } => "query",
            RegistryCommand::Create { .. } => "create",
            RegistryCommand::Update { .. } => "update",
            RegistryCommand::Remove { .. } => "remove",
            RegistryCommand::Click { .. } => "click",
            RegistryCommand::ClickMute { .. } => "click-mute",
            RegistryCommand::ClickClose { .. } => "click-close",
            RegistryCommand::AddListener { .. } => "add-listener",
            RegistryCommand::RemoveListener { .. } => "remove-listener",
            RegistryCommand::Shutdown { .. } => "shutdown",
        }
    }
}

pub struct TabService {
    registry: TabRegistry,
    cmd_tx: mpsc::Sender<RegistryCommand>,
    cmd_rx: mpsc::Receiver<RegistryCommand>,
}

impl TabService {
    pub fn new(config: RegistryConfig) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel(config.channel_capacity);

        Self {
            registry: TabRegistry::new(config.ordering),
            cmd_tx,
            cmd_rx,
        }
    }

    /// Spawn the command loop, returning the caller-facing handle and the
    /// task join handle.
    pub fn start(self) -> (RegistryHandle, JoinHandle<()>) {
        let handle = RegistryHandle::new(self.cmd_tx.clone());
        let join_handle = tokio::spawn(self.run());

        (handle, join_handle)
    }

    /// Run the inbound command loop. Commands are handled one at a time in
    /// arrival order. The loop ends on [`RegistryCommand::Shutdown`] or
    /// once every handle has been dropped.
    pub async fn run(self) {
        let Self {
            mut registry,
            cmd_tx,
            mut cmd_rx,
        } = self;

        // The loop must not keep itself alive once all handles are gone.
        drop(cmd_tx);

        debug!("tab registry service started");

        while let Some(cmd) = cmd_rx.recv().await {
            trace!("handling {} command", cmd.name());

            match cmd {
                RegistryCommand::Get { id, reply } => {
                    let _ = reply.send(registry.get(id));
                }
                RegistryCommand::Query { filter, reply } => {
                    let _ = reply.send(registry.query(&filter));
                }
                RegistryCommand::Create {
                    extension,
                    properties,
                    reply,
                } => {
                    let _ = reply.send(registry.create(extension, properties));
                }
                RegistryCommand::Update {
                    ids,
                    properties,
                    reply,
                } => {
                    let _ = reply.send(registry.update(ids, &properties));
                }
                RegistryCommand::Remove { ids, reply } => {
                    let _ = reply.send(registry.remove(ids));
                }
                RegistryCommand::Click { ids, reply } => {
                    let _ = reply.send(ClickDispatch::new(&mut registry).click(ids));
                }
                RegistryCommand::ClickMute { ids, reply } => {
                    let _ = reply.send(ClickDispatch::new(&mut registry).click_mute(ids));
                }
                RegistryCommand::ClickClose { ids, reply } => {
                    let _ = reply.send(ClickDispatch::new(&mut registry).click_close(ids));
                }
                RegistryCommand::AddListener {
                    kind,
                    listener,
                    reply,
                } => {
                    registry.add_listener(kind, listener);
                    let _ = reply.send(());
                }
                RegistryCommand::RemoveListener {
                    kind,
                    listener,
                    reply,
                } => {
                    registry.remove_listener(kind, &listener);
                    let _ = reply.send(());
                }
                RegistryCommand::Shutdown { reply } => {
                    let _ = reply.send(());
                    break;
                }
            }
        }

        debug!("tab registry service stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    fn started() -> (RegistryHandle, JoinHandle<()>) {
        TabService::new(RegistryConfig::default()).start()
    }

    /// Create, get, query, update, and remove, all round-tripping through
    /// the service's command loop.
    #[tokio::test]
    async fn crud_round_trips_through_the_loop() {
        let (handle, join) = started();

        let a = handle
            .create(
                "ext.demo",
                TabProperties {
                    text: Some("a".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .tab;
        let b = handle
            .create(
                "ext.demo",
                TabProperties {
                    text: Some("b".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .tab;
        assert_eq!((a.index, b.index), (0, 1));

        assert_eq!(handle.get(a.id).await.unwrap(), a);

        let all = handle.query(TabFilter::default()).await.unwrap();
        assert_eq!(all.len(), 2);

        let report = handle
            .update(
                a.id,
                TabProperties {
                    text: Some("renamed".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(report.is_ok());
        assert_eq!(handle.get(a.id).await.unwrap().text, "renamed");

        let report = handle.remove(vec![a.id, b.id]).await.unwrap();
        assert_eq!(report.completed, vec![a.id, b.id]);
        assert!(handle.query(TabFilter::default()).await.unwrap().is_empty());

        handle.shutdown().await.unwrap();
        join.await.unwrap();
    }

    #[tokio::test]
    async fn listeners_fire_across_the_service_boundary() {
        let (handle, join) = started();

        let hits = Arc::new(AtomicUsize::new(0));
        let hits_in = hits.clone();
        handle
            .add_listener(
                TabEventKind::Created,
                Arc::new(move |_event, _tab| {
                    hits_in.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }),
            )
            .await
            .unwrap();

        handle.create("ext.demo", TabProperties::default()).await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        handle.shutdown().await.unwrap();
        join.await.unwrap();
    }

    /// The close-click flow: the façade only signals intent, and a listener
    /// performs the removal through a handle clone. The re-entrant remove
    /// queues behind the click dispatch instead of interleaving into it.
    #[tokio::test]
    async fn close_click_listener_drives_removal() {
        let (handle, join) = started();

        let tab = handle
            .create("ext.demo", TabProperties::default())
            .await
            .unwrap()
            .tab;

        let removal: Arc<Mutex<Option<JoinHandle<()>>>> = Arc::new(Mutex::new(None));
        let removal_in = removal.clone();
        let handle_in = handle.clone();
        handle
            .add_listener(
                TabEventKind::ClickedClose,
                Arc::new(move |event, _tab| {
                    let handle = handle_in.clone();
                    let id = event.id;
                    *removal_in.lock().unwrap() = Some(tokio::spawn(async move {
                        let _ = handle.remove(id).await;
                    }));
                    Ok(())
                }),
            )
            .await
            .unwrap();

        let report = handle.click_close(tab.id).await.unwrap();
        assert_eq!(report.completed, vec![tab.id]);

        let spawned = removal.lock().unwrap().take().unwrap();
        spawned.await.unwrap();

        assert!(matches!(
            handle.get(tab.id).await,
            Err(RegistryError::NotFound(_))
        ));

        handle.shutdown().await.unwrap();
        join.await.unwrap();
    }

    #[tokio::test]
    async fn shutdown_closes_the_channel_for_later_calls() {
        let (handle, join) = started();

        handle.shutdown().await.unwrap();
        join.await.unwrap();

        assert!(matches!(
            handle.get(TabId::new()).await,
            Err(RegistryError::ChannelClosed)
        ));
    }

    #[tokio::test]
    async fn loop_ends_when_every_handle_is_dropped() {
        let (handle, join) = started();
        drop(handle);
        join.await.unwrap();
    }
}
