use std::sync::Arc;

use ext_tabs::{
    RegistryConfig, RegistryError, TabEventKind, TabFilter, TabProperties, TabService,
};

#[tokio::main]
async fn main() -> Result<(), RegistryError> {
    env_logger::init();

    // Configure and start the registry service. The default configuration
    // scopes tab indices per owning extension; use OrderingScope::Global for
    // one sequence across all extensions.
    let service = TabService::new(RegistryConfig::default());
    let (handle, join_handle) = service.start();

    // Register listeners on the event channels we care about. Listeners get
    // the event descriptor plus a snapshot of the tab at dispatch time.
    handle
        .add_listener(
            TabEventKind::Created,
            Arc::new(|event, tab| {
                println!("tab {} created for {} at index {}", event.id, event.extension, tab.index);
                Ok(())
            }),
        )
        .await?;

    // A close click only signals intent. This listener decides to honor it
    // by removing the tab through a handle clone; the removal queues behind
    // the click dispatch that triggered it.
    let closer = handle.clone();
    handle
        .add_listener(
            TabEventKind::ClickedClose,
            Arc::new(move |event, _tab| {
                let closer = closer.clone();
                let id = event.id;
                tokio::spawn(async move {
                    let _ = closer.remove(id).await;
                });
                Ok(())
            }),
        )
        .await?;

    // Create a couple of tabs for one extension. Absent properties get
    // their defaults; absent indices append to the end of the scope.
    let inbox = handle
        .create(
            "ext.mail",
            TabProperties {
                text: Some("Inbox".into()),
                icon: Some("icons/inbox.png".into()),
                ..Default::default()
            },
        )
        .await?
        .tab;

    let spam = handle
        .create(
            "ext.mail",
            TabProperties {
                text: Some("Spam".into()),
                muted: Some(true),
                ..Default::default()
            },
        )
        .await?
        .tab;

    // Move the inbox tab behind the spam tab; indices stay dense.
    handle
        .update(
            inbox.id,
            TabProperties {
                index: Some(1),
                ..Default::default()
            },
        )
        .await?;

    // Query with a partial-match filter.
    let muted = handle
        .query(TabFilter {
            muted: Some(true),
            ..Default::default()
        })
        .await?;
    println!("{} muted tab(s)", muted.len());

    // Simulate a close click on the spam tab. The listener above removes it.
    handle.click_close(spam.id).await?;

    // The removal runs on a spawned task; give it a moment to land.
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    let remaining = handle.query(TabFilter::default()).await?;
    for tab in &remaining {
        println!("remaining: {} at index {}", tab.text, tab.index);
    }

    // Shut the service down and wait for the loop to finish.
    handle.shutdown().await?;
    join_handle.await.expect("service task panicked");

    Ok(())
}
