use std::sync::Arc;

use tokio::test;

use registry::model::Subscriber;
use registry::registry::SubscriberRegistry;
use registry::store::SubscriberStore;

use mock_store::InMemorySubscriberStore;

fn sample_subscriber(chat_id: i64) -> Subscriber {
    Subscriber {
        chat_id,
        name: "Vivek".into(),
        subscribed_at_ms: 1_000,
    }
}

#[test]
async fn restore_loads_existing_subscribers() -> anyhow::Result<()> {
    let store = Arc::new(InMemorySubscriberStore::default());
    store.save(&sample_subscriber(42)).await?;

    let registry = SubscriberRegistry::new(store.clone()).await?;

    assert!(registry.is_subscribed(42).await);
    assert!(!registry.is_subscribed(7).await);

    Ok(())
}

#[test]
async fn upsert_reports_new_vs_returning() -> anyhow::Result<()> {
    let store = Arc::new(InMemorySubscriberStore::default());
    let registry = SubscriberRegistry::new(store.clone()).await?;

    assert!(registry.upsert(sample_subscriber(42)).await?);
    // Same chat again: not new, but still persisted.
    assert!(!registry.upsert(sample_subscriber(42)).await?);

    assert!(store.map.lock().await.contains_key(&42));

    Ok(())
}

#[test]
async fn all_chat_ids_enumerates_roster() -> anyhow::Result<()> {
    let store = Arc::new(InMemorySubscriberStore::default());
    let registry = SubscriberRegistry::new(store.clone()).await?;

    registry.upsert(sample_subscriber(1)).await?;
    registry.upsert(sample_subscriber(2)).await?;
    registry.upsert(sample_subscriber(3)).await?;

    let mut ids = registry.all_chat_ids().await;
    ids.sort_unstable();
    assert_eq!(ids, vec![1, 2, 3]);

    Ok(())
}

#[test]
async fn remove_deletes_everywhere() -> anyhow::Result<()> {
    let store = Arc::new(InMemorySubscriberStore::default());
    let registry = SubscriberRegistry::new(store.clone()).await?;

    registry.upsert(sample_subscriber(42)).await?;
    registry.remove(42).await?;

    assert!(!registry.is_subscribed(42).await);
    assert!(store.map.lock().await.get(&42).is_none());

    Ok(())
}
