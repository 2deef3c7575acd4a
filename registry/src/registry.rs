use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::info;

use crate::model::Subscriber;
use crate::store::SubscriberStore;

/// In-memory roster of subscribers, persisted through a store.
///
/// Writes go through the store first; the map only reflects what was
/// durably saved.
pub struct SubscriberRegistry<S: SubscriberStore> {
    subscribers: Arc<Mutex<HashMap<i64, Subscriber>>>,
    store: Arc<S>,
}

impl<S: SubscriberStore> SubscriberRegistry<S> {
    /// Initialize a fresh registry from the store.
    pub async fn new(store: Arc<S>) -> anyhow::Result<Self> {
        let registry = Self {
            subscribers: Arc::new(Mutex::new(HashMap::new())),
            store,
        };

        registry.restore_from_store().await?;
        Ok(registry)
    }

    async fn restore_from_store(&self) -> anyhow::Result<()> {
        let all = self.store.load_all().await?;
        let mut subscribers = self.subscribers.lock().await;

        for s in all {
            subscribers.insert(s.chat_id, s);
        }

        info!(subscribers = subscribers.len(), "subscriber roster restored");
        Ok(())
    }

    /// Store-then-index upsert. Returns `true` when the chat was not known
    /// before (a genuinely new subscriber).
    pub async fn upsert(&self, subscriber: Subscriber) -> anyhow::Result<bool> {
        self.store.save(&subscriber).await?;

        let mut guard = self.subscribers.lock().await;
        let was_new = guard.insert(subscriber.chat_id, subscriber).is_none();

        Ok(was_new)
    }

    pub async fn is_subscribed(&self, chat_id: i64) -> bool {
        self.subscribers.lock().await.contains_key(&chat_id)
    }

    /// Recipient ids for /broadcast.
    pub async fn all_chat_ids(&self) -> Vec<i64> {
        self.subscribers.lock().await.keys().copied().collect()
    }

    pub async fn remove(&self, chat_id: i64) -> anyhow::Result<()> {
        self.store.delete(chat_id).await?;
        self.subscribers.lock().await.remove(&chat_id);
        Ok(())
    }
}
