pub mod sqlite_store;

use crate::model::Subscriber;

#[async_trait::async_trait]
pub trait SubscriberStore: Send + Sync {
    async fn load_all(&self) -> anyhow::Result<Vec<Subscriber>>;
    async fn save(&self, subscriber: &Subscriber) -> anyhow::Result<()>;
    async fn delete(&self, chat_id: i64) -> anyhow::Result<()>;
}
