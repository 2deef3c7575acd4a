//! SQLite-backed implementation of `SubscriberStore`.
//!
//! Durable persistence for the subscriber roster so /start survives
//! restarts and /broadcast reaches everyone who ever connected.

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use super::SubscriberStore;
use crate::model::Subscriber;

pub struct SqliteSubscriberStore {
    pool: SqlitePool,
}

impl SqliteSubscriberStore {
    pub async fn from_pool(pool: SqlitePool) -> anyhow::Result<Self> {
        Self::ensure_schema(&pool).await?;
        Ok(Self { pool })
    }

    /// Open (or create) the database at `url` and ensure the schema exists.
    pub async fn new(url: &str) -> anyhow::Result<Self> {
        let pool = SqlitePool::connect(url).await?;
        Self::from_pool(pool).await
    }

    async fn ensure_schema(pool: &SqlitePool) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS subscribers (
                chat_id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                subscribed_at_ms INTEGER NOT NULL
            );
        "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl SubscriberStore for SqliteSubscriberStore {
    async fn load_all(&self) -> anyhow::Result<Vec<Subscriber>> {
        let rows = sqlx::query("SELECT chat_id, name, subscribed_at_ms FROM subscribers")
            .fetch_all(&self.pool)
            .await?;

        let mut subscribers = Vec::with_capacity(rows.len());
        for row in rows {
            subscribers.push(Subscriber {
                chat_id: row.get("chat_id"),
                name: row.get("name"),
                subscribed_at_ms: row.get("subscribed_at_ms"),
            });
        }

        Ok(subscribers)
    }

    /// Upsert: a returning user keeps their chat_id row, name refreshed.
    async fn save(&self, subscriber: &Subscriber) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO subscribers (chat_id, name, subscribed_at_ms)
            VALUES (?, ?, ?)
            ON CONFLICT(chat_id) DO UPDATE SET
                name = excluded.name,
                subscribed_at_ms = excluded.subscribed_at_ms;
        "#,
        )
        .bind(subscriber.chat_id)
        .bind(&subscriber.name)
        .bind(subscriber.subscribed_at_ms)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, chat_id: i64) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM subscribers WHERE chat_id = ?")
            .bind(chat_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
