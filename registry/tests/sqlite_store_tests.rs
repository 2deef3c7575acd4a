use sqlx::SqlitePool;

use registry::model::Subscriber;
use registry::store::SubscriberStore;
use registry::store::sqlite_store::SqliteSubscriberStore;

fn sample_subscriber() -> Subscriber {
    Subscriber {
        chat_id: 42,
        name: "Vivek".into(),
        subscribed_at_ms: 1_000,
    }
}

#[sqlx::test]
async fn insert_and_load_roundtrip(pool: SqlitePool) -> anyhow::Result<()> {
    let store = SqliteSubscriberStore::from_pool(pool).await?;

    store.save(&sample_subscriber()).await?;

    let loaded = store.load_all().await?;
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].chat_id, 42);
    assert_eq!(loaded[0].name, "Vivek");
    assert_eq!(loaded[0].subscribed_at_ms, 1_000);

    Ok(())
}

#[sqlx::test]
async fn second_save_updates_in_place(pool: SqlitePool) -> anyhow::Result<()> {
    let store = SqliteSubscriberStore::from_pool(pool).await?;

    let mut subscriber = sample_subscriber();
    store.save(&subscriber).await?;

    subscriber.name = "Vivek Kumar".into();
    subscriber.subscribed_at_ms = 2_000;
    store.save(&subscriber).await?;

    let loaded = store.load_all().await?;
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].name, "Vivek Kumar");
    assert_eq!(loaded[0].subscribed_at_ms, 2_000);

    Ok(())
}

#[sqlx::test]
async fn delete_removes_row(pool: SqlitePool) -> anyhow::Result<()> {
    let store = SqliteSubscriberStore::from_pool(pool).await?;

    store.save(&sample_subscriber()).await?;
    store.delete(42).await?;

    assert!(store.load_all().await?.is_empty());

    Ok(())
}

#[sqlx::test]
async fn multiple_subscribers_are_independent(pool: SqlitePool) -> anyhow::Result<()> {
    let store = SqliteSubscriberStore::from_pool(pool).await?;

    let mut a = sample_subscriber();
    a.chat_id = 100;
    let mut b = sample_subscriber();
    b.chat_id = 200;

    store.save(&a).await?;
    store.save(&b).await?;
    store.delete(100).await?;

    let loaded = store.load_all().await?;
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].chat_id, 200);

    Ok(())
}
