use std::sync::Arc;
use std::time::Duration;

use tokio::test;

use monitor::{MonitorConfig, MonitorEngine, MonitorManager, Subscription};

use mocks::{available, RecordingSink, ScriptedApi, ScriptedTheatre};

fn engine() -> Arc<MonitorEngine<ScriptedApi, RecordingSink>> {
    let api = Arc::new(ScriptedApi::new(
        vec![("Dune Part Two", 501)],
        vec![ScriptedTheatre {
            id: 77,
            name: "PVR Grand Mall".to_string(),
            sessions: vec![mocks::ScriptedSession {
                sid: 9001,
                show_time: "2024-05-01T13:00".to_string(),
                areas: vec![("NORMAL".to_string(), 55.0)],
                seats: vec![available("NORMAL", "G", "11")],
            }],
        }],
    ));
    let config = MonitorConfig {
        poll_interval: Duration::from_millis(10),
        penalty_interval: Duration::from_millis(10),
        ..MonitorConfig::default()
    };
    Arc::new(MonitorEngine::new(
        api,
        Arc::new(RecordingSink::default()),
        config,
    ))
}

fn sub(chat_id: i64) -> Subscription {
    Subscription {
        chat_id,
        movie_query: "dune".to_string(),
        theatre_query: "grand".to_string(),
        date: None,
    }
}

#[test]
async fn starting_twice_keeps_one_monitor_per_chat() {
    let manager = MonitorManager::new(engine());

    manager.start(sub(42)).await;
    manager.start(sub(42)).await;

    assert_eq!(manager.active_count().await, 1);

    manager.start(sub(43)).await;
    assert_eq!(manager.active_count().await, 2);
}

#[test]
async fn stop_cancels_and_the_task_winds_down() {
    let manager = MonitorManager::new(engine());

    manager.start(sub(42)).await;
    assert_eq!(manager.active_count().await, 1);

    let task = manager.stop(42).await.unwrap();
    assert_eq!(manager.active_count().await, 0);

    tokio::time::timeout(Duration::from_secs(1), task)
        .await
        .unwrap()
        .unwrap();
}

#[test]
async fn stopping_an_unknown_chat_is_a_noop() {
    let manager = MonitorManager::new(engine());
    assert!(manager.stop(999).await.is_none());
}
