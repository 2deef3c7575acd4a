use std::collections::HashSet;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::test;

use monitor::{MonitorConfig, MonitorEngine, ScanOutcome, Subscription};

use mocks::{available, taken, RecordingSink, ScriptedApi, ScriptedTheatre};

fn dune_api() -> ScriptedApi {
    ScriptedApi::new(
        vec![("Dune Part Two", 501), ("Oppenheimer", 502)],
        vec![ScriptedTheatre {
            id: 77,
            name: "PVR Grand Mall".to_string(),
            sessions: vec![mocks::ScriptedSession {
                sid: 9001,
                show_time: "2024-05-01T13:00".to_string(),
                areas: vec![("NORMAL".to_string(), 55.0), ("EXECUTIVE".to_string(), 90.0)],
                seats: vec![
                    available("NORMAL", "G", "11"),
                    taken("NORMAL", "G", "12"),
                    available("NORMAL", "H", "1"),
                    available("EXECUTIVE", "A", "1"),
                ],
            }],
        }],
    )
}

fn subscription() -> Subscription {
    Subscription {
        chat_id: 42,
        movie_query: "dune".to_string(),
        theatre_query: "grand".to_string(),
        date: None,
    }
}

fn fast_config() -> MonitorConfig {
    MonitorConfig {
        poll_interval: Duration::from_millis(10),
        penalty_interval: Duration::from_millis(5),
        ..MonitorConfig::default()
    }
}

#[test]
async fn scan_alerts_on_affordable_normal_seats() {
    let api = Arc::new(dune_api());
    let sink = Arc::new(RecordingSink::default());
    let engine = MonitorEngine::new(Arc::clone(&api), Arc::clone(&sink), MonitorConfig::default());

    let mut theatre_query = "grand".to_string();
    let mut seen = HashSet::new();
    let outcome = engine
        .scan(&subscription(), &mut theatre_query, &mut seen)
        .await
        .unwrap();

    assert_eq!(outcome, ScanOutcome::Completed { alerts: 1 });

    let sent = sink.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    let (chat_id, text) = &sent[0];
    assert_eq!(*chat_id, 42);
    assert!(text.contains("🎬 <b>Dune Part Two</b>"));
    assert!(text.contains("NORMAL seats OPEN"));
    assert!(text.contains("🎟️ <b>Available:</b> 2 seats"));
    assert!(text.contains("₹55.00"));
    assert!(text.contains("06:30 PM, 01 May 2024"));

    // The query now carries the provider's canonical theatre name.
    assert_eq!(theatre_query, "PVR Grand Mall");
}

#[test]
async fn unaffordable_sessions_never_fetch_the_layout() {
    let api = Arc::new(ScriptedApi::new(
        vec![("Dune Part Two", 501)],
        vec![ScriptedTheatre {
            id: 77,
            name: "PVR Grand Mall".to_string(),
            sessions: vec![mocks::ScriptedSession {
                sid: 9001,
                show_time: "2024-05-01T13:00".to_string(),
                areas: vec![("NORMAL".to_string(), 80.0), ("EXECUTIVE".to_string(), 120.0)],
                seats: vec![available("NORMAL", "G", "11")],
            }],
        }],
    ));
    let sink = Arc::new(RecordingSink::default());
    let engine = MonitorEngine::new(Arc::clone(&api), Arc::clone(&sink), MonitorConfig::default());

    let outcome = engine
        .scan(&subscription(), &mut "grand".to_string(), &mut HashSet::new())
        .await
        .unwrap();

    assert_eq!(outcome, ScanOutcome::Completed { alerts: 0 });
    assert_eq!(api.layout_calls.load(Ordering::SeqCst), 0);
    assert!(sink.sent.lock().unwrap().is_empty());
}

#[test]
async fn missing_movie_and_theatre_are_reported_not_fatal() {
    let api = Arc::new(dune_api());
    let sink = Arc::new(RecordingSink::default());
    let engine = MonitorEngine::new(api, sink, MonitorConfig::default());

    let mut sub = subscription();
    sub.movie_query = "barbie".to_string();
    let outcome = engine
        .scan(&sub, &mut "grand".to_string(), &mut HashSet::new())
        .await
        .unwrap();
    assert_eq!(outcome, ScanOutcome::MovieNotFound);

    let outcome = engine
        .scan(&subscription(), &mut "inox".to_string(), &mut HashSet::new())
        .await
        .unwrap();
    assert_eq!(outcome, ScanOutcome::TheatreNotFound);
}

#[test]
async fn realert_off_suppresses_unchanged_seat_sets() {
    let api = Arc::new(dune_api());
    let sink = Arc::new(RecordingSink::default());
    let config = MonitorConfig {
        realert: false,
        ..MonitorConfig::default()
    };
    let engine = MonitorEngine::new(api, Arc::clone(&sink), config);

    let mut theatre_query = "grand".to_string();
    let mut seen = HashSet::new();

    let first = engine
        .scan(&subscription(), &mut theatre_query, &mut seen)
        .await
        .unwrap();
    let second = engine
        .scan(&subscription(), &mut theatre_query, &mut seen)
        .await
        .unwrap();

    assert_eq!(first, ScanOutcome::Completed { alerts: 1 });
    assert_eq!(second, ScanOutcome::Completed { alerts: 0 });
    assert_eq!(sink.sent.lock().unwrap().len(), 1);
}

#[test]
async fn realert_on_repeats_every_cycle() {
    let api = Arc::new(dune_api());
    let sink = Arc::new(RecordingSink::default());
    let engine = MonitorEngine::new(api, Arc::clone(&sink), MonitorConfig::default());

    let mut theatre_query = "grand".to_string();
    let mut seen = HashSet::new();

    for _ in 0..2 {
        engine
            .scan(&subscription(), &mut theatre_query, &mut seen)
            .await
            .unwrap();
    }

    assert_eq!(sink.sent.lock().unwrap().len(), 2);
}

#[test]
async fn run_survives_transient_provider_failures() {
    let api = Arc::new(dune_api().fail_catalog_times(3));
    let sink = Arc::new(RecordingSink::default());
    let engine = Arc::new(MonitorEngine::new(
        Arc::clone(&api),
        Arc::clone(&sink),
        fast_config(),
    ));

    let (cancel_tx, cancel_rx) = watch::channel(false);
    let runner = {
        let engine = Arc::clone(&engine);
        tokio::spawn(async move {
            engine.run(subscription(), cancel_rx).await;
        })
    };

    // Three failed cycles back off on the penalty interval, then the fourth
    // succeeds and alerts.
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if !sink.sent.lock().unwrap().is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
    })
    .await
    .unwrap();

    assert!(api.catalog_calls.load(Ordering::SeqCst) >= 4);

    cancel_tx.send(true).unwrap();
    tokio::time::timeout(Duration::from_secs(1), runner)
        .await
        .unwrap()
        .unwrap();
}

#[test]
async fn run_stops_when_cancelled_mid_sleep() {
    let api = Arc::new(dune_api());
    let sink = Arc::new(RecordingSink::default());
    let config = MonitorConfig {
        poll_interval: Duration::from_secs(3600),
        ..MonitorConfig::default()
    };
    let engine = Arc::new(MonitorEngine::new(api, sink, config));

    let (cancel_tx, cancel_rx) = watch::channel(false);
    let runner = tokio::spawn({
        let engine = Arc::clone(&engine);
        async move {
            engine.run(subscription(), cancel_rx).await;
        }
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    cancel_tx.send(true).unwrap();

    tokio::time::timeout(Duration::from_secs(1), runner)
        .await
        .unwrap()
        .unwrap();
}
