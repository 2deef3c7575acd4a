//! Lifecycle of per-subscriber monitor tasks.

use std::collections::HashMap;
use std::sync::Arc;

use notifier::AlertSink;
use provider::api::TicketingApi;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::info;

use crate::engine::{MonitorEngine, Subscription};

struct MonitorHandle {
    cancel: watch::Sender<bool>,
    task: JoinHandle<()>,
}

/// One monitor task per chat. Starting a second watch for the same chat
/// replaces the first; the old task is cancelled before the new one exists
/// in the map, so a chat never has two loops polling at once.
pub struct MonitorManager<P, S> {
    engine: Arc<MonitorEngine<P, S>>,
    handles: Mutex<HashMap<i64, MonitorHandle>>,
}

impl<P, S> MonitorManager<P, S>
where
    P: TicketingApi + 'static,
    S: AlertSink + 'static,
{
    pub fn new(engine: Arc<MonitorEngine<P, S>>) -> Self {
        Self {
            engine,
            handles: Mutex::new(HashMap::new()),
        }
    }

    /// Start (or replace) the monitor for `sub.chat_id`.
    pub async fn start(&self, sub: Subscription) {
        let chat_id = sub.chat_id;
        let (cancel_tx, cancel_rx) = watch::channel(false);

        let engine = Arc::clone(&self.engine);
        let task = tokio::spawn(async move {
            engine.run(sub, cancel_rx).await;
        });

        let mut handles = self.handles.lock().await;
        if let Some(old) = handles.insert(chat_id, MonitorHandle { cancel: cancel_tx, task }) {
            info!(chat_id, "replacing existing monitor");
            // Cooperative: the old loop notices at its next cycle boundary.
            let _ = old.cancel.send(true);
        }
    }

    /// Stop the monitor for `chat_id`. Hands back the join handle so callers
    /// that care can await the wind-down; `None` when none was running.
    pub async fn stop(&self, chat_id: i64) -> Option<JoinHandle<()>> {
        let mut handles = self.handles.lock().await;
        let handle = handles.remove(&chat_id)?;
        let _ = handle.cancel.send(true);
        info!(chat_id, "monitor stop requested");
        Some(handle.task)
    }

    pub async fn active_count(&self) -> usize {
        self.handles.lock().await.len()
    }
}
