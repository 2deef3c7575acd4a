/// Delivery seam consumed by the monitor engine.
///
/// A failed delivery is an `Err` for the caller to log; it must never stop a
/// monitor loop.
#[async_trait::async_trait]
pub trait AlertSink: Send + Sync {
    async fn send(&self, chat_id: i64, html_text: &str) -> anyhow::Result<()>;
}
