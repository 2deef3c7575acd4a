/// One chat known to the bot. Subscribers are only ever added or updated,
/// never expired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscriber {
    /// Telegram chat id, the recipient identifier for alerts.
    pub chat_id: i64,
    pub name: String,
    pub subscribed_at_ms: i64,
}
