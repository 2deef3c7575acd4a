pub mod escape;
pub mod sink;
pub mod telegram;
pub mod types;

pub use escape::escape_html;
pub use sink::AlertSink;
pub use telegram::{TelegramClient, TelegramError};
