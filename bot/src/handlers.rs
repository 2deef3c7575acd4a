//! Update dispatch for the Telegram command surface.

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tracing::{info, warn};

use monitor::resolve::{resolve_movie, suggest_movies};
use monitor::{MonitorManager, Subscription};
use notifier::escape_html;
use notifier::types::{CallbackQuery, Chat, InlineKeyboardButton, InlineKeyboardMarkup, Update};
use notifier::TelegramClient;
use provider::api::TicketingApi;
use registry::{Subscriber, SubscriberRegistry, SubscriberStore};

use crate::commands::{split_quoted, Command};

const USAGE_TRACK: &str = r#"Usage: /track "<movie>" "<theatre>" [YYYY-MM-DD]"#;

const HELP_TEXT: &str = "ℹ️ Available Commands:\n\
    /start — Show introduction\n\
    /track \"<movie>\" \"<theatre>\" [date] — Start monitoring seats\n\
    /broadcast <message> — Send message to all users\n\
    /help — Show this help message";

pub struct BotHandlers<P, S>
where
    P: TicketingApi + 'static,
    S: SubscriberStore + 'static,
{
    telegram: Arc<TelegramClient>,
    provider: Arc<P>,
    registry: Arc<SubscriberRegistry<S>>,
    manager: Arc<MonitorManager<P, TelegramClient>>,
}

impl<P, S> BotHandlers<P, S>
where
    P: TicketingApi + 'static,
    S: SubscriberStore + 'static,
{
    pub fn new(
        telegram: Arc<TelegramClient>,
        provider: Arc<P>,
        registry: Arc<SubscriberRegistry<S>>,
        manager: Arc<MonitorManager<P, TelegramClient>>,
    ) -> Self {
        Self {
            telegram,
            provider,
            registry,
            manager,
        }
    }

    /// Entry point for one update off the long poll. Never returns an error
    /// upward; a broken update must not take down the dispatch loop.
    pub async fn handle_update(&self, update: Update) {
        if let Some(message) = update.message {
            let Some(text) = message.text.as_deref() else {
                return;
            };
            let Some(command) = Command::parse(text) else {
                return;
            };

            let result = match command {
                Command::Start => self.handle_start(&message.chat).await,
                Command::Track(args) => self.handle_track(&message.chat, &args).await,
                Command::Broadcast(text) => self.handle_broadcast(message.chat.id, &text).await,
                Command::Help => self.reply(message.chat.id, HELP_TEXT).await,
            };

            if let Err(err) = result {
                warn!(chat_id = message.chat.id, error = %err, "command handling failed");
            }
        } else if let Some(callback) = update.callback_query {
            if let Err(err) = self.handle_suggestion_callback(&callback).await {
                warn!(error = %err, "suggestion callback failed");
            }
        }
    }

    async fn reply(&self, chat_id: i64, text: &str) -> anyhow::Result<()> {
        self.telegram.send_message(chat_id, text).await?;
        Ok(())
    }

    async fn handle_start(&self, chat: &Chat) -> anyhow::Result<()> {
        let was_new = self
            .registry
            .upsert(Subscriber {
                chat_id: chat.id,
                name: chat.full_name(),
                subscribed_at_ms: chrono::Utc::now().timestamp_millis(),
            })
            .await?;

        info!(chat_id = chat.id, was_new, "subscriber connected");

        let first_name = chat.first_name.as_deref().unwrap_or("there");
        self.reply(
            chat.id,
            &format!(
                "👋 Hi {name}! You're now subscribed for movie seat alerts.\n\n\
                 Use /track \"<movie>\" \"<theatre>\" [date in YYYY-MM-DD format] to start monitoring.",
                name = escape_html(first_name)
            ),
        )
        .await
    }

    async fn handle_track(&self, chat: &Chat, raw_args: &str) -> anyhow::Result<()> {
        let Some(args) = split_quoted(raw_args) else {
            return self
                .reply(chat.id, "⚠️ Couldn't parse input. Use quotes for multi-word names.")
                .await;
        };

        if args.len() < 2 {
            return self.reply(chat.id, USAGE_TRACK).await;
        }

        let movie_query = &args[0];
        let theatre_query = &args[1];

        let date = match args.get(2) {
            Some(raw) => match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
                Ok(date) => date,
                Err(_) => {
                    return self
                        .reply(chat.id, "⚠️ Bad date. Expected YYYY-MM-DD.")
                        .await;
                }
            },
            None => Local::now().date_naive(),
        };

        let catalog = match self.provider.fetch_catalog().await {
            Ok(catalog) => catalog,
            Err(err) => {
                warn!(error = %err, "catalog fetch failed during /track");
                return self
                    .reply(chat.id, "⚠️ Couldn't reach the ticketing service. Try again in a bit.")
                    .await;
            }
        };

        let Some(movie) = resolve_movie(&catalog, movie_query) else {
            return self
                .offer_suggestions(chat.id, &catalog, movie_query, theatre_query, date)
                .await;
        };

        self.start_monitor(chat, movie.name.clone(), theatre_query.clone(), date)
            .await
    }

    async fn offer_suggestions(
        &self,
        chat_id: i64,
        catalog: &std::collections::BTreeSet<provider::types::MovieCatalogEntry>,
        movie_query: &str,
        theatre_query: &str,
        date: NaiveDate,
    ) -> anyhow::Result<()> {
        let suggestions = suggest_movies(catalog, movie_query);
        let not_found = format!("❌ Movie '{}' not found.", escape_html(movie_query));

        if suggestions.is_empty() {
            return self
                .reply(chat_id, &format!("{not_found} Please check spelling."))
                .await;
        }

        let buttons = suggestions
            .into_iter()
            .map(|title| InlineKeyboardButton {
                text: format!("🎬 {title}"),
                callback_data: format!("track|{title}|{theatre_query}|{date}"),
            })
            .collect();

        self.telegram
            .send_with_keyboard(
                chat_id,
                &format!("{not_found}\nDid you mean one of these?"),
                &InlineKeyboardMarkup::single_column(buttons),
            )
            .await?;
        Ok(())
    }

    async fn handle_suggestion_callback(&self, callback: &CallbackQuery) -> anyhow::Result<()> {
        self.telegram.answer_callback(&callback.id).await?;

        let (Some(data), Some(message)) = (&callback.data, &callback.message) else {
            return Ok(());
        };

        let parts: Vec<&str> = data.split('|').collect();
        let ["track", movie, theatre, date_raw] = parts.as_slice() else {
            self.telegram
                .edit_message_text(message.chat.id, message.message_id, "⚠️ Invalid selection.")
                .await?;
            return Ok(());
        };

        let date = NaiveDate::parse_from_str(date_raw, "%Y-%m-%d")
            .unwrap_or_else(|_| Local::now().date_naive());

        self.telegram
            .edit_message_text(
                message.chat.id,
                message.message_id,
                &format!("✅ You selected: {movie}\nStarting tracking now…"),
            )
            .await?;

        let sub = Subscription {
            chat_id: message.chat.id,
            movie_query: movie.to_string(),
            theatre_query: theatre.to_string(),
            date: Some(date),
        };
        info!(chat_id = sub.chat_id, movie = %sub.movie_query, "tracking via suggestion");
        self.manager.start(sub).await;
        Ok(())
    }

    async fn start_monitor(
        &self,
        chat: &Chat,
        movie: String,
        theatre: String,
        date: NaiveDate,
    ) -> anyhow::Result<()> {
        self.reply(
            chat.id,
            &format!(
                "🎬 Tracking started for <b>{movie}</b> at <b>{theatre}</b> ({date})",
                movie = escape_html(&movie),
                theatre = escape_html(&theatre),
            ),
        )
        .await?;

        info!(chat_id = chat.id, %movie, %theatre, %date, "tracking started");

        self.manager
            .start(Subscription {
                chat_id: chat.id,
                movie_query: movie,
                theatre_query: theatre,
                date: Some(date),
            })
            .await;
        Ok(())
    }

    async fn handle_broadcast(&self, from_chat_id: i64, text: &str) -> anyhow::Result<()> {
        if text.is_empty() {
            return self.reply(from_chat_id, "Usage: /broadcast <message>").await;
        }

        let payload = format!("📢 {}", escape_html(text));
        for chat_id in self.registry.all_chat_ids().await {
            if let Err(err) = self.telegram.send_message(chat_id, &payload).await {
                warn!(chat_id, error = %err, "broadcast delivery failed");
            }
        }

        self.reply(from_chat_id, "✅ Message sent to all active users.")
            .await
    }
}
