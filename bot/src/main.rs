mod commands;
mod config;
mod handlers;

use std::sync::Arc;

use common::init_logger;
use monitor::{MonitorEngine, MonitorManager};
use notifier::TelegramClient;
use provider::client::DistrictClient;
use registry::store::sqlite_store::SqliteSubscriberStore;
use registry::SubscriberRegistry;

use crate::config::AppConfig;
use crate::handlers::BotHandlers;

/// Seconds Telegram holds a getUpdates call open before answering empty.
const LONG_POLL_SECS: u64 = 30;

async fn init_registry(
    cfg: &AppConfig,
) -> anyhow::Result<Arc<SubscriberRegistry<SqliteSubscriberStore>>> {
    let store = Arc::new(SqliteSubscriberStore::new(&cfg.database_url).await?);
    Ok(Arc::new(SubscriberRegistry::new(store).await?))
}

fn start_update_loop(
    telegram: Arc<TelegramClient>,
    handlers: Arc<BotHandlers<DistrictClient, SqliteSubscriberStore>>,
) {
    tokio::spawn(async move {
        let mut offset = 0i64;

        loop {
            let updates = match telegram.get_updates(offset, LONG_POLL_SECS).await {
                Ok(updates) => updates,
                Err(err) => {
                    tracing::warn!(error = %err, "getUpdates failed, retrying");
                    tokio::time::sleep(std::time::Duration::from_secs(3)).await;
                    continue;
                }
            };

            for update in updates {
                offset = offset.max(update.update_id + 1);

                let handlers = Arc::clone(&handlers);
                tokio::spawn(async move {
                    handlers.handle_update(update).await;
                });
            }
        }
    });
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger("seatwatch-bot");

    tracing::info!("Starting seat watch bot...");

    let cfg = AppConfig::from_env()?;

    let provider = Arc::new(DistrictClient::new(cfg.provider.clone())?);
    let telegram = Arc::new(TelegramClient::new(
        &cfg.telegram_api_root,
        &cfg.telegram_token,
    )?);

    let registry = init_registry(&cfg).await?;

    let engine = Arc::new(MonitorEngine::new(
        Arc::clone(&provider),
        Arc::clone(&telegram),
        cfg.monitor.clone(),
    ));
    let manager = Arc::new(MonitorManager::new(engine));

    let handlers = Arc::new(BotHandlers::new(
        Arc::clone(&telegram),
        provider,
        registry,
        manager,
    ));

    start_update_loop(telegram, handlers);

    tracing::info!("Bot is running. Press Ctrl+C to stop.");

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");

    Ok(())
}
