use std::time::Duration;

use monitor::MonitorConfig;
use provider::client::DistrictConfig;

#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Bot API token. The process is useless without it, so startup fails
    /// loudly when it is missing.
    pub telegram_token: String,

    /// Bot API root. Only overridden by tests pointing at a mock server.
    pub telegram_api_root: String,

    /// Subscriber roster database.
    pub database_url: String,

    pub provider: DistrictConfig,
    pub monitor: MonitorConfig,
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let telegram_token = std::env::var("TELEGRAM_BOT_TOKEN")
            .map_err(|_| anyhow::anyhow!("TELEGRAM_BOT_TOKEN is not set"))?;

        let provider = DistrictConfig {
            base_url: std::env::var("PROVIDER_BASE_URL")
                .unwrap_or_else(|_| "https://www.district.in/gw".to_string()),
            city_id: env_or("CITY_ID", 7),
            city_key: std::env::var("CITY_KEY").unwrap_or_else(|_| "chennai".to_string()),
            latitude: env_or("LAT", 12.94063577797741),
            longitude: env_or("LNG", 80.23532394691959),
            access_token: std::env::var("X_ACCESS_TOKEN").ok(),
            device_id: std::env::var("X_DEVICE_ID").ok(),
        };

        let monitor = MonitorConfig {
            price_limit: env_or("PRICE_LIMIT", 60.0),
            poll_interval: Duration::from_secs(env_or("CHECK_INTERVAL_MIN", 5u64) * 60),
            penalty_interval: Duration::from_secs(env_or("PENALTY_SECS", 120u64)),
            realert: env_or("REALERT", true),
            ..MonitorConfig::default()
        };

        Ok(Self {
            telegram_token,
            telegram_api_root: std::env::var("TELEGRAM_API_ROOT")
                .unwrap_or_else(|_| "https://api.telegram.org".to_string()),
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://seatwatch.db?mode=rwc".to_string()),
            provider,
            monitor,
        })
    }
}
