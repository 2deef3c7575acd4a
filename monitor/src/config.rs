use std::time::Duration;

/// Process-wide monitor settings. Read once at startup, immutable after.
#[derive(Clone, Debug)]
pub struct MonitorConfig {
    /// Price ceiling (inclusive). Areas above it never produce alerts.
    pub price_limit: f64,

    /// Pause between successful (or not-found) polling cycles.
    ///
    /// Catalogs and session listings change on the scale of minutes, so
    /// anything finer just burns provider quota.
    pub poll_interval: Duration,

    /// Pause after a transient failure (network, 5xx, malformed body).
    ///
    /// Shorter than the poll interval on purpose: a flaky upstream usually
    /// recovers quickly and we do not want to miss a release-day window.
    pub penalty_interval: Duration,

    /// When true (the default), a session that still has matching seats
    /// re-alerts every cycle; the alert doubles as a reminder. When false,
    /// a repeat with an unchanged seat set is suppressed.
    pub realert: bool,

    /// Cap on example seat labels embedded in one alert.
    pub max_example_seats: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            price_limit: 60.0,
            poll_interval: Duration::from_secs(5 * 60),
            penalty_interval: Duration::from_secs(120),
            realert: true,
            max_example_seats: 5,
        }
    }
}
