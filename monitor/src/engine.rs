//! The polling loop: resolve, fetch, classify, alert, sleep, repeat.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use chrono::NaiveDate;
use notifier::AlertSink;
use provider::api::{SeatLayoutQuery, TicketingApi};
use provider::types::{SessionListing, TheatreGroup};
use tokio::sync::watch;
use tracing::Instrument;
use tracing::{debug, info, warn};

use common::{cycle_span, CycleId};

use crate::alert::{decide, render, AlertDecision};
use crate::classify::{affordable_tiers, classify_seats, tier_prices};
use crate::config::MonitorConfig;
use crate::resolve::resolve_movie;
use crate::showtime;

/// One subscriber's standing watch request.
#[derive(Debug, Clone)]
pub struct Subscription {
    pub chat_id: i64,
    pub movie_query: String,
    pub theatre_query: String,
    pub date: Option<NaiveDate>,
}

/// What a single polling cycle concluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// The cycle ran end to end; `alerts` messages were dispatched.
    Completed { alerts: usize },
    /// The movie fell out of the catalog. Not fatal: it may reappear.
    MovieNotFound,
    /// No theatre in the listing matched the query.
    TheatreNotFound,
}

pub struct MonitorEngine<P, S> {
    provider: Arc<P>,
    sink: Arc<S>,
    config: MonitorConfig,
}

impl<P, S> MonitorEngine<P, S>
where
    P: TicketingApi,
    S: AlertSink,
{
    pub fn new(provider: Arc<P>, sink: Arc<S>, config: MonitorConfig) -> Self {
        Self {
            provider,
            sink,
            config,
        }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Drive one subscription until cancelled.
    ///
    /// Provider failures never kill the loop; they only shorten the sleep to
    /// the penalty interval so the next attempt comes sooner.
    pub async fn run(&self, sub: Subscription, mut cancel: watch::Receiver<bool>) {
        // The query is replaced by the canonical theatre name on first match
        // so later cycles compare against what the provider actually calls it.
        let mut theatre_query = sub.theatre_query.clone();
        let mut seen_fingerprints: HashSet<u64> = HashSet::new();

        info!(
            chat_id = sub.chat_id,
            movie = %sub.movie_query,
            theatre = %theatre_query,
            "monitor started"
        );

        loop {
            if *cancel.borrow() {
                break;
            }

            let cycle_id = CycleId::new();
            let span = cycle_span("seat_scan", &cycle_id);

            let outcome = self
                .scan(&sub, &mut theatre_query, &mut seen_fingerprints)
                .instrument(span)
                .await;

            let sleep_for = match outcome {
                Ok(ScanOutcome::Completed { alerts }) => {
                    debug!(chat_id = sub.chat_id, alerts, "cycle complete");
                    self.config.poll_interval
                }
                Ok(ScanOutcome::MovieNotFound) => {
                    debug!(chat_id = sub.chat_id, movie = %sub.movie_query, "movie not in catalog");
                    self.config.poll_interval
                }
                Ok(ScanOutcome::TheatreNotFound) => {
                    debug!(chat_id = sub.chat_id, theatre = %theatre_query, "theatre not listed");
                    self.config.poll_interval
                }
                Err(err) => {
                    warn!(chat_id = sub.chat_id, error = %err, "cycle failed, backing off");
                    self.config.penalty_interval
                }
            };

            if sleep_or_cancelled(sleep_for, &mut cancel).await {
                break;
            }
        }

        info!(chat_id = sub.chat_id, "monitor stopped");
    }

    /// One full pass over the subscription. Visible for tests; production
    /// code only reaches it through [`run`](Self::run).
    pub async fn scan(
        &self,
        sub: &Subscription,
        theatre_query: &mut String,
        seen_fingerprints: &mut HashSet<u64>,
    ) -> anyhow::Result<ScanOutcome> {
        let catalog = self.provider.fetch_catalog().await?;

        let Some(movie) = resolve_movie(&catalog, &sub.movie_query) else {
            return Ok(ScanOutcome::MovieNotFound);
        };

        let sessions = self
            .provider
            .fetch_sessions(movie.content_id, sub.date)
            .await?;

        let Some(theatre) = find_theatre(&sessions.page_data.nearby_cinemas, theatre_query) else {
            return Ok(ScanOutcome::TheatreNotFound);
        };

        // Pin the canonical name for every later cycle.
        if *theatre_query != theatre.cinema_info.name {
            theatre_query.clear();
            theatre_query.push_str(&theatre.cinema_info.name);
        }

        let mut alerts = 0usize;

        for session in &theatre.sessions {
            let decision = self.evaluate_session(movie.content_id, theatre, session).await?;

            if decision == AlertDecision::NoSeats {
                debug!(sid = session.sid, "no matching seats");
                continue;
            }

            if !self.config.realert {
                let fp = session_fingerprint(session.sid, &decision);
                if !seen_fingerprints.insert(fp) {
                    debug!(sid = session.sid, "unchanged seat set, alert suppressed");
                    continue;
                }
            }

            let display_time = showtime::to_display(&session.show_time);
            if let Some(text) = render(
                &decision,
                &movie.name,
                &theatre.cinema_info.name,
                &display_time,
            ) {
                match self.sink.send(sub.chat_id, &text).await {
                    Ok(()) => alerts += 1,
                    Err(err) => {
                        warn!(chat_id = sub.chat_id, sid = session.sid, error = %err, "alert delivery failed");
                    }
                }
            }
        }

        Ok(ScanOutcome::Completed { alerts })
    }

    /// Classify one session. Skips the seat-layout fetch entirely when no
    /// tier is within the price limit.
    async fn evaluate_session(
        &self,
        content_id: i64,
        theatre: &TheatreGroup,
        session: &SessionListing,
    ) -> anyhow::Result<AlertDecision> {
        let affordable = affordable_tiers(&session.areas, self.config.price_limit);
        if affordable.is_empty() {
            return Ok(AlertDecision::NoSeats);
        }

        let prices = tier_prices(&session.areas);

        let layout = self
            .provider
            .fetch_seat_layout(&SeatLayoutQuery {
                cinema_id: theatre.id,
                session_id: session.sid,
                provider_id: session.pid,
                content_id,
                movie_code: session.mid.clone(),
            })
            .await?;

        let buckets = classify_seats(&layout, &affordable);

        Ok(decide(&buckets, &prices, self.config.max_example_seats))
    }
}

/// Case-insensitive substring match over theatre names.
fn find_theatre<'a>(groups: &'a [TheatreGroup], query: &str) -> Option<&'a TheatreGroup> {
    let needle = query.to_lowercase();
    groups
        .iter()
        .find(|g| g.cinema_info.name.to_lowercase().contains(&needle))
}

/// Identity of one alert-worthy seat set. Built from the session id plus the
/// example labels, so the same session re-alerts when its seats change.
fn session_fingerprint(sid: i64, decision: &AlertDecision) -> u64 {
    let mut hasher = DefaultHasher::new();
    sid.hash(&mut hasher);
    match decision {
        AlertDecision::NormalOpen { count, examples, .. } => {
            0u8.hash(&mut hasher);
            count.hash(&mut hasher);
            examples.hash(&mut hasher);
        }
        AlertDecision::ExecutiveOnly { count, examples, .. } => {
            1u8.hash(&mut hasher);
            count.hash(&mut hasher);
            examples.hash(&mut hasher);
        }
        AlertDecision::NoSeats => {
            2u8.hash(&mut hasher);
        }
    }
    hasher.finish()
}

/// Sleep for `duration`, waking early on cancellation. Returns true when the
/// loop should exit.
async fn sleep_or_cancelled(
    duration: std::time::Duration,
    cancel: &mut watch::Receiver<bool>,
) -> bool {
    tokio::select! {
        _ = tokio::time::sleep(duration) => *cancel.borrow(),
        changed = cancel.changed() => match changed {
            Ok(()) => *cancel.borrow(),
            // Sender dropped: nobody can ever cancel us politely again,
            // treat it as a stop request.
            Err(_) => true,
        },
    }
}
