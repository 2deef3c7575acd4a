//! Alert decision and message rendering.

use std::collections::HashMap;

use notifier::escape_html;

use crate::classify::{TIER_EXECUTIVE, TIER_NORMAL, TierBuckets};

/// What one session's classification means for the subscriber.
/// Exactly one of these holds per session; NORMAL wins over EXECUTIVE.
#[derive(Debug, Clone, PartialEq)]
pub enum AlertDecision {
    NormalOpen {
        count: usize,
        price: Option<f64>,
        examples: Vec<String>,
    },
    ExecutiveOnly {
        count: usize,
        price: Option<f64>,
        examples: Vec<String>,
    },
    NoSeats,
}

fn tier_price(prices: &HashMap<String, f64>, tier: &str) -> Option<f64> {
    prices.get(tier).copied().filter(|p| *p > 0.0)
}

pub fn decide(
    buckets: &TierBuckets,
    prices: &HashMap<String, f64>,
    max_examples: usize,
) -> AlertDecision {
    if !buckets.normal.is_empty() {
        AlertDecision::NormalOpen {
            count: buckets.normal.len(),
            price: tier_price(prices, TIER_NORMAL),
            examples: buckets.normal.iter().take(max_examples).cloned().collect(),
        }
    } else if !buckets.executive.is_empty() {
        AlertDecision::ExecutiveOnly {
            count: buckets.executive.len(),
            price: tier_price(prices, TIER_EXECUTIVE),
            examples: buckets
                .executive
                .iter()
                .take(max_examples)
                .cloned()
                .collect(),
        }
    } else {
        AlertDecision::NoSeats
    }
}

fn price_display(price: Option<f64>) -> String {
    match price {
        Some(p) => format!("₹{p:.2}"),
        None => "N/A".to_string(),
    }
}

fn seats_line(count: usize, examples: &[String]) -> String {
    let joined = examples.join(", ");
    if count > examples.len() {
        format!("Seats: {joined}...")
    } else {
        format!("Seats: {joined}")
    }
}

/// Render the Telegram HTML payload for a decision; `None` when there is
/// nothing worth sending.
pub fn render(
    decision: &AlertDecision,
    movie_name: &str,
    theatre_name: &str,
    showtime: &str,
) -> Option<String> {
    let (headline, count, price, examples) = match decision {
        AlertDecision::NormalOpen {
            count,
            price,
            examples,
        } => ("🪑 <b>NORMAL seats OPEN!</b>", *count, *price, examples),
        AlertDecision::ExecutiveOnly {
            count,
            price,
            examples,
        } => (
            "💺 <b>Higher class (EXECUTIVE) seats only available!</b>",
            *count,
            *price,
            examples,
        ),
        AlertDecision::NoSeats => return None,
    };

    Some(format!(
        "🎬 <b>{movie}</b>\n\
         {headline}\n\
         🍿 <b>{theatre}</b>\n\
         🕒 <b>Showtime:</b> {showtime}\n\
         🎟️ <b>Available:</b> {count} seats\n\
         💰 <b>Price:</b> {price}\n\
         {seats}",
        movie = escape_html(movie_name),
        theatre = escape_html(theatre_name),
        price = price_display(price),
        seats = seats_line(count, examples),
    ))
}
