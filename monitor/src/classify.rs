//! Price-tier classification of a session's seat layout.

use std::collections::{BTreeSet, HashMap};

use provider::types::{PriceArea, SeatLayoutResponse, SeatStatus};

pub const TIER_NORMAL: &str = "NORMAL";
pub const TIER_EXECUTIVE: &str = "EXECUTIVE";

/// Available-seat labels per tier of interest. Tiers the alert rules do not
/// know about are dropped here, never a failure.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TierBuckets {
    pub normal: Vec<String>,
    pub executive: Vec<String>,
}

impl TierBuckets {
    pub fn is_empty(&self) -> bool {
        self.normal.is_empty() && self.executive.is_empty()
    }
}

/// Canonical tier key: uppercase, surrounding whitespace trimmed.
fn tier_key(label: &str) -> String {
    label.trim().to_uppercase()
}

/// Tiers priced within the limit. Empty means the session needs no further
/// work this cycle.
pub fn affordable_tiers(areas: &[PriceArea], price_limit: f64) -> BTreeSet<String> {
    areas
        .iter()
        .filter(|a| a.price <= price_limit)
        .map(|a| tier_key(&a.label))
        .collect()
}

/// Tier -> price lookup over every area of the session, affordable or not.
pub fn tier_prices(areas: &[PriceArea]) -> HashMap<String, f64> {
    areas
        .iter()
        .map(|a| (tier_key(&a.label), a.price))
        .collect()
}

pub fn seat_label(area_desc: &str, row_id: &str, seat_number: &str) -> String {
    format!("{area_desc} {row_id}{seat_number}")
}

/// Walk the layout and bucket available seats by tier.
///
/// Only affordable tiers accumulate. A lone affordable tier that happens to
/// be EXECUTIVE is excluded outright: a premium-only session is not the
/// cheap-seat signal subscribers asked for.
pub fn classify_seats(
    layout: &SeatLayoutResponse,
    affordable: &BTreeSet<String>,
) -> TierBuckets {
    let executive_only =
        affordable.len() == 1 && affordable.contains(TIER_EXECUTIVE);

    let mut buckets = TierBuckets::default();

    for area in &layout.seat_layout.col_areas.areas {
        let tier = tier_key(&area.area_desc);
        if !affordable.contains(&tier) {
            continue;
        }
        if executive_only && tier == TIER_EXECUTIVE {
            continue;
        }

        let bucket = match tier.as_str() {
            TIER_NORMAL => &mut buckets.normal,
            TIER_EXECUTIVE => &mut buckets.executive,
            _ => continue,
        };

        for row in &area.rows {
            for seat in &row.seats {
                if seat.status == SeatStatus::Available {
                    bucket.push(seat_label(&tier, &row.phy_row_id, &seat.display_number));
                }
            }
        }
    }

    buckets
}
