//! Showtime localization for alert text.

use chrono::{Duration, NaiveDateTime};

/// Provider showtimes are naive UTC; subscribers are in IST (+5:30).
const IST_OFFSET_MINUTES: i64 = 5 * 60 + 30;

const SOURCE_FORMAT: &str = "%Y-%m-%dT%H:%M";
const DISPLAY_FORMAT: &str = "%I:%M %p, %d %b %Y";

/// Convert a raw showtime into the display form, e.g.
/// `2024-05-01T18:30` -> `12:00 AM, 02 May 2024`.
///
/// Anything unparseable passes through unchanged; a weird showtime must
/// never cost a subscriber the alert itself.
pub fn to_display(raw: &str) -> String {
    match NaiveDateTime::parse_from_str(raw, SOURCE_FORMAT) {
        Ok(utc) => {
            let ist = utc + Duration::minutes(IST_OFFSET_MINUTES);
            ist.format(DISPLAY_FORMAT).to_string()
        }
        Err(_) => raw.to_string(),
    }
}
