use tracing::{Level, Span};

use super::CycleId;

/// Create a root span for one monitor polling cycle.
pub fn cycle_span(name: &'static str, cycle_id: &CycleId) -> Span {
    tracing::span!(
        Level::INFO,
        "cycle",
        op = name,
        cycle_id = %cycle_id.as_str()
    )
}
