use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::errors::ProviderError;
use crate::types::{MovieCatalogEntry, MovieSessionsResponse, SeatLayoutResponse};

/// Everything needed to address one session's seat layout.
#[derive(Debug, Clone)]
pub struct SeatLayoutQuery {
    pub cinema_id: i64,
    pub session_id: i64,
    pub provider_id: i64,
    pub content_id: i64,
    pub movie_code: String,
}

/// The seam between the monitor engine and the ticketing backend.
///
/// Any failure (network, 5xx, malformed body) surfaces as `ProviderError`;
/// callers treat all of them as transient.
#[async_trait::async_trait]
pub trait TicketingApi: Send + Sync {
    /// Scan the discovery catalog. Refetched on every resolution attempt,
    /// never cached: the catalog changes under us.
    async fn fetch_catalog(&self) -> Result<BTreeSet<MovieCatalogEntry>, ProviderError>;

    /// Theatre session groups for a movie, optionally narrowed to a date.
    async fn fetch_sessions(
        &self,
        content_id: i64,
        date: Option<NaiveDate>,
    ) -> Result<MovieSessionsResponse, ProviderError>;

    /// Nested area/row/seat tree for one session.
    async fn fetch_seat_layout(
        &self,
        query: &SeatLayoutQuery,
    ) -> Result<SeatLayoutResponse, ProviderError>;
}
