use serde::Deserialize;

/// One movie known to the provider's discovery catalog.
///
/// Identity is the (name, content_id) pair: the same title can show up more
/// than once with different ids, so catalogs are set-valued.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct MovieCatalogEntry {
    pub name: String,
    pub content_id: i64,
}

// --- Discovery endpoint ---
//
// The discovery payload is a widget layout. Only items carrying an entity id
// and some display name are movies; everything else (banners, offers) is
// ignored by keeping those fields optional.

#[derive(Debug, Deserialize)]
pub struct DiscoveryResponse {
    #[serde(default)]
    pub widgets: Vec<DiscoveryWidget>,
}

#[derive(Debug, Deserialize)]
pub struct DiscoveryWidget {
    #[serde(default)]
    pub items: Vec<DiscoveryItem>,
}

#[derive(Debug, Deserialize)]
pub struct DiscoveryItem {
    pub entity_id: Option<i64>,
    pub name: Option<String>,
    pub title: Option<String>,
    #[serde(rename = "ItemDetails")]
    pub item_details: Option<ItemDetails>,
}

#[derive(Debug, Deserialize)]
pub struct ItemDetails {
    #[serde(rename = "MovieData")]
    pub movie_data: Option<MovieData>,
}

#[derive(Debug, Deserialize)]
pub struct MovieData {
    pub name: Option<String>,
}

impl DiscoveryItem {
    /// The display name of a movie item, wherever the layout put it.
    pub fn display_name(&self) -> Option<String> {
        self.name
            .clone()
            .or_else(|| self.title.clone())
            .or_else(|| {
                self.item_details
                    .as_ref()
                    .and_then(|d| d.movie_data.as_ref())
                    .and_then(|m| m.name.clone())
            })
    }
}

// --- Movie sessions endpoint ---

#[derive(Debug, Deserialize)]
pub struct MovieSessionsResponse {
    #[serde(rename = "pageData", default)]
    pub page_data: SessionsPageData,
}

#[derive(Debug, Default, Deserialize)]
pub struct SessionsPageData {
    #[serde(rename = "nearbyCinemas", default)]
    pub nearby_cinemas: Vec<TheatreGroup>,
}

/// All sessions of one movie at one theatre for the queried date.
#[derive(Debug, Deserialize)]
pub struct TheatreGroup {
    pub id: i64,
    #[serde(rename = "cinemaInfo")]
    pub cinema_info: CinemaInfo,
    #[serde(default)]
    pub sessions: Vec<SessionListing>,
}

#[derive(Debug, Deserialize)]
pub struct CinemaInfo {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct SessionListing {
    /// Session id.
    pub sid: i64,
    /// Provider id (the theatre chain backing this session).
    pub pid: i64,
    /// Movie code within the provider's own namespace.
    pub mid: String,
    /// Naive UTC timestamp, `%Y-%m-%dT%H:%M`.
    #[serde(rename = "showTime")]
    pub show_time: String,
    #[serde(default)]
    pub areas: Vec<PriceArea>,
}

/// A named seating category and its price for one session.
#[derive(Debug, Clone, Deserialize)]
pub struct PriceArea {
    pub label: String,
    #[serde(default)]
    pub price: f64,
}

// --- Seat layout endpoint ---

#[derive(Debug, Deserialize)]
pub struct SeatLayoutResponse {
    #[serde(rename = "seatLayout")]
    pub seat_layout: SeatLayout,
}

#[derive(Debug, Deserialize)]
pub struct SeatLayout {
    #[serde(rename = "colAreas")]
    pub col_areas: ColAreas,
}

#[derive(Debug, Deserialize)]
pub struct ColAreas {
    #[serde(rename = "objArea", default)]
    pub areas: Vec<SeatArea>,
}

#[derive(Debug, Deserialize)]
pub struct SeatArea {
    /// Tier name, e.g. "NORMAL" or "EXECUTIVE".
    #[serde(rename = "AreaDesc")]
    pub area_desc: String,
    #[serde(rename = "objRow", default)]
    pub rows: Vec<SeatRow>,
}

#[derive(Debug, Deserialize)]
pub struct SeatRow {
    #[serde(rename = "PhyRowId")]
    pub phy_row_id: String,
    #[serde(rename = "objSeat", default)]
    pub seats: Vec<Seat>,
}

#[derive(Debug, Deserialize)]
pub struct Seat {
    #[serde(rename = "SeatStatus")]
    pub status: SeatStatus,
    #[serde(rename = "displaySeatNumber")]
    pub display_number: String,
}

/// Availability flag on a single seat. The wire format is a bare string;
/// anything the provider invents later lands in `Other` instead of failing
/// deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum SeatStatus {
    Available,
    Taken,
    Other,
}

impl From<String> for SeatStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "0" => SeatStatus::Available,
            "1" | "2" => SeatStatus::Taken,
            _ => SeatStatus::Other,
        }
    }
}
