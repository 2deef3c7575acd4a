use std::collections::BTreeSet;
use std::time::Duration;

use chrono::NaiveDate;
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::api::{SeatLayoutQuery, TicketingApi};
use crate::errors::ProviderError;
use crate::types::{
    DiscoveryResponse, MovieCatalogEntry, MovieSessionsResponse, SeatLayoutResponse,
};

/// Connection settings for the District backend. Read once at startup.
#[derive(Debug, Clone)]
pub struct DistrictConfig {
    /// Gateway base, e.g. `https://www.district.in/gw`.
    pub base_url: String,
    pub city_id: u32,
    pub city_key: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Session cookies lifted from a logged-in browser session.
    pub access_token: Option<String>,
    pub device_id: Option<String>,
}

#[derive(Clone)]
pub struct DistrictClient {
    http: Client,
    cfg: DistrictConfig,
}

#[derive(Serialize)]
struct GeoLocation {
    city_id: u32,
    user_lng: f64,
    user_lat: f64,
    gps_lng: f64,
    gps_lat: f64,
}

#[derive(Serialize)]
struct DiscoveryRequest {
    location: GeoLocation,
    layout_type: &'static str,
    request_type: &'static str,
}

#[derive(Serialize)]
struct SeatLayoutRequest<'a> {
    #[serde(rename = "cinemaId")]
    cinema_id: i64,
    #[serde(rename = "sessionId")]
    session_id: i64,
    #[serde(rename = "providerId")]
    provider_id: i64,
    #[serde(rename = "screenOnTop")]
    screen_on_top: bool,
    #[serde(rename = "freeSeating")]
    free_seating: bool,
    #[serde(rename = "screenFormat")]
    screen_format: &'static str,
    moviecode: &'a str,
    config: SeatLayoutFlags,
    #[serde(rename = "contentId")]
    content_id: i64,
}

#[derive(Serialize)]
struct SeatLayoutFlags {
    #[serde(rename = "socialDistancing")]
    social_distancing: u8,
}

impl DistrictClient {
    pub fn new(cfg: DistrictConfig) -> Result<Self, ProviderError> {
        let mut headers = HeaderMap::new();
        headers.insert("accept", HeaderValue::from_static("*/*"));
        headers.insert("api_source", HeaderValue::from_static("district"));
        headers.insert("x-app-type", HeaderValue::from_static("ed_web"));
        headers.insert("user-agent", HeaderValue::from_static("Mozilla/5.0"));
        headers.insert("x-is-movies-supported", HeaderValue::from_static("true"));
        headers.insert("x-user-lat", HeaderValue::from_str(&cfg.latitude.to_string())?);
        headers.insert("x-user-lng", HeaderValue::from_str(&cfg.longitude.to_string())?);

        if let Some(cookie) = Self::cookie_header(&cfg) {
            headers.insert("cookie", HeaderValue::from_str(&cookie)?);
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(15))
            .pool_idle_timeout(Duration::from_secs(30))
            .default_headers(headers)
            .build()?;

        Ok(Self { http, cfg })
    }

    fn cookie_header(cfg: &DistrictConfig) -> Option<String> {
        let mut parts = Vec::new();
        if let Some(token) = &cfg.access_token {
            parts.push(format!("x-access-token={token}"));
        }
        if let Some(device) = &cfg.device_id {
            parts.push(format!("x-device-id={device}"));
        }
        if parts.is_empty() {
            None
        } else {
            Some(parts.join("; "))
        }
    }

    fn discovery_body(&self) -> DiscoveryRequest {
        DiscoveryRequest {
            location: GeoLocation {
                city_id: self.cfg.city_id,
                user_lng: self.cfg.longitude,
                user_lat: self.cfg.latitude,
                gps_lng: self.cfg.longitude,
                gps_lat: self.cfg.latitude,
            },
            layout_type: "movies_home_v2",
            request_type: "tab_switch",
        }
    }
}

#[async_trait::async_trait]
impl TicketingApi for DistrictClient {
    #[instrument(skip(self), level = "debug")]
    async fn fetch_catalog(&self) -> Result<BTreeSet<MovieCatalogEntry>, ProviderError> {
        let url = format!("{}/web/get_discovery_results", self.cfg.base_url);

        let resp = self
            .http
            .post(&url)
            .json(&self.discovery_body())
            .send()
            .await?
            .error_for_status()?;

        let discovery: DiscoveryResponse = resp.json().await?;

        let mut catalog = BTreeSet::new();
        for widget in discovery.widgets {
            for item in widget.items {
                if let (Some(content_id), Some(name)) = (item.entity_id, item.display_name()) {
                    catalog.insert(MovieCatalogEntry { name, content_id });
                }
            }
        }

        debug!(movies = catalog.len(), "discovery catalog fetched");

        Ok(catalog)
    }

    #[instrument(skip(self), fields(content_id = content_id), level = "debug")]
    async fn fetch_sessions(
        &self,
        content_id: i64,
        date: Option<NaiveDate>,
    ) -> Result<MovieSessionsResponse, ProviderError> {
        let url = format!("{}/consumer/movies/v5/movie", self.cfg.base_url);

        let mut req = self
            .http
            .get(&url)
            .query(&[
                ("version", "3"),
                ("site_id", "1"),
                ("channel", "web"),
                ("child_site_id", "1"),
                ("platform", "district"),
                ("cinemaOrderLogic", "3"),
            ])
            .query(&[("city_key", self.cfg.city_key.as_str())])
            .query(&[("content_id", content_id.to_string())])
            .query(&[
                ("latitude", self.cfg.latitude.to_string()),
                ("longitude", self.cfg.longitude.to_string()),
            ]);

        if let Some(date) = date {
            req = req.query(&[("date", date.format("%Y-%m-%d").to_string())]);
        }

        let resp = req.send().await?.error_for_status()?;
        let sessions: MovieSessionsResponse = resp.json().await?;

        debug!(
            theatres = sessions.page_data.nearby_cinemas.len(),
            "session groups fetched"
        );

        Ok(sessions)
    }

    #[instrument(
        skip(self, query),
        fields(session_id = query.session_id, cinema_id = query.cinema_id),
        level = "debug"
    )]
    async fn fetch_seat_layout(
        &self,
        query: &SeatLayoutQuery,
    ) -> Result<SeatLayoutResponse, ProviderError> {
        let url = format!("{}/consumer/movies/v1/select-seat", self.cfg.base_url);

        let body = SeatLayoutRequest {
            cinema_id: query.cinema_id,
            session_id: query.session_id,
            provider_id: query.provider_id,
            screen_on_top: true,
            free_seating: false,
            screen_format: "2D",
            moviecode: &query.movie_code,
            config: SeatLayoutFlags {
                social_distancing: 1,
            },
            content_id: query.content_id,
        };

        let resp = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let layout: SeatLayoutResponse = resp.json().await?;

        Ok(layout)
    }
}
