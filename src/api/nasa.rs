//! Provides a client for interacting with NASA's open data APIs (api.nasa.gov).
//!
//! This module defines the `NasaClient` struct and its methods for fetching
//! APOD entries, near-Earth asteroid data, Mars rover photos and EPIC imagery.

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{
    validate_asteroid_id, validate_feed_window, Apod, ApodPayload, ApodSelection,
    EpicCollection, EpicImage, LatestPhotosResponse, MarsPhoto, MarsPhotosResponse,
    NearEarthObject, NeoFeed, PhotoSelection, RoverPhotoQuery, DATE_FORMAT,
};
use chrono::NaiveDate;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, info, warn};

const APOD_PATH: &str = "/planetary/apod";
const NEO_FEED_PATH: &str = "/neo/rest/v1/feed";
const NEO_LOOKUP_PATH: &str = "/neo/rest/v1/neo";

/// Pulls the most specific human-readable message out of an error response body.
///
/// Error bodies differ per service:
/// - APOD: `{"code":400,"msg":"..."}`
/// - api.nasa.gov gateway: `{"error":{"code":"API_KEY_INVALID","message":"..."}}`
/// - NeoWs: `{"http_error":"BAD_REQUEST","error_message":"..."}`
///
/// Blank candidates are skipped. Raw text is only used when the body is not JSON.
pub fn extract_error_message(body: &str) -> String {
    const UNKNOWN: &str = "Unknown error";

    let non_blank = |v: Option<&Value>| {
        v.and_then(Value::as_str)
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
    };

    match serde_json::from_str::<Value>(body) {
        Ok(parsed) => non_blank(parsed.get("msg"))
            .or_else(|| non_blank(parsed.get("error").and_then(|e| e.get("message"))))
            .or_else(|| non_blank(parsed.get("error_message")))
            .unwrap_or_else(|| UNKNOWN.to_string()),
        Err(_) => {
            let text = body.trim();
            if text.is_empty() {
                UNKNOWN.to_string()
            } else {
                text.to_string()
            }
        },
    }
}

/// An asynchronous client for NASA's open data APIs.
pub struct NasaClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl NasaClient {
    /// Creates a new `NasaClient` from the runtime configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
        })
    }

    /// Creates a new `NasaClient` with a custom base URL.
    ///
    /// This is primarily intended for testing purposes (e.g., using a mock server).
    #[cfg(test)]
    pub fn new_with_base_url(api_key: &str, base_url: &str) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Issues a GET against `path` with the API key attached and decodes the JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {} with {} parameter(s)", url, params.len());

        let response = self
            .client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .send()
            .await
            .map_err(|e| {
                error!("Request to {} failed: {}", url, e);
                AppError::Api(e.into())
            })?;

        if let Some(remaining) = response
            .headers()
            .get("X-RateLimit-Remaining")
            .and_then(|v| v.to_str().ok())
        {
            debug!("Rate limit remaining: {}", remaining);
            if remaining == "0" {
                warn!("NASA API rate limit exhausted for this key");
            }
        }

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!("Failed to read response body from {}: {}", url, e);
            AppError::Api(e.into())
        })?;

        if !status.is_success() {
            let message = extract_error_message(&body);
            error!(
                "API request to {} failed with status {}: {}",
                url, status, message
            );
            if status == reqwest::StatusCode::FORBIDDEN || status == reqwest::StatusCode::UNAUTHORIZED
            {
                error!("Received 401/403. Check NASA_API_KEY validity.");
            } else if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                error!("Received 429. DEMO_KEY is heavily rate limited; set NASA_API_KEY.");
            }
            return Err(AppError::Nasa {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            error!("Error parsing API response JSON from {}: {}", url, e);
            AppError::JsonParse(e.into())
        })
    }

    /// Fetches Astronomy Picture of the Day entries.
    ///
    /// Corresponds to the `/planetary/apod` endpoint. Single-date responses
    /// are normalized into a one-element list.
    pub async fn get_apod(&self, selection: &ApodSelection, thumbs: bool) -> Result<Vec<Apod>> {
        selection.validate()?;
        info!("Fetching APOD: {:?} (thumbs: {})", selection, thumbs);

        let mut params = vec![("thumbs", thumbs.to_string())];
        params.extend(selection.query_params());

        let payload: ApodPayload = self.get_json(APOD_PATH, &params).await?;
        let apods: Vec<Apod> = payload.into_records().into_iter().map(Apod::from).collect();

        debug!("Received {} APOD entries", apods.len());
        Ok(apods)
    }

    /// Fetches asteroids by closest approach date.
    ///
    /// Corresponds to `/neo/rest/v1/feed`. When `end` is omitted the
    /// service's own default window applies.
    pub async fn get_neo_feed(&self, start: NaiveDate, end: Option<NaiveDate>) -> Result<NeoFeed> {
        validate_feed_window(start, end)?;
        info!("Fetching asteroid feed from {} to {:?}", start, end);

        let mut params = vec![("start_date", start.format(DATE_FORMAT).to_string())];
        if let Some(end) = end {
            params.push(("end_date", end.format(DATE_FORMAT).to_string()));
        }

        let feed: NeoFeed = self.get_json(NEO_FEED_PATH, &params).await?;
        debug!("Received {} near-Earth objects", feed.element_count);
        Ok(feed)
    }

    /// Looks up a single asteroid by its SPK-ID (`/neo/rest/v1/neo/{id}`).
    pub async fn lookup_neo(&self, id: &str) -> Result<NearEarthObject> {
        let id = validate_asteroid_id(id)?;
        info!("Looking up asteroid {}", id);
        self.get_json(&format!("{}/{}", NEO_LOOKUP_PATH, id), &[])
            .await
    }

    /// Fetches Mars rover photos by sol, Earth date, or latest available.
    pub async fn get_rover_photos(&self, query: &RoverPhotoQuery) -> Result<Vec<MarsPhoto>> {
        let mut query = query.clone();
        query.validate()?;
        info!(
            "Fetching {} photos: {:?} camera={:?} page={:?}",
            query.rover, query.selection, query.camera, query.page
        );

        let path = query.path();
        let params = query.query_params();
        let photos = match query.selection {
            PhotoSelection::Latest => {
                let response: LatestPhotosResponse = self.get_json(&path, &params).await?;
                response.latest_photos
            },
            _ => {
                let response: MarsPhotosResponse = self.get_json(&path, &params).await?;
                response.photos
            },
        };

        debug!("Received {} photos from {}", photos.len(), query.rover);
        Ok(photos)
    }

    /// Fetches EPIC image metadata for a collection, either for a date or the most recent set.
    pub async fn get_epic_images(
        &self,
        collection: EpicCollection,
        date: Option<NaiveDate>,
    ) -> Result<Vec<EpicImage>> {
        info!("Fetching EPIC {} images for {:?}", collection, date);

        let path = match date {
            Some(date) => format!("/EPIC/api/{}/date/{}", collection, date.format(DATE_FORMAT)),
            None => format!("/EPIC/api/{}", collection),
        };

        let images: Vec<EpicImage> = self.get_json(&path, &[]).await?;
        debug!("Received {} EPIC images", images.len());
        Ok(images)
    }
}
