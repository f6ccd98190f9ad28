use crate::domain::model::Coordinate;
use crate::domain::ports::PlacePhotoLookup;
use crate::utils::error::{PlannerError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

pub const GOOGLE_MAPS_BASE_URL: &str = "https://maps.googleapis.com";
pub const PHOTO_MAX_WIDTH: u32 = 400;

#[derive(Debug, Deserialize)]
struct NearbySearch {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    results: Vec<Place>,
}

#[derive(Debug, Deserialize)]
struct Place {
    #[serde(default)]
    photos: Vec<PlacePhoto>,
}

#[derive(Debug, Deserialize)]
struct PlacePhoto {
    photo_reference: String,
}

/// Nearby search over the Places web service.
#[derive(Debug, Clone)]
pub struct GooglePlaces {
    client: Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl GooglePlaces {
    pub fn new(api_key: impl Into<String>, timeout_seconds: u64) -> Self {
        Self::with_base_url(GOOGLE_MAPS_BASE_URL, api_key, timeout_seconds)
    }

    pub fn with_base_url(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout_seconds: u64,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(timeout_seconds),
        }
    }

    pub fn photo_url(&self, photo_reference: &str) -> String {
        format!(
            "{}/maps/api/place/photo?maxwidth={}&photo_reference={}&key={}",
            self.base_url, PHOTO_MAX_WIDTH, photo_reference, self.api_key
        )
    }
}

#[async_trait]
impl PlacePhotoLookup for GooglePlaces {
    async fn load(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(PlannerError::PhotoLibraryError {
                message: "Google Maps API key is empty".to_string(),
            });
        }
        url::Url::parse(&self.base_url).map_err(|e| PlannerError::PhotoLibraryError {
            message: format!("invalid Places base URL '{}': {}", self.base_url, e),
        })?;
        Ok(())
    }

    async fn nearby_photos(&self, coordinate: Coordinate, radius_m: u32) -> Result<Vec<String>> {
        let response = self
            .client
            .get(format!("{}/maps/api/place/nearbysearch/json", self.base_url))
            .query(&[
                ("location", coordinate.to_string()),
                ("radius", radius_m.to_string()),
                ("key", self.api_key.clone()),
            ])
            .timeout(self.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(PlannerError::PhotoLibraryError {
                message: format!("nearby search failed with status: {}", response.status()),
            });
        }

        let search: NearbySearch = response.json().await?;
        match search.status.as_str() {
            "OK" | "ZERO_RESULTS" => {}
            status => {
                return Err(PlannerError::PhotoLibraryError {
                    message: search
                        .error_message
                        .map(|m| format!("{}: {}", status, m))
                        .unwrap_or_else(|| status.to_string()),
                })
            }
        }

        // Only the nearest place counts.
        let photos: Vec<String> = search
            .results
            .first()
            .and_then(|place| place.photos.first())
            .map(|photo| self.photo_url(&photo.photo_reference))
            .into_iter()
            .collect();
        tracing::debug!("📷 {} place photo(s) near {}", photos.len(), coordinate);
        Ok(photos)
    }
}
