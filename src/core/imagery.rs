use crate::core::maps;
use crate::domain::model::{Coordinate, Venue};
use crate::domain::ports::PlacePhotoLookup;
use crate::utils::error::{PlannerError, Result};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::OnceCell;

pub const PHOTO_SEARCH_RADIUS_M: u32 = 100;
pub const STREET_VIEW_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/streetview";

pub fn street_view_url(coordinate: Coordinate, api_key: &str) -> String {
    format!(
        "{}?size=400x200&location={},{}&key={}",
        STREET_VIEW_ENDPOINT,
        coordinate.lat(),
        coordinate.lng(),
        api_key
    )
}

#[derive(Debug, Clone, PartialEq)]
pub enum LocationImage {
    PlacePhoto(String),
    StreetView(String),
}

impl LocationImage {
    pub fn url(&self) -> &str {
        match self {
            LocationImage::PlacePhoto(url) | LocationImage::StreetView(url) => url,
        }
    }
}

/// Limits for bringing the photo client up.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadPolicy {
    pub max_attempts: u32,
    pub attempt_timeout: Duration,
    pub retry_interval: Duration,
}

impl Default for LoadPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            attempt_timeout: Duration::from_secs(5),
            retry_interval: Duration::from_millis(100),
        }
    }
}

/// Finds a picture for a venue: a nearby place photo when one exists, the
/// street-level static image otherwise.
pub struct LocationImages<P: PlacePhotoLookup> {
    lookup: P,
    api_key: String,
    policy: LoadPolicy,
    loaded: OnceCell<std::result::Result<(), String>>,
}

impl<P: PlacePhotoLookup> LocationImages<P> {
    pub fn new(lookup: P, api_key: impl Into<String>, policy: LoadPolicy) -> Self {
        Self {
            lookup,
            api_key: api_key.into(),
            policy,
            loaded: OnceCell::new(),
        }
    }

    /// Loads the photo client once per process. Concurrent callers wait on
    /// the same attempt; a terminal failure is remembered and not retried.
    pub async fn ensure_loaded(&self) -> Result<()> {
        self.loaded
            .get_or_init(|| self.load_with_retries())
            .await
            .clone()
            .map_err(|message| PlannerError::PhotoLibraryError { message })
    }

    async fn load_with_retries(&self) -> std::result::Result<(), String> {
        let mut last_error = String::from("no load attempt was made");

        for attempt in 1..=self.policy.max_attempts {
            match tokio::time::timeout(self.policy.attempt_timeout, self.lookup.load()).await {
                Ok(Ok(())) => {
                    tracing::debug!("📷 Photo client ready after {} attempt(s)", attempt);
                    return Ok(());
                }
                Ok(Err(e)) => last_error = e.to_string(),
                Err(_) => {
                    last_error = format!("load timed out after {:?}", self.policy.attempt_timeout)
                }
            }

            tracing::warn!(
                "📷 Photo client load attempt {}/{} failed: {}",
                attempt,
                self.policy.max_attempts,
                last_error
            );

            if attempt < self.policy.max_attempts {
                tokio::time::sleep(self.policy.retry_interval).await;
            }
        }

        tracing::error!("❌ Giving up on the photo client: {}", last_error);
        Err(format!(
            "gave up after {} attempt(s): {}",
            self.policy.max_attempts, last_error
        ))
    }

    pub fn street_view(&self, coordinate: Coordinate) -> LocationImage {
        LocationImage::StreetView(street_view_url(coordinate, &self.api_key))
    }

    /// Images for every venue whose map reference resolves, keyed by venue id.
    pub async fn for_venues(&self, venues: &[Venue]) -> HashMap<String, LocationImage> {
        let mut images = HashMap::new();
        for venue in venues {
            if let Some(coordinate) = maps::resolve(&venue.map) {
                images.insert(venue.id.clone(), self.image_for(coordinate).await);
            }
        }
        images
    }

    /// Never fails; every error path ends on the street view image.
    pub async fn image_for(&self, coordinate: Coordinate) -> LocationImage {
        if let Err(e) = self.ensure_loaded().await {
            tracing::warn!("Photo client unavailable, using Street View: {}", e);
            return self.street_view(coordinate);
        }

        let lookup = self.lookup.nearby_photos(coordinate, PHOTO_SEARCH_RADIUS_M);
        match tokio::time::timeout(self.policy.attempt_timeout, lookup).await {
            Ok(Ok(photos)) => match photos.into_iter().next() {
                Some(url) => LocationImage::PlacePhoto(url),
                None => {
                    tracing::debug!("No place photos found near {}, falling back to Street View", coordinate);
                    self.street_view(coordinate)
                }
            },
            Ok(Err(e)) => {
                tracing::error!("Error fetching place photo near {}: {}", coordinate, e);
                self.street_view(coordinate)
            }
            Err(_) => {
                tracing::warn!("Place photo lookup near {} timed out", coordinate);
                self.street_view(coordinate)
            }
        }
    }
}
