use crate::domain::model::{AuthSession, Coordinate, User, Venue, VenueDraft};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Persistent table of venue records keyed by id.
#[async_trait]
pub trait VenueStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Venue>>;
    async fn insert(&self, draft: &VenueDraft) -> Result<()>;
    async fn update(&self, id: &str, draft: &VenueDraft) -> Result<()>;
    async fn delete(&self, id: &str) -> Result<()>;
}

/// Result of a sign-up: the provider may hold back the session until the
/// email address is confirmed.
#[derive(Debug, Clone, PartialEq)]
pub struct SignUpOutcome {
    pub user: User,
    pub session: Option<AuthSession>,
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// A session persisted by an earlier sign-in, if any.
    async fn current_session(&self) -> Result<Option<AuthSession>>;
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthSession>;
    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome>;
    async fn sign_out(&self, access_token: &str) -> Result<()>;
}

#[async_trait]
pub trait PlacePhotoLookup: Send + Sync {
    /// Prepares the client library. Called once per process by the imagery
    /// helper before the first lookup.
    async fn load(&self) -> Result<()> {
        Ok(())
    }

    /// Photo URLs of the nearest place within `radius_m` of `coordinate`.
    /// Empty when that place has no photo.
    async fn nearby_photos(&self, coordinate: Coordinate, radius_m: u32) -> Result<Vec<String>>;
}

pub trait ConfigProvider: Send + Sync {
    fn supabase_url(&self) -> &str;
    fn supabase_anon_key(&self) -> &str;
    fn google_maps_api_key(&self) -> &str;
    fn request_timeout_seconds(&self) -> u64;
}
