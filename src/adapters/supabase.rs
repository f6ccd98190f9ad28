use crate::domain::model::{AuthSession, User, Venue, VenueDraft};
use crate::domain::ports::{AuthProvider, ConfigProvider, SignUpOutcome, VenueStore};
use crate::utils::error::{PlannerError, Result};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const VENUES_TABLE: &str = "venues";
pub const VENUE_COLUMNS: &str = "id,region,name,price,comment,map,external_link,created_at";

/// Thin REST client for a Supabase project: base URL, anon key and the
/// headers every call carries.
#[derive(Debug, Clone)]
pub struct SupabaseClient {
    client: Client,
    base_url: String,
    anon_key: String,
    timeout: Duration,
}

impl SupabaseClient {
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>, timeout_seconds: u64) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
            timeout: Duration::from_secs(timeout_seconds),
        }
    }

    pub fn from_config(config: &impl ConfigProvider) -> Self {
        Self::new(
            config.supabase_url(),
            config.supabase_anon_key(),
            config.request_timeout_seconds(),
        )
    }

    fn request(&self, method: Method, path: &str, bearer: Option<&str>) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("📡 {} {}", method, url);
        self.client
            .request(method, url)
            .header("apikey", &self.anon_key)
            .bearer_auth(bearer.unwrap_or(self.anon_key.as_str()))
            .timeout(self.timeout)
    }
}

/// Pulls a readable message out of a Supabase error body. Auth answers use
/// `error_description` or `msg`, the REST layer uses `message`.
pub fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| {
            ["error_description", "msg", "message", "error"]
                .iter()
                .find_map(|key| json.get(*key).and_then(|v| v.as_str()).map(str::to_string))
        })
        .unwrap_or_else(|| match body.trim() {
            "" => status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string(),
            text => text.to_string(),
        })
}

async fn store_failure(response: Response) -> PlannerError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    PlannerError::StoreError {
        status: status.as_u16(),
        message: error_message(status, &body),
    }
}

async fn auth_failure(response: Response) -> PlannerError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    PlannerError::AuthError {
        message: error_message(status, &body),
    }
}

/// The `venues` table over PostgREST.
#[derive(Debug, Clone)]
pub struct SupabaseVenueStore {
    api: SupabaseClient,
    access_token: Option<String>,
}

impl SupabaseVenueStore {
    pub fn new(api: SupabaseClient) -> Self {
        Self {
            api,
            access_token: None,
        }
    }

    /// Row level security sees the signed-in user instead of the anon role.
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    fn table(&self, method: Method) -> RequestBuilder {
        self.api.request(
            method,
            &format!("/rest/v1/{}", VENUES_TABLE),
            self.access_token.as_deref(),
        )
    }

    fn row(&self, method: Method, id: &str) -> RequestBuilder {
        self.table(method).query(&[("id", format!("eq.{}", id))])
    }
}

#[async_trait]
impl VenueStore for SupabaseVenueStore {
    async fn list(&self) -> Result<Vec<Venue>> {
        let response = self
            .table(Method::GET)
            .query(&[("select", VENUE_COLUMNS)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(store_failure(response).await);
        }
        Ok(response.json::<Vec<Venue>>().await?)
    }

    async fn insert(&self, draft: &VenueDraft) -> Result<()> {
        let response = self
            .table(Method::POST)
            .header("Prefer", "return=minimal")
            .json(&[draft])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(store_failure(response).await);
        }
        Ok(())
    }

    async fn update(&self, id: &str, draft: &VenueDraft) -> Result<()> {
        let response = self
            .row(Method::PATCH, id)
            .header("Prefer", "return=minimal")
            .json(draft)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(store_failure(response).await);
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let response = self.row(Method::DELETE, id).send().await?;

        if !response.status().is_success() {
            return Err(store_failure(response).await);
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize, Deserialize)]
struct TokenResponse {
    access_token: String,
    user: User,
}

impl From<TokenResponse> for AuthSession {
    fn from(token: TokenResponse) -> Self {
        AuthSession {
            access_token: token.access_token,
            user: token.user,
        }
    }
}

/// Password authentication against GoTrue. A signed-in session can be kept
/// in a JSON file so the next run starts signed in.
#[derive(Debug, Clone)]
pub struct SupabaseAuth {
    api: SupabaseClient,
    session_file: Option<PathBuf>,
}

impl SupabaseAuth {
    pub fn new(api: SupabaseClient) -> Self {
        Self {
            api,
            session_file: None,
        }
    }

    pub fn with_session_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_file = Some(path.into());
        self
    }

    fn persist(&self, session: &AuthSession) -> Result<()> {
        if let Some(path) = &self.session_file {
            let stored = TokenResponse {
                access_token: session.access_token.clone(),
                user: session.user.clone(),
            };
            write_private(path, &serde_json::to_vec_pretty(&stored)?)?;
            tracing::debug!("Session saved to {}", path.display());
        }
        Ok(())
    }

    fn forget(&self) -> Result<()> {
        match &self.session_file {
            Some(path) if path.exists() => Ok(std::fs::remove_file(path)?),
            _ => Ok(()),
        }
    }
}

/// Writes a file only the owner can read, tightening an existing one.
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut options = std::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
        options.mode(0o600);
        let mut file = options.open(path)?;
        file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
        file.write_all(contents)
    }
    #[cfg(not(unix))]
    {
        options.open(path)?.write_all(contents)
    }
}

#[async_trait]
impl AuthProvider for SupabaseAuth {
    async fn current_session(&self) -> Result<Option<AuthSession>> {
        let Some(path) = self.session_file.as_ref().filter(|p| p.exists()) else {
            return Ok(None);
        };
        let content = std::fs::read(path)?;
        let stored: TokenResponse = serde_json::from_slice(&content)?;
        Ok(Some(stored.into()))
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthSession> {
        let response = self
            .api
            .request(Method::POST, "/auth/v1/token", None)
            .query(&[("grant_type", "password")])
            .json(&Credentials { email, password })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(auth_failure(response).await);
        }

        let session: AuthSession = response.json::<TokenResponse>().await?.into();
        self.persist(&session)?;
        Ok(session)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome> {
        let response = self
            .api
            .request(Method::POST, "/auth/v1/signup", None)
            .json(&Credentials { email, password })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(auth_failure(response).await);
        }

        // With email confirmation on, the body is the bare user and no session
        let body: serde_json::Value = response.json().await?;
        if body.get("access_token").is_some() {
            let session: AuthSession = serde_json::from_value::<TokenResponse>(body)?.into();
            self.persist(&session)?;
            Ok(SignUpOutcome {
                user: session.user.clone(),
                session: Some(session),
            })
        } else {
            Ok(SignUpOutcome {
                user: serde_json::from_value(body)?,
                session: None,
            })
        }
    }

    async fn sign_out(&self, access_token: &str) -> Result<()> {
        let response = self
            .api
            .request(Method::POST, "/auth/v1/logout", Some(access_token))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(auth_failure(response).await);
        }
        self.forget()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use tempfile::TempDir;

    fn venue_json(id: i64, name: &str, price: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "region": "Bourgogne",
            "name": name,
            "price": price,
            "comment": null,
            "map": "https://www.google.com/maps/place/X/@47.0644992,4.8175578,17z",
            "external_link": null,
            "created_at": "2025-05-15T10:00:00+00:00"
        })
    }

    fn user_json(confirmed: bool) -> serde_json::Value {
        serde_json::json!({
            "id": "8d0fd2b3-9ca7-4d9e-a95f-9e13dde4b4f2",
            "aud": "authenticated",
            "email": "marie@example.fr",
            "confirmed_at": if confirmed { serde_json::json!("2025-05-01T08:00:00Z") } else { serde_json::Value::Null }
        })
    }

    #[test]
    fn test_error_message_fields() {
        let status = reqwest::StatusCode::BAD_REQUEST;
        assert_eq!(
            error_message(status, r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#),
            "Invalid login credentials"
        );
        assert_eq!(error_message(status, r#"{"code":422,"msg":"Password should be at least 6 characters"}"#), "Password should be at least 6 characters");
        assert_eq!(error_message(status, r#"{"code":"42501","message":"permission denied"}"#), "permission denied");
        assert_eq!(error_message(status, ""), "Bad Request");
        assert_eq!(error_message(status, "upstream timeout"), "upstream timeout");
    }

    #[tokio::test]
    async fn test_list_venues_with_user_token() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/rest/v1/venues")
                .query_param("select", VENUE_COLUMNS)
                .header("apikey", "anon-key")
                .header("Authorization", "Bearer user-token");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!([
                    venue_json(1, "Château de Savigny", "4200"),
                    venue_json(2, "Domaine des Prés", "3500")
                ]));
        });

        let store = SupabaseVenueStore::new(SupabaseClient::new(server.base_url(), "anon-key", 5))
            .with_access_token("user-token");
        let venues = store.list().await.unwrap();

        api_mock.assert();
        assert_eq!(venues.len(), 2);
        assert_eq!(venues[0].id, "1");
        assert_eq!(venues[0].comment, "");
        assert_eq!(venues[1].name, "Domaine des Prés");
    }

    #[tokio::test]
    async fn test_anon_key_is_used_without_user() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/rest/v1/venues")
                .header("Authorization", "Bearer anon-key");
            then.status(200).json_body(serde_json::json!([]));
        });

        let store = SupabaseVenueStore::new(SupabaseClient::new(server.base_url(), "anon-key", 5));
        assert!(store.list().await.unwrap().is_empty());
        api_mock.assert();
    }

    #[tokio::test]
    async fn test_insert_sends_single_row_array() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/rest/v1/venues")
                .header("Prefer", "return=minimal")
                .json_body(serde_json::json!([{
                    "region": "Paris",
                    "name": "Le Grand Hôtel",
                    "price": "5000",
                    "comment": "",
                    "map": "48.8566,2.3522",
                    "external_link": null
                }]));
            then.status(201);
        });

        let store = SupabaseVenueStore::new(SupabaseClient::new(server.base_url(), "anon-key", 5));
        let draft = VenueDraft {
            region: "Paris".to_string(),
            name: "Le Grand Hôtel".to_string(),
            price: "5000".to_string(),
            map: "48.8566,2.3522".to_string(),
            ..VenueDraft::default()
        };
        store.insert(&draft).await.unwrap();
        api_mock.assert();
    }

    #[tokio::test]
    async fn test_update_and_delete_filter_by_id() {
        let server = MockServer::start();
        let update_mock = server.mock(|when, then| {
            when.method(httpmock::Method::PATCH)
                .path("/rest/v1/venues")
                .query_param("id", "eq.42");
            then.status(204);
        });
        let delete_mock = server.mock(|when, then| {
            when.method(DELETE)
                .path("/rest/v1/venues")
                .query_param("id", "eq.42");
            then.status(204);
        });

        let store = SupabaseVenueStore::new(SupabaseClient::new(server.base_url(), "anon-key", 5));
        store.update("42", &VenueDraft::default()).await.unwrap();
        store.delete("42").await.unwrap();

        update_mock.assert();
        delete_mock.assert();
    }

    #[tokio::test]
    async fn test_store_rejection_carries_status_and_message() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(DELETE).path("/rest/v1/venues");
            then.status(403).json_body(serde_json::json!({
                "code": "42501",
                "message": "permission denied for table venues"
            }));
        });

        let store = SupabaseVenueStore::new(SupabaseClient::new(server.base_url(), "anon-key", 5));
        match store.delete("1").await.unwrap_err() {
            PlannerError::StoreError { status, message } => {
                assert_eq!(status, 403);
                assert_eq!(message, "permission denied for table venues");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_sign_in_persists_session() {
        let server = MockServer::start();
        let token_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/auth/v1/token")
                .query_param("grant_type", "password")
                .json_body(serde_json::json!({"email": "marie@example.fr", "password": "secret"}));
            then.status(200).json_body(serde_json::json!({
                "access_token": "jwt",
                "token_type": "bearer",
                "expires_in": 3600,
                "refresh_token": "refresh",
                "user": user_json(true)
            }));
        });
        let logout_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/auth/v1/logout")
                .header("Authorization", "Bearer jwt");
            then.status(204);
        });

        let dir = TempDir::new().unwrap();
        let session_file = dir.path().join("session.json");
        let auth = SupabaseAuth::new(SupabaseClient::new(server.base_url(), "anon-key", 5))
            .with_session_file(&session_file);

        assert_eq!(auth.current_session().await.unwrap(), None);

        let session = auth.sign_in_with_password("marie@example.fr", "secret").await.unwrap();
        token_mock.assert();
        assert_eq!(session.access_token, "jwt");
        assert!(session.user.is_confirmed());
        assert_eq!(auth.current_session().await.unwrap(), Some(session));

        auth.sign_out("jwt").await.unwrap();
        logout_mock.assert();
        assert!(!session_file.exists());
        assert_eq!(auth.current_session().await.unwrap(), None);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_session_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/auth/v1/token");
            then.status(200).json_body(serde_json::json!({
                "access_token": "jwt",
                "user": user_json(true)
            }));
        });

        let dir = TempDir::new().unwrap();
        let session_file = dir.path().join("session.json");
        std::fs::write(&session_file, "{}").unwrap();
        std::fs::set_permissions(&session_file, std::fs::Permissions::from_mode(0o644)).unwrap();

        let auth = SupabaseAuth::new(SupabaseClient::new(server.base_url(), "anon-key", 5))
            .with_session_file(&session_file);
        auth.sign_in_with_password("marie@example.fr", "secret").await.unwrap();

        let mode = std::fs::metadata(&session_file).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(auth.current_session().await.unwrap().map(|s| s.access_token).as_deref(), Some("jwt"));
    }

    #[tokio::test]
    async fn test_sign_in_failure_surfaces_description() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/auth/v1/token");
            then.status(400).json_body(serde_json::json!({
                "error": "invalid_grant",
                "error_description": "Invalid login credentials"
            }));
        });

        let auth = SupabaseAuth::new(SupabaseClient::new(server.base_url(), "anon-key", 5));
        let err = auth.sign_in_with_password("marie@example.fr", "wrong").await.unwrap_err();
        assert_eq!(err.user_friendly_message(), "Invalid login credentials");
    }

    #[tokio::test]
    async fn test_sign_up_without_session() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/auth/v1/signup");
            then.status(200).json_body(user_json(false));
        });

        let auth = SupabaseAuth::new(SupabaseClient::new(server.base_url(), "anon-key", 5));
        let outcome = auth.sign_up("marie@example.fr", "secret").await.unwrap();
        assert_eq!(outcome.user.email, "marie@example.fr");
        assert!(!outcome.user.is_confirmed());
        assert!(outcome.session.is_none());
    }
}
