//! Mastodon API surface
//!
//! A thin, explicitly typed client for the handful of endpoints posting
//! touches: app registration, the password-grant token exchange, credential
//! verification, status creation and media upload. Every call has a
//! concrete request/response struct; anything other than a 2xx response is
//! a hard error carrying the failing URL and status. There is no retry.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::media::MediaFile;

mod http;
pub mod mock;

pub use http::ApiClient;

/// App name registered with the instance.
pub const CLIENT_NAME: &str = "tootcast";
/// Scopes requested for the access token.
pub const SCOPES: &str = "read write";
/// Out-of-band redirect URI used by the password grant.
pub const REDIRECT_URI: &str = "urn:ietf:wg:oauth:2.0:oob";
/// Client website sent with app registration.
pub const CLIENT_WEBSITE: &str = "https://github.com/tootcast/tootcast";

/// The API calls the posting flow depends on.
///
/// Implemented over HTTP by [`ApiClient`] and in memory by
/// [`mock::MockApi`] so the posting sequence is testable without a live
/// instance.
#[async_trait]
pub trait MastodonApi: Send + Sync {
    /// Register this client as an app on `instance`.
    async fn register_app(&self, instance: &str) -> Result<AppCredentials>;

    /// Exchange user credentials for an access token.
    async fn obtain_token(&self, instance: &str, request: &TokenRequest) -> Result<Token>;

    /// Confirm the token resolves to a live account.
    async fn verify_credentials(&self, instance: &str, token: &str) -> Result<CredentialAccount>;

    /// Publish one status.
    async fn post_status(
        &self,
        instance: &str,
        token: &str,
        request: &StatusRequest,
    ) -> Result<Status>;

    /// Upload one media file, returning the attachment to reference from a
    /// status.
    async fn upload_media(
        &self,
        instance: &str,
        token: &str,
        media: &MediaFile,
    ) -> Result<MediaAttachment>;
}

/// Body for `POST /api/v1/apps`.
#[derive(Debug, Clone, Serialize)]
pub struct AppRegistration {
    pub client_name: String,
    pub redirect_uris: String,
    pub scopes: String,
    pub website: String,
}

impl Default for AppRegistration {
    fn default() -> Self {
        Self {
            client_name: CLIENT_NAME.to_string(),
            redirect_uris: REDIRECT_URI.to_string(),
            scopes: SCOPES.to_string(),
            website: CLIENT_WEBSITE.to_string(),
        }
    }
}

/// App registration response.
#[derive(Debug, Clone, Deserialize)]
pub struct AppCredentials {
    pub client_id: String,
    pub client_secret: String,
}

/// Body for `POST /oauth/token`.
#[derive(Debug, Clone, Serialize)]
pub struct TokenRequest {
    pub grant_type: String,
    pub client_id: String,
    pub client_secret: String,
    pub username: String,
    pub password: String,
    pub scope: String,
    pub redirect_uri: String,
}

impl TokenRequest {
    /// Password-grant request for `email` against a registered app.
    pub fn password_grant(app: &AppCredentials, email: &str, password: &str) -> Self {
        Self {
            grant_type: "password".to_string(),
            client_id: app.client_id.clone(),
            client_secret: app.client_secret.clone(),
            username: email.to_string(),
            password: password.to_string(),
            scope: SCOPES.to_string(),
            redirect_uri: REDIRECT_URI.to_string(),
        }
    }
}

/// Token exchange response.
#[derive(Debug, Clone, Deserialize)]
pub struct Token {
    pub access_token: String,
}

/// The account behind a token, from `verify_credentials`.
#[derive(Debug, Clone, Deserialize)]
pub struct CredentialAccount {
    pub id: String,
    pub username: String,
    pub acct: String,
}

/// Who can see a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Unlisted,
}

/// Body for `POST /api/v1/statuses`.
#[derive(Debug, Clone, Serialize)]
pub struct StatusRequest {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_reply_to_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spoiler_text: Option<String>,
    pub visibility: Visibility,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub media_ids: Vec<String>,
}

/// A published status.
#[derive(Debug, Clone, Deserialize)]
pub struct Status {
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// An uploaded media attachment.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaAttachment {
    pub id: String,
}
