//! Recording API double
//!
//! Lives outside `cfg(test)` so integration tests in dependent crates can
//! drive the posting sequence without a live instance.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{ApiError, Result};
use crate::media::MediaFile;

use super::{
    AppCredentials, CredentialAccount, MastodonApi, MediaAttachment, Status, StatusRequest, Token,
    TokenRequest,
};

/// In-memory [`MastodonApi`] that records every call.
#[derive(Default)]
pub struct MockApi {
    /// Status requests received, in order.
    statuses: Mutex<Vec<StatusRequest>>,
    /// Media file names received, in order.
    uploads: Mutex<Vec<String>>,
    /// When set, the nth status post (0-based) fails with a 500.
    fail_status_at: Option<usize>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mock whose `index`th status post fails with a server error.
    pub fn failing_at(index: usize) -> Self {
        Self {
            fail_status_at: Some(index),
            ..Self::default()
        }
    }

    /// The status requests accepted so far.
    pub fn posted(&self) -> Vec<StatusRequest> {
        self.statuses.lock().unwrap().clone()
    }

    /// Names of the media files uploaded so far.
    pub fn uploaded(&self) -> Vec<String> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl MastodonApi for MockApi {
    async fn register_app(&self, _instance: &str) -> Result<AppCredentials> {
        Ok(AppCredentials {
            client_id: "mock-client-id".to_string(),
            client_secret: "mock-client-secret".to_string(),
        })
    }

    async fn obtain_token(&self, _instance: &str, _request: &TokenRequest) -> Result<Token> {
        Ok(Token {
            access_token: "mock-token".to_string(),
        })
    }

    async fn verify_credentials(&self, _instance: &str, _token: &str) -> Result<CredentialAccount> {
        Ok(CredentialAccount {
            id: "1".to_string(),
            username: "mock".to_string(),
            acct: "mock".to_string(),
        })
    }

    async fn post_status(
        &self,
        instance: &str,
        _token: &str,
        request: &StatusRequest,
    ) -> Result<Status> {
        let mut statuses = self.statuses.lock().unwrap();
        if self.fail_status_at == Some(statuses.len()) {
            return Err(ApiError::Status {
                url: format!("https://{}/api/v1/statuses", instance),
                status: 500,
            }
            .into());
        }
        statuses.push(request.clone());
        let id = format!("status-{}", statuses.len());
        Ok(Status {
            url: Some(format!("https://{}/web/statuses/{}", instance, id)),
            id,
        })
    }

    async fn upload_media(
        &self,
        _instance: &str,
        _token: &str,
        media: &MediaFile,
    ) -> Result<MediaAttachment> {
        let mut uploads = self.uploads.lock().unwrap();
        uploads.push(media.name.clone());
        Ok(MediaAttachment {
            id: format!("media-{}", uploads.len()),
        })
    }
}
