//! HTTP implementation of the API surface

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::{ApiError, Result};
use crate::media::MediaFile;

use super::{
    AppCredentials, AppRegistration, CredentialAccount, MastodonApi, MediaAttachment, Status,
    StatusRequest, Token, TokenRequest,
};

/// reqwest-backed client. One instance serves any number of calls; the
/// target instance is passed per call.
pub struct ApiClient {
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new() -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("tootcast/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Client(e.to_string()))?;
        Ok(Self { http })
    }

    async fn post_json<B, T>(&self, url: String, body: &B, token: Option<&str>) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut request = self.http.post(&url).json(body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await.map_err(|e| ApiError::Network {
            url: url.clone(),
            message: e.to_string(),
        })?;
        decode(url, response).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String, token: Option<&str>) -> Result<T> {
        let mut request = self.http.get(&url);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await.map_err(|e| ApiError::Network {
            url: url.clone(),
            message: e.to_string(),
        })?;
        decode(url, response).await
    }
}

/// Build the full endpoint URL, defaulting bare instance names to https.
/// An explicit `http://` prefix survives for local instances.
fn endpoint(instance: &str, path: &str) -> String {
    if instance.starts_with("http://") || instance.starts_with("https://") {
        format!("{}{}", instance.trim_end_matches('/'), path)
    } else {
        format!("https://{}{}", instance.trim_end_matches('/'), path)
    }
}

async fn decode<T: DeserializeOwned>(url: String, response: reqwest::Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::Status {
            url,
            status: status.as_u16(),
        }
        .into());
    }
    Ok(response.json().await.map_err(|e| ApiError::Decode {
        url,
        message: e.to_string(),
    })?)
}

#[async_trait]
impl MastodonApi for ApiClient {
    async fn register_app(&self, instance: &str) -> Result<AppCredentials> {
        let url = endpoint(instance, "/api/v1/apps");
        debug!("registering app at {}", url);
        self.post_json(url, &AppRegistration::default(), None).await
    }

    async fn obtain_token(&self, instance: &str, request: &TokenRequest) -> Result<Token> {
        let url = endpoint(instance, "/oauth/token");
        debug!("requesting token from {}", url);
        self.post_json(url, request, None).await
    }

    async fn verify_credentials(&self, instance: &str, token: &str) -> Result<CredentialAccount> {
        let url = endpoint(instance, "/api/v1/accounts/verify_credentials");
        debug!("verifying credentials at {}", url);
        self.get_json(url, Some(token)).await
    }

    async fn post_status(
        &self,
        instance: &str,
        token: &str,
        request: &StatusRequest,
    ) -> Result<Status> {
        let url = endpoint(instance, "/api/v1/statuses");
        debug!("posting status to {}", url);
        self.post_json(url, request, Some(token)).await
    }

    async fn upload_media(
        &self,
        instance: &str,
        token: &str,
        media: &MediaFile,
    ) -> Result<MediaAttachment> {
        let url = endpoint(instance, "/api/v1/media");
        let bytes = tokio::fs::read(&media.path)
            .await
            .map_err(|e| ApiError::Media {
                path: media.path.display().to_string(),
                message: e.to_string(),
            })?;

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(media.name.clone())
            .mime_str(media.mime.as_str())
            .map_err(|e| ApiError::Client(e.to_string()))?;
        let mut form = reqwest::multipart::Form::new().part("file", part);
        if let Some(description) = &media.description {
            form = form.text("description", description.clone());
        }

        debug!("uploading {} to {}", media.name, url);
        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ApiError::Network {
                url: url.clone(),
                message: e.to_string(),
            })?;
        decode(url, response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_defaults_to_https() {
        assert_eq!(
            endpoint("example.social", "/api/v1/statuses"),
            "https://example.social/api/v1/statuses"
        );
    }

    #[test]
    fn test_endpoint_preserves_explicit_scheme() {
        assert_eq!(
            endpoint("http://localhost:3000", "/oauth/token"),
            "http://localhost:3000/oauth/token"
        );
        assert_eq!(
            endpoint("https://example.social", "/api/v1/apps"),
            "https://example.social/api/v1/apps"
        );
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        assert_eq!(
            endpoint("example.social/", "/api/v1/media"),
            "https://example.social/api/v1/media"
        );
    }

    #[test]
    fn test_client_builds() {
        assert!(ApiClient::new().is_ok());
    }
}
