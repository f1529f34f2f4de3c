//! Error types for tootcast

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TootcastError>;

#[derive(Error, Debug)]
pub enum TootcastError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Failed to read content: {0}")]
    Content(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read account store: {0}")]
    ReadError(std::io::Error),

    #[error("Failed to parse account store: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Failed to write account store at {path}: {source}")]
    WriteError {
        path: String,
        source: std::io::Error,
    },

    #[error("Missing required path: {0}")]
    MissingPath(String),

    #[error("No accounts configured. Run with --add-account to log in")]
    NoAccounts,

    #[error("No such account: {0}")]
    UnknownAccount(String),

    #[error("Invalid account address '{0}'. Must be in format @username@instance")]
    InvalidAddress(String),
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Call to {url} returned {status}")]
    Status { url: String, status: u16 },

    #[error("Request to {url} failed: {message}")]
    Network { url: String, message: String },

    #[error("Failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },

    #[error("Failed to read media file {path}: {message}")]
    Media { path: String, message: String },

    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_formatting_invalid_input() {
        let error = TootcastError::InvalidInput("No content".to_string());
        assert_eq!(format!("{}", error), "Invalid input: No content");
    }

    #[test]
    fn test_error_message_formatting_api_status() {
        let error = TootcastError::Api(ApiError::Status {
            url: "https://example.social/api/v1/statuses".to_string(),
            status: 422,
        });
        let message = format!("{}", error);
        assert_eq!(
            message,
            "API error: Call to https://example.social/api/v1/statuses returned 422"
        );
    }

    #[test]
    fn test_error_message_formatting_unknown_account() {
        let error = TootcastError::Config(ConfigError::UnknownAccount(
            "@nobody@example.social".to_string(),
        ));
        let message = format!("{}", error);
        assert!(message.contains("Configuration error"));
        assert!(message.contains("@nobody@example.social"));
    }

    #[test]
    fn test_error_conversion_from_config_error() {
        let config_error = ConfigError::NoAccounts;
        let error: TootcastError = config_error.into();
        assert!(matches!(error, TootcastError::Config(_)));
    }

    #[test]
    fn test_error_conversion_from_api_error() {
        let api_error = ApiError::Network {
            url: "https://example.social/oauth/token".to_string(),
            message: "connection refused".to_string(),
        };
        let error: TootcastError = api_error.into();
        assert!(matches!(error, TootcastError::Api(_)));
    }

    #[test]
    fn test_network_error_carries_url() {
        let error = ApiError::Network {
            url: "https://example.social/api/v1/media".to_string(),
            message: "timed out".to_string(),
        };
        let message = format!("{}", error);
        assert!(message.contains("https://example.social/api/v1/media"));
        assert!(message.contains("timed out"));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_err() -> Result<()> {
            Err(TootcastError::InvalidInput("test".to_string()))
        }
        assert!(returns_err().is_err());
    }
}
