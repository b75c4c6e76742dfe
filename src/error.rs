//! Error types for portrait transformation.

use std::time::Duration;

/// Broad failure classes shown to the user.
///
/// Every [`StudioError`] falls into exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The local file could not be read or decoded as an image.
    DecodeFailure,
    /// The outbound call failed (network, auth, quota, server error).
    TransportFailure,
    /// The service answered without any image content.
    NoImageReturned,
    /// The style selector is outside the preset set.
    InvalidStyle,
}

/// Errors that can occur while loading or transforming a portrait.
#[derive(Debug, thiserror::Error)]
pub enum StudioError {
    /// Input could not be decoded as an image.
    #[error("failed to decode: {0}")]
    Decode(String),

    /// I/O error while reading a local file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// API key missing or rejected.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Sanitized response body.
        message: String,
    },

    /// Rate limit or quota exceeded.
    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited {
        /// Server hint from the `retry-after` header.
        retry_after: Option<Duration>,
    },

    /// Network or HTTP error.
    #[cfg(feature = "gemini")]
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The transform task died before reporting a result.
    #[error("transform aborted: {0}")]
    Aborted(String),

    /// Content was blocked by safety filters.
    #[error("content blocked: {0}")]
    ContentBlocked(String),

    /// The response carried no inline image part.
    #[error("no image returned: {0}")]
    NoImageReturned(String),

    /// Style selector is not one of the presets.
    #[error("invalid style: {0}")]
    InvalidStyle(String),
}

impl StudioError {
    /// Returns the failure class of this error.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Decode(_) | Self::Io(_) => FailureKind::DecodeFailure,
            Self::Auth(_) | Self::Api { .. } | Self::RateLimited { .. } | Self::Json(_)
            | Self::Aborted(_) => {
                FailureKind::TransportFailure
            }
            #[cfg(feature = "gemini")]
            Self::Network(_) => FailureKind::TransportFailure,
            Self::ContentBlocked(_) | Self::NoImageReturned(_) => FailureKind::NoImageReturned,
            Self::InvalidStyle(_) => FailureKind::InvalidStyle,
        }
    }
}

/// Result type alias for portrait operations.
pub type Result<T> = std::result::Result<T, StudioError>;

const MAX_ERROR_MESSAGE_LEN: usize = 300;

/// Redacts API keys and truncates an upstream error body.
#[cfg_attr(not(feature = "gemini"), allow(dead_code))]
pub(crate) fn sanitize_error_message(text: &str) -> String {
    let redacted: Vec<String> = text
        .split_whitespace()
        .map(|word| {
            let token = word.trim_matches(|c: char| !c.is_ascii_alphanumeric() && c != '_' && c != '-');
            // Google API keys start with "AIza" and are 39 chars long.
            if token.starts_with("AIza") && token.len() >= 30 {
                word.replace(token, "[REDACTED]")
            } else {
                word.to_string()
            }
        })
        .collect();
    let joined = redacted.join(" ");

    if joined.chars().count() > MAX_ERROR_MESSAGE_LEN {
        let truncated: String = joined.chars().take(MAX_ERROR_MESSAGE_LEN).collect();
        format!("{truncated}...")
    } else {
        joined
    }
}

/// Reads a `retry-after` header given in whole seconds.
#[cfg(feature = "gemini")]
pub(crate) fn parse_retry_after(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    headers
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}
