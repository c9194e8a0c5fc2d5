//! Error type for catalog operations
//!
//! The three domain outcomes (not found, already exists, reserved name) get
//! their own variants so callers can match on them; everything else the
//! server or transport reports is surfaced as-is.

use thiserror::Error;

use crate::resource_url::ResourceUrl;

/// Longest response body excerpt kept in an [`Error::Http`].
const BODY_EXCERPT_CHARS: usize = 200;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// 404 on fetch, update or delete.
    #[error("attribute not found: {0}")]
    AttributeNotFound(ResourceUrl),

    /// 409 on create. Carries the URL the attribute would have had.
    #[error("attribute already exists: {0}")]
    AttributeExists(ResourceUrl),

    /// Rejected before any request was sent.
    #[error("reserved attribute name: {0}")]
    ReservedAttributeName(String),

    #[error("malformed response from {url}: {source}")]
    MalformedResponse {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("HTTP {status} from {url}: {body}")]
    Http {
        status: u16,
        url: String,
        body: String,
    },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// `.` or `..` as a path segment; no URL can address it.
    #[error("invalid path segment: '{0}'")]
    InvalidPathSegment(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn http(status: u16, url: impl Into<String>, body: &str) -> Self {
        Self::Http {
            status,
            url: url.into(),
            body: body.chars().take(BODY_EXCERPT_CHARS).collect(),
        }
    }

    /// HTTP status behind this error, when the server produced one.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::AttributeNotFound(_) => Some(404),
            Self::AttributeExists(_) => Some(409),
            Self::Http { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            Self::ReservedAttributeName(_)
            | Self::MalformedResponse { .. }
            | Self::InvalidUrl(_)
            | Self::InvalidPathSegment(_)
            | Self::Config(_) => None,
        }
    }
}
