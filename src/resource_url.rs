//! Resource addresses
//!
//! A [`ResourceUrl`] is an API base (origin + versioned base path) plus the
//! resource path below it as a list of segments, e.g.
//! `["datasets", "7", "attributes", "name"]`. Segments are kept verbatim and
//! percent-encoded one at a time when the absolute URL is built, so a name
//! containing `/`, `?` or `#` stays a single segment. Values are immutable;
//! [`ResourceUrl::join`] returns a new address.

use std::fmt;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceUrl {
    base: url::Url,
    segments: Vec<String>,
}

impl ResourceUrl {
    /// Build an address from an API base and a `/`-separated resource path.
    ///
    /// The base always ends up with a trailing `/` and no query or fragment;
    /// empty segments in `path` are dropped.
    pub fn new(mut base: url::Url, path: &str) -> Self {
        base.set_query(None);
        base.set_fragment(None);
        if !base.path().ends_with('/') {
            let with_slash = format!("{}/", base.path());
            base.set_path(&with_slash);
        }

        Self {
            base,
            segments: path
                .split('/')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    /// Parse an absolute API base and attach `path` to it.
    pub fn parse(base: &str, path: &str) -> Result<Self> {
        Ok(Self::new(url::Url::parse(base)?, path))
    }

    pub fn base(&self) -> &url::Url {
        &self.base
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Unencoded resource path relative to the API base, without a leading slash.
    pub fn path(&self) -> String {
        self.segments.join("/")
    }

    /// Append one path segment. `segment` is taken literally, `/` included.
    pub fn join(&self, segment: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.to_string());

        Self {
            base: self.base.clone(),
            segments,
        }
    }

    /// Absolute URL for the transport.
    ///
    /// Fails with [`Error::InvalidPathSegment`] for `.` and `..`, which every
    /// URL parser resolves away even when percent-encoded.
    pub fn to_url(&self) -> Result<url::Url> {
        if let Some(segment) = self.segments.iter().find(|s| is_dot_segment(s)) {
            return Err(Error::InvalidPathSegment(segment.clone()));
        }
        Ok(url::Url::parse(&self.to_string())?)
    }

    fn encoded_path(&self) -> String {
        self.segments
            .iter()
            .map(|s| urlencoding::encode(s).into_owned())
            .collect::<Vec<_>>()
            .join("/")
    }
}

fn is_dot_segment(segment: &str) -> bool {
    matches!(segment, "." | "..")
}

impl fmt::Display for ResourceUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.base, self.encoded_path())
    }
}
