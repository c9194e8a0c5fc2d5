//! Catalog instance and session configuration
//!
//! Configuration comes from the environment (with `.env` support) or from a
//! YAML file. Both paths fill in defaults for anything left unset.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::resource_url::ResourceUrl;

const DEFAULT_PROTOCOL: &str = "http";
const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 9100;
const DEFAULT_BASE_PATH: &str = "/api/versioned/v1/";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Location of a catalog server: `<protocol>://<host>:<port><base_path>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Instance {
    pub protocol: String,
    pub host: String,
    pub port: u16,
    pub base_path: String,
}

impl Default for Instance {
    fn default() -> Self {
        Self {
            protocol: DEFAULT_PROTOCOL.to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            base_path: DEFAULT_BASE_PATH.to_string(),
        }
    }
}

impl Instance {
    pub fn new(protocol: &str, host: &str, port: u16, base_path: &str) -> Self {
        Self {
            protocol: protocol.to_string(),
            host: host.to_string(),
            port,
            base_path: normalize_base_path(base_path),
        }
    }

    /// `<protocol>://<host>:<port>`
    pub fn origin(&self) -> String {
        format!("{}://{}:{}", self.protocol, self.host, self.port)
    }

    /// Absolute API base, always ending in `/`.
    pub fn base_url(&self) -> Result<url::Url> {
        let raw = format!("{}{}", self.origin(), normalize_base_path(&self.base_path));
        Ok(url::Url::parse(&raw)?)
    }

    /// Address of a resource on this instance, e.g. `resource("datasets/7")`.
    pub fn resource(&self, path: &str) -> Result<ResourceUrl> {
        Ok(ResourceUrl::new(self.base_url()?, path))
    }
}

/// Base paths always start and end with `/`.
fn normalize_base_path(base_path: &str) -> String {
    let trimmed = base_path.trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", trimmed)
    }
}

/// Everything needed to open an [`HttpSession`](crate::HttpSession).
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub instance: Instance,
    pub username: Option<String>,
    pub password: Option<String>,
    pub timeout_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            instance: Instance::default(),
            username: None,
            password: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

// Credentials stay out of logs.
impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("instance", &self.instance)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl SessionConfig {
    /// Load from `CATALOG_*` environment variables, reading `.env` first if present.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from a YAML file. Missing fields take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {}", path.display(), e)))?;
        let config: Self = serde_yaml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse {}: {}", path.display(), e)))?;
        config.credentials()?;
        Ok(config)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Instance::default();
        let port = match lookup("CATALOG_PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|_| Error::Config(format!("CATALOG_PORT is not a port number: {raw}")))?,
            None => defaults.port,
        };
        let timeout_secs = match lookup("CATALOG_TIMEOUT_SECS") {
            Some(raw) => raw.parse().map_err(|_| {
                Error::Config(format!("CATALOG_TIMEOUT_SECS is not a number: {raw}"))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let instance = Instance::new(
            &lookup("CATALOG_PROTOCOL").unwrap_or(defaults.protocol),
            &lookup("CATALOG_HOST").unwrap_or(defaults.host),
            port,
            &lookup("CATALOG_BASE_PATH").unwrap_or(defaults.base_path),
        );

        let config = Self {
            instance,
            username: lookup("CATALOG_USERNAME"),
            password: lookup("CATALOG_PASSWORD"),
            timeout_secs,
        };
        config.credentials()?;
        Ok(config)
    }

    /// Username/password pair, if configured. A username without a password is an error.
    pub fn credentials(&self) -> Result<Option<(&str, &str)>> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Ok(Some((user.as_str(), pass.as_str()))),
            (None, _) => Ok(None),
            (Some(user), None) => Err(Error::Config(format!(
                "username '{user}' configured without a password"
            ))),
        }
    }
}
