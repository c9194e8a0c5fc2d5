//! HTTP session boundary
//!
//! [`Session`] is the only way attribute operations reach the network. It is
//! a blocking, one-request-per-call interface; [`HttpSession`] implements it
//! over `reqwest::blocking` and tests substitute scripted fakes.

use std::borrow::Cow;
use std::time::Duration;

use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::Method;
use serde_json::Value;

use crate::config::SessionConfig;
use crate::error::{Error, Result};
use crate::resource_url::ResourceUrl;

/// Status and body of a completed request.
#[derive(Debug, Clone)]
pub struct Response {
    status: u16,
    url: String,
    body: Vec<u8>,
}

impl Response {
    pub fn new(status: u16, url: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            url: url.into(),
            body: body.into(),
        }
    }

    /// Response carrying a JSON document.
    pub fn with_json(status: u16, url: impl Into<String>, body: &Value) -> Self {
        Self::new(status, url, body.to_string())
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Pass 2xx responses through; anything else becomes [`Error::Http`].
    ///
    /// Callers that give particular statuses a domain meaning (404, 409)
    /// must check for them before calling this.
    pub fn successful(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            let body = self.text().into_owned();
            Err(Error::http(self.status, self.url, &body))
        }
    }

    pub fn json(&self) -> Result<Value> {
        serde_json::from_slice(&self.body).map_err(|source| Error::MalformedResponse {
            url: self.url.clone(),
            source,
        })
    }
}

/// Authenticated HTTP verbs against the catalog.
pub trait Session: Send + Sync {
    fn get(&self, url: &ResourceUrl) -> Result<Response>;

    fn post(&self, url: &ResourceUrl, body: &Value) -> Result<Response>;

    fn put(&self, url: &ResourceUrl, body: &Value) -> Result<Response>;

    fn delete(&self, url: &ResourceUrl) -> Result<Response>;
}

/// [`Session`] backed by a blocking reqwest client.
pub struct HttpSession {
    http: Client,
}

impl HttpSession {
    pub fn new(config: &SessionConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some((username, password)) = config.credentials()? {
            headers.insert(AUTHORIZATION, basic_creds(username, password)?);
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()?;

        tracing::debug!(
            origin = %config.instance.origin(),
            authenticated = config.username.is_some(),
            "Created catalog session"
        );

        Ok(Self { http })
    }

    fn send(&self, method: Method, url: &ResourceUrl, body: Option<&Value>) -> Result<Response> {
        let mut request = self.http.request(method.clone(), url.to_url()?);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send()?;
        let status = response.status().as_u16();
        tracing::info!(%method, %url, status, "catalog request");

        let body = response.bytes()?;
        Ok(Response::new(status, url.to_string(), body.to_vec()))
    }
}

impl Session for HttpSession {
    fn get(&self, url: &ResourceUrl) -> Result<Response> {
        self.send(Method::GET, url, None)
    }

    fn post(&self, url: &ResourceUrl, body: &Value) -> Result<Response> {
        self.send(Method::POST, url, Some(body))
    }

    fn put(&self, url: &ResourceUrl, body: &Value) -> Result<Response> {
        self.send(Method::PUT, url, Some(body))
    }

    fn delete(&self, url: &ResourceUrl) -> Result<Response> {
        self.send(Method::DELETE, url, None)
    }
}

/// The catalog's username/password scheme: `BasicCreds <base64(user:pass)>`.
fn basic_creds(username: &str, password: &str) -> Result<HeaderValue> {
    let token = STANDARD.encode(format!("{}:{}", username, password));
    let mut value = HeaderValue::from_str(&format!("BasicCreds {}", token))
        .map_err(|e| Error::Config(format!("invalid credentials header: {}", e)))?;
    value.set_sensitive(true);
    Ok(value)
}
