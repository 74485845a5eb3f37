//! HTTP transport seam
//!
//! The dispatcher only sees [`Transport`]: one request in, one fully-read
//! response or a classified failure out.

use std::error::Error as _;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use url::Url;

use crate::error::{ProximaError, Result};

/// HTTP methods the gateway uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => f.write_str("GET"),
            Self::Post => f.write_str("POST"),
        }
    }
}

/// One outgoing request
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    /// HTTP method
    pub method: Method,
    /// Absolute URL
    pub url: Url,
    /// JSON body, sent only for `POST`
    pub body: Option<Value>,
    /// Per-attempt deadline
    pub timeout: Duration,
}

/// A received response with its body already read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// `Content-Type` header, if any
    pub content_type: Option<String>,
    /// Raw body
    pub body: Bytes,
}

impl HttpResponse {
    /// Whether the content type announces a JSON body
    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|content_type| content_type.starts_with("application/json"))
    }
}

/// Transport-level outcome that produced no response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportFailure {
    /// Connection could not be established
    Connect(String),
    /// The deadline elapsed
    Timeout,
    /// Anything else; not worth retrying
    Other(String),
}

/// Sends requests to the gateway
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform one attempt
    async fn send(&self, request: &HttpRequest) -> std::result::Result<HttpResponse, TransportFailure>;
}

/// [`Transport`] over a shared `reqwest` client
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a transport that sends JSON and, when given, a bearer token on every call
    ///
    /// # Errors
    ///
    /// Returns an error if the token is not a valid header value or the
    /// HTTP client cannot be built
    pub fn new(api_key: Option<&SecretString>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(key) = api_key {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", key.expose_secret()))
                .map_err(|e| ProximaError::Config(format!("invalid API key: {e}")))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| ProximaError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &HttpRequest) -> std::result::Result<HttpResponse, TransportFailure> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
        };

        let mut builder = self
            .http
            .request(method, request.url.clone())
            .timeout(request.timeout);

        if let Some(ref body) = request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(classify)?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(ToOwned::to_owned);

        let body = response.bytes().await.map_err(classify)?;

        Ok(HttpResponse {
            status,
            content_type,
            body,
        })
    }
}

/// Sort a `reqwest` error into a retry class
///
/// DNS, refused connections and TLS handshake failures all surface as
/// connect errors and are retried. A timeout during connect counts as a
/// timeout.
fn classify(error: reqwest::Error) -> TransportFailure {
    if error.is_timeout() {
        TransportFailure::Timeout
    } else if error.is_connect() {
        TransportFailure::Connect(error_chain(&error))
    } else {
        TransportFailure::Other(error_chain(&error))
    }
}

/// Render an error with its sources
fn error_chain(error: &reqwest::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();

    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }

    message
}
