use std::fmt;

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::GatewayConfig;
use crate::error::TripPlannerError;
use crate::types::{CampsiteId, TripId};

/// HTTP verbs used against the remote store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// Read a resource or collection
    Get,
    /// Create or edit a resource
    Post,
    /// Remove a resource
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        })
    }
}

/// Path of a resource on the remote store, relative to the base URL
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourcePath(String);

impl ResourcePath {
    /// `/campsites`
    pub fn campsites() -> Self {
        Self("/campsites".to_string())
    }

    /// `/campsites/{id}`
    pub fn campsite(id: CampsiteId) -> Self {
        Self(format!("/campsites/{}", id))
    }

    /// `/trips`
    pub fn trips() -> Self {
        Self("/trips".to_string())
    }

    /// `/trips/{id}`
    pub fn trip(id: TripId) -> Self {
        Self(format!("/trips/{}", id))
    }

    /// `/trips/{id}/campsites`
    pub fn trip_bookings(trip_id: TripId) -> Self {
        Self(format!("/trips/{}/campsites", trip_id))
    }

    /// `/trips/{id}/campsites/{campsiteId}`
    pub fn trip_booking(trip_id: TripId, campsite_id: CampsiteId) -> Self {
        Self(format!("/trips/{}/campsites/{}", trip_id, campsite_id))
    }

    /// The path as sent on the wire
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Non-empty path segments
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|segment| !segment.is_empty())
    }
}

impl fmt::Display for ResourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Request/response channel to the remote data store.
///
/// Bodies travel as raw JSON; callers decode them into typed records with
/// [`decode`]. An empty response body is reported as `Value::Null`.
#[async_trait::async_trait]
pub trait RemoteGateway: Send + Sync {
    /// Fetch a resource or collection
    async fn get(&self, path: &ResourcePath) -> Result<Value, TripPlannerError>;

    /// Submit a JSON body to a resource
    async fn post(&self, path: &ResourcePath, body: Value) -> Result<Value, TripPlannerError>;

    /// Delete a resource
    async fn delete(&self, path: &ResourcePath) -> Result<Value, TripPlannerError>;
}

/// Decodes a response body into a typed record
pub fn decode<T: DeserializeOwned>(path: &ResourcePath, body: Value) -> Result<T, TripPlannerError> {
    serde_json::from_value(body).map_err(|e| {
        TripPlannerError::DataFormat(format!("Unexpected response from {}: {}", path, e))
    })
}

/// Encodes a typed record into a request body
pub fn encode<T: Serialize>(record: &T) -> Result<Value, TripPlannerError> {
    serde_json::to_value(record)
        .map_err(|e| TripPlannerError::DataFormat(format!("Failed to encode request: {}", e)))
}

/// Gateway talking to the remote store over HTTP
pub struct HttpGateway {
    client: Client,
    base_url: String,
    bearer_token: Option<String>,
}

impl HttpGateway {
    /// Create a new HTTP gateway from the given configuration
    pub fn new(config: GatewayConfig) -> Result<Self, TripPlannerError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| TripPlannerError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            bearer_token: config.bearer_token,
        })
    }

    fn url(&self, path: &ResourcePath) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &ResourcePath) -> RequestBuilder {
        let url = self.url(path);
        let builder = match method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Delete => self.client.delete(&url),
        };

        match self.bearer_token {
            Some(ref token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn execute(
        &self,
        method: Method,
        path: &ResourcePath,
        builder: RequestBuilder,
    ) -> Result<Value, TripPlannerError> {
        debug!("{} {}", method, self.url(path));

        let response = builder.send().await.map_err(|e| {
            TripPlannerError::Network(format!("{} {} failed: {}", method, path, e))
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            TripPlannerError::Network(format!("Failed to read response from {}: {}", path, e))
        })?;

        debug!("{} {} returned {}", method, path, status);

        if !status.is_success() {
            warn!("{} {} failed with status {}: {}", method, path, status, body);
            return Err(TripPlannerError::from_status(
                status.as_u16(),
                extract_error_message(&body),
            ));
        }

        parse_body(path, &body)
    }
}

#[async_trait::async_trait]
impl RemoteGateway for HttpGateway {
    async fn get(&self, path: &ResourcePath) -> Result<Value, TripPlannerError> {
        let builder = self.request(Method::Get, path);
        self.execute(Method::Get, path, builder).await
    }

    async fn post(&self, path: &ResourcePath, body: Value) -> Result<Value, TripPlannerError> {
        let builder = self.request(Method::Post, path).json(&body);
        self.execute(Method::Post, path, builder).await
    }

    async fn delete(&self, path: &ResourcePath) -> Result<Value, TripPlannerError> {
        let builder = self.request(Method::Delete, path);
        self.execute(Method::Delete, path, builder).await
    }
}

/// Parse a success body; an empty body is `Null`
fn parse_body(path: &ResourcePath, body: &str) -> Result<Value, TripPlannerError> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str(body).map_err(|e| {
        TripPlannerError::DataFormat(format!("Response from {} is not JSON: {}", path, e))
    })
}

/// Pull the server's explanation out of an error body.
///
/// The remote store answers failures with `{"message": ...}` or
/// `{"error": ...}`; `message` wins when both are present.
fn extract_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;

    ["message", "error"]
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}
