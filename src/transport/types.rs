use crate::error::{Result, RouteError};

use bytes::Bytes;
use futures::Stream;
use reqwest::header::{CONTENT_TYPE, HeaderMap};
use reqwest::{Method, StatusCode};
use std::fmt;
use std::pin::Pin;

/// Name of the header whose presence marks a multipart response body.
pub const BOUNDARY_HEADER: &str = "Boundary";

/// Response body. Dropping the stream closes it.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

/// One request directed at one endpoint.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    /// Endpoint address or base URL as found in the registry.
    pub endpoint: String,
    pub method: Method,
    /// Path plus optional `?query`.
    pub path_and_query: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl OutboundRequest {
    pub fn url(&self) -> String {
        format!(
            "{}{}",
            endpoint_url(&self.endpoint).trim_end_matches('/'),
            self.path_and_query
        )
    }
}

/// An inbound request read fully into memory so it can be replayed to any number of
/// endpoints. Only `Content-Type` is carried over from the inbound headers.
#[derive(Debug, Clone)]
pub struct BufferedRequest {
    pub method: Method,
    pub path_and_query: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl BufferedRequest {
    pub async fn read(request: axum::extract::Request, max_body_bytes: usize) -> Result<Self> {
        let (parts, body) = request.into_parts();
        let body = axum::body::to_bytes(body, max_body_bytes)
            .await
            .map_err(|e| RouteError::Body(e.to_string()))?;

        let path_and_query = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| "/".to_string());

        let mut headers = HeaderMap::new();
        if let Some(content_type) = parts.headers.get(CONTENT_TYPE) {
            headers.insert(CONTENT_TYPE, content_type.clone());
        }

        Ok(Self {
            method: parts.method,
            path_and_query,
            headers,
            body,
        })
    }

    pub fn path(&self) -> &str {
        self.path_and_query
            .split_once('?')
            .map_or(self.path_and_query.as_str(), |(path, _)| path)
    }

    pub fn to_endpoint(&self, endpoint: impl Into<String>) -> OutboundRequest {
        OutboundRequest {
            endpoint: endpoint.into(),
            method: self.method.clone(),
            path_and_query: self.path_and_query.clone(),
            headers: self.headers.clone(),
            body: self.body.clone(),
        }
    }
}

/// A response tagged with the endpoint that produced it.
pub struct EndpointResponse {
    pub address: String,
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: ByteStream,
}

impl EndpointResponse {
    /// Value of the `Boundary` header, when the body is multipart.
    pub fn boundary(&self) -> Option<&str> {
        self.headers
            .get(BOUNDARY_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
    }
}

impl fmt::Debug for EndpointResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndpointResponse")
            .field("address", &self.address)
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

/// Registry values may be bare `host:port`; those are reached over plain HTTP.
pub fn endpoint_url(endpoint: &str) -> String {
    if endpoint.contains("://") {
        endpoint.to_string()
    } else {
        format!("http://{}", endpoint)
    }
}
