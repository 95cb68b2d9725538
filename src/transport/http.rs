use super::Transport;
use super::types::{EndpointResponse, OutboundRequest};
use crate::error::{Result, RouteError};

use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use std::time::Duration;

/// reqwest-backed transport. The client pools connections per host.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: OutboundRequest) -> Result<EndpointResponse> {
        let url = request.url();
        tracing::debug!(method = %request.method, url = %url, "Sending request");

        let response = self
            .client
            .request(request.method, url.as_str())
            .headers(request.headers)
            .body(request.body)
            .send()
            .await?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes_stream().map_err(RouteError::from).boxed();

        Ok(EndpointResponse {
            address: request.endpoint,
            status,
            headers,
            body,
        })
    }
}
