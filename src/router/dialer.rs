use crate::error::{Result, RouteError};
use crate::transport::endpoint_url;

use async_trait::async_trait;
use reqwest::{Method, Url};
use std::time::Duration;

/// Connection factory: address in, usable connection out.
#[async_trait]
pub trait Dialer: Send + Sync {
    type Conn: Send;

    async fn dial(&self, address: &str) -> Result<Self::Conn>;
}

/// Handle to one node's HTTP API. Cloning is cheap; connections are pooled by the
/// shared client.
#[derive(Debug, Clone)]
pub struct HttpConn {
    address: String,
    base_url: Url,
    client: reqwest::Client,
}

impl HttpConn {
    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url(), path.trim_start_matches('/'))
    }

    pub fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        self.client.request(method, self.url(path))
    }
}

#[derive(Debug, Clone)]
pub struct HttpDialer {
    client: reqwest::Client,
}

impl HttpDialer {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Dialer for HttpDialer {
    type Conn = HttpConn;

    /// Validates the address and binds it to the pooled client. No I/O happens here;
    /// the first request opens (or reuses) the TCP connection.
    async fn dial(&self, address: &str) -> Result<HttpConn> {
        let base_url = Url::parse(&endpoint_url(address)).map_err(|e| RouteError::Dial {
            address: address.to_string(),
            reason: e.to_string(),
        })?;

        if base_url.host_str().is_none_or(str::is_empty) {
            return Err(RouteError::Dial {
                address: address.to_string(),
                reason: "missing host".to_string(),
            });
        }

        tracing::debug!(address = %address, "Dialed node");
        Ok(HttpConn {
            address: address.to_string(),
            base_url,
            client: self.client.clone(),
        })
    }
}
