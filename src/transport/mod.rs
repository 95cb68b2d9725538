//! Transport Module
//!
//! The outbound HTTP edge of the routing layer. The core only needs "send this
//! request to that endpoint and give me a status, headers and a body stream";
//! connection establishment, pooling and timeouts belong to the implementation.
//!
//! ## Submodules
//! - **`types`**: request/response shapes and the boxed body stream.
//! - **`http`**: reqwest-backed transport.
//! - **`mock`** (tests only): scripted transport whose bodies count their drops.

pub mod http;
#[cfg(test)]
pub mod mock;
pub mod types;

pub use http::HttpTransport;
pub use types::{
    BOUNDARY_HEADER, BufferedRequest, ByteStream, EndpointResponse, OutboundRequest, endpoint_url,
};

use crate::error::{Result, RouteError};

use async_trait::async_trait;

#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: OutboundRequest) -> Result<EndpointResponse>;
}

/// Sends `request` and treats any non-success status as a failure.
///
/// The body of a rejected response is closed before the error is returned.
pub async fn send_checked(
    transport: &dyn Transport,
    request: OutboundRequest,
) -> Result<EndpointResponse> {
    let url = request.url();
    let response = transport.send(request).await?;

    if !response.status.is_success() {
        tracing::debug!(url = %url, status = %response.status, "Endpoint rejected request");
        return Err(RouteError::Status {
            status: response.status,
            url,
        });
    }
    Ok(response)
}
