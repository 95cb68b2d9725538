use crate::discovery::{DiscoveryClient, keys};
use crate::error::{Result, RouteError};
use crate::sharding::{ShardDescriptor, Sharder};
use crate::transport::{BufferedRequest, EndpointResponse, Transport, send_checked};

use axum::extract::Request;
use std::sync::Arc;
use tracing::debug;

pub struct Forwarder {
    sharder: Arc<dyn Sharder>,
    discovery: Arc<dyn DiscoveryClient>,
    transport: Arc<dyn Transport>,
    base_key: String,
    max_body_bytes: usize,
}

impl Forwarder {
    pub fn new(
        sharder: Arc<dyn Sharder>,
        discovery: Arc<dyn DiscoveryClient>,
        transport: Arc<dyn Transport>,
        base_key: impl Into<String>,
        max_body_bytes: usize,
    ) -> Self {
        Self {
            sharder,
            discovery,
            transport,
            base_key: base_key.into(),
            max_body_bytes,
        }
    }

    /// Master address currently recorded for the shard owning `path`.
    pub async fn master_for(&self, path: &str) -> Result<(ShardDescriptor, String)> {
        let descriptor = self.sharder.get_descriptor(path)?;
        let key = keys::master_key(&self.base_key, &descriptor);

        match self.discovery.get(&key).await? {
            Some(master) if !master.is_empty() => Ok((descriptor, master)),
            _ => Err(RouteError::NoMaster(descriptor.index)),
        }
    }

    /// Replays `request` against the master of its shard and returns the master's
    /// response. A non-success status is an error.
    pub async fn route(&self, request: Request) -> Result<EndpointResponse> {
        let request = BufferedRequest::read(request, self.max_body_bytes).await?;
        let (descriptor, master) = self.master_for(request.path()).await?;

        debug!(
            path = %request.path(),
            shard = %descriptor,
            master = %master,
            "Forwarding request to shard master"
        );
        send_checked(self.transport.as_ref(), request.to_endpoint(master)).await
    }
}
