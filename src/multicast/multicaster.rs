use super::merge::{MergedResponse, ReturnMode, merge};
use crate::discovery::DiscoveryClient;
use crate::error::{Result, RouteError};
use crate::transport::{BufferedRequest, EndpointResponse, Transport, send_checked};

use axum::extract::Request;
use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

pub struct Multicaster {
    discovery: Arc<dyn DiscoveryClient>,
    transport: Arc<dyn Transport>,
    max_body_bytes: usize,
}

impl Multicaster {
    pub fn new(
        discovery: Arc<dyn DiscoveryClient>,
        transport: Arc<dyn Transport>,
        max_body_bytes: usize,
    ) -> Self {
        Self {
            discovery,
            transport,
            max_body_bytes,
        }
    }

    /// Endpoint values registered under `namespace`, in registry key order.
    pub async fn endpoints(&self, namespace: &str) -> Result<Vec<String>> {
        Ok(self
            .discovery
            .get_all(namespace)
            .await?
            .into_values()
            .collect())
    }

    /// Sends `request` to every endpoint under `namespace` and returns every response,
    /// or the first recorded failure.
    pub async fn multicast(
        &self,
        request: Request,
        namespace: &str,
    ) -> Result<Vec<EndpointResponse>> {
        let endpoints = self.endpoints(namespace).await?;
        if endpoints.is_empty() {
            tracing::warn!(namespace = %namespace, "No hosts registered for multicast");
            return Err(RouteError::NoHosts);
        }

        // The body is replayed to every endpoint, so it is read once up front
        let request = BufferedRequest::read(request, self.max_body_bytes).await?;
        self.fan_out(endpoints, request).await
    }

    /// Multicast followed by [`merge`].
    pub async fn multicast_merged(
        &self,
        request: Request,
        namespace: &str,
        mode: ReturnMode,
    ) -> Result<MergedResponse> {
        let responses = self.multicast(request, namespace).await?;
        merge(responses, mode)
    }

    async fn fan_out(
        &self,
        endpoints: Vec<String>,
        request: BufferedRequest,
    ) -> Result<Vec<EndpointResponse>> {
        let total = endpoints.len();
        tracing::info!(
            method = %request.method,
            path = %request.path_and_query,
            endpoints = total,
            body_bytes = request.body.len(),
            "Multicasting request"
        );

        let results: Arc<Mutex<Vec<EndpointResponse>>> =
            Arc::new(Mutex::new(Vec::with_capacity(total)));
        let (errors_tx, mut errors_rx) = mpsc::channel::<RouteError>(total);

        let mut workers = Vec::with_capacity(total);
        for endpoint in endpoints {
            let request = request.to_endpoint(endpoint);
            let transport = self.transport.clone();
            let results = results.clone();
            let errors = errors_tx.clone();

            workers.push(tokio::spawn(async move {
                let endpoint = request.endpoint.clone();
                match send_checked(transport.as_ref(), request).await {
                    Ok(response) => results.lock().await.push(response),
                    Err(e) => {
                        tracing::debug!(endpoint = %endpoint, error = %e, "Multicast endpoint failed");
                        // One slot per endpoint, so this never finds the channel full
                        let _ = errors.try_send(e);
                    }
                }
            }));
        }
        drop(errors_tx);

        let mut crashed = None;
        for joined in join_all(workers).await {
            if let Err(e) = joined {
                crashed.get_or_insert(RouteError::Transport(format!(
                    "multicast worker failed: {}",
                    e
                )));
            }
        }

        let responses = std::mem::take(&mut *results.lock().await);

        if let Ok(e) = errors_rx.try_recv() {
            tracing::warn!(
                error = %e,
                succeeded = responses.len(),
                endpoints = total,
                "Multicast failed, closing collected responses"
            );
            return Err(e);
        }
        if let Some(e) = crashed {
            return Err(e);
        }

        tracing::info!(responses = responses.len(), "Multicast complete");
        Ok(responses)
    }
}
