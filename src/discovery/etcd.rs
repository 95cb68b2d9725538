//! Etcd Registry
//!
//! `DiscoveryClient` backed by etcd. Directory listings are prefix reads, so a
//! listing of `<dir>` returns every key under `<dir>/` at any depth.

use super::client::DiscoveryClient;
use crate::error::{Result, RouteError};

use async_trait::async_trait;
use backoff::{ExponentialBackoff, future::retry};
use etcd_client::{Client, GetOptions};
use std::collections::BTreeMap;
use tracing::{debug, warn};

#[derive(Clone)]
pub struct EtcdDiscovery {
    client: Client,
}

impl EtcdDiscovery {
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    /// Connect to etcd with exponential backoff.
    pub async fn connect(endpoints: Vec<String>, backoff: ExponentialBackoff) -> Result<Self> {
        let client = retry(backoff, || async {
            match Client::connect(&endpoints, None).await {
                Ok(client) => {
                    debug!(endpoints = ?endpoints, "Connected to etcd");
                    Ok(client)
                }
                Err(e) => {
                    warn!(error = %e, "etcd connection failed, retrying");
                    Err(backoff::Error::transient(e))
                }
            }
        })
        .await
        .map_err(|e| {
            RouteError::Discovery(format!("failed to connect to etcd after retries: {}", e))
        })?;

        Ok(Self { client })
    }
}

#[async_trait]
impl DiscoveryClient for EtcdDiscovery {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut client = self.client.clone();
        let resp = client.get(key, None).await?;

        match resp.kvs().first() {
            Some(kv) => Ok(Some(kv.value_str()?.to_string())),
            None => Ok(None),
        }
    }

    async fn get_all(&self, dir: &str) -> Result<BTreeMap<String, String>> {
        let prefix = format!("{}/", dir.trim_end_matches('/'));
        let mut client = self.client.clone();
        let resp = client
            .get(prefix.as_str(), Some(GetOptions::new().with_prefix()))
            .await?;

        let mut entries = BTreeMap::new();
        for kv in resp.kvs() {
            entries.insert(kv.key_str()?.to_string(), kv.value_str()?.to_string());
        }

        debug!(dir = %dir, count = entries.len(), "Listed registry directory");
        Ok(entries)
    }
}
