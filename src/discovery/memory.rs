//! In-Memory Registry
//!
//! A process-local `DiscoveryClient`. Backs the static single-node configuration and
//! stands in for the coordination service in tests. Writers use the inherent methods;
//! the routing layer only sees the read trait.

use super::client::DiscoveryClient;
use super::keys;
use crate::error::Result;
use crate::sharding::ShardDescriptor;

use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Default)]
pub struct MemoryDiscovery {
    entries: DashMap<String, String>,
}

impl MemoryDiscovery {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn delete(&self, key: &str) -> Option<String> {
        self.entries.remove(key).map(|(_, value)| value)
    }

    /// Removes every key below `dir`.
    pub fn delete_dir(&self, dir: &str) {
        let prefix = dir_prefix(dir);
        self.entries.retain(|key, _| !key.starts_with(&prefix));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Records `address` as master of `descriptor`, replacing any previous master.
    pub fn set_master(&self, base: &str, descriptor: &ShardDescriptor, address: &str) {
        self.set(keys::master_key(base, descriptor), address);
    }

    pub fn add_slave(&self, base: &str, descriptor: &ShardDescriptor, address: &str) {
        self.set(keys::slave_key(base, descriptor, address), address);
    }

    pub fn remove_slave(&self, base: &str, descriptor: &ShardDescriptor, address: &str) {
        self.delete(&keys::slave_key(base, descriptor, address));
    }

    /// Registers an endpoint URL under a multicast namespace.
    pub fn add_endpoint(&self, namespace: &str, name: &str, url: &str) {
        self.set(keys::join(namespace, name), url);
    }
}

#[async_trait]
impl DiscoveryClient for MemoryDiscovery {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    async fn get_all(&self, dir: &str) -> Result<BTreeMap<String, String>> {
        let prefix = dir_prefix(dir);
        Ok(self
            .entries
            .iter()
            .filter(|entry| entry.key().starts_with(&prefix))
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect())
    }
}

fn dir_prefix(dir: &str) -> String {
    format!("{}/", dir.trim_end_matches('/'))
}
