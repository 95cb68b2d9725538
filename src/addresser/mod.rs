//! Addresser Module
//!
//! Resolves which shards an address serves, and in which role.
//!
//! ## Implementations
//! - **`SingleAddresser`**: one node is master and slave for every shard. No I/O.
//! - **`DiscoveryAddresser`**: reads master/slave records from the discovery registry
//!   on every call. Registry changes are how failover becomes visible, so nothing is cached.

pub mod registry;
pub mod single;

pub use registry::DiscoveryAddresser;
pub use single::SingleAddresser;

use crate::error::Result;
use crate::sharding::ShardIndex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Role an address plays for a shard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Master,
    Slave,
}

#[async_trait]
pub trait Addresser: Send + Sync {
    /// Shards `address` serves as master.
    async fn get_master_shards(&self, address: &str) -> Result<BTreeSet<ShardIndex>>;

    /// Shards `address` serves as slave.
    async fn get_slave_shards(&self, address: &str) -> Result<BTreeSet<ShardIndex>>;

    /// Every known address, sorted and deduplicated.
    async fn get_all_addresses(&self) -> Result<Vec<String>>;

    async fn get_shards(&self, role: Role, address: &str) -> Result<BTreeSet<ShardIndex>> {
        match role {
            Role::Master => self.get_master_shards(address).await,
            Role::Slave => self.get_slave_shards(address).await,
        }
    }

    /// Addresses serving `shard` in `role`.
    ///
    /// The default scans every address's role set one read at a time; implementations
    /// that can answer from a single registry snapshot should override it.
    async fn get_shard_addresses(&self, role: Role, shard: ShardIndex) -> Result<Vec<String>> {
        let mut found = Vec::new();
        for address in self.get_all_addresses().await? {
            if self.get_shards(role, &address).await?.contains(&shard) {
                found.push(address);
            }
        }
        Ok(found)
    }
}
