//! Discovery-backed Addresser
//!
//! Reads role records laid out as described in [`crate::discovery::keys`]. A shard with
//! no master record (mid-election) is simply absent from every result. Records written
//! for a different shard count belong to another shard space and are skipped.

use super::{Addresser, Role};
use crate::discovery::{DiscoveryClient, keys};
use crate::error::Result;
use crate::sharding::ShardIndex;

use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct DiscoveryAddresser {
    client: Arc<dyn DiscoveryClient>,
    base_key: String,
    num_shards: u64,
}

impl DiscoveryAddresser {
    pub fn new(
        client: Arc<dyn DiscoveryClient>,
        base_key: impl Into<String>,
        num_shards: u64,
    ) -> Self {
        Self {
            client,
            base_key: base_key.into(),
            num_shards,
        }
    }

    pub fn base_key(&self) -> &str {
        &self.base_key
    }

    /// `(shard, address)` pairs for every record of `role`, from one directory read.
    async fn role_records(&self, role: Role) -> Result<Vec<(ShardIndex, String)>> {
        let dir = keys::role_dir(&self.base_key, role);
        let entries = self.client.get_all(&dir).await?;

        let mut records = Vec::with_capacity(entries.len());
        for (key, address) in entries {
            match keys::parse_record_key(&dir, &key) {
                Some(descriptor) if descriptor.num_shards == self.num_shards => {
                    records.push((descriptor.index, address))
                }
                Some(descriptor) => {
                    warn!(
                        key = %key,
                        num_shards = descriptor.num_shards,
                        expected = self.num_shards,
                        "Skipping shard record from another shard space"
                    );
                }
                None => {
                    warn!(key = %key, role = ?role, "Skipping malformed shard record");
                }
            }
        }
        Ok(records)
    }

    async fn shards_of(&self, role: Role, address: &str) -> Result<BTreeSet<ShardIndex>> {
        let shards: BTreeSet<ShardIndex> = self
            .role_records(role)
            .await?
            .into_iter()
            .filter(|(_, record_address)| record_address == address)
            .map(|(shard, _)| shard)
            .collect();

        debug!(address = %address, role = ?role, count = shards.len(), "Resolved shards for address");
        Ok(shards)
    }
}

#[async_trait]
impl Addresser for DiscoveryAddresser {
    async fn get_master_shards(&self, address: &str) -> Result<BTreeSet<ShardIndex>> {
        self.shards_of(Role::Master, address).await
    }

    async fn get_slave_shards(&self, address: &str) -> Result<BTreeSet<ShardIndex>> {
        self.shards_of(Role::Slave, address).await
    }

    async fn get_all_addresses(&self) -> Result<Vec<String>> {
        let mut addresses = BTreeSet::new();
        for role in [Role::Master, Role::Slave] {
            for (_, address) in self.role_records(role).await? {
                addresses.insert(address);
            }
        }
        Ok(addresses.into_iter().collect())
    }

    async fn get_shard_addresses(&self, role: Role, shard: ShardIndex) -> Result<Vec<String>> {
        let addresses: BTreeSet<String> = self
            .role_records(role)
            .await?
            .into_iter()
            .filter(|(record_shard, _)| *record_shard == shard)
            .map(|(_, address)| address)
            .collect();
        Ok(addresses.into_iter().collect())
    }
}
