use super::Addresser;
use crate::error::{Result, RouteError};
use crate::sharding::ShardIndex;

use async_trait::async_trait;
use std::collections::BTreeSet;

/// Static configuration: one address is master and slave for every shard.
#[derive(Debug, Clone)]
pub struct SingleAddresser {
    address: String,
    num_shards: u64,
}

impl SingleAddresser {
    pub fn new(address: impl Into<String>, num_shards: u64) -> Result<Self> {
        if num_shards == 0 {
            return Err(RouteError::ZeroShards);
        }
        Ok(Self {
            address: address.into(),
            num_shards,
        })
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    fn shards_for(&self, address: &str) -> BTreeSet<ShardIndex> {
        if address == self.address {
            (0..self.num_shards).collect()
        } else {
            BTreeSet::new()
        }
    }
}

#[async_trait]
impl Addresser for SingleAddresser {
    async fn get_master_shards(&self, address: &str) -> Result<BTreeSet<ShardIndex>> {
        Ok(self.shards_for(address))
    }

    async fn get_slave_shards(&self, address: &str) -> Result<BTreeSet<ShardIndex>> {
        Ok(self.shards_for(address))
    }

    async fn get_all_addresses(&self) -> Result<Vec<String>> {
        Ok(vec![self.address.clone()])
    }
}
