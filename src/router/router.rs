use super::dialer::Dialer;
use crate::addresser::{Addresser, Role};
use crate::error::{Result, RouteError};
use crate::sharding::ShardIndex;

use async_trait::async_trait;
use futures::future::try_join_all;
use rand::seq::SliceRandom;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, warn};

#[async_trait]
pub trait Router: Send + Sync {
    type Conn: Send;

    /// Shards this node serves as master.
    async fn get_master_shards(&self) -> Result<BTreeSet<ShardIndex>>;

    /// Shards this node serves as slave.
    async fn get_slave_shards(&self) -> Result<BTreeSet<ShardIndex>>;

    async fn get_master_client_conn(&self, shard: ShardIndex) -> Result<Self::Conn>;

    /// A random slave of `shard`, or its master when it has no slaves.
    async fn get_master_or_slave_client_conn(&self, shard: ShardIndex) -> Result<Self::Conn>;

    async fn get_all_slave_client_conns(&self, shard: ShardIndex) -> Result<Vec<Self::Conn>>;

    /// Every known address except the local one. Empty when there are none.
    async fn get_all_client_conns(&self) -> Result<Vec<Self::Conn>>;
}

pub struct ShardRouter<D> {
    addresser: Arc<dyn Addresser>,
    dialer: D,
    local_address: String,
}

impl<D: Dialer> ShardRouter<D> {
    pub fn new(addresser: Arc<dyn Addresser>, dialer: D, local_address: impl Into<String>) -> Self {
        Self {
            addresser,
            dialer,
            local_address: local_address.into(),
        }
    }

    pub fn local_address(&self) -> &str {
        &self.local_address
    }

    async fn master_address(&self, shard: ShardIndex) -> Result<String> {
        let mut masters = self
            .addresser
            .get_shard_addresses(Role::Master, shard)
            .await?
            .into_iter();

        let master = masters.next().ok_or(RouteError::NoMaster(shard))?;
        let extra: Vec<String> = masters.collect();
        if !extra.is_empty() {
            warn!(
                shard,
                chosen = %master,
                others = ?extra,
                "Multiple masters registered for shard"
            );
        }
        Ok(master)
    }

    async fn dial_all(&self, addresses: &[String]) -> Result<Vec<D::Conn>> {
        // One future per address, each owning its own result slot
        try_join_all(addresses.iter().map(|address| self.dialer.dial(address))).await
    }
}

#[async_trait]
impl<D: Dialer> Router for ShardRouter<D> {
    type Conn = D::Conn;

    async fn get_master_shards(&self) -> Result<BTreeSet<ShardIndex>> {
        self.addresser.get_master_shards(&self.local_address).await
    }

    async fn get_slave_shards(&self) -> Result<BTreeSet<ShardIndex>> {
        self.addresser.get_slave_shards(&self.local_address).await
    }

    async fn get_master_client_conn(&self, shard: ShardIndex) -> Result<D::Conn> {
        let address = self.master_address(shard).await?;
        debug!(shard, address = %address, "Routing to master");
        self.dialer.dial(&address).await
    }

    async fn get_master_or_slave_client_conn(&self, shard: ShardIndex) -> Result<D::Conn> {
        let slaves = self
            .addresser
            .get_shard_addresses(Role::Slave, shard)
            .await?;

        let picked = slaves.choose(&mut rand::thread_rng()).cloned();
        if let Some(address) = picked {
            debug!(shard, address = %address, candidates = slaves.len(), "Routing to slave");
            return self.dialer.dial(&address).await;
        }

        let address = match self.master_address(shard).await {
            Ok(address) => address,
            Err(RouteError::NoMaster(_)) => return Err(RouteError::NoSlaveOrMaster(shard)),
            Err(e) => return Err(e),
        };
        debug!(shard, address = %address, "No slaves, routing to master");
        self.dialer.dial(&address).await
    }

    async fn get_all_slave_client_conns(&self, shard: ShardIndex) -> Result<Vec<D::Conn>> {
        let slaves = self
            .addresser
            .get_shard_addresses(Role::Slave, shard)
            .await?;
        self.dial_all(&slaves).await
    }

    async fn get_all_client_conns(&self) -> Result<Vec<D::Conn>> {
        let peers: Vec<String> = self
            .addresser
            .get_all_addresses()
            .await?
            .into_iter()
            .filter(|address| *address != self.local_address)
            .collect();

        debug!(count = peers.len(), "Dialing all peers");
        self.dial_all(&peers).await
    }
}
