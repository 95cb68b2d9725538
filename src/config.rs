//! Node Configuration
//!
//! Every flag can also be set through the environment variable named next to it.
//! Without `--etcd-endpoints` the node runs on its own: the storage server at
//! `--storage-addr` is master of every shard and the only multicast endpoint, while
//! `--advertise` stays the router's own address.

use crate::discovery::MemoryDiscovery;
use crate::error::{Result, RouteError};
use crate::sharding::ShardDescriptor;
use crate::transport::endpoint_url;

use backoff::ExponentialBackoff;
use clap::Parser;
use std::net::SocketAddr;
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[command(name = "shard-router")]
#[command(about = "Shard routing and request fan-out node")]
#[command(version)]
pub struct NodeConfig {
    /// Address the HTTP API listens on
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8080")]
    pub bind: SocketAddr,

    /// Address other nodes use to reach this one, as written in the registry
    #[arg(long, env = "ADVERTISE_ADDR", default_value = "127.0.0.1:8080")]
    pub advertise: String,

    /// Co-located storage server that serves every shard in single-node mode
    #[arg(long, env = "STORAGE_ADDR", default_value = "127.0.0.1:9000")]
    pub storage_addr: String,

    /// Comma-separated etcd endpoints. Empty means single-node mode.
    #[arg(long, env = "ETCD_ENDPOINTS", value_delimiter = ',')]
    pub etcd_endpoints: Vec<String>,

    /// Registry key holding master/slave records
    #[arg(long, env = "SHARDS_KEY", default_value = "/shard-router/shards")]
    pub shards_key: String,

    /// Registry directory listing multicast endpoints
    #[arg(long, env = "ENDPOINTS_KEY", default_value = "/shard-router/endpoints")]
    pub endpoints_key: String,

    #[arg(long, env = "NUM_SHARDS", default_value_t = 16)]
    pub num_shards: u64,

    /// Largest request body buffered for replay
    #[arg(long, env = "MAX_BODY_BYTES", default_value_t = 64 * 1024 * 1024)]
    pub max_body_bytes: usize,

    /// Timeout of each outbound request
    #[arg(long, env = "REQUEST_TIMEOUT_MS", default_value_t = 30_000)]
    pub request_timeout_ms: u64,

    #[arg(long, env = "ETCD_BACKOFF_INITIAL_MS", default_value_t = 1_000)]
    pub etcd_backoff_initial_ms: u64,

    #[arg(long, env = "ETCD_BACKOFF_MAX_MS", default_value_t = 10_000)]
    pub etcd_backoff_max_ms: u64,

    /// Give up connecting to etcd after this long
    #[arg(long, env = "ETCD_BACKOFF_MAX_ELAPSED_MS", default_value_t = 60_000)]
    pub etcd_backoff_max_elapsed_ms: u64,
}

impl NodeConfig {
    pub fn validate(&self) -> Result<()> {
        if self.num_shards == 0 {
            return Err(RouteError::ZeroShards);
        }
        Ok(())
    }

    pub fn single_node(&self) -> bool {
        self.etcd_endpoints.is_empty()
    }

    /// Registers the storage server as master of every shard and as the only
    /// multicast endpoint.
    pub fn seed_single_node(&self, registry: &MemoryDiscovery) -> Result<()> {
        for index in 0..self.num_shards {
            let descriptor = ShardDescriptor::new(index, self.num_shards)?;
            registry.set_master(&self.shards_key, &descriptor, &self.storage_addr);
        }
        registry.add_endpoint(&self.endpoints_key, "self", &endpoint_url(&self.storage_addr));
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn etcd_backoff(&self) -> ExponentialBackoff {
        ExponentialBackoff {
            initial_interval: Duration::from_millis(self.etcd_backoff_initial_ms),
            max_interval: Duration::from_millis(self.etcd_backoff_max_ms),
            max_elapsed_time: Some(Duration::from_millis(self.etcd_backoff_max_elapsed_ms)),
            ..Default::default()
        }
    }
}
