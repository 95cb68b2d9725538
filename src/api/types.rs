use crate::router::HttpConn;
use crate::sharding::ShardIndex;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub address: String,
    pub num_shards: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LookupQuery {
    pub key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShardLookupResponse {
    pub key: String,
    pub shard: ShardIndex,
    pub num_shards: u64,
    pub descriptor: String,
}

/// Shards served by the answering node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalShardsResponse {
    pub address: String,
    pub master: BTreeSet<ShardIndex>,
    pub slave: BTreeSet<ShardIndex>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnInfo {
    pub address: String,
    pub url: String,
}

impl From<&HttpConn> for ConnInfo {
    fn from(conn: &HttpConn) -> Self {
        Self {
            address: conn.address().to_string(),
            url: conn.base_url().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShardConnResponse {
    pub shard: ShardIndex,
    pub conn: ConnInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnListResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shard: Option<ShardIndex>,
    pub conns: Vec<ConnInfo>,
}
