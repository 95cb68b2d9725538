//! Error types for the routing layer.
//!
//! Every failure is reported to the caller; nothing here is retried locally.

use crate::sharding::ShardIndex;
use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RouteError>;

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("invalid shard descriptor '{descriptor}': {reason}")]
    InvalidDescriptor { descriptor: String, reason: String },

    #[error("number of shards must be positive")]
    ZeroShards,

    #[error("discovery read failed: {0}")]
    Discovery(String),

    #[error("no master found for shard {0}")]
    NoMaster(ShardIndex),

    #[error("no slave or master found for shard {0}")]
    NoSlaveOrMaster(ShardIndex),

    #[error("no hosts found")]
    NoHosts,

    #[error("failed to dial {address}: {reason}")]
    Dial { address: String, reason: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("failed request ({status}) to {url}")]
    Status { status: StatusCode, url: String },

    #[error("invalid request uri: {0}")]
    InvalidUri(String),

    #[error("failed to read request body: {0}")]
    Body(String),

    #[error("multipart response from {0} carries no boundary")]
    MissingBoundary(String),

    #[error("multipart error: {0}")]
    Multipart(#[from] multer::Error),
}

impl From<etcd_client::Error> for RouteError {
    fn from(e: etcd_client::Error) -> Self {
        RouteError::Discovery(e.to_string())
    }
}

impl From<reqwest::Error> for RouteError {
    fn from(e: reqwest::Error) -> Self {
        RouteError::Transport(e.to_string())
    }
}
