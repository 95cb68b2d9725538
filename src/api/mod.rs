//! HTTP API Module
//!
//! The axum surface of a routing node. Lookup routes expose the sharder and router as
//! JSON; `/route/*` and `/multicast/*` proxy arbitrary requests into the cluster.
//!
//! Every `RouteError` is answered with `500` and the error message as the body.

pub mod handlers;
pub mod types;

use crate::multicast::Multicaster;
use crate::proxy::Forwarder;
use crate::router::{HttpDialer, ShardRouter};
use crate::sharding::Sharder;

use axum::Extension;
use axum::routing::{any, get};
use handlers::*;
use std::sync::Arc;

/// Shared handles passed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub sharder: Arc<dyn Sharder>,
    pub router: Arc<ShardRouter<HttpDialer>>,
    pub forwarder: Arc<Forwarder>,
    pub multicaster: Arc<Multicaster>,
    pub endpoints_key: String,
}

pub fn build_router(state: AppState) -> axum::Router {
    axum::Router::new()
        .route("/health", get(handle_health))
        .route("/lookup", get(handle_lookup))
        .route("/shards", get(handle_local_shards))
        .route("/shards/:shard/master", get(handle_shard_master))
        .route("/shards/:shard/replica", get(handle_shard_replica))
        .route("/shards/:shard/slaves", get(handle_shard_slaves))
        .route("/peers", get(handle_peers))
        .route("/route/*path", any(handle_route))
        .route("/multicast/one/*path", any(handle_multicast_one))
        .route("/multicast/all/*path", any(handle_multicast_all))
        .layer(Extension(state))
}
