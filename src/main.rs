use clap::Parser;
use shard_router::addresser::{Addresser, DiscoveryAddresser, SingleAddresser};
use shard_router::api::{AppState, build_router};
use shard_router::config::NodeConfig;
use shard_router::discovery::{DiscoveryClient, EtcdDiscovery, MemoryDiscovery};
use shard_router::multicast::Multicaster;
use shard_router::proxy::Forwarder;
use shard_router::router::{HttpDialer, ShardRouter};
use shard_router::sharding::{ChecksumSharder, Sharder};
use shard_router::transport::{HttpTransport, Transport};
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = NodeConfig::parse();
    config.validate()?;

    tracing::info!("Starting node {} on {}", config.advertise, config.bind);
    tracing::info!("Shard space: {} shards", config.num_shards);

    // 1. Registry and addresser:
    let discovery: Arc<dyn DiscoveryClient>;
    let addresser: Arc<dyn Addresser>;
    if config.single_node() {
        tracing::info!(
            "No etcd endpoints configured, running single-node against {}",
            config.storage_addr
        );
        let registry = MemoryDiscovery::new();
        config.seed_single_node(&registry)?;
        discovery = registry;
        addresser = Arc::new(SingleAddresser::new(
            config.advertise.clone(),
            config.num_shards,
        )?);
    } else {
        tracing::info!("Connecting to etcd: {:?}", config.etcd_endpoints);
        let etcd =
            Arc::new(EtcdDiscovery::connect(config.etcd_endpoints.clone(), config.etcd_backoff()).await?);
        discovery = etcd.clone();
        addresser = Arc::new(DiscoveryAddresser::new(
            etcd,
            config.shards_key.clone(),
            config.num_shards,
        ));
    }

    // 2. Routing components:
    let sharder: Arc<dyn Sharder> = Arc::new(ChecksumSharder::new(config.num_shards)?);
    let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(config.request_timeout())?);
    let dialer = HttpDialer::new(config.request_timeout())?;

    let state = AppState {
        sharder: sharder.clone(),
        router: Arc::new(ShardRouter::new(addresser, dialer, config.advertise.clone())),
        forwarder: Arc::new(Forwarder::new(
            sharder,
            discovery.clone(),
            transport.clone(),
            config.shards_key.clone(),
            config.max_body_bytes,
        )),
        multicaster: Arc::new(Multicaster::new(discovery, transport, config.max_body_bytes)),
        endpoints_key: config.endpoints_key.clone(),
    };

    // 3. HTTP server:
    let app = build_router(state);

    tracing::info!("HTTP server listening on {}", config.bind);
    tracing::info!("Press Ctrl+C to shutdown");

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
