//! Router Module Tests
//!
//! ## Test Scopes
//! - **Master lookup**: missing master, single master, multiple masters.
//! - **Replica selection**: slave preference, master fallback, uniform spread.
//! - **Broadcast**: all slaves of a shard, all peers except the local node.
//! - **HttpDialer**: address validation.

#[cfg(test)]
mod tests {
    use crate::addresser::{DiscoveryAddresser, SingleAddresser};
    use crate::discovery::MemoryDiscovery;
    use crate::error::{Result, RouteError};
    use crate::router::{Dialer, HttpDialer, Router, ShardRouter};
    use crate::sharding::ShardDescriptor;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    const BASE: &str = "/pfs/shards";

    fn shard(index: u64) -> ShardDescriptor {
        ShardDescriptor::new(index, 4).unwrap()
    }

    /// Dialer whose connections are just the dialed address.
    #[derive(Default)]
    struct CountingDialer {
        dials: Arc<AtomicUsize>,
        unreachable: HashSet<String>,
    }

    #[async_trait]
    impl Dialer for CountingDialer {
        type Conn = String;

        async fn dial(&self, address: &str) -> Result<String> {
            self.dials.fetch_add(1, Ordering::SeqCst);
            if self.unreachable.contains(address) {
                return Err(RouteError::Dial {
                    address: address.to_string(),
                    reason: "connection refused".to_string(),
                });
            }
            Ok(address.to_string())
        }
    }

    fn router_over(
        registry: Arc<MemoryDiscovery>,
        local: &str,
    ) -> (ShardRouter<CountingDialer>, Arc<AtomicUsize>) {
        let dialer = CountingDialer::default();
        let dials = dialer.dials.clone();
        let addresser = Arc::new(DiscoveryAddresser::new(registry, BASE, 4));
        (ShardRouter::new(addresser, dialer, local), dials)
    }

    // ============================================================
    // MASTER LOOKUP TESTS
    // ============================================================

    #[tokio::test]
    async fn test_no_master_never_dials() {
        // ARRANGE: shard 2 is mid-election
        let registry = MemoryDiscovery::new();
        registry.set_master(BASE, &shard(0), "A");
        registry.add_slave(BASE, &shard(2), "C");
        let (router, dials) = router_over(registry, "A");

        // ACT
        let result = router.get_master_client_conn(2).await;

        // ASSERT
        assert!(matches!(result, Err(RouteError::NoMaster(2))));
        assert_eq!(dials.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_master_conn_resolves_master() {
        let registry = MemoryDiscovery::new();
        registry.set_master(BASE, &shard(1), "B");
        registry.add_slave(BASE, &shard(1), "C");
        let (router, dials) = router_over(registry, "A");

        let conn = router.get_master_client_conn(1).await.unwrap();

        assert_eq!(conn, "B");
        assert_eq!(dials.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_multiple_masters_pick_is_deterministic() {
        let registry = MemoryDiscovery::new();
        registry.set("/pfs/shards/master/1-4", "B");
        // Inconsistent registry: a second record parses to the same shard
        registry.set("/pfs/shards/master/1-4/stale", "A");
        let (router, _) = router_over(registry, "Z");

        let first = router.get_master_client_conn(1).await.unwrap();
        let second = router.get_master_client_conn(1).await.unwrap();

        assert_eq!(first, "A");
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_dial_failure_propagates() {
        let registry = MemoryDiscovery::new();
        registry.set_master(BASE, &shard(0), "A");
        let dialer = CountingDialer {
            unreachable: HashSet::from(["A".to_string()]),
            ..Default::default()
        };
        let addresser = Arc::new(DiscoveryAddresser::new(registry, BASE, 4));
        let router = ShardRouter::new(addresser, dialer, "Z");

        let result = router.get_master_client_conn(0).await;

        assert!(matches!(result, Err(RouteError::Dial { .. })));
    }

    // ============================================================
    // REPLICA SELECTION TESTS
    // ============================================================

    #[tokio::test]
    async fn test_only_master_resolves_to_master() {
        let registry = MemoryDiscovery::new();
        registry.set_master(BASE, &shard(3), "A");
        let (router, _) = router_over(registry, "Z");

        let conn = router.get_master_or_slave_client_conn(3).await.unwrap();

        assert_eq!(conn, "A");
    }

    #[tokio::test]
    async fn test_slaves_preferred_and_spread() {
        // ARRANGE
        let registry = MemoryDiscovery::new();
        registry.set_master(BASE, &shard(3), "A");
        registry.add_slave(BASE, &shard(3), "B");
        registry.add_slave(BASE, &shard(3), "C");
        let (router, _) = router_over(registry, "Z");

        // ACT
        let mut seen = HashSet::new();
        for _ in 0..200 {
            seen.insert(router.get_master_or_slave_client_conn(3).await.unwrap());
        }

        // ASSERT: never the master, both slaves exercised
        assert!(!seen.contains("A"));
        assert_eq!(seen, HashSet::from(["B".to_string(), "C".to_string()]));
    }

    #[tokio::test]
    async fn test_no_slave_or_master() {
        let (router, dials) = router_over(MemoryDiscovery::new(), "A");

        let result = router.get_master_or_slave_client_conn(0).await;

        assert!(matches!(result, Err(RouteError::NoSlaveOrMaster(0))));
        assert_eq!(dials.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_slave_removal_is_observed() {
        let registry = MemoryDiscovery::new();
        registry.set_master(BASE, &shard(0), "A");
        registry.add_slave(BASE, &shard(0), "B");
        let (router, _) = router_over(registry.clone(), "Z");

        assert_eq!(router.get_master_or_slave_client_conn(0).await.unwrap(), "B");

        registry.remove_slave(BASE, &shard(0), "B");

        assert_eq!(router.get_master_or_slave_client_conn(0).await.unwrap(), "A");
    }

    // ============================================================
    // BROADCAST TESTS
    // ============================================================

    #[tokio::test]
    async fn test_all_slave_conns() {
        let registry = MemoryDiscovery::new();
        registry.set_master(BASE, &shard(0), "A");
        registry.add_slave(BASE, &shard(0), "C");
        registry.add_slave(BASE, &shard(0), "B");
        registry.add_slave(BASE, &shard(1), "D");
        let (router, dials) = router_over(registry, "A");

        let conns = router.get_all_slave_client_conns(0).await.unwrap();

        assert_eq!(conns, vec!["B", "C"]);
        assert_eq!(dials.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_all_conns_excludes_local() {
        let registry = MemoryDiscovery::new();
        registry.set_master(BASE, &shard(0), "A");
        registry.set_master(BASE, &shard(1), "B");
        registry.add_slave(BASE, &shard(0), "C");
        registry.add_slave(BASE, &shard(1), "A");
        let (router, _) = router_over(registry, "A");

        let conns = router.get_all_client_conns().await.unwrap();

        assert_eq!(conns, vec!["B", "C"]);
    }

    #[tokio::test]
    async fn test_all_conns_empty_when_alone() {
        let registry = MemoryDiscovery::new();
        registry.set_master(BASE, &shard(0), "A");
        let (router, dials) = router_over(registry, "A");

        let conns = router.get_all_client_conns().await.unwrap();
        assert!(conns.is_empty());
        assert_eq!(dials.load(Ordering::SeqCst), 0);

        let (router, _) = router_over(MemoryDiscovery::new(), "A");
        assert!(router.get_all_client_conns().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_local_shards_from_single_addresser() {
        let addresser = Arc::new(SingleAddresser::new("A", 4).unwrap());
        let router = ShardRouter::new(addresser, CountingDialer::default(), "A");

        assert_eq!(router.get_master_shards().await.unwrap().len(), 4);
        assert_eq!(router.get_slave_shards().await.unwrap().len(), 4);
        assert_eq!(router.get_master_client_conn(2).await.unwrap(), "A");
        assert!(router.get_all_client_conns().await.unwrap().is_empty());
    }

    // ============================================================
    // HTTP DIALER TESTS
    // ============================================================

    #[tokio::test]
    async fn test_http_dialer_normalises_address() {
        let dialer = HttpDialer::new(Duration::from_secs(1)).unwrap();

        let conn = dialer.dial("10.0.0.5:7070").await.unwrap();

        assert_eq!(conn.address(), "10.0.0.5:7070");
        assert_eq!(conn.base_url(), "http://10.0.0.5:7070");
        assert_eq!(conn.url("/health"), "http://10.0.0.5:7070/health");
    }

    #[tokio::test]
    async fn test_http_dialer_rejects_garbage() {
        let dialer = HttpDialer::new(Duration::from_secs(1)).unwrap();

        assert!(matches!(
            dialer.dial("").await,
            Err(RouteError::Dial { .. })
        ));
        assert!(matches!(
            dialer.dial("http://[::1").await,
            Err(RouteError::Dial { .. })
        ));
    }
}
