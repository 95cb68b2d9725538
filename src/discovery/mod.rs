//! Discovery Registry Module
//!
//! Read-only access to the coordination service that owns shard role assignments
//! and endpoint membership. Registration, leases and leader election happen outside
//! this crate; the router only reads, and re-reads on every call.
//!
//! ## Submodules
//! - **`client`**: the `DiscoveryClient` trait (single-key reads and directory listings).
//! - **`keys`**: the hierarchical key layout for master/slave records.
//! - **`memory`**: in-process registry used for single-node mode and tests.
//! - **`etcd`**: etcd-backed registry.
//! - **`unavailable`** (tests only): registry that fails every read.

pub mod client;
pub mod etcd;
pub mod keys;
pub mod memory;
#[cfg(test)]
pub mod unavailable;

pub use client::DiscoveryClient;
pub use etcd::EtcdDiscovery;
pub use memory::MemoryDiscovery;
