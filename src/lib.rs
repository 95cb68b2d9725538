//! Shard Router Library
//!
//! The routing and fan-out layer of a sharded storage cluster. Resources (file paths)
//! hash onto a fixed shard space; each shard has one master and any number of slaves,
//! recorded in a discovery registry. This crate answers "who serves this shard" and
//! moves requests there, either point-to-point or to every endpoint at once.
//!
//! ## Architecture Modules
//! - **`sharding`**: deterministic resource → shard mapping and `"<index>-<N>"` descriptors.
//! - **`discovery`**: read-only registry access (etcd or in-memory) and the key layout.
//! - **`addresser`**: which shards an address serves, and as what.
//! - **`router`**: connection lookup with master/slave selection policy.
//! - **`transport`**: the outbound HTTP edge.
//! - **`multicast`**: concurrent all-or-nothing fan-out and response merging.
//! - **`proxy`**: point-to-point forwarding to a shard master.
//! - **`api`**: the axum HTTP surface of a routing node.
//! - **`config`**: command line and environment configuration.

pub mod addresser;
pub mod api;
pub mod config;
pub mod discovery;
pub mod error;
pub mod multicast;
pub mod proxy;
pub mod router;
pub mod sharding;
pub mod transport;
