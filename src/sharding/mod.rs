//! Sharding Module
//!
//! Maps resource keys (file paths) onto a fixed shard space.
//!
//! ## Core Concepts
//! - **Shard space**: `N` partitions, fixed for the lifetime of a cluster configuration.
//! - **Hashing**: an Adler-32 checksum of the key bytes reduced modulo `N`. The mapping is
//!   deterministic across processes, which is how independent nodes agree on ownership,
//!   and matches the checksum nodes already deployed in the cluster use.
//! - **Descriptors**: the compact `"<index>-<N>"` string form of a shard, used in registry
//!   keys and by callers that match keys without holding a `Sharder`.

pub mod descriptor;
pub mod sharder;

pub use descriptor::{ShardDescriptor, matches, parse_shard};
pub use sharder::{ChecksumSharder, Sharder, hash_resource};

/// Index of a shard, always in `[0, N)`.
pub type ShardIndex = u64;

#[cfg(test)]
mod tests;
