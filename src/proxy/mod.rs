//! Proxy Module
//!
//! Point-to-point routing: one inbound request goes to the master of the shard its
//! path hashes to. The shard is found by hashing the request path with the node's
//! `Sharder`, and its master by a single registry read of the master record.

pub mod forwarder;

pub use forwarder::Forwarder;
