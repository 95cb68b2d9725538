//! Shard descriptors
//!
//! A descriptor is the compact string form of a shard: `"3-8"` is shard 3 of 8.
//! Deployments that route purely by string use [`matches`] to test a key against a
//! descriptor without holding a live [`Sharder`](super::Sharder).

use super::ShardIndex;
use super::sharder::hash_resource;
use crate::error::{Result, RouteError};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShardDescriptor {
    pub index: ShardIndex,
    pub num_shards: u64,
}

impl ShardDescriptor {
    /// Builds a descriptor, enforcing `0 <= index < num_shards`.
    pub fn new(index: ShardIndex, num_shards: u64) -> Result<Self> {
        if num_shards == 0 {
            return Err(RouteError::ZeroShards);
        }
        if index >= num_shards {
            return Err(RouteError::InvalidDescriptor {
                descriptor: format!("{}-{}", index, num_shards),
                reason: "shard index out of range".to_string(),
            });
        }
        Ok(Self { index, num_shards })
    }

    /// Descriptor of the shard `resource` hashes to.
    pub fn for_resource(resource: &str, num_shards: u64) -> Result<Self> {
        if num_shards == 0 {
            return Err(RouteError::ZeroShards);
        }
        Self::new(hash_resource(resource) % num_shards, num_shards)
    }

    /// True iff `hash(resource) % num_shards == index`.
    pub fn matches(&self, resource: &str) -> bool {
        hash_resource(resource) % self.num_shards == self.index
    }
}

impl fmt::Display for ShardDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.index, self.num_shards)
    }
}

impl FromStr for ShardDescriptor {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = |reason: String| RouteError::InvalidDescriptor {
            descriptor: s.to_string(),
            reason,
        };

        let (index, num_shards) = s
            .split_once('-')
            .ok_or_else(|| invalid("missing '-' separator".to_string()))?;
        let index = parse_component(index)
            .map_err(|e| invalid(format!("bad shard index: {}", e)))?;
        let num_shards = parse_component(num_shards)
            .map_err(|e| invalid(format!("bad shard count: {}", e)))?;

        Self::new(index, num_shards).map_err(|_| invalid("shard index out of range".to_string()))
    }
}

/// Canonical decimal only: no sign, no leading zeros except a bare `0`.
fn parse_component(part: &str) -> std::result::Result<u64, String> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("'{}' is not a decimal number", part));
    }
    if part.len() > 1 && part.starts_with('0') {
        return Err(format!("'{}' has leading zeros", part));
    }
    part.parse().map_err(|e: std::num::ParseIntError| e.to_string())
}

/// Parses `"<index>-<N>"` into `(index, N)`.
pub fn parse_shard(descriptor: &str) -> Result<(ShardIndex, u64)> {
    let parsed: ShardDescriptor = descriptor.parse()?;
    Ok((parsed.index, parsed.num_shards))
}

/// Returns true if `resource` hashes to the shard named by `descriptor`.
pub fn matches(resource: &str, descriptor: &str) -> Result<bool> {
    let parsed: ShardDescriptor = descriptor.parse()?;
    Ok(parsed.matches(resource))
}
