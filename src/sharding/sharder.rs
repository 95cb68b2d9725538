use super::ShardIndex;
use super::descriptor::ShardDescriptor;
use crate::error::{Result, RouteError};

/// Maps resource keys onto shard indices.
pub trait Sharder: Send + Sync {
    /// Total number of shards `N`.
    fn num_shards(&self) -> u64;

    /// Shard owning `resource`, in `[0, N)`.
    fn get_shard(&self, resource: &str) -> Result<ShardIndex>;

    /// Descriptor (`"<index>-<N>"`) of the shard owning `resource`.
    fn get_descriptor(&self, resource: &str) -> Result<ShardDescriptor> {
        let index = self.get_shard(resource)?;
        ShardDescriptor::new(index, self.num_shards())
    }
}

/// Adler-32 checksum of a resource key. Stable across processes and restarts, and the
/// same value every existing node of the cluster computes for the key.
pub fn hash_resource(resource: &str) -> u64 {
    let mut hasher = adler::Adler32::new();
    hasher.write_slice(resource.as_bytes());
    hasher.checksum() as u64
}

/// Sharder reducing an Adler-32 checksum of the key modulo `N`.
#[derive(Debug, Clone)]
pub struct ChecksumSharder {
    num_shards: u64,
}

impl ChecksumSharder {
    pub fn new(num_shards: u64) -> Result<Self> {
        if num_shards == 0 {
            return Err(RouteError::ZeroShards);
        }
        Ok(Self { num_shards })
    }
}

impl Sharder for ChecksumSharder {
    fn num_shards(&self) -> u64 {
        self.num_shards
    }

    fn get_shard(&self, resource: &str) -> Result<ShardIndex> {
        Ok(hash_resource(resource) % self.num_shards)
    }
}
