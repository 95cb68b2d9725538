use crate::error::Result;

use async_trait::async_trait;
use std::collections::BTreeMap;

/// Key-value read interface of the discovery registry.
///
/// Absence is not an error: a missing key reads as `None` and a missing
/// directory lists as an empty map.
#[async_trait]
pub trait DiscoveryClient: Send + Sync {
    /// Value stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Every key stored below `dir` (recursively) with its value, keyed by full key.
    async fn get_all(&self, dir: &str) -> Result<BTreeMap<String, String>>;
}
