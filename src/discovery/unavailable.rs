//! Registry whose every read fails, as when the coordination service is unreachable.

use super::DiscoveryClient;
use crate::error::{Result, RouteError};

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;

pub struct UnavailableRegistry;

impl UnavailableRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self)
    }
}

#[async_trait]
impl DiscoveryClient for UnavailableRegistry {
    async fn get(&self, _key: &str) -> Result<Option<String>> {
        Err(RouteError::Discovery("connection refused".to_string()))
    }

    async fn get_all(&self, _dir: &str) -> Result<BTreeMap<String, String>> {
        Err(RouteError::Discovery("connection refused".to_string()))
    }
}
