//! Token metadata cache
//!
//! Maps token addresses to resolved [`TokenInfo`]. Entries are only ever added;
//! re-resolving an address yields the same value, so concurrent inserts for
//! the same key are harmless. [`TokenCache::clear`] exists for tests and
//! operators.

use std::collections::HashMap;

use alloy::primitives::Address;
use tokio::sync::RwLock;

use crate::types::TokenInfo;

/// Shared token metadata cache, usually held in an `Arc`
#[derive(Debug, Default)]
pub struct TokenCache {
    entries: RwLock<HashMap<Address, TokenInfo>>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get cached metadata for `token`
    pub async fn get(&self, token: &Address) -> Option<TokenInfo> {
        self.entries.read().await.get(token).cloned()
    }

    /// Cache metadata under its token address
    pub async fn insert(&self, info: TokenInfo) {
        self.entries.write().await.insert(info.address, info);
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Drop every cached entry
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}
