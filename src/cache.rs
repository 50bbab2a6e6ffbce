use anyhow::{anyhow, Result};
use async_trait::async_trait;
use dashmap::DashMap;
use ethers::prelude::Address;
use log::debug;
use std::sync::Arc;

use crate::pool_repository::{PoolRepository, SpotPriceSource};
use crate::pools::PoolRecord;

#[derive(Debug, Clone, Default)]
/// In-memory pool store indexed by pool id and by pool address.
///
/// Both indexes share the same records; inserting a record with an existing id or
/// address replaces the previous one.
///
/// ## Features
///
/// - **Lock-Free**: `DashMap` for concurrent reads while a graph is being built
/// - **Cheap Clones**: indexes are behind `Arc`, clones share state
pub struct InMemoryPoolRepository {
    by_id: Arc<DashMap<String, Arc<PoolRecord>>>,
    by_address: Arc<DashMap<Address, Arc<PoolRecord>>>,
}

impl InMemoryPoolRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pools(pools: impl IntoIterator<Item = PoolRecord>) -> Self {
        let repository = Self::new();
        for pool in pools {
            repository.insert(pool);
        }
        repository
    }

    /// Load records from a JSON array (the shape pool indexers return).
    pub fn from_json(json: &str) -> Result<Self> {
        let pools: Vec<PoolRecord> = serde_json::from_str(json)?;
        Ok(Self::from_pools(pools))
    }

    pub fn insert(&self, pool: PoolRecord) {
        let pool = Arc::new(pool);
        debug!("Caching pool {} at {:?}", pool.id, pool.address);
        self.by_id.insert(pool.id.to_lowercase(), Arc::clone(&pool));
        self.by_address.insert(pool.address, pool);
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn get_by_address(&self, address: &Address) -> Option<PoolRecord> {
        self.by_address.get(address).map(|e| e.value().as_ref().clone())
    }
}

#[async_trait]
impl PoolRepository for InMemoryPoolRepository {
    fn name(&self) -> &'static str {
        "InMemory"
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<PoolRecord>> {
        Ok(self
            .by_id
            .get(&id.to_lowercase())
            .map(|e| e.value().as_ref().clone()))
    }

    async fn find_by_address(&self, address: Address) -> Result<Option<PoolRecord>> {
        Ok(self.get_by_address(&address))
    }
}

/// Spot prices keyed by (pool, token, quote), for fixtures and pre-computed price sets.
#[derive(Debug, Clone, Default)]
pub struct StaticSpotPrices {
    prices: Arc<DashMap<(Address, Address, Address), String>>,
    fallback: Option<String>,
}

impl StaticSpotPrices {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every unknown (pool, token, quote) triple resolves to `price`.
    pub fn with_fallback(price: impl Into<String>) -> Self {
        Self {
            prices: Arc::new(DashMap::new()),
            fallback: Some(price.into()),
        }
    }

    pub fn insert(&self, pool: Address, token: Address, quote: Address, price: impl Into<String>) {
        self.prices.insert((pool, token, quote), price.into());
    }
}

impl SpotPriceSource for StaticSpotPrices {
    fn spot_price(&self, pool: &PoolRecord, token: Address, quote: Address) -> Result<String> {
        self.prices
            .get(&(pool.address, token, quote))
            .map(|e| e.value().clone())
            .or_else(|| self.fallback.clone())
            .ok_or_else(|| anyhow!("no spot price for {:?} in pool {}", token, pool.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pools::PoolToken;

    fn pool(id: &str, byte: u8) -> PoolRecord {
        PoolRecord {
            id: id.to_string(),
            address: Address::from([byte; 20]),
            pool_type: "Weighted".to_string(),
            pool_type_version: 1,
            tokens: vec![PoolToken {
                address: Address::from([0x01; 20]),
                balance: "1".to_string(),
                decimals: Some(18),
            }],
            main_index: None,
            wrapped_index: None,
        }
    }

    #[tokio::test]
    async fn test_lookup_by_id_and_address() {
        let repo = InMemoryPoolRepository::from_pools(vec![pool("0xABCD", 0xaa)]);
        assert_eq!(repo.len(), 1);

        let by_id = repo.find_by_id("0xabcd").await.unwrap().unwrap();
        assert_eq!(by_id.address, Address::from([0xaa; 20]));

        let by_address = repo
            .find_by_address(Address::from([0xaa; 20]))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_address.id, "0xABCD");

        assert!(repo.find_by_address(Address::from([0xbb; 20])).await.unwrap().is_none());
    }

    #[test]
    fn test_static_spot_prices() {
        let prices = StaticSpotPrices::new();
        let p = pool("0x01", 0xaa);
        let token = Address::from([0x01; 20]);
        prices.insert(p.address, token, p.address, "0.99");
        assert_eq!(prices.spot_price(&p, token, p.address).unwrap(), "0.99");
        assert!(prices.spot_price(&p, p.address, token).is_err());

        let fallback = StaticSpotPrices::with_fallback("1");
        assert_eq!(fallback.spot_price(&p, p.address, token).unwrap(), "1");
    }
}
