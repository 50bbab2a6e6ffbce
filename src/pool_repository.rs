//! # Pool Repository
//!
//! Collaborator traits the pool graph consumes. The graph never talks to a chain or an
//! indexer directly: every pool it expands comes from a [`PoolRepository`], and every
//! spot price from a [`SpotPriceSource`].
//!
//! ## Implementations
//!
//! - [`InMemoryPoolRepository`](crate::cache::InMemoryPoolRepository): lock-free map of
//!   records, used for fixtures and for pre-fetched pool sets
//! - [`FallbackPoolRepository`](crate::fallback_repository::FallbackPoolRepository):
//!   ordered list of sources with per-source timeouts
//!
//! ## Example
//!
//! ```rust,no_run
//! use pool_graph_sdk::pool_repository::PoolRepository;
//! use pool_graph_sdk::pools::PoolRecord;
//! use async_trait::async_trait;
//! use ethers::types::Address;
//!
//! struct SubgraphPools { /* http client */ }
//!
//! #[async_trait]
//! impl PoolRepository for SubgraphPools {
//!     fn name(&self) -> &'static str {
//!         "Subgraph"
//!     }
//!
//!     async fn find_by_id(&self, id: &str) -> anyhow::Result<Option<PoolRecord>> {
//!         // query by id
//!         # let _ = id; Ok(None)
//!     }
//!
//!     async fn find_by_address(&self, address: Address) -> anyhow::Result<Option<PoolRecord>> {
//!         // query by address
//!         # let _ = address; Ok(None)
//!     }
//! }
//! ```

use anyhow::Result;
use async_trait::async_trait;
use ethers::prelude::Address;

use crate::pools::PoolRecord;

/// Source of pool records.
///
/// `Ok(None)` means the address is not a pool. The graph builder treats an `Err` the same
/// way after logging it: retries and fallbacks are the repository's concern.
///
/// # Thread Safety
///
/// Repositories must be `Send + Sync` so one instance can serve concurrent builds.
#[async_trait]
pub trait PoolRepository: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    async fn find_by_id(&self, id: &str) -> Result<Option<PoolRecord>>;

    async fn find_by_address(&self, address: Address) -> Result<Option<PoolRecord>>;
}

#[async_trait]
impl<R: PoolRepository + ?Sized> PoolRepository for std::sync::Arc<R> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<PoolRecord>> {
        (**self).find_by_id(id).await
    }

    async fn find_by_address(&self, address: Address) -> Result<Option<PoolRecord>> {
        (**self).find_by_address(address).await
    }
}

/// Spot price of one pool token quoted in another.
///
/// Prices are returned as fixed-point decimal strings, e.g. `"1.002534"`.
pub trait SpotPriceSource: Send + Sync {
    fn spot_price(&self, pool: &PoolRecord, token: Address, quote: Address) -> Result<String>;
}
