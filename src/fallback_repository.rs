//! # Fallback Pool Repository
//!
//! Chains several [`PoolRepository`] sources. Each lookup walks the sources in order,
//! bounded by a per-source timeout, and returns the first record found. A source that
//! errors or times out is logged and skipped.
//!
//! When every source has been tried the lookup resolves to `Ok(None)`, which the graph
//! builder reports as `PoolNotFound`.

use anyhow::Result;
use async_trait::async_trait;
use ethers::prelude::Address;
use log::{debug, warn};
use std::future::Future;
use std::sync::Arc;
use tokio::time::{timeout, Duration};

use crate::pool_repository::PoolRepository;
use crate::pools::PoolRecord;
use crate::settings::LookupSettings;

#[derive(Clone)]
pub struct FallbackPoolRepository {
    sources: Vec<Arc<dyn PoolRepository>>,
    lookup_timeout: Duration,
}

impl FallbackPoolRepository {
    pub fn new(sources: Vec<Arc<dyn PoolRepository>>, lookup_timeout: Duration) -> Self {
        Self {
            sources,
            lookup_timeout,
        }
    }

    /// Builds from settings, keeping at most `max_sources` sources.
    pub fn from_settings(
        mut sources: Vec<Arc<dyn PoolRepository>>,
        settings: &LookupSettings,
    ) -> Self {
        if sources.len() > settings.max_sources {
            warn!(
                "Ignoring {} pool sources beyond lookup.max_sources={}",
                sources.len() - settings.max_sources,
                settings.max_sources
            );
            sources.truncate(settings.max_sources);
        }
        Self::new(sources, settings.timeout())
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    async fn first_hit<'a, F, Fut>(&'a self, what: &str, lookup: F) -> Result<Option<PoolRecord>>
    where
        F: Fn(&'a Arc<dyn PoolRepository>) -> Fut,
        Fut: Future<Output = Result<Option<PoolRecord>>> + 'a,
    {
        for source in &self.sources {
            match timeout(self.lookup_timeout, lookup(source)).await {
                Ok(Ok(Some(pool))) => {
                    debug!("{} resolved {} via {}", what, pool.id, source.name());
                    return Ok(Some(pool));
                }
                Ok(Ok(None)) => {
                    debug!("{} not found in {}", what, source.name());
                }
                Ok(Err(e)) => {
                    warn!(
                        "{} lookup failed in {}: {}. Trying next source.",
                        what,
                        source.name(),
                        e
                    );
                }
                Err(_) => {
                    warn!(
                        "{} lookup timed out in {} after {:?}. Trying next source.",
                        what,
                        source.name(),
                        self.lookup_timeout
                    );
                }
            }
        }
        Ok(None)
    }
}

#[async_trait]
impl PoolRepository for FallbackPoolRepository {
    fn name(&self) -> &'static str {
        "Fallback"
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<PoolRecord>> {
        self.first_hit(&format!("Pool id {}", id), |source| source.find_by_id(id))
            .await
    }

    async fn find_by_address(&self, address: Address) -> Result<Option<PoolRecord>> {
        self.first_hit(&format!("Pool address {:?}", address), |source| {
            source.find_by_address(address)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::InMemoryPoolRepository;
    use crate::pools::PoolToken;
    use anyhow::anyhow;

    struct Failing;

    #[async_trait]
    impl PoolRepository for Failing {
        fn name(&self) -> &'static str {
            "Failing"
        }
        async fn find_by_id(&self, _id: &str) -> Result<Option<PoolRecord>> {
            Err(anyhow!("connection refused"))
        }
        async fn find_by_address(&self, _address: Address) -> Result<Option<PoolRecord>> {
            Err(anyhow!("connection refused"))
        }
    }

    struct Stalled;

    #[async_trait]
    impl PoolRepository for Stalled {
        fn name(&self) -> &'static str {
            "Stalled"
        }
        async fn find_by_id(&self, _id: &str) -> Result<Option<PoolRecord>> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(None)
        }
        async fn find_by_address(&self, _address: Address) -> Result<Option<PoolRecord>> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(None)
        }
    }

    fn memory() -> Arc<dyn PoolRepository> {
        Arc::new(InMemoryPoolRepository::from_pools(vec![PoolRecord {
            id: "0x01".to_string(),
            address: Address::from([0xaa; 20]),
            pool_type: "Weighted".to_string(),
            pool_type_version: 1,
            tokens: vec![PoolToken {
                address: Address::from([0x01; 20]),
                balance: "1".to_string(),
                decimals: None,
            }],
            main_index: None,
            wrapped_index: None,
        }]))
    }

    #[tokio::test]
    async fn test_skips_failing_and_stalled_sources() {
        let repo = FallbackPoolRepository::new(
            vec![Arc::new(Failing), Arc::new(Stalled), memory()],
            Duration::from_millis(20),
        );
        let pool = repo.find_by_id("0x01").await.unwrap();
        assert_eq!(pool.map(|p| p.address), Some(Address::from([0xaa; 20])));

        let pool = repo.find_by_address(Address::from([0xaa; 20])).await.unwrap();
        assert!(pool.is_some());
    }

    #[tokio::test]
    async fn test_exhausted_sources_resolve_to_none() {
        let repo = FallbackPoolRepository::new(vec![Arc::new(Failing)], Duration::from_millis(20));
        assert!(repo.find_by_id("0x01").await.unwrap().is_none());
    }

    #[test]
    fn test_from_settings_truncates_sources() {
        let settings = LookupSettings {
            timeout_ms: 10,
            max_sources: 1,
        };
        let repo = FallbackPoolRepository::from_settings(vec![memory(), memory()], &settings);
        assert_eq!(repo.source_count(), 1);
    }
}
