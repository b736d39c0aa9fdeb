//! Cached rate lookups with fallback, and amount conversion on top of them.

use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::core::cache::Cache;
use crate::core::conversion::{Amount, Conversion, ConversionResult};
use crate::core::currency::{RateProvider, RateSnapshot};
use crate::error::ConversionError;
use crate::providers::fallback;

pub type RateCache = Cache<String, RateSnapshot>;

pub struct CurrencyConverter<P: RateProvider> {
    provider: P,
    cache: Arc<RateCache>,
    ttl: Duration,
}

impl<P: RateProvider> CurrencyConverter<P> {
    pub fn new(provider: P, cache: Arc<RateCache>, ttl: Duration) -> Self {
        CurrencyConverter {
            provider,
            cache,
            ttl,
        }
    }

    /// Rates for `base`. Served from the cache while fresh, otherwise fetched
    /// live. Any fetch failure degrades to the fallback table.
    #[instrument(skip(self))]
    pub async fn get_exchange_rates(&self, base: &str) -> RateSnapshot {
        let key = base.to_string();
        if let Some(cached) = self.cache.get(&key).await {
            if cached.is_fresh(Utc::now(), self.ttl) {
                return cached;
            }
            debug!(fetched_at = %cached.fetched_at, "Cached rates are stale");
        }

        match self.provider.fetch_rates(base).await {
            Ok(snapshot) => {
                self.cache.put(key, snapshot.clone()).await;
                snapshot
            }
            Err(e) => {
                let snapshot = fallback::fallback_rates(base, Utc::now());
                warn!(
                    error = %e,
                    fallback_base = %snapshot.base_code,
                    "Error fetching exchange rates, using fallback rates"
                );
                snapshot
            }
        }
    }

    /// Converts `amount` of `from` into `to`. Never fails outward; problems are
    /// reported in the returned result.
    pub async fn convert(
        &self,
        amount: impl Into<Amount>,
        from: &str,
        to: &str,
    ) -> ConversionResult {
        let result = self.try_convert(amount.into(), from, to).await;
        if let Err(e) = &result {
            debug!(error = %e, from, to, "Conversion failed");
        }
        result.into()
    }

    async fn try_convert(
        &self,
        amount: Amount,
        from: &str,
        to: &str,
    ) -> Result<Conversion, ConversionError> {
        let snapshot = self.get_exchange_rates(from).await;
        let rate = snapshot.rate(to).ok_or(ConversionError::RateNotFound)?;
        let amount = amount.parse()?;

        Ok(Conversion {
            from: from.to_string(),
            to: to.to_string(),
            amount,
            converted: amount * rate,
            rate,
        })
    }
}
