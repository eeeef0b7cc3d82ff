mod memory;
mod postgres;

pub use memory::{InMemoryLedger, InMemoryObservationLog};
pub use postgres::{PgLedger, PgObservationLog};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::EngineError;
use crate::models::{CurrentPriceRecord, PriceObservation};

/// Append-only, chronologically indexed log of price observations keyed by
/// (product, store). No update or delete: corrections are new observations.
#[async_trait]
pub trait ObservationLog: Send + Sync {
    async fn append(&self, observation: PriceObservation) -> Result<(), EngineError>;

    /// Observations for a product with `observed_at >= since`, optionally
    /// scoped to one store, ordered ascending by `observed_at`.
    async fn fetch_since(
        &self,
        product_id: i64,
        store_id: Option<i64>,
        since: DateTime<Utc>,
    ) -> Result<Vec<PriceObservation>, EngineError>;
}

/// Keyed table of current price records, unique on (product, store).
///
/// `apply` must be serializable per pair: concurrent calls for the same pair
/// may not produce a record whose `last_observed_at` is not the maximum
/// `observed_at` seen. Distinct pairs carry no ordering relationship.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Create the pair's record on first observation, otherwise overwrite it
    /// when the observation is at least as new as `last_observed_at`. Older
    /// observations leave the record as is. Returns the record as it stands
    /// after the call.
    async fn apply(
        &self,
        observation: &PriceObservation,
    ) -> Result<CurrentPriceRecord, EngineError>;

    async fn get(
        &self,
        product_id: i64,
        store_id: i64,
    ) -> Result<Option<CurrentPriceRecord>, EngineError>;

    /// Manual suppression or restoration of a pair; price fields untouched.
    async fn set_active(
        &self,
        product_id: i64,
        store_id: i64,
        active: bool,
    ) -> Result<(), EngineError>;

    async fn fetch_for_product(
        &self,
        product_id: i64,
    ) -> Result<Vec<CurrentPriceRecord>, EngineError>;
}
