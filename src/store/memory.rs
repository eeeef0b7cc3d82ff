use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::debug;

use crate::errors::EngineError;
use crate::models::{CurrentPriceRecord, PriceObservation};
use crate::store::{LedgerStore, ObservationLog};

type PairKey = (i64, i64);

/// In-process observation log. Appends from independent writers never
/// contend beyond the touched map shard.
#[derive(Default)]
pub struct InMemoryObservationLog {
    observations: DashMap<PairKey, Vec<PriceObservation>>,
}

impl InMemoryObservationLog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ObservationLog for InMemoryObservationLog {
    async fn append(&self, observation: PriceObservation) -> Result<(), EngineError> {
        let key = (observation.product_id, observation.store_id);
        self.observations.entry(key).or_default().push(observation);
        Ok(())
    }

    async fn fetch_since(
        &self,
        product_id: i64,
        store_id: Option<i64>,
        since: DateTime<Utc>,
    ) -> Result<Vec<PriceObservation>, EngineError> {
        let mut result: Vec<PriceObservation> = self
            .observations
            .iter()
            .filter(|entry| {
                let (p, s) = *entry.key();
                p == product_id && store_id.map_or(true, |wanted| s == wanted)
            })
            .flat_map(|entry| {
                entry
                    .value()
                    .iter()
                    .filter(|obs| obs.observed_at >= since)
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .collect();
        result.sort_by_key(|obs| obs.observed_at);
        Ok(result)
    }
}

/// In-process current price table. The DashMap entry API holds the pair's
/// shard lock across read-modify-write, which gives the per-pair
/// serializability `LedgerStore::apply` requires.
#[derive(Default)]
pub struct InMemoryLedger {
    records: DashMap<PairKey, CurrentPriceRecord>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedger {
    async fn apply(
        &self,
        observation: &PriceObservation,
    ) -> Result<CurrentPriceRecord, EngineError> {
        let key = (observation.product_id, observation.store_id);
        let record = match self.records.entry(key) {
            Entry::Occupied(mut occupied) => {
                if !occupied.get_mut().absorb(observation) {
                    debug!(
                        product_id = observation.product_id,
                        store_id = observation.store_id,
                        observed_at = %observation.observed_at,
                        "out-of-order observation ignored for current price"
                    );
                }
                occupied.get().clone()
            }
            Entry::Vacant(vacant) => vacant
                .insert(CurrentPriceRecord::from_observation(observation))
                .clone(),
        };
        Ok(record)
    }

    async fn get(
        &self,
        product_id: i64,
        store_id: i64,
    ) -> Result<Option<CurrentPriceRecord>, EngineError> {
        Ok(self
            .records
            .get(&(product_id, store_id))
            .map(|entry| entry.value().clone()))
    }

    async fn set_active(
        &self,
        product_id: i64,
        store_id: i64,
        active: bool,
    ) -> Result<(), EngineError> {
        match self.records.get_mut(&(product_id, store_id)) {
            Some(mut entry) => {
                entry.value_mut().is_active = active;
                Ok(())
            }
            None => Err(EngineError::NotFound),
        }
    }

    async fn fetch_for_product(
        &self,
        product_id: i64,
    ) -> Result<Vec<CurrentPriceRecord>, EngineError> {
        Ok(self
            .records
            .iter()
            .filter(|entry| entry.key().0 == product_id)
            .map(|entry| entry.value().clone())
            .collect())
    }
}
