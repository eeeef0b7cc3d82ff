use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::debug;

use crate::db::{current_price_queries, observation_queries, CurrentPriceRow, ObservationRow};
use crate::errors::EngineError;
use crate::models::{CurrentPriceRecord, PriceObservation};
use crate::store::{LedgerStore, ObservationLog};

impl TryFrom<ObservationRow> for PriceObservation {
    type Error = EngineError;

    fn try_from(row: ObservationRow) -> Result<Self, Self::Error> {
        Ok(PriceObservation {
            id: row.id,
            product_id: row.product_id,
            store_id: row.store_id,
            price: row.price,
            original_price: row.original_price,
            currency: row.currency.trim().to_string(),
            availability: row.availability.parse().map_err(EngineError::Storage)?,
            stock_quantity: row.stock_quantity,
            source_url: row.source_url,
            observed_at: row.observed_at,
        })
    }
}

impl TryFrom<CurrentPriceRow> for CurrentPriceRecord {
    type Error = EngineError;

    fn try_from(row: CurrentPriceRow) -> Result<Self, Self::Error> {
        Ok(CurrentPriceRecord {
            product_id: row.product_id,
            store_id: row.store_id,
            price: row.price,
            original_price: row.original_price,
            currency: row.currency.trim().to_string(),
            availability: row.availability.parse().map_err(EngineError::Storage)?,
            stock_quantity: row.stock_quantity,
            source_url: row.source_url,
            last_observed_at: row.last_observed_at,
            is_active: row.is_active,
        })
    }
}

pub struct PgObservationLog {
    pool: PgPool,
}

impl PgObservationLog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ObservationLog for PgObservationLog {
    async fn append(&self, observation: PriceObservation) -> Result<(), EngineError> {
        observation_queries::insert(&self.pool, &observation).await?;
        Ok(())
    }

    async fn fetch_since(
        &self,
        product_id: i64,
        store_id: Option<i64>,
        since: DateTime<Utc>,
    ) -> Result<Vec<PriceObservation>, EngineError> {
        let rows = observation_queries::fetch_since(&self.pool, product_id, store_id, since).await?;
        rows.into_iter().map(PriceObservation::try_from).collect()
    }
}

pub struct PgLedger {
    pool: PgPool,
}

impl PgLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LedgerStore for PgLedger {
    async fn apply(
        &self,
        observation: &PriceObservation,
    ) -> Result<CurrentPriceRecord, EngineError> {
        match current_price_queries::upsert_if_newer(&self.pool, observation).await? {
            Some(row) => row.try_into(),
            None => {
                // Conditional upsert declined: an out-of-order observation.
                // The row necessarily exists, return it unchanged.
                debug!(
                    product_id = observation.product_id,
                    store_id = observation.store_id,
                    observed_at = %observation.observed_at,
                    "out-of-order observation ignored for current price"
                );
                current_price_queries::fetch_one(
                    &self.pool,
                    observation.product_id,
                    observation.store_id,
                )
                .await?
                .ok_or_else(|| {
                    EngineError::Storage("current price row missing after upsert".to_string())
                })?
                .try_into()
            }
        }
    }

    async fn get(
        &self,
        product_id: i64,
        store_id: i64,
    ) -> Result<Option<CurrentPriceRecord>, EngineError> {
        current_price_queries::fetch_one(&self.pool, product_id, store_id)
            .await?
            .map(CurrentPriceRecord::try_from)
            .transpose()
    }

    async fn set_active(
        &self,
        product_id: i64,
        store_id: i64,
        active: bool,
    ) -> Result<(), EngineError> {
        let touched =
            current_price_queries::set_active(&self.pool, product_id, store_id, active).await?;
        if touched == 0 {
            return Err(EngineError::NotFound);
        }
        Ok(())
    }

    async fn fetch_for_product(
        &self,
        product_id: i64,
    ) -> Result<Vec<CurrentPriceRecord>, EngineError> {
        let rows = current_price_queries::fetch_for_product(&self.pool, product_id).await?;
        rows.into_iter().map(CurrentPriceRecord::try_from).collect()
    }
}
