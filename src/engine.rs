use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::catalog::Catalog;
use crate::config::EngineConfig;
use crate::errors::EngineError;
use crate::models::{CurrentPriceRecord, Offer, OfferFilter, PriceObservation, PriceTrend};
use crate::services::{comparison_service, ingest_service, ledger_service, trend_service};
use crate::store::{
    InMemoryLedger, InMemoryObservationLog, LedgerStore, ObservationLog, PgLedger,
    PgObservationLog,
};

/// The engine's single entry point: observation log, current price ledger and
/// catalog behind one handle. Cheap to clone and share across tasks.
#[derive(Clone)]
pub struct PriceEngine {
    observations: Arc<dyn ObservationLog>,
    ledger: Arc<dyn LedgerStore>,
    catalog: Arc<dyn Catalog>,
    config: EngineConfig,
}

impl PriceEngine {
    pub fn new(
        observations: Arc<dyn ObservationLog>,
        ledger: Arc<dyn LedgerStore>,
        catalog: Arc<dyn Catalog>,
        config: EngineConfig,
    ) -> Self {
        Self {
            observations,
            ledger,
            catalog,
            config,
        }
    }

    /// Engine over the in-process backends.
    pub fn in_memory(catalog: Arc<dyn Catalog>, config: EngineConfig) -> Self {
        Self::new(
            Arc::new(InMemoryObservationLog::new()),
            Arc::new(InMemoryLedger::new()),
            catalog,
            config,
        )
    }

    /// Engine over the postgres backends sharing one pool.
    pub fn postgres(pool: PgPool, catalog: Arc<dyn Catalog>, config: EngineConfig) -> Self {
        Self::new(
            Arc::new(PgObservationLog::new(pool.clone())),
            Arc::new(PgLedger::new(pool)),
            catalog,
            config,
        )
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Validate and ingest one observation; returns the updated current price
    /// record for the pair.
    pub async fn record_observation(
        &self,
        observation: PriceObservation,
        now: DateTime<Utc>,
    ) -> Result<CurrentPriceRecord, EngineError> {
        ingest_service::record(
            self.observations.as_ref(),
            self.ledger.as_ref(),
            self.catalog.as_ref(),
            &self.config,
            observation,
            now,
        )
        .await
    }

    pub async fn current_price(
        &self,
        product_id: i64,
        store_id: i64,
    ) -> Result<Option<CurrentPriceRecord>, EngineError> {
        ledger_service::current_price(self.ledger.as_ref(), product_id, store_id).await
    }

    pub async fn set_active(
        &self,
        product_id: i64,
        store_id: i64,
        active: bool,
    ) -> Result<(), EngineError> {
        ledger_service::set_active(self.ledger.as_ref(), product_id, store_id, active).await
    }

    /// Staleness check with the configured default threshold when
    /// `threshold_hours` is None.
    pub async fn needs_refresh(
        &self,
        product_id: i64,
        store_id: i64,
        now: DateTime<Utc>,
        threshold_hours: Option<i64>,
    ) -> Result<bool, EngineError> {
        let threshold = threshold_hours.unwrap_or(self.config.default_stale_after_hours);
        ledger_service::needs_refresh(self.ledger.as_ref(), product_id, store_id, now, threshold)
            .await
    }

    pub async fn compare_offers(
        &self,
        product_id: i64,
        filter: OfferFilter,
    ) -> Result<Vec<Offer>, EngineError> {
        comparison_service::compare_offers(
            self.ledger.as_ref(),
            self.catalog.as_ref(),
            product_id,
            filter,
        )
        .await
    }

    pub async fn lowest_price(
        &self,
        product_id: i64,
        filter: OfferFilter,
    ) -> Result<Option<Offer>, EngineError> {
        comparison_service::lowest_price(
            self.ledger.as_ref(),
            self.catalog.as_ref(),
            product_id,
            filter,
        )
        .await
    }

    pub async fn is_available(&self, product_id: i64) -> Result<bool, EngineError> {
        comparison_service::is_available(self.ledger.as_ref(), self.catalog.as_ref(), product_id)
            .await
    }

    pub async fn price_trend(
        &self,
        product_id: i64,
        store_id: Option<i64>,
        window_days: u32,
        now: DateTime<Utc>,
    ) -> Result<PriceTrend, EngineError> {
        trend_service::price_trend(
            self.observations.as_ref(),
            product_id,
            store_id,
            window_days,
            now,
        )
        .await
    }
}
