use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use tracing::{error, info};

use crate::catalog::Catalog;
use crate::config::EngineConfig;
use crate::errors::EngineError;
use crate::models::{CurrentPriceRecord, PriceObservation};
use crate::store::{LedgerStore, ObservationLog};

/// Accept one observation from the ingestion collaborator: validate it,
/// resolve both catalog references, append it to the log and fold it into the
/// current price ledger. Returns the pair's record as it stands afterwards.
///
/// `now` is passed explicitly so skew validation stays deterministic.
pub async fn record(
    log: &dyn ObservationLog,
    ledger: &dyn LedgerStore,
    catalog: &dyn Catalog,
    config: &EngineConfig,
    observation: PriceObservation,
    now: DateTime<Utc>,
) -> Result<CurrentPriceRecord, EngineError> {
    validate(config, &observation, now)?;

    catalog
        .product(observation.product_id)
        .await?
        .ok_or_else(|| {
            EngineError::UnknownReference(format!("product {}", observation.product_id))
        })?;
    catalog.store(observation.store_id).await?.ok_or_else(|| {
        EngineError::UnknownReference(format!("store {}", observation.store_id))
    })?;

    log.append(observation.clone()).await.map_err(|e| {
        error!(
            product_id = observation.product_id,
            store_id = observation.store_id,
            "failed to append price observation: {}",
            e
        );
        e
    })?;

    let record = ledger.apply(&observation).await.map_err(|e| {
        error!(
            product_id = observation.product_id,
            store_id = observation.store_id,
            "failed to apply observation to current price ledger: {}",
            e
        );
        e
    })?;

    info!(
        product_id = observation.product_id,
        store_id = observation.store_id,
        price = %observation.price,
        observed_at = %observation.observed_at,
        "price observation recorded"
    );
    Ok(record)
}

fn validate(
    config: &EngineConfig,
    obs: &PriceObservation,
    now: DateTime<Utc>,
) -> Result<(), EngineError> {
    let zero = BigDecimal::from(0);
    if obs.price < zero {
        return Err(EngineError::Validation(format!(
            "negative price: {}",
            obs.price
        )));
    }
    if let Some(original) = &obs.original_price {
        if original < &zero {
            return Err(EngineError::Validation(format!(
                "negative original price: {}",
                original
            )));
        }
    }
    if let Some(quantity) = obs.stock_quantity {
        if quantity < 0 {
            return Err(EngineError::Validation(format!(
                "negative stock quantity: {}",
                quantity
            )));
        }
    }
    if obs.currency.len() != 3 || !obs.currency.chars().all(|c| c.is_ascii_uppercase()) {
        return Err(EngineError::Validation(format!(
            "malformed currency code: {}",
            obs.currency
        )));
    }
    if !config.accepted_currencies.contains(&obs.currency) {
        return Err(EngineError::Validation(format!(
            "unknown currency: {}",
            obs.currency
        )));
    }
    if obs.observed_at > now + config.skew_tolerance {
        return Err(EngineError::Validation(format!(
            "observation timestamp {} is beyond the skew tolerance",
            obs.observed_at
        )));
    }
    Ok(())
}
