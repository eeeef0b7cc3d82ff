use chrono::{DateTime, Utc};
use tracing::info;

use crate::errors::EngineError;
use crate::models::CurrentPriceRecord;
use crate::store::LedgerStore;

pub async fn current_price(
    ledger: &dyn LedgerStore,
    product_id: i64,
    store_id: i64,
) -> Result<Option<CurrentPriceRecord>, EngineError> {
    ledger.get(product_id, store_id).await
}

/// Manually suppress or restore a pair in comparisons. Independent of the
/// observation flow; price fields are untouched.
pub async fn set_active(
    ledger: &dyn LedgerStore,
    product_id: i64,
    store_id: i64,
    active: bool,
) -> Result<(), EngineError> {
    ledger.set_active(product_id, store_id, active).await?;
    info!(product_id, store_id, active, "current price record toggled");
    Ok(())
}

/// Whether the pair is due for re-scraping as of `now`. NotFound when the
/// pair has never been observed.
pub async fn needs_refresh(
    ledger: &dyn LedgerStore,
    product_id: i64,
    store_id: i64,
    now: DateTime<Utc>,
    threshold_hours: i64,
) -> Result<bool, EngineError> {
    let record = ledger
        .get(product_id, store_id)
        .await?
        .ok_or(EngineError::NotFound)?;
    Ok(record.needs_refresh(now, threshold_hours))
}
