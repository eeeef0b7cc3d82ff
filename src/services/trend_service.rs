use chrono::{DateTime, Duration, Utc};

use crate::errors::EngineError;
use crate::models::{PriceTrend, TrendPoint};
use crate::store::ObservationLog;

/// Per-store chronological price series for charting, read from the full
/// observation history rather than the ledger. Observations sharing a
/// calendar date are all kept; consumers choose their own aggregation
/// granularity. An empty window yields an empty map.
pub async fn price_trend(
    log: &dyn ObservationLog,
    product_id: i64,
    store_id: Option<i64>,
    window_days: u32,
    now: DateTime<Utc>,
) -> Result<PriceTrend, EngineError> {
    if window_days == 0 {
        return Err(EngineError::Validation(
            "trend window must be at least one day".to_string(),
        ));
    }

    let since = now - Duration::days(i64::from(window_days));
    let observations = log.fetch_since(product_id, store_id, since).await?;

    // fetch_since is ascending by observed_at, so per-store groups stay
    // chronological as they are built.
    let mut trend = PriceTrend::new();
    for obs in &observations {
        trend
            .entry(obs.store_id)
            .or_default()
            .push(TrendPoint::from_observation(obs));
    }
    Ok(trend)
}
