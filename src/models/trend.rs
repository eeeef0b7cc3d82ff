use std::collections::HashMap;

use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::PriceObservation;

// One charted price sample. Several points may share a calendar date; the
// aggregator keeps them all and consumers pick their own granularity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub price: BigDecimal,
    pub observed_at: DateTime<Utc>,
}

impl TrendPoint {
    pub fn from_observation(obs: &PriceObservation) -> Self {
        Self {
            date: obs.observed_at.date_naive(),
            price: obs.price.clone(),
            observed_at: obs.observed_at,
        }
    }
}

/// Per-store chronological price series for a product.
pub type PriceTrend = HashMap<i64, Vec<TrendPoint>>;
