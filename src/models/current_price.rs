use bigdecimal::{BigDecimal, ToPrimitive};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Availability, PriceObservation};

// The latest known price for one (product, store) pair. A materialized view
// over the observation log: every field except `is_active` is overwritten by
// the most recent observation applied to the pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentPriceRecord {
    pub product_id: i64,
    pub store_id: i64,
    pub price: BigDecimal,
    pub original_price: Option<BigDecimal>,
    pub currency: String,
    pub availability: Availability,
    pub stock_quantity: Option<i32>,
    pub source_url: Option<String>,
    pub last_observed_at: DateTime<Utc>,
    /// Manual suppression flag. False excludes the pair from comparisons even
    /// while observations keep arriving; never reset by the observation flow.
    pub is_active: bool,
}

impl CurrentPriceRecord {
    pub fn from_observation(obs: &PriceObservation) -> Self {
        Self {
            product_id: obs.product_id,
            store_id: obs.store_id,
            price: obs.price.clone(),
            original_price: obs.original_price.clone(),
            currency: obs.currency.clone(),
            availability: obs.availability,
            stock_quantity: obs.stock_quantity,
            source_url: obs.source_url.clone(),
            last_observed_at: obs.observed_at,
            is_active: true,
        }
    }

    /// Overwrite the price fields from a newer (or equally timestamped)
    /// observation. Equal timestamps replace, so idempotent re-delivery is
    /// safe. Returns false and leaves the record untouched when the
    /// observation is older than `last_observed_at`.
    pub fn absorb(&mut self, obs: &PriceObservation) -> bool {
        if obs.observed_at < self.last_observed_at {
            return false;
        }
        self.price = obs.price.clone();
        self.original_price = obs.original_price.clone();
        self.currency = obs.currency.clone();
        self.availability = obs.availability;
        self.stock_quantity = obs.stock_quantity;
        self.source_url = obs.source_url.clone();
        self.last_observed_at = obs.observed_at;
        true
    }

    pub fn is_on_sale(&self) -> bool {
        match &self.original_price {
            Some(original) => original > &self.price,
            None => false,
        }
    }

    /// Discount relative to the original price, rounded to one decimal place.
    /// None when the record is not on sale.
    pub fn discount_percentage(&self) -> Option<f64> {
        let original = self.original_price.as_ref()?;
        if original <= &self.price {
            return None;
        }
        let ratio = ((original - &self.price) / original).to_f64()?;
        Some((ratio * 1000.0).round() / 10.0)
    }

    /// True when the pair has not been observed for at least
    /// `threshold_hours` as of `now` and should be re-scraped.
    pub fn needs_refresh(&self, now: DateTime<Utc>, threshold_hours: i64) -> bool {
        now.signed_duration_since(self.last_observed_at) >= Duration::hours(threshold_hours)
    }
}
