use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Availability, CurrentPriceRecord};

/// Which current price records participate in a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfferFilter {
    /// Only offers that can be bought right now (in stock or limited).
    AvailableOnly,
    /// Every eligible record regardless of availability, for "cheapest
    /// listed anywhere" questions.
    All,
}

// One store's current offer for a product, as returned by comparisons.
// Sale status and discount are frozen in at query time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Offer {
    pub store_id: i64,
    pub price: BigDecimal,
    pub original_price: Option<BigDecimal>,
    pub is_on_sale: bool,
    pub discount_percentage: Option<f64>,
    pub availability: Availability,
    pub last_observed_at: DateTime<Utc>,
    pub source_url: Option<String>,
}

impl Offer {
    pub fn from_record(record: &CurrentPriceRecord) -> Self {
        Self {
            store_id: record.store_id,
            price: record.price.clone(),
            original_price: record.original_price.clone(),
            is_on_sale: record.is_on_sale(),
            discount_percentage: record.discount_percentage(),
            availability: record.availability,
            last_observed_at: record.last_observed_at,
            source_url: record.source_url.clone(),
        }
    }
}
