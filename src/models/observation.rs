use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    InStock,
    OutOfStock,
    Limited,
    PreOrder,
}

impl Availability {
    /// In-stock and limited-stock offers can actually be bought right now;
    /// pre-orders and out-of-stock listings cannot.
    pub fn is_purchasable(&self) -> bool {
        matches!(self, Availability::InStock | Availability::Limited)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Availability::InStock => "in_stock",
            Availability::OutOfStock => "out_of_stock",
            Availability::Limited => "limited",
            Availability::PreOrder => "pre_order",
        }
    }
}

impl FromStr for Availability {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_stock" => Ok(Availability::InStock),
            "out_of_stock" => Ok(Availability::OutOfStock),
            "limited" => Ok(Availability::Limited),
            "pre_order" => Ok(Availability::PreOrder),
            other => Err(format!("unknown availability: {}", other)),
        }
    }
}

// One point-in-time price reading for a product at a store. Immutable once
// recorded; corrections arrive as new observations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceObservation {
    pub id: Uuid,
    pub product_id: i64,
    pub store_id: i64,
    pub price: BigDecimal,
    /// Pre-sale price as listed by the store. May be lower than `price`
    /// (a sale ending is a valid observation); sale status is computed, not
    /// assumed at write time.
    pub original_price: Option<BigDecimal>,
    pub currency: String,
    pub availability: Availability,
    pub stock_quantity: Option<i32>,
    pub source_url: Option<String>,
    pub observed_at: DateTime<Utc>,
}

impl PriceObservation {
    pub fn new(
        product_id: i64,
        store_id: i64,
        price: BigDecimal,
        observed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            product_id,
            store_id,
            price,
            original_price: None,
            currency: "PHP".to_string(),
            availability: Availability::InStock,
            stock_quantity: None,
            source_url: None,
            observed_at,
        }
    }

    pub fn with_original_price(mut self, original_price: BigDecimal) -> Self {
        self.original_price = Some(original_price);
        self
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    pub fn with_availability(mut self, availability: Availability) -> Self {
        self.availability = availability;
        self
    }

    pub fn with_stock_quantity(mut self, stock_quantity: i32) -> Self {
        self.stock_quantity = Some(stock_quantity);
        self
    }

    pub fn with_source_url(mut self, source_url: impl Into<String>) -> Self {
        self.source_url = Some(source_url.into());
        self
    }
}
