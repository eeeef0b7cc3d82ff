use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::models::PriceObservation;

#[derive(Debug, Clone, FromRow)]
pub struct CurrentPriceRow {
    pub product_id: i64,
    pub store_id: i64,
    pub price: BigDecimal,
    pub original_price: Option<BigDecimal>,
    pub currency: String,
    pub availability: String,
    pub stock_quantity: Option<i32>,
    pub source_url: Option<String>,
    pub last_observed_at: DateTime<Utc>,
    pub is_active: bool,
}

const RETURNING_COLUMNS: &str = "product_id, store_id, price, original_price, currency, \
     availability, stock_quantity, source_url, last_observed_at, is_active";

/// Conditional upsert: the row is created on first observation, and updated
/// only when the observation is at least as new as the stored
/// `last_observed_at`. The WHERE clause on the conflict action is the
/// compare-and-swap that keeps concurrent appliers from regressing the row.
/// Returns None when the observation was older and the row was left alone.
pub async fn upsert_if_newer(
    pool: &PgPool,
    obs: &PriceObservation,
) -> Result<Option<CurrentPriceRow>, sqlx::Error> {
    sqlx::query_as::<_, CurrentPriceRow>(&format!(
        r#"
        INSERT INTO current_prices
            (product_id, store_id, price, original_price, currency,
             availability, stock_quantity, source_url, last_observed_at, is_active)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, TRUE)
        ON CONFLICT (product_id, store_id) DO UPDATE SET
            price = EXCLUDED.price,
            original_price = EXCLUDED.original_price,
            currency = EXCLUDED.currency,
            availability = EXCLUDED.availability,
            stock_quantity = EXCLUDED.stock_quantity,
            source_url = EXCLUDED.source_url,
            last_observed_at = EXCLUDED.last_observed_at
        WHERE current_prices.last_observed_at <= EXCLUDED.last_observed_at
        RETURNING {}
        "#,
        RETURNING_COLUMNS
    ))
    .bind(obs.product_id)
    .bind(obs.store_id)
    .bind(&obs.price)
    .bind(&obs.original_price)
    .bind(&obs.currency)
    .bind(obs.availability.as_str())
    .bind(obs.stock_quantity)
    .bind(&obs.source_url)
    .bind(obs.observed_at)
    .fetch_optional(pool)
    .await
}

pub async fn fetch_one(
    pool: &PgPool,
    product_id: i64,
    store_id: i64,
) -> Result<Option<CurrentPriceRow>, sqlx::Error> {
    sqlx::query_as::<_, CurrentPriceRow>(&format!(
        "SELECT {} FROM current_prices WHERE product_id = $1 AND store_id = $2",
        RETURNING_COLUMNS
    ))
    .bind(product_id)
    .bind(store_id)
    .fetch_optional(pool)
    .await
}

pub async fn fetch_for_product(
    pool: &PgPool,
    product_id: i64,
) -> Result<Vec<CurrentPriceRow>, sqlx::Error> {
    sqlx::query_as::<_, CurrentPriceRow>(&format!(
        "SELECT {} FROM current_prices WHERE product_id = $1 ORDER BY store_id ASC",
        RETURNING_COLUMNS
    ))
    .bind(product_id)
    .fetch_all(pool)
    .await
}

/// Returns the number of rows touched; zero means the pair does not exist.
pub async fn set_active(
    pool: &PgPool,
    product_id: i64,
    store_id: i64,
    active: bool,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE current_prices SET is_active = $3 WHERE product_id = $1 AND store_id = $2",
    )
    .bind(product_id)
    .bind(store_id)
    .bind(active)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}
