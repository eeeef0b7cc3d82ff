use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::models::PriceObservation;

// Raw observation row; availability stays TEXT until the store layer parses
// it into the domain enum.
#[derive(Debug, Clone, FromRow)]
pub struct ObservationRow {
    pub id: Uuid,
    pub product_id: i64,
    pub store_id: i64,
    pub price: BigDecimal,
    pub original_price: Option<BigDecimal>,
    pub currency: String,
    pub availability: String,
    pub stock_quantity: Option<i32>,
    pub source_url: Option<String>,
    pub observed_at: DateTime<Utc>,
}

pub async fn insert(pool: &PgPool, obs: &PriceObservation) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO price_observations
            (id, product_id, store_id, price, original_price, currency,
             availability, stock_quantity, source_url, observed_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        "#,
    )
    .bind(obs.id)
    .bind(obs.product_id)
    .bind(obs.store_id)
    .bind(&obs.price)
    .bind(&obs.original_price)
    .bind(&obs.currency)
    .bind(obs.availability.as_str())
    .bind(obs.stock_quantity)
    .bind(&obs.source_url)
    .bind(obs.observed_at)
    .execute(pool)
    .await?;
    Ok(())
}

/// Time-windowed range scan over the log, ascending by `observed_at`.
pub async fn fetch_since(
    pool: &PgPool,
    product_id: i64,
    store_id: Option<i64>,
    since: DateTime<Utc>,
) -> Result<Vec<ObservationRow>, sqlx::Error> {
    match store_id {
        Some(store_id) => {
            sqlx::query_as::<_, ObservationRow>(
                r#"
                SELECT id, product_id, store_id, price, original_price, currency,
                       availability, stock_quantity, source_url, observed_at
                FROM price_observations
                WHERE product_id = $1 AND store_id = $2 AND observed_at >= $3
                ORDER BY observed_at ASC
                "#,
            )
            .bind(product_id)
            .bind(store_id)
            .bind(since)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as::<_, ObservationRow>(
                r#"
                SELECT id, product_id, store_id, price, original_price, currency,
                       availability, stock_quantity, source_url, observed_at
                FROM price_observations
                WHERE product_id = $1 AND observed_at >= $2
                ORDER BY observed_at ASC
                "#,
            )
            .bind(product_id)
            .bind(since)
            .fetch_all(pool)
            .await
        }
    }
}
