use std::str::FromStr;
use std::sync::Arc;

use anyhow::Result;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Duration, TimeZone, Utc};
use pricewatch::models::{Availability, OfferFilter, PriceObservation, ProductStatus};
use pricewatch::{EngineConfig, EngineError, InMemoryCatalog, PriceEngine};

const PRODUCT: i64 = 1;

fn dec(s: &str) -> BigDecimal {
    BigDecimal::from_str(s).unwrap()
}

fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

fn setup() -> (PriceEngine, Arc<InMemoryCatalog>) {
    let catalog = Arc::new(InMemoryCatalog::new());
    catalog.upsert_product(PRODUCT, ProductStatus::Active);
    for store_id in [1, 2, 3, 7] {
        catalog.upsert_store(store_id, true);
    }
    let engine = PriceEngine::in_memory(catalog.clone(), EngineConfig::default());
    (engine, catalog)
}

fn obs(store_id: i64, price: &str, observed_at: DateTime<Utc>) -> PriceObservation {
    PriceObservation::new(PRODUCT, store_id, dec(price), observed_at)
}

#[tokio::test]
async fn first_observation_creates_current_price_record() -> Result<()> {
    let (engine, _) = setup();
    let now = fixed_now();

    let record = engine
        .record_observation(
            obs(1, "1499.00", now - Duration::hours(2))
                .with_original_price(dec("1999.00"))
                .with_stock_quantity(5)
                .with_source_url("https://store-one.example/p/1"),
            now,
        )
        .await?;

    assert_eq!(record.product_id, PRODUCT);
    assert_eq!(record.store_id, 1);
    assert_eq!(record.price, dec("1499.00"));
    assert_eq!(record.stock_quantity, Some(5));
    assert!(record.is_active);
    assert!(record.is_on_sale());

    let fetched = engine.current_price(PRODUCT, 1).await?.unwrap();
    assert_eq!(fetched.price, record.price);
    assert_eq!(fetched.last_observed_at, record.last_observed_at);
    Ok(())
}

#[tokio::test]
async fn out_of_order_observation_keeps_ledger_but_lands_in_history() -> Result<()> {
    let (engine, _) = setup();
    let now = fixed_now();

    engine
        .record_observation(obs(1, "100", now - Duration::hours(1)), now)
        .await?;
    // One hour older than the record: must not regress the current price
    engine
        .record_observation(obs(1, "90", now - Duration::hours(2)), now)
        .await?;

    let record = engine.current_price(PRODUCT, 1).await?.unwrap();
    assert_eq!(record.price, dec("100"));
    assert_eq!(record.last_observed_at, now - Duration::hours(1));

    let trend = engine.price_trend(PRODUCT, Some(1), 30, now).await?;
    let series = &trend[&1];
    assert_eq!(series.len(), 2);
    assert_eq!(series[0].price, dec("90"));
    assert_eq!(series[1].price, dec("100"));
    Ok(())
}

#[tokio::test]
async fn replaying_the_same_observation_is_idempotent() -> Result<()> {
    let (engine, _) = setup();
    let now = fixed_now();
    let observation = obs(1, "250.00", now - Duration::minutes(30));

    let first = engine.record_observation(observation.clone(), now).await?;
    let second = engine.record_observation(observation, now).await?;

    assert_eq!(first.price, second.price);
    assert_eq!(first.last_observed_at, second.last_observed_at);
    assert_eq!(first.is_active, second.is_active);
    Ok(())
}

#[tokio::test]
async fn equal_prices_tie_break_on_lower_store_id() -> Result<()> {
    let (engine, _) = setup();
    let now = fixed_now();

    engine
        .record_observation(obs(7, "100", now - Duration::hours(1)), now)
        .await?;
    engine
        .record_observation(obs(2, "100", now - Duration::hours(1)), now)
        .await?;

    let lowest = engine
        .lowest_price(PRODUCT, OfferFilter::AvailableOnly)
        .await?
        .unwrap();
    assert_eq!(lowest.store_id, 2);
    Ok(())
}

#[tokio::test]
async fn offers_sorted_by_price_then_store_id() -> Result<()> {
    let (engine, _) = setup();
    let now = fixed_now();

    engine
        .record_observation(obs(3, "120", now - Duration::hours(1)), now)
        .await?;
    engine
        .record_observation(obs(1, "80", now - Duration::hours(1)), now)
        .await?;
    engine
        .record_observation(obs(7, "80", now - Duration::hours(1)), now)
        .await?;

    let offers = engine.compare_offers(PRODUCT, OfferFilter::All).await?;
    let ranking: Vec<i64> = offers.iter().map(|o| o.store_id).collect();
    assert_eq!(ranking, vec![1, 7, 3]);
    Ok(())
}

#[tokio::test]
async fn suppressed_record_is_excluded_from_comparisons() -> Result<()> {
    let (engine, _) = setup();
    let now = fixed_now();

    engine
        .record_observation(obs(1, "50", now - Duration::hours(1)), now)
        .await?;
    engine
        .record_observation(obs(2, "80", now - Duration::hours(1)), now)
        .await?;
    engine.set_active(PRODUCT, 1, false).await?;

    let lowest = engine
        .lowest_price(PRODUCT, OfferFilter::AvailableOnly)
        .await?
        .unwrap();
    assert_eq!(lowest.store_id, 2);
    assert_eq!(lowest.price, dec("80"));

    // Observations keep flowing while suppressed; record updates but stays out
    engine
        .record_observation(obs(1, "45", now - Duration::minutes(10)), now)
        .await?;
    let record = engine.current_price(PRODUCT, 1).await?.unwrap();
    assert_eq!(record.price, dec("45"));
    assert!(!record.is_active);
    let offers = engine
        .compare_offers(PRODUCT, OfferFilter::AvailableOnly)
        .await?;
    assert!(offers.iter().all(|o| o.store_id != 1));

    engine.set_active(PRODUCT, 1, true).await?;
    let lowest = engine
        .lowest_price(PRODUCT, OfferFilter::AvailableOnly)
        .await?
        .unwrap();
    assert_eq!(lowest.store_id, 1);
    Ok(())
}

#[tokio::test]
async fn inactive_store_is_excluded_from_comparisons() -> Result<()> {
    let (engine, catalog) = setup();
    let now = fixed_now();

    engine
        .record_observation(obs(1, "50", now - Duration::hours(1)), now)
        .await?;
    engine
        .record_observation(obs(2, "80", now - Duration::hours(1)), now)
        .await?;
    catalog.upsert_store(1, false);

    let lowest = engine
        .lowest_price(PRODUCT, OfferFilter::AvailableOnly)
        .await?
        .unwrap();
    assert_eq!(lowest.store_id, 2);
    Ok(())
}

#[tokio::test]
async fn discontinued_product_has_no_offers() -> Result<()> {
    let (engine, catalog) = setup();
    let now = fixed_now();

    engine
        .record_observation(obs(1, "50", now - Duration::hours(1)), now)
        .await?;
    catalog.upsert_product(PRODUCT, ProductStatus::Discontinued);

    assert!(engine
        .compare_offers(PRODUCT, OfferFilter::All)
        .await?
        .is_empty());
    assert!(engine
        .lowest_price(PRODUCT, OfferFilter::AvailableOnly)
        .await?
        .is_none());
    assert!(!engine.is_available(PRODUCT).await?);
    Ok(())
}

#[tokio::test]
async fn availability_filter_distinguishes_query_modes() -> Result<()> {
    let (engine, _) = setup();
    let now = fixed_now();

    engine
        .record_observation(
            obs(1, "60", now - Duration::hours(1)).with_availability(Availability::OutOfStock),
            now,
        )
        .await?;
    engine
        .record_observation(
            obs(2, "90", now - Duration::hours(1)).with_availability(Availability::Limited),
            now,
        )
        .await?;
    engine
        .record_observation(
            obs(3, "70", now - Duration::hours(1)).with_availability(Availability::PreOrder),
            now,
        )
        .await?;

    // "lowest available" and "cheapest listed" are different questions
    let available = engine
        .compare_offers(PRODUCT, OfferFilter::AvailableOnly)
        .await?;
    assert_eq!(available.len(), 1);
    assert_eq!(available[0].store_id, 2);

    let all = engine.compare_offers(PRODUCT, OfferFilter::All).await?;
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].store_id, 1);
    assert_eq!(all[0].price, dec("60"));

    assert!(engine.is_available(PRODUCT).await?);
    Ok(())
}

#[tokio::test]
async fn no_offers_is_an_empty_state_not_an_error() -> Result<()> {
    let (engine, _) = setup();

    assert!(engine
        .compare_offers(PRODUCT, OfferFilter::All)
        .await?
        .is_empty());
    assert!(engine
        .lowest_price(PRODUCT, OfferFilter::All)
        .await?
        .is_none());
    assert!(!engine.is_available(PRODUCT).await?);
    assert!(engine.current_price(PRODUCT, 1).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn unknown_references_are_rejected() {
    let (engine, _) = setup();
    let now = fixed_now();

    let unknown_product = PriceObservation::new(999, 1, dec("10"), now - Duration::hours(1));
    assert!(matches!(
        engine.record_observation(unknown_product, now).await,
        Err(EngineError::UnknownReference(_))
    ));

    let unknown_store = obs(999, "10", now - Duration::hours(1));
    assert!(matches!(
        engine.record_observation(unknown_store, now).await,
        Err(EngineError::UnknownReference(_))
    ));

    assert!(matches!(
        engine.compare_offers(999, OfferFilter::All).await,
        Err(EngineError::UnknownReference(_))
    ));
}

#[tokio::test]
async fn rejected_observation_leaves_no_trace() -> Result<()> {
    let (engine, _) = setup();
    let now = fixed_now();

    let future = obs(1, "10", now + Duration::hours(1));
    assert!(matches!(
        engine.record_observation(future, now).await,
        Err(EngineError::Validation(_))
    ));
    let negative = obs(1, "-1", now - Duration::hours(1));
    assert!(matches!(
        engine.record_observation(negative, now).await,
        Err(EngineError::Validation(_))
    ));

    assert!(engine.current_price(PRODUCT, 1).await?.is_none());
    assert!(engine.price_trend(PRODUCT, None, 30, now).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn needs_refresh_boundary() -> Result<()> {
    let (engine, _) = setup();
    let now = fixed_now();
    engine.record_observation(obs(1, "100", now), now).await?;

    let just_before = now + Duration::hours(24) - Duration::seconds(1);
    let exactly = now + Duration::hours(24);
    assert!(!engine.needs_refresh(PRODUCT, 1, just_before, None).await?);
    assert!(engine.needs_refresh(PRODUCT, 1, exactly, None).await?);
    assert!(
        engine
            .needs_refresh(PRODUCT, 1, exactly + Duration::days(3), None)
            .await?
    );

    // Per-call threshold override
    assert!(
        engine
            .needs_refresh(PRODUCT, 1, now + Duration::hours(6), Some(6))
            .await?
    );
    assert!(
        !engine
            .needs_refresh(PRODUCT, 1, now + Duration::hours(6), Some(7))
            .await?
    );

    assert!(matches!(
        engine.needs_refresh(PRODUCT, 2, now, None).await,
        Err(EngineError::NotFound)
    ));
    Ok(())
}

#[tokio::test]
async fn set_active_on_missing_pair_is_not_found() {
    let (engine, _) = setup();
    assert!(matches!(
        engine.set_active(PRODUCT, 1, false).await,
        Err(EngineError::NotFound)
    ));
}

#[tokio::test]
async fn trend_respects_window_and_store_scope() -> Result<()> {
    let (engine, _) = setup();
    let now = fixed_now();

    engine
        .record_observation(obs(1, "100", now - Duration::days(40)), now)
        .await?;
    engine
        .record_observation(obs(1, "95", now - Duration::days(10)), now)
        .await?;
    engine
        .record_observation(obs(2, "97", now - Duration::days(5)), now)
        .await?;

    let trend = engine.price_trend(PRODUCT, None, 30, now).await?;
    assert_eq!(trend.len(), 2);
    assert_eq!(trend[&1].len(), 1);
    assert_eq!(trend[&1][0].price, dec("95"));

    let scoped = engine.price_trend(PRODUCT, Some(2), 30, now).await?;
    assert_eq!(scoped.len(), 1);
    assert_eq!(scoped[&2].len(), 1);

    let empty = engine.price_trend(PRODUCT, Some(3), 30, now).await?;
    assert!(empty.is_empty());

    assert!(matches!(
        engine.price_trend(PRODUCT, None, 0, now).await,
        Err(EngineError::Validation(_))
    ));
    Ok(())
}

#[tokio::test]
async fn trend_is_chronological_and_keeps_same_date_points() -> Result<()> {
    let (engine, _) = setup();
    let now = fixed_now();

    // Recorded out of chronological order, two points on the same date
    for hours in [3, 9, 6] {
        engine
            .record_observation(
                obs(1, &format!("{}", 100 + hours), now - Duration::hours(hours)),
                now,
            )
            .await?;
    }
    engine
        .record_observation(obs(1, "200", now - Duration::days(2)), now)
        .await?;

    let trend = engine.price_trend(PRODUCT, Some(1), 7, now).await?;
    let series = &trend[&1];
    assert_eq!(series.len(), 4);
    assert!(series
        .windows(2)
        .all(|pair| pair[0].observed_at <= pair[1].observed_at));
    assert_eq!(series[0].price, dec("200"));
    Ok(())
}

#[tokio::test]
async fn discount_surfaces_in_offers() -> Result<()> {
    let (engine, _) = setup();
    let now = fixed_now();

    engine
        .record_observation(
            obs(1, "4500.00", now - Duration::hours(1)).with_original_price(dec("5000.00")),
            now,
        )
        .await?;
    engine
        .record_observation(
            obs(2, "5000.00", now - Duration::hours(1)).with_original_price(dec("4500.00")),
            now,
        )
        .await?;

    let offers = engine.compare_offers(PRODUCT, OfferFilter::All).await?;
    let on_sale = offers.iter().find(|o| o.store_id == 1).unwrap();
    assert!(on_sale.is_on_sale);
    assert_eq!(on_sale.discount_percentage, Some(10.0));

    let ended = offers.iter().find(|o| o.store_id == 2).unwrap();
    assert!(!ended.is_on_sale);
    assert_eq!(ended.discount_percentage, None);
    Ok(())
}
