use crate::catalog::Catalog;
use crate::errors::EngineError;
use crate::models::{Offer, OfferFilter, ProductStatus};
use crate::store::LedgerStore;

/// Ranked cross-store offer list for a product, cheapest first, ties broken
/// by ascending store id for determinism.
///
/// Eligibility is an explicit predicate over materialized records: the record
/// must be active, its store active and the product itself active. With
/// `OfferFilter::AvailableOnly` the offer must also be purchasable right now.
/// An empty list is the normal "no current offer" state, not an error.
pub async fn compare_offers(
    ledger: &dyn LedgerStore,
    catalog: &dyn Catalog,
    product_id: i64,
    filter: OfferFilter,
) -> Result<Vec<Offer>, EngineError> {
    let product = catalog
        .product(product_id)
        .await?
        .ok_or_else(|| EngineError::UnknownReference(format!("product {}", product_id)))?;
    if product.status != ProductStatus::Active {
        return Ok(Vec::new());
    }

    let mut offers = Vec::new();
    for record in ledger.fetch_for_product(product_id).await? {
        if !record.is_active {
            continue;
        }
        if filter == OfferFilter::AvailableOnly && !record.availability.is_purchasable() {
            continue;
        }
        match catalog.store(record.store_id).await? {
            Some(store) if store.is_active => offers.push(Offer::from_record(&record)),
            _ => continue,
        }
    }

    offers.sort_by(|a, b| a.price.cmp(&b.price).then(a.store_id.cmp(&b.store_id)));
    Ok(offers)
}

pub async fn lowest_price(
    ledger: &dyn LedgerStore,
    catalog: &dyn Catalog,
    product_id: i64,
    filter: OfferFilter,
) -> Result<Option<Offer>, EngineError> {
    Ok(compare_offers(ledger, catalog, product_id, filter)
        .await?
        .into_iter()
        .next())
}

pub async fn is_available(
    ledger: &dyn LedgerStore,
    catalog: &dyn Catalog,
    product_id: i64,
) -> Result<bool, EngineError> {
    Ok(
        !compare_offers(ledger, catalog, product_id, OfferFilter::AvailableOnly)
            .await?
            .is_empty(),
    )
}
