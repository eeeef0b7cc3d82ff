use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::errors::EngineError;
use crate::models::{Product, ProductStatus, Store};

/// Resolves product and store ids to their catalog identity. The catalog is
/// owned by an external collaborator; the engine only consults it for
/// existence and active status when validating ingests and filtering offers.
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn product(&self, product_id: i64) -> Result<Option<Product>, EngineError>;

    async fn store(&self, store_id: i64) -> Result<Option<Store>, EngineError>;
}

/// Catalog backed by plain maps. Suits embedders that sync catalog state into
/// the process, and every test in this crate.
#[derive(Default)]
pub struct InMemoryCatalog {
    products: RwLock<HashMap<i64, Product>>,
    stores: RwLock<HashMap<i64, Store>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert_product(&self, id: i64, status: ProductStatus) {
        self.products.write().insert(id, Product { id, status });
    }

    pub fn upsert_store(&self, id: i64, is_active: bool) {
        self.stores.write().insert(id, Store { id, is_active });
    }
}

#[async_trait]
impl Catalog for InMemoryCatalog {
    async fn product(&self, product_id: i64) -> Result<Option<Product>, EngineError> {
        Ok(self.products.read().get(&product_id).copied())
    }

    async fn store(&self, store_id: i64) -> Result<Option<Store>, EngineError> {
        Ok(self.stores.read().get(&store_id).copied())
    }
}
