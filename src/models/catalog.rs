use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    Active,
    Discontinued,
    ComingSoon,
}

impl ProductStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Active => "active",
            ProductStatus::Discontinued => "discontinued",
            ProductStatus::ComingSoon => "coming_soon",
        }
    }
}

impl FromStr for ProductStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(ProductStatus::Active),
            "discontinued" => Ok(ProductStatus::Discontinued),
            "coming_soon" => Ok(ProductStatus::ComingSoon),
            other => Err(format!("unknown product status: {}", other)),
        }
    }
}

// Catalog identity as the engine sees it. Names, brands, categories and the
// rest of the catalog live with the external catalog owner.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub status: ProductStatus,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Store {
    pub id: i64,
    pub is_active: bool,
}
