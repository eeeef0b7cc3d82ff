mod catalog;
mod current_price;
mod observation;
mod offer;
mod trend;

pub use catalog::{Product, ProductStatus, Store};
pub use current_price::CurrentPriceRecord;
pub use observation::{Availability, PriceObservation};
pub use offer::{Offer, OfferFilter};
pub use trend::{PriceTrend, TrendPoint};
