pub mod current_price_queries;
pub mod observation_queries;

pub use current_price_queries::CurrentPriceRow;
pub use observation_queries::ObservationRow;
