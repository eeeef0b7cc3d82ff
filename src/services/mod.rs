pub mod comparison_service;
pub mod ingest_service;
pub mod ledger_service;
pub mod trend_service;
