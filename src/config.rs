use std::collections::HashSet;

use chrono::Duration;

const DEFAULT_CURRENCIES: &[&str] = &["PHP", "USD", "EUR", "GBP", "JPY", "SGD", "AUD"];

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// How far in the future an observation's timestamp may sit before it is
    /// rejected as malformed (scraper clock drift allowance).
    pub skew_tolerance: Duration,
    /// Default staleness threshold for `needs_refresh`, overridable per call.
    pub default_stale_after_hours: i64,
    /// Accepted ISO 4217 currency codes.
    pub accepted_currencies: HashSet<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            skew_tolerance: Duration::minutes(5),
            default_stale_after_hours: 24,
            accepted_currencies: DEFAULT_CURRENCIES
                .iter()
                .map(|c| c.to_string())
                .collect(),
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let skew_minutes = std::env::var("PRICE_SKEW_TOLERANCE_MINUTES")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(5);
        let stale_hours = std::env::var("PRICE_STALE_AFTER_HOURS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(defaults.default_stale_after_hours);
        let currencies = std::env::var("PRICE_CURRENCIES")
            .map(|v| {
                v.split(',')
                    .map(|c| c.trim().to_uppercase())
                    .filter(|c| !c.is_empty())
                    .collect::<HashSet<_>>()
            })
            .unwrap_or(defaults.accepted_currencies);

        Self {
            skew_tolerance: Duration::minutes(skew_minutes),
            default_stale_after_hours: stale_hours,
            accepted_currencies: currencies,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.default_stale_after_hours <= 0 {
            return Err("stale-after threshold must be positive".to_string());
        }
        if self.accepted_currencies.is_empty() {
            return Err("at least one accepted currency is required".to_string());
        }
        for code in &self.accepted_currencies {
            if code.len() != 3 || !code.chars().all(|c| c.is_ascii_uppercase()) {
                return Err(format!("invalid currency code: {}", code));
            }
        }
        Ok(())
    }
}
