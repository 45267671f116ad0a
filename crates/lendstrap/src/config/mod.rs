//!
//! Market configuration: the static, versioned bundle describing one
//! market's reserves, risk parameters, naming templates, and per-network
//! address tables. Loaded once per run and treated as read-only.
//!

mod model;

pub use model::*;

use std::path::Path;
use thiserror::Error as ThisError;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
#[remain::sorted]
pub enum ConfigError {
    #[error("reserve {0}: liquidation bonus must exceed 100% when liquidatable")]
    BonusNotLiquidating(String),

    #[error("cannot read market config {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("reserve {0}: ltv exceeds liquidation threshold")]
    LtvAboveThreshold(String),

    #[error(transparent)]
    Parse(#[from] toml::de::Error),

    #[error("quote currency {0} must not appear in the reserve set")]
    QuoteIsReserve(String),

    #[error("quote currency address must not be zero")]
    ZeroQuoteAddress,
}

impl MarketConfig {
    /// Parse and validate a market configuration from TOML text.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;

        Ok(config)
    }

    /// Load a market configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        Self::from_toml_str(&raw)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.quote.address.is_zero() {
            return Err(ConfigError::ZeroQuoteAddress);
        }
        if self.reserves.contains_key(&self.quote.symbol) {
            return Err(ConfigError::QuoteIsReserve(self.quote.symbol.to_string()));
        }

        for (symbol, params) in &self.reserves {
            if params.ltv > params.liquidation_threshold {
                return Err(ConfigError::LtvAboveThreshold(symbol.to_string()));
            }
            // threshold 0 disables collateral use entirely; a bonus at or
            // below 100% would pay liquidators nothing
            if params.liquidation_threshold > 0 && params.liquidation_bonus <= 10_000 {
                return Err(ConfigError::BonusNotLiquidating(symbol.to_string()));
            }
        }

        Ok(())
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Network;

    const SAMPLE: &str = include_str!("../../../../markets/main.toml");

    #[test]
    fn sample_market_parses_and_validates() {
        let market = MarketConfig::from_toml_str(SAMPLE).unwrap();

        assert!(market.reserves.contains_key(&"DAI".into()));
        assert_eq!(market.quote.symbol, "USD".into());
        assert!(
            market
                .addresses
                .reserve_assets
                .resolve(Network::Mainnet)
                .is_some()
        );
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let doc = SAMPLE.replace("market_id =", "market_identifier =");
        assert!(matches!(
            MarketConfig::from_toml_str(&doc),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn ltv_above_threshold_is_rejected() {
        let doc = SAMPLE.replace("ltv = 7500", "ltv = 9500");
        assert!(matches!(
            MarketConfig::from_toml_str(&doc),
            Err(ConfigError::LtvAboveThreshold(_))
        ));
    }

    #[test]
    fn quote_symbol_may_not_be_a_reserve() {
        let doc = SAMPLE.replace("reserves.DAI", "reserves.USD");
        assert!(matches!(
            MarketConfig::from_toml_str(&doc),
            Err(ConfigError::QuoteIsReserve(_))
        ));
    }
}
