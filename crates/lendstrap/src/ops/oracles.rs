//!
//! Price-feed pairing and baseline-rate table joins. Pure functions; the
//! orchestrator feeds their output into the oracle contracts.
//!

use crate::{
    config::MarketConfig,
    ops::{OpsError, resolve::require},
    types::{Address, Network, Ray, Symbol},
};
use std::collections::BTreeMap;

/// The symbol→asset map the price oracle tracks on `network`: the resolved
/// reserve assets plus the quote-currency pseudo-entry. Map order is the
/// iteration order every downstream pairing preserves.
pub fn tracked_assets(
    market: &MarketConfig,
    network: Network,
) -> Result<BTreeMap<Symbol, Address>, OpsError> {
    let assets = require(&market.addresses.reserve_assets, network, "reserve asset table")?;

    let mut tracked = assets.clone();
    tracked.insert(market.quote.symbol.clone(), market.quote.address);

    Ok(tracked)
}

/// Produce the index-aligned (assets, sources) sequences for the price
/// oracle. The quote currency is the implicit denominator and is never
/// paired; any other tracked symbol without a feed is a configuration
/// error, never a silently skipped (and therefore misaligned) entry.
pub fn pair_asset_feeds(
    tracked: &BTreeMap<Symbol, Address>,
    feeds: &BTreeMap<Symbol, Address>,
    quote_symbol: &Symbol,
) -> Result<(Vec<Address>, Vec<Address>), OpsError> {
    let n = tracked.len().saturating_sub(1);
    let mut assets = Vec::with_capacity(n);
    let mut sources = Vec::with_capacity(n);

    for (symbol, asset) in tracked {
        if symbol == quote_symbol {
            continue;
        }

        let feed = feeds
            .get(symbol)
            .ok_or_else(|| OpsError::MissingFeed(symbol.clone()))?;

        assets.push(*asset);
        sources.push(*feed);
    }

    Ok((assets, sources))
}

/// Join the configured baseline rates against the tracked assets,
/// producing index-aligned (assets, rates) sequences. Symbols whose asset
/// is not deployed on this network are left out, consistent with the
/// partial-market rule for reserves.
#[must_use]
pub fn baseline_rate_pairs(
    baseline: &BTreeMap<Symbol, Ray>,
    tracked: &BTreeMap<Symbol, Address>,
    quote_symbol: &Symbol,
) -> (Vec<Address>, Vec<Ray>) {
    let mut assets = Vec::new();
    let mut rates = Vec::new();

    for (symbol, rate) in baseline {
        if symbol == quote_symbol {
            continue;
        }
        let Some(asset) = tracked.get(symbol) else {
            continue;
        };

        assets.push(*asset);
        rates.push(*rate);
    }

    (assets, rates)
}

///
/// TESTS
///
