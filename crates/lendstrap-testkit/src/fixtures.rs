//!
//! Ready-made market configurations for bootstrap tests. Everything is
//! deterministic; tests adjust the returned value where a scenario needs
//! to differ.
//!

use crate::Fake;
use lendstrap::{
    config::{
        FeedProxies, MarketAddresses, MarketConfig, QuoteCurrency, RateStrategy, ReserveNaming,
        ReserveParams,
    },
    types::{Address, Network, Ray, Symbol},
};

/// 3.9% in ray units, the fixture's baseline borrow rate for every reserve.
#[must_use]
pub const fn baseline_rate() -> Ray {
    Ray::new(39 * 10u128.pow(24))
}

#[must_use]
pub const fn reserve_params(decimals: u8) -> ReserveParams {
    ReserveParams {
        decimals,
        ltv: 7500,
        liquidation_threshold: 8000,
        liquidation_bonus: 10_500,
        borrowing_enabled: true,
        stable_borrowing_enabled: true,
        reserve_factor: 1000,
        borrow_cap: 0,
        supply_cap: 0,
        strategy: RateStrategy {
            optimal_utilization: Ray::new(9 * 10u128.pow(26)),
            base_variable_rate: Ray::new(0),
            variable_slope1: Ray::new(4 * 10u128.pow(25)),
            variable_slope2: Ray::new(6 * 10u128.pow(26)),
            stable_slope1: Ray::new(2 * 10u128.pow(25)),
            stable_slope2: Ray::new(6 * 10u128.pow(26)),
        },
    }
}

#[must_use]
pub fn naming() -> ReserveNaming {
    ReserveNaming {
        ib_name_prefix: "Lendstrap interest bearing ".into(),
        ib_symbol_prefix: "l".into(),
        stable_debt_name_prefix: "Lendstrap stable debt bearing ".into(),
        stable_debt_symbol_prefix: "stableDebt".into(),
        variable_debt_name_prefix: "Lendstrap variable debt bearing ".into(),
        variable_debt_symbol_prefix: "variableDebt".into(),
        symbol_prefix: String::new(),
    }
}

/// A market whose reserves are exactly the `assets` handed in, with the
/// required per-network tables filled for `network`. The feed table is
/// taken as-is, so scenarios can include or omit the quote entry.
#[must_use]
pub fn market(
    network: Network,
    assets: &[(&str, Address)],
    feeds: &[(&str, Address)],
) -> MarketConfig {
    let mut addresses = MarketAddresses::default();
    addresses.registry.insert(network, Fake::address(0x0001_0001));
    addresses.treasury.insert(network, Fake::address(0x0002_0001));
    addresses
        .wrapped_native
        .insert(network, Fake::address(0x0002_0002));
    addresses.feed_proxies.insert(
        network,
        FeedProxies {
            aggregator: Fake::address(0x0002_0003),
            quote_aggregator: Fake::address(0x0002_0004),
        },
    );
    addresses.reserve_assets.insert(
        network,
        assets
            .iter()
            .map(|(symbol, address)| (Symbol::from(*symbol), *address))
            .collect(),
    );
    addresses.price_feeds.insert(
        network,
        feeds
            .iter()
            .map(|(symbol, address)| (Symbol::from(*symbol), *address))
            .collect(),
    );

    MarketConfig {
        market_id: "Lendstrap test market".into(),
        quote: QuoteCurrency {
            symbol: "USD".into(),
            address: Fake::address(0x0348),
            unit: 100_000_000,
        },
        naming: naming(),
        reserves: assets
            .iter()
            .map(|(symbol, _)| (Symbol::from(*symbol), reserve_params(18)))
            .collect(),
        baseline_rates: assets
            .iter()
            .map(|(symbol, _)| (Symbol::from(*symbol), baseline_rate()))
            .collect(),
        addresses,
    }
}
