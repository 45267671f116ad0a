use crate::types::{Address, PerNetwork, Ray, Symbol};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

///
/// MarketConfig
///

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MarketConfig {
    /// Human-readable market identifier, stamped into every reserve batch.
    pub market_id: String,

    pub quote: QuoteCurrency,

    pub naming: ReserveNaming,

    /// Risk and strategy parameters per reserve symbol. Which of these are
    /// actually onboarded on a given network depends on the resolved
    /// reserve-asset table (partial markets are allowed).
    pub reserves: BTreeMap<Symbol, ReserveParams>,

    /// Baseline borrow-rate references used to seed a freshly deployed
    /// rate oracle. Never applied to a pre-existing oracle.
    #[serde(default)]
    pub baseline_rates: BTreeMap<Symbol, Ray>,

    pub addresses: MarketAddresses,
}

///
/// QuoteCurrency
/// The denominator of every price the oracle reports. Not a real token;
/// `address` is the fixed sentinel the oracle uses to identify it.
///

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct QuoteCurrency {
    pub symbol: Symbol,
    pub address: Address,

    /// Price unit of the quote currency (e.g. 100000000 for 8 decimals).
    pub unit: u64,
}

///
/// ReserveNaming
/// Templates for the token triple derived per reserve. All derivation is
/// prefix + underlying symbol, with `symbol_prefix` available to
/// disambiguate multiple markets sharing one network.
///

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ReserveNaming {
    pub ib_name_prefix: String,
    pub ib_symbol_prefix: String,
    pub stable_debt_name_prefix: String,
    pub stable_debt_symbol_prefix: String,
    pub variable_debt_name_prefix: String,
    pub variable_debt_symbol_prefix: String,

    #[serde(default)]
    pub symbol_prefix: String,
}

///
/// ReserveParams
/// Per-reserve risk configuration. The orchestrator passes these through
/// unchanged; it never interprets them beyond validation.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ReserveParams {
    pub decimals: u8,

    /// Loan-to-value, basis points.
    pub ltv: u16,

    /// Basis points; 0 disables use as collateral.
    pub liquidation_threshold: u16,

    /// Basis points over 100% paid to liquidators.
    pub liquidation_bonus: u16,

    pub borrowing_enabled: bool,
    pub stable_borrowing_enabled: bool,

    /// Share of interest routed to the treasury, basis points.
    pub reserve_factor: u16,

    #[serde(default)]
    pub borrow_cap: u64,

    #[serde(default)]
    pub supply_cap: u64,

    pub strategy: RateStrategy,
}

///
/// RateStrategy
/// Interest-rate strategy constants, opaque to the orchestrator.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RateStrategy {
    pub optimal_utilization: Ray,
    pub base_variable_rate: Ray,
    pub variable_slope1: Ray,
    pub variable_slope2: Ray,
    pub stable_slope1: Ray,
    pub stable_slope2: Ray,
}

///
/// MarketAddresses
/// Per-network address tables. Required tables (registry, treasury,
/// reserve assets, price feeds, wrapped native) abort the run when absent
/// for the target network; optional component tables feed the idempotent
/// provisioning decisions.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MarketAddresses {
    pub registry: PerNetwork<Address>,
    pub treasury: PerNetwork<Address>,

    #[serde(default)]
    pub incentives_controller: PerNetwork<Address>,

    pub reserve_assets: PerNetwork<BTreeMap<Symbol, Address>>,
    pub price_feeds: PerNetwork<BTreeMap<Symbol, Address>>,

    #[serde(default)]
    pub price_oracle: PerNetwork<Address>,

    #[serde(default)]
    pub rate_oracle: PerNetwork<Address>,

    #[serde(default)]
    pub fallback_oracle: PerNetwork<Address>,

    #[serde(default)]
    pub collateral_manager: PerNetwork<Address>,

    #[serde(default)]
    pub gateway: PerNetwork<Address>,

    pub wrapped_native: PerNetwork<Address>,

    #[serde(default)]
    pub feed_proxies: PerNetwork<FeedProxies>,
}

///
/// FeedProxies
/// Aggregator proxy pair handed to the UI data provider.
///

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FeedProxies {
    pub aggregator: Address,
    pub quote_aggregator: Address,
}
