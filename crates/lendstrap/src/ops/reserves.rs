//!
//! Reserve onboarding: derived token naming, the batched initialization
//! call, and the later per-reserve risk configuration pass.
//!

use crate::{
    Error,
    chain::{ChainService, ReserveInput},
    config::{MarketConfig, ReserveNaming, ReserveParams},
    log,
    ops::resolve::usable_address,
    types::{Address, Symbol},
};
use std::collections::BTreeMap;

///
/// ReservePlan
/// Which reserves of the market can actually be onboarded on the target
/// network. Reserves whose underlying asset is not deployed there are
/// excluded, not failed: markets are allowed to be partial per network.
///

#[derive(Clone, Debug)]
pub struct ReservePlan {
    pub batch: Vec<ReserveInput>,
    pub onboarded: Vec<Symbol>,
    pub skipped: Vec<Symbol>,
}

/// Derive the token triple and wiring for one reserve. Template
/// substitution only (prefix + underlying symbol) so the result is
/// deterministic and collision-free as long as symbols are unique.
#[must_use]
pub fn derive_reserve_input(
    symbol: &Symbol,
    params: &ReserveParams,
    underlying: Address,
    naming: &ReserveNaming,
    treasury: Address,
    incentives_controller: Address,
) -> ReserveInput {
    let infix = &naming.symbol_prefix;

    ReserveInput {
        underlying,
        decimals: params.decimals,
        ib_token_name: format!("{}{symbol}", naming.ib_name_prefix),
        ib_token_symbol: format!("{}{infix}{symbol}", naming.ib_symbol_prefix),
        stable_debt_name: format!("{}{symbol}", naming.stable_debt_name_prefix),
        stable_debt_symbol: format!("{}{infix}{symbol}", naming.stable_debt_symbol_prefix),
        variable_debt_name: format!("{}{symbol}", naming.variable_debt_name_prefix),
        variable_debt_symbol: format!("{}{infix}{symbol}", naming.variable_debt_symbol_prefix),
        treasury,
        incentives_controller,
        strategy: params.strategy.clone(),
    }
}

/// Build the onboarding batch for `market` from the network's resolved
/// asset table.
#[must_use]
pub fn plan_reserves(
    market: &MarketConfig,
    assets: &BTreeMap<Symbol, Address>,
    treasury: Address,
    incentives_controller: Address,
) -> ReservePlan {
    let mut plan = ReservePlan {
        batch: Vec::new(),
        onboarded: Vec::new(),
        skipped: Vec::new(),
    };

    for (symbol, params) in &market.reserves {
        let underlying = assets.get(symbol).copied().and_then(usable_address);

        match underlying {
            Some(underlying) => {
                plan.batch.push(derive_reserve_input(
                    symbol,
                    params,
                    underlying,
                    &market.naming,
                    treasury,
                    incentives_controller,
                ));
                plan.onboarded.push(symbol.clone());
            }
            None => plan.skipped.push(symbol.clone()),
        }
    }

    plan
}

/// Submit the batch of not-yet-initialized reserves in a single confirmed
/// action so treasury, incentives controller, and market id wiring is
/// uniform across it. Reserves whose tokens already exist in the pool are
/// left untouched, which is what keeps re-runs free of duplicate
/// creations. Returns the symbols actually initialized this run.
pub async fn init_reserves(
    chain: &dyn ChainService,
    lending_pool: Address,
    configurator: Address,
    market_id: &str,
    plan: &ReservePlan,
) -> Result<Vec<Symbol>, Error> {
    for symbol in &plan.skipped {
        log!(Warn, "⏭  {symbol}: no deployed asset on this network, skipping");
    }

    let mut pending = Vec::with_capacity(plan.batch.len());
    let mut initialized = Vec::new();

    for (input, symbol) in plan.batch.iter().zip(&plan.onboarded) {
        if chain.reserve_active(lending_pool, input.underlying).await? {
            log!(Info, "♻️  {symbol}: reserve already initialized");
        } else {
            pending.push(input.clone());
            initialized.push(symbol.clone());
        }
    }

    if pending.is_empty() {
        log!(Warn, "no reserves left to initialize in this market");
        return Ok(initialized);
    }

    chain
        .init_reserves(configurator, market_id, &pending)
        .await?;
    log!(
        Ok,
        "⚡ initialized {} reserves: {}",
        initialized.len(),
        initialized
            .iter()
            .map(Symbol::as_str)
            .collect::<Vec<_>>()
            .join(", "),
    );

    Ok(initialized)
}

/// Apply each onboarded reserve's risk parameters, one confirmed action at
/// a time. Runs strictly after `init_reserves`: enabling borrowing on a
/// reserve presupposes its tokens exist.
pub async fn configure_reserves(
    chain: &dyn ChainService,
    admin: Address,
    market: &MarketConfig,
    assets: &BTreeMap<Symbol, Address>,
    plan: &ReservePlan,
) -> Result<(), Error> {
    for symbol in &plan.onboarded {
        let Some(params) = market.reserves.get(symbol) else {
            continue;
        };
        let Some(asset) = assets.get(symbol).copied().and_then(usable_address) else {
            continue;
        };

        chain.configure_reserve(admin, asset, params).await?;
        log!(
            Ok,
            "🛠  configured {symbol}: ltv {} threshold {} borrowing {}",
            params.ltv,
            params.liquidation_threshold,
            params.borrowing_enabled,
        );
    }

    Ok(())
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::RateStrategy, types::Ray};
    use std::collections::BTreeSet;

    fn addr(tag: u8) -> Address {
        let mut bytes = [0u8; 20];
        bytes[19] = tag;

        Address::new(bytes)
    }

    fn naming() -> ReserveNaming {
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

    fn params() -> ReserveParams {
        ReserveParams {
            decimals: 18,
            ltv: 7500,
            liquidation_threshold: 8000,
            liquidation_bonus: 10_500,
            borrowing_enabled: true,
            stable_borrowing_enabled: false,
            reserve_factor: 1000,
            borrow_cap: 0,
            supply_cap: 0,
            strategy: RateStrategy {
                optimal_utilization: Ray::new(8),
                base_variable_rate: Ray::new(0),
                variable_slope1: Ray::new(4),
                variable_slope2: Ray::new(75),
                stable_slope1: Ray::new(2),
                stable_slope2: Ray::new(75),
            },
        }
    }

    fn market(reserves: &[&str]) -> MarketConfig {
        MarketConfig {
            market_id: "test market".into(),
            quote: crate::config::QuoteCurrency {
                symbol: "USD".into(),
                address: addr(0xF0),
                unit: 100_000_000,
            },
            naming: naming(),
            reserves: reserves
                .iter()
                .map(|s| (Symbol::from(*s), params()))
                .collect(),
            baseline_rates: BTreeMap::new(),
            addresses: crate::config::MarketAddresses::default(),
        }
    }

    #[test]
    fn naming_derivation_is_exact() {
        let input = derive_reserve_input(
            &"DAI".into(),
            &params(),
            addr(0xD1),
            &naming(),
            addr(0xEE),
            Address::ZERO,
        );

        assert_eq!(input.ib_token_name, "Lendstrap interest bearing DAI");
        assert_eq!(input.ib_token_symbol, "lDAI");
        assert_eq!(input.stable_debt_symbol, "stableDebtDAI");
        assert_eq!(input.variable_debt_symbol, "variableDebtDAI");
        assert_eq!(input.treasury, addr(0xEE));
        assert_eq!(input.incentives_controller, Address::ZERO);
    }

    #[test]
    fn symbol_prefix_disambiguates_namespaces() {
        let mut naming = naming();
        naming.symbol_prefix = "Eth".into();

        let input = derive_reserve_input(
            &"DAI".into(),
            &params(),
            addr(0xD1),
            &naming,
            addr(0xEE),
            Address::ZERO,
        );

        assert_eq!(input.ib_token_symbol, "lEthDAI");
        assert_eq!(input.stable_debt_symbol, "stableDebtEthDAI");
    }

    #[test]
    fn derived_symbols_are_collision_free_across_the_set() {
        let market = market(&["DAI", "USDC", "WBTC", "WETH"]);
        let assets: BTreeMap<Symbol, Address> = ["DAI", "USDC", "WBTC", "WETH"]
            .iter()
            .enumerate()
            .map(|(i, s)| (Symbol::from(*s), addr(i as u8 + 1)))
            .collect();

        let plan = plan_reserves(&market, &assets, addr(0xEE), Address::ZERO);

        let mut names = BTreeSet::new();
        for input in &plan.batch {
            names.insert(input.ib_token_symbol.clone());
            names.insert(input.stable_debt_symbol.clone());
            names.insert(input.variable_debt_symbol.clone());
        }

        assert_eq!(names.len(), plan.batch.len() * 3);
    }

    #[test]
    fn partial_markets_exclude_undeployed_reserves_without_error() {
        let market = market(&["DAI", "USDC", "WETH"]);

        // WETH configured but not deployed: absent from the table entirely
        // and, equivalently, present as the zero sentinel
        for weth_entry in [None, Some(Address::ZERO)] {
            let mut assets: BTreeMap<Symbol, Address> =
                [("DAI".into(), addr(1)), ("USDC".into(), addr(2))]
                    .into_iter()
                    .collect();
            if let Some(zero) = weth_entry {
                assets.insert("WETH".into(), zero);
            }

            let plan = plan_reserves(&market, &assets, addr(0xEE), Address::ZERO);

            assert_eq!(plan.onboarded, vec!["DAI".into(), "USDC".into()]);
            assert_eq!(plan.skipped, vec![Symbol::from("WETH")]);
            assert_eq!(plan.batch.len(), 2);
        }
    }
}
