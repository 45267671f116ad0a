//! End-to-end bootstrap runs against the in-memory mock chain.

use lendstrap::{
    chain::{Component, ForkLocator, SlotId},
    ops::bootstrap::Bootstrap,
    types::{Address, Network, Symbol},
};
use lendstrap_testkit::{ChainEvent, FailPoint, Fake, MockChain, fixtures};

const NET: Network = Network::Sepolia;

fn dai() -> Address {
    Fake::address(0xD1)
}

fn usdc() -> Address {
    Fake::address(0xC1)
}

fn dai_feed() -> Address {
    Fake::address(0xF1)
}

fn usdc_feed() -> Address {
    Fake::address(0xF2)
}

/// Two stablecoin reserves plus the quote entry in the feed table.
fn two_reserve_market() -> lendstrap::config::MarketConfig {
    fixtures::market(
        NET,
        &[("DAI", dai()), ("USDC", usdc())],
        &[
            ("DAI", dai_feed()),
            ("USDC", usdc_feed()),
            ("USD", Fake::address(0xF0)),
        ],
    )
}

#[tokio::test]
async fn fresh_bootstrap_deploys_and_wires_everything() {
    let chain = MockChain::new();
    let market = two_reserve_market();

    let report = Bootstrap::new(&chain, &chain, NET, &market)
        .run()
        .await
        .unwrap();

    // one deployment per component, nothing reused
    assert_eq!(chain.deployment_count(), 7);
    assert!(report.price_oracle.fresh);
    assert!(report.rate_oracle.fresh);
    assert!(report.rates_seeded);
    assert!(report.collateral_manager.fresh);
    assert!(report.gateway.fresh);
    assert_eq!(
        report.reserves_initialized,
        vec![Symbol::from("DAI"), Symbol::from("USDC")]
    );
    assert!(report.reserves_skipped.is_empty());

    // the registry ends up pointing at what was deployed
    assert_eq!(chain.registered_price_oracle(), report.price_oracle.address);
    assert_eq!(chain.registered_rate_oracle(), report.rate_oracle.address);

    let events = chain.events();

    // pipeline order: sources before rates, init before configure,
    // authorization last
    assert!(matches!(
        events.first(),
        Some(ChainEvent::Deployed(Component::PriceOracle, _))
    ));
    assert!(matches!(
        events.last(),
        Some(ChainEvent::GatewayAuthorized { .. })
    ));

    let init_at = events
        .iter()
        .position(|e| matches!(e, ChainEvent::ReservesInitialized { .. }))
        .unwrap();
    let configure_at = events
        .iter()
        .position(|e| matches!(e, ChainEvent::ReserveConfigured { .. }))
        .unwrap();
    assert!(init_at < configure_at);

    // every slot-recorded component was written to its slot
    for slot in [
        SlotId::DATA_PROVIDER,
        SlotId::WALLET_BALANCE_PROVIDER,
        SlotId::UI_DATA_PROVIDER,
        SlotId::GATEWAY,
    ] {
        assert!(
            events
                .iter()
                .any(|e| matches!(e, ChainEvent::SlotRegistered(s, _) if *s == slot)),
            "missing slot registration {slot}"
        );
    }
}

#[tokio::test]
async fn rerun_performs_no_deployments_and_no_reseeding() {
    let chain = MockChain::new();
    let market = two_reserve_market();

    Bootstrap::new(&chain, &chain, NET, &market)
        .run()
        .await
        .unwrap();

    let after_first = chain.events().len();
    let deployments_after_first = chain.deployment_count();

    let report = Bootstrap::new(&chain, &chain, NET, &market)
        .run()
        .await
        .unwrap();

    let second_run = &chain.events()[after_first..];

    assert_eq!(chain.deployment_count(), deployments_after_first);
    assert!(
        !second_run
            .iter()
            .any(|e| matches!(e, ChainEvent::Deployed(..))),
        "re-run must not deploy"
    );
    assert!(
        !second_run
            .iter()
            .any(|e| matches!(e, ChainEvent::MarketRatesSeeded { .. })),
        "re-run must not re-seed rates"
    );
    assert!(
        !second_run
            .iter()
            .any(|e| matches!(e, ChainEvent::ReservesInitialized { .. })),
        "re-run must not re-create reserves"
    );

    assert!(!report.price_oracle.fresh);
    assert!(!report.rate_oracle.fresh);
    assert!(!report.rates_seeded);
    assert!(report.reserves_initialized.is_empty());
}

// The scenario pinned down in the design discussions: no price oracle
// registered, a usable rate oracle already set, DAI and USDC deployed.
#[tokio::test]
async fn preexisting_rate_oracle_is_reused_and_never_reseeded() {
    let curated = Fake::address(0xA1);
    let chain = MockChain::new().with_rate_oracle(curated);
    let market = two_reserve_market();

    let report = Bootstrap::new(&chain, &chain, NET, &market)
        .run()
        .await
        .unwrap();

    // a fresh price oracle, the curated rate oracle untouched
    assert!(report.price_oracle.fresh);
    assert!(!report.rate_oracle.fresh);
    assert_eq!(report.rate_oracle.address, curated);
    assert!(!report.rates_seeded);
    assert_eq!(chain.registered_rate_oracle(), curated);

    let events = chain.events();
    assert!(
        !events
            .iter()
            .any(|e| matches!(e, ChainEvent::MarketRatesSeeded { .. })),
        "curated rates must not be overwritten"
    );
    assert!(
        !events
            .iter()
            .any(|e| matches!(e, ChainEvent::Deployed(Component::RateOracle, _)))
    );

    // asset/source pairing is exact and ordered: DAI then USDC
    let sources_set = events
        .iter()
        .find(|e| matches!(e, ChainEvent::AssetSourcesSet { .. }))
        .unwrap();
    let ChainEvent::AssetSourcesSet {
        oracle,
        assets,
        sources,
    } = sources_set
    else {
        unreachable!()
    };
    assert_eq!(*oracle, report.price_oracle.address);
    assert_eq!(*assets, vec![dai(), usdc()]);
    assert_eq!(*sources, vec![dai_feed(), usdc_feed()]);
}

#[tokio::test]
async fn config_supplied_rate_oracle_also_skips_seeding() {
    let curated = Fake::address(0xA2);
    let chain = MockChain::new();
    let mut market = two_reserve_market();
    market.addresses.rate_oracle.insert(NET, curated);

    let report = Bootstrap::new(&chain, &chain, NET, &market)
        .run()
        .await
        .unwrap();

    assert!(!report.rate_oracle.fresh);
    assert_eq!(report.rate_oracle.address, curated);
    assert!(!report.rates_seeded);
    // the supplied address still gets registered
    assert_eq!(chain.registered_rate_oracle(), curated);
}

#[tokio::test]
async fn partial_market_onboards_only_deployed_reserves() {
    let chain = MockChain::new();
    let mut market = two_reserve_market();

    // configured but not deployed on this network
    market
        .reserves
        .insert("WETH".into(), fixtures::reserve_params(18));

    let report = Bootstrap::new(&chain, &chain, NET, &market)
        .run()
        .await
        .unwrap();

    assert_eq!(
        report.reserves_onboarded,
        vec![Symbol::from("DAI"), Symbol::from("USDC")]
    );
    assert_eq!(report.reserves_skipped, vec![Symbol::from("WETH")]);

    let events = chain.events();
    let init = events
        .iter()
        .find(|e| matches!(e, ChainEvent::ReservesInitialized { .. }))
        .unwrap();
    let ChainEvent::ReservesInitialized { underlyings, .. } = init else {
        unreachable!()
    };
    assert_eq!(*underlyings, vec![dai(), usdc()]);

    let configured: Vec<_> = events
        .iter()
        .filter(|e| matches!(e, ChainEvent::ReserveConfigured { .. }))
        .collect();
    assert_eq!(configured.len(), 2);
}

#[tokio::test]
async fn already_active_reserves_are_not_recreated() {
    let chain = MockChain::new().with_active_reserve(dai());
    let market = two_reserve_market();

    let report = Bootstrap::new(&chain, &chain, NET, &market)
        .run()
        .await
        .unwrap();

    assert_eq!(report.reserves_initialized, vec![Symbol::from("USDC")]);

    let events = chain.events();
    let ChainEvent::ReservesInitialized { underlyings, .. } = events
        .iter()
        .find(|e| matches!(e, ChainEvent::ReservesInitialized { .. }))
        .unwrap()
    else {
        unreachable!()
    };
    assert_eq!(*underlyings, vec![usdc()]);
}

#[tokio::test]
async fn failure_aborts_the_remaining_pipeline() {
    let chain = MockChain::new().fail_at(FailPoint::Deploy(Component::CollateralManager));
    let market = two_reserve_market();

    let err = Bootstrap::new(&chain, &chain, NET, &market)
        .run()
        .await
        .unwrap_err();

    assert!(err.to_string().contains("provision collateral manager"));
    assert!(err.to_string().contains("sepolia"));

    // nothing past the failing stage ran
    let events = chain.events();
    assert!(
        !events
            .iter()
            .any(|e| matches!(e, ChainEvent::CollateralManagerRegistered(_)))
    );
    assert!(
        !events
            .iter()
            .any(|e| matches!(e, ChainEvent::SlotRegistered(..)))
    );
    assert!(
        !events
            .iter()
            .any(|e| matches!(e, ChainEvent::GatewayAuthorized { .. }))
    );

    // everything before it is untouched by the abort
    assert!(
        events
            .iter()
            .any(|e| matches!(e, ChainEvent::ReservesInitialized { .. }))
    );
}

#[tokio::test]
async fn fork_failures_carry_the_simulation_locator() {
    let locator = ForkLocator {
        project: "lendstrap-ops".into(),
        fork: "3f2a".into(),
        head: "0xabcdef".into(),
    };
    let chain = MockChain::new()
        .with_locator(locator.clone())
        .fail_at(FailPoint::SeedRates);
    let market = fixtures::market(
        Network::Fork,
        &[("DAI", dai()), ("USDC", usdc())],
        &[
            ("DAI", dai_feed()),
            ("USDC", usdc_feed()),
            ("USD", Fake::address(0xF0)),
        ],
    );

    let err = Bootstrap::new(&chain, &chain, Network::Fork, &market)
        .run()
        .await
        .unwrap_err();

    let message = err.to_string();
    assert!(message.contains("seed baseline rates"));
    assert!(message.contains(&locator.to_string()));
}

#[tokio::test]
async fn missing_reserve_asset_table_is_a_clean_configuration_abort() {
    let chain = MockChain::new();
    let market = two_reserve_market();

    // the market carries tables for sepolia only
    let err = Bootstrap::new(&chain, &chain, Network::Local, &market)
        .run()
        .await
        .unwrap_err();

    assert!(err.to_string().contains("reserve asset table"));
    assert!(chain.events().is_empty(), "no action may precede the abort");
}

#[tokio::test]
async fn missing_feed_for_a_tracked_symbol_is_fatal() {
    let chain = MockChain::new();
    let market = fixtures::market(
        NET,
        &[("DAI", dai()), ("USDC", usdc())],
        // USDC feed deliberately missing
        &[("DAI", dai_feed()), ("USD", Fake::address(0xF0))],
    );

    let err = Bootstrap::new(&chain, &chain, NET, &market)
        .run()
        .await
        .unwrap_err();

    assert!(err.to_string().contains("USDC"));
    assert!(chain.events().is_empty());
}
