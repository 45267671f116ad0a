//!
//! An in-memory stand-in for the on-chain collaborators. One value plays
//! both roles, deployment/action service and central registry, the way
//! a single simulated environment would, and journals every confirmed
//! action so tests can assert exactly what a bootstrap did.
//!

use crate::Fake;
use async_trait::async_trait;
use lendstrap::{
    chain::{
        ChainError, ChainService, Component, ForkLocator, PriceOracleInit, Receipt, Registry,
        ReserveInput, SlotId,
    },
    config::ReserveParams,
    types::{Address, Ray},
};
use std::{
    collections::{BTreeMap, BTreeSet},
    sync::Mutex,
};

/// Seed base for addresses minted by mock deployments, far above anything
/// the fixtures hand out.
const DEPLOY_SEED_BASE: u32 = 0x000A_0000;

///
/// ChainEvent
/// One confirmed action, in the order the orchestrator performed it.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ChainEvent {
    Deployed(Component, Address),
    AssetSourcesSet {
        oracle: Address,
        assets: Vec<Address>,
        sources: Vec<Address>,
    },
    MarketRatesSeeded {
        oracle: Address,
        assets: Vec<Address>,
        rates: Vec<Ray>,
    },
    ReservesInitialized {
        configurator: Address,
        market_id: String,
        underlyings: Vec<Address>,
    },
    ReserveConfigured {
        admin: Address,
        asset: Address,
    },
    GatewayAuthorized {
        gateway: Address,
        lending_pool: Address,
    },
    PriceOracleRegistered(Address),
    RateOracleRegistered(Address),
    CollateralManagerRegistered(Address),
    SlotRegistered(SlotId, Address),
}

///
/// FailPoint
/// Injected failure: the first matching action errors instead of
/// confirming.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FailPoint {
    Deploy(Component),
    SeedRates,
    InitReserves,
    AuthorizeGateway,
}

struct MockState {
    events: Vec<ChainEvent>,
    price_oracle: Address,
    rate_oracle: Address,
    collateral_manager: Address,
    slots: BTreeMap<SlotId, Address>,
    active_reserves: BTreeSet<Address>,
    next_seed: u32,
    nonce: u64,
}

///
/// MockChain
///

pub struct MockChain {
    registry_address: Address,
    pool_admin: Address,
    lending_pool: Address,
    configurator: Address,
    locator: Option<ForkLocator>,
    fail_at: Option<FailPoint>,
    state: Mutex<MockState>,
}

impl MockChain {
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry_address: Fake::address(0x0001_0001),
            pool_admin: Fake::address(0x0001_0002),
            lending_pool: Fake::address(0x0001_0003),
            configurator: Fake::address(0x0001_0004),
            locator: None,
            fail_at: None,
            state: Mutex::new(MockState {
                events: Vec::new(),
                price_oracle: Address::ZERO,
                rate_oracle: Address::ZERO,
                collateral_manager: Address::ZERO,
                slots: BTreeMap::new(),
                active_reserves: BTreeSet::new(),
                next_seed: DEPLOY_SEED_BASE,
                nonce: 0,
            }),
        }
    }

    /// Pretend a previous run (or an external operator) registered this
    /// price oracle.
    #[must_use]
    pub fn with_price_oracle(self, address: Address) -> Self {
        self.state.lock().unwrap().price_oracle = address;
        self
    }

    /// Pretend the rate oracle is already registered and curated.
    #[must_use]
    pub fn with_rate_oracle(self, address: Address) -> Self {
        self.state.lock().unwrap().rate_oracle = address;
        self
    }

    /// Pretend the reserve for `asset` already has its tokens created.
    #[must_use]
    pub fn with_active_reserve(self, asset: Address) -> Self {
        self.state.lock().unwrap().active_reserves.insert(asset);
        self
    }

    /// Report a simulation locator, as a fork backend would.
    #[must_use]
    pub fn with_locator(mut self, locator: ForkLocator) -> Self {
        self.locator = Some(locator);
        self
    }

    /// Make the first action matching `point` fail to confirm.
    #[must_use]
    pub fn fail_at(mut self, point: FailPoint) -> Self {
        self.fail_at = Some(point);
        self
    }

    /// Everything the orchestrator did, in order.
    #[must_use]
    pub fn events(&self) -> Vec<ChainEvent> {
        self.state.lock().unwrap().events.clone()
    }

    /// Count of deployment actions performed so far.
    #[must_use]
    pub fn deployment_count(&self) -> usize {
        self.state
            .lock()
            .unwrap()
            .events
            .iter()
            .filter(|e| matches!(e, ChainEvent::Deployed(..)))
            .count()
    }

    /// Current registry view of the rate oracle.
    #[must_use]
    pub fn registered_rate_oracle(&self) -> Address {
        self.state.lock().unwrap().rate_oracle
    }

    /// Current registry view of the price oracle.
    #[must_use]
    pub fn registered_price_oracle(&self) -> Address {
        self.state.lock().unwrap().price_oracle
    }

    fn deploy(&self, component: Component) -> Result<Address, ChainError> {
        if self.fail_at == Some(FailPoint::Deploy(component)) {
            return Err(ChainError::Deploy(component, "injected failure".into()));
        }

        let mut state = self.state.lock().unwrap();
        state.next_seed += 1;
        let address = Fake::address(state.next_seed);
        state.events.push(ChainEvent::Deployed(component, address));

        Ok(address)
    }

    fn confirm(&self, event: ChainEvent) -> Receipt {
        let mut state = self.state.lock().unwrap();
        state.events.push(event);
        state.nonce += 1;

        Receipt {
            tx: format!("0x{:064x}", state.nonce),
            block: state.nonce,
        }
    }
}

impl Default for MockChain {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChainService for MockChain {
    async fn deploy_price_oracle(&self, _init: PriceOracleInit) -> Result<Address, ChainError> {
        self.deploy(Component::PriceOracle)
    }

    async fn deploy_rate_oracle(&self) -> Result<Address, ChainError> {
        self.deploy(Component::RateOracle)
    }

    async fn deploy_collateral_manager(&self) -> Result<Address, ChainError> {
        self.deploy(Component::CollateralManager)
    }

    async fn deploy_data_provider(&self, _registry: Address) -> Result<Address, ChainError> {
        self.deploy(Component::DataProvider)
    }

    async fn deploy_wallet_balance_provider(&self) -> Result<Address, ChainError> {
        self.deploy(Component::WalletBalanceProvider)
    }

    async fn deploy_ui_data_provider(
        &self,
        _aggregator_proxy: Address,
        _quote_aggregator_proxy: Address,
    ) -> Result<Address, ChainError> {
        self.deploy(Component::UiDataProvider)
    }

    async fn deploy_gateway(&self, _wrapped_native: Address) -> Result<Address, ChainError> {
        self.deploy(Component::Gateway)
    }

    async fn set_asset_sources(
        &self,
        oracle: Address,
        assets: &[Address],
        sources: &[Address],
    ) -> Result<Receipt, ChainError> {
        Ok(self.confirm(ChainEvent::AssetSourcesSet {
            oracle,
            assets: assets.to_vec(),
            sources: sources.to_vec(),
        }))
    }

    async fn seed_market_rates(
        &self,
        oracle: Address,
        assets: &[Address],
        rates: &[Ray],
    ) -> Result<Receipt, ChainError> {
        if self.fail_at == Some(FailPoint::SeedRates) {
            return Err(ChainError::Reverted(oracle, "injected failure".into()));
        }

        Ok(self.confirm(ChainEvent::MarketRatesSeeded {
            oracle,
            assets: assets.to_vec(),
            rates: rates.to_vec(),
        }))
    }

    async fn reserve_active(
        &self,
        _lending_pool: Address,
        asset: Address,
    ) -> Result<bool, ChainError> {
        Ok(self.state.lock().unwrap().active_reserves.contains(&asset))
    }

    async fn init_reserves(
        &self,
        configurator: Address,
        market_id: &str,
        batch: &[ReserveInput],
    ) -> Result<Receipt, ChainError> {
        if self.fail_at == Some(FailPoint::InitReserves) {
            return Err(ChainError::Reverted(configurator, "injected failure".into()));
        }

        let underlyings: Vec<Address> = batch.iter().map(|input| input.underlying).collect();
        self.state
            .lock()
            .unwrap()
            .active_reserves
            .extend(underlyings.iter().copied());

        Ok(self.confirm(ChainEvent::ReservesInitialized {
            configurator,
            market_id: market_id.to_string(),
            underlyings,
        }))
    }

    async fn configure_reserve(
        &self,
        admin: Address,
        asset: Address,
        _params: &ReserveParams,
    ) -> Result<Receipt, ChainError> {
        Ok(self.confirm(ChainEvent::ReserveConfigured { admin, asset }))
    }

    async fn authorize_gateway(
        &self,
        gateway: Address,
        lending_pool: Address,
    ) -> Result<Receipt, ChainError> {
        if self.fail_at == Some(FailPoint::AuthorizeGateway) {
            return Err(ChainError::Reverted(gateway, "injected failure".into()));
        }

        Ok(self.confirm(ChainEvent::GatewayAuthorized {
            gateway,
            lending_pool,
        }))
    }

    fn fork_locator(&self) -> Option<ForkLocator> {
        self.locator.clone()
    }
}

#[async_trait]
impl Registry for MockChain {
    fn address(&self) -> Address {
        self.registry_address
    }

    async fn pool_admin(&self) -> Result<Address, ChainError> {
        Ok(self.pool_admin)
    }

    async fn lending_pool(&self) -> Result<Address, ChainError> {
        Ok(self.lending_pool)
    }

    async fn configurator(&self) -> Result<Address, ChainError> {
        Ok(self.configurator)
    }

    async fn price_oracle(&self) -> Result<Address, ChainError> {
        Ok(self.state.lock().unwrap().price_oracle)
    }

    async fn rate_oracle(&self) -> Result<Address, ChainError> {
        Ok(self.state.lock().unwrap().rate_oracle)
    }

    async fn collateral_manager(&self) -> Result<Address, ChainError> {
        Ok(self.state.lock().unwrap().collateral_manager)
    }

    async fn slot(&self, slot: SlotId) -> Result<Address, ChainError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .slots
            .get(&slot)
            .copied()
            .unwrap_or(Address::ZERO))
    }

    async fn set_price_oracle(&self, oracle: Address) -> Result<Receipt, ChainError> {
        self.state.lock().unwrap().price_oracle = oracle;
        Ok(self.confirm(ChainEvent::PriceOracleRegistered(oracle)))
    }

    async fn set_rate_oracle(&self, oracle: Address) -> Result<Receipt, ChainError> {
        self.state.lock().unwrap().rate_oracle = oracle;
        Ok(self.confirm(ChainEvent::RateOracleRegistered(oracle)))
    }

    async fn set_collateral_manager(&self, manager: Address) -> Result<Receipt, ChainError> {
        self.state.lock().unwrap().collateral_manager = manager;
        Ok(self.confirm(ChainEvent::CollateralManagerRegistered(manager)))
    }

    async fn set_slot(&self, slot: SlotId, value: Address) -> Result<Receipt, ChainError> {
        self.state.lock().unwrap().slots.insert(slot, value);
        Ok(self.confirm(ChainEvent::SlotRegistered(slot, value)))
    }
}
