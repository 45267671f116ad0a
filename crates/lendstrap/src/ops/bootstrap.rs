//!
//! The bootstrap orchestrator: a linear pipeline of provisioning and
//! wiring stages. Every state-changing action is awaited to confirmation
//! before the next begins; the first unrecovered failure aborts the
//! remainder with the failing stage attached. Nothing is rolled back;
//! re-running is safe because every provisioning decision is idempotent.
//!

use crate::{
    Error, VERSION,
    chain::{ChainError, ChainService, Component, PriceOracleInit, Registry, SlotId},
    config::MarketConfig,
    log,
    ops::{
        OpsError, oracles,
        provision::{Provisioned, provision},
        reserves,
        resolve::{require, resolve_usable, usable_address},
    },
    types::{Address, Network, PerNetwork, Symbol},
};
use std::{
    fmt::{self, Display},
    future::Future,
};

///
/// Stage
/// The pipeline's states, in execution order. Terminal outcomes are
/// `Done` or an abort carrying the stage that failed.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Stage {
    ProvisionPriceOracle,
    SeedPriceSources,
    ProvisionRateOracle,
    SeedBaselineRates,
    RegisterOracles,
    InitializeReserves,
    ConfigureReserves,
    ProvisionCollateralManager,
    RegisterCollateralManager,
    RegisterDataProvider,
    ProvisionGateway,
    AuthorizeGateway,
    Done,
}

impl Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ProvisionPriceOracle => "provision price oracle",
            Self::SeedPriceSources => "seed price sources",
            Self::ProvisionRateOracle => "provision rate oracle",
            Self::SeedBaselineRates => "seed baseline rates",
            Self::RegisterOracles => "register oracles",
            Self::InitializeReserves => "initialize reserves",
            Self::ConfigureReserves => "configure reserves",
            Self::ProvisionCollateralManager => "provision collateral manager",
            Self::RegisterCollateralManager => "register collateral manager",
            Self::RegisterDataProvider => "register data providers",
            Self::ProvisionGateway => "provision gateway",
            Self::AuthorizeGateway => "authorize gateway",
            Self::Done => "done",
        };

        write!(f, "{name}")
    }
}

///
/// BootstrapReport
/// Everything a run decided and where it left the protocol, for operator
/// reporting and assertions.
///

#[derive(Clone, Debug)]
pub struct BootstrapReport {
    pub network: Network,
    pub market_id: String,

    pub price_oracle: Provisioned,
    pub rate_oracle: Provisioned,
    pub rates_seeded: bool,
    pub collateral_manager: Provisioned,
    pub data_provider: Provisioned,
    pub wallet_balance_provider: Provisioned,
    pub ui_data_provider: Option<Provisioned>,
    pub gateway: Provisioned,

    pub reserves_onboarded: Vec<Symbol>,
    /// Subset of `reserves_onboarded` whose tokens this run created (the
    /// rest already existed in the pool).
    pub reserves_initialized: Vec<Symbol>,
    pub reserves_skipped: Vec<Symbol>,
}

///
/// Bootstrap
/// One orchestration run against one network. Collaborator handles are
/// injected; the orchestrator never reaches for ambient state.
///

pub struct Bootstrap<'a> {
    chain: &'a dyn ChainService,
    registry: &'a dyn Registry,
    network: Network,
    market: &'a MarketConfig,
}

impl<'a> Bootstrap<'a> {
    #[must_use]
    pub fn new(
        chain: &'a dyn ChainService,
        registry: &'a dyn Registry,
        network: Network,
        market: &'a MarketConfig,
    ) -> Self {
        Self {
            chain,
            registry,
            network,
            market,
        }
    }

    /// Drive the full bootstrap sequence to `Done` or the first failure.
    pub async fn run(&self) -> Result<BootstrapReport, Error> {
        let market = self.market;
        let network = self.network;

        log!(Info, "🔧 ----------------- lendstrap v{VERSION} -----------------");
        log!(Info, "🏁 bootstrap: {} on {network}", market.market_id);

        // --- provision price oracle -----------------------------------
        let stage = Stage::ProvisionPriceOracle;
        self.enter(stage);

        let tracked =
            oracles::tracked_assets(market, network).map_err(|e| self.abort(stage, e))?;
        let feeds = require(&market.addresses.price_feeds, network, "price feed table")
            .map_err(|e| self.abort(stage, e))?;
        let (assets, sources) = oracles::pair_asset_feeds(&tracked, feeds, &market.quote.symbol)
            .map_err(|e| self.abort(stage, e))?;

        let configured = self
            .configured_or_registered(stage, &market.addresses.price_oracle, || {
                self.registry.price_oracle()
            })
            .await?;
        let init = PriceOracleInit {
            assets: assets.clone(),
            sources: sources.clone(),
            fallback_oracle: resolve_usable(&market.addresses.fallback_oracle, network)
                .unwrap_or(Address::ZERO),
            quote_currency: market.quote.address,
            quote_unit: market.quote.unit,
        };
        let price_oracle = provision(Component::PriceOracle, configured, move || {
            self.chain.deploy_price_oracle(init)
        })
        .await
        .map_err(|e| self.abort(stage, e))?;

        // --- seed price sources (refreshed on reuse as well) ----------
        let stage = Stage::SeedPriceSources;
        self.enter(stage);
        self.chain
            .set_asset_sources(price_oracle.address, &assets, &sources)
            .await
            .map_err(|e| self.abort(stage, e))?;
        log!(Ok, "🧭 price sources set for {} assets", assets.len());

        // --- provision rate oracle ------------------------------------
        let stage = Stage::ProvisionRateOracle;
        self.enter(stage);
        let configured = self
            .configured_or_registered(stage, &market.addresses.rate_oracle, || {
                self.registry.rate_oracle()
            })
            .await?;
        let rate_oracle = provision(Component::RateOracle, configured, || {
            self.chain.deploy_rate_oracle()
        })
        .await
        .map_err(|e| self.abort(stage, e))?;

        // --- seed baseline rates, only into an oracle this run created -
        let rates_seeded = if rate_oracle.fresh {
            let stage = Stage::SeedBaselineRates;
            self.enter(stage);

            let (rate_assets, rates) = oracles::baseline_rate_pairs(
                &market.baseline_rates,
                &tracked,
                &market.quote.symbol,
            );
            if rate_assets.is_empty() {
                log!(Warn, "no baseline rates configured for this market");
                false
            } else {
                self.chain
                    .seed_market_rates(rate_oracle.address, &rate_assets, &rates)
                    .await
                    .map_err(|e| self.abort(stage, e))?;
                log!(Ok, "🌱 seeded baseline rates for {} assets", rate_assets.len());
                true
            }
        } else {
            // an externally supplied oracle carries curated rates;
            // overwriting them is never correct
            log!(Info, "⏭  rate oracle supplied externally, keeping its rates");
            false
        };

        // --- register oracles -----------------------------------------
        let stage = Stage::RegisterOracles;
        self.enter(stage);
        self.registry
            .set_price_oracle(price_oracle.address)
            .await
            .map_err(|e| self.abort(stage, e))?;
        self.registry
            .set_rate_oracle(rate_oracle.address)
            .await
            .map_err(|e| self.abort(stage, e))?;
        log!(Ok, "📒 registry: price oracle {}", price_oracle.address);
        log!(Ok, "📒 registry: rate oracle {}", rate_oracle.address);

        // --- initialize reserves --------------------------------------
        let stage = Stage::InitializeReserves;
        self.enter(stage);
        let admin = self
            .registry
            .pool_admin()
            .await
            .map_err(|e| self.abort(stage, e))?;
        let configurator = self
            .registry
            .configurator()
            .await
            .map_err(|e| self.abort(stage, e))?;
        let lending_pool = self
            .registry
            .lending_pool()
            .await
            .map_err(|e| self.abort(stage, e))?;
        let reserve_assets =
            require(&market.addresses.reserve_assets, network, "reserve asset table")
                .map_err(|e| self.abort(stage, e))?;
        let treasury = *require(&market.addresses.treasury, network, "treasury")
            .map_err(|e| self.abort(stage, e))?;
        let incentives_controller =
            resolve_usable(&market.addresses.incentives_controller, network)
                .unwrap_or(Address::ZERO);

        let plan = reserves::plan_reserves(market, reserve_assets, treasury, incentives_controller);
        let reserves_initialized = reserves::init_reserves(
            self.chain,
            lending_pool,
            configurator,
            &market.market_id,
            &plan,
        )
        .await
        .map_err(|e| self.abort(stage, e))?;

        // --- configure reserves ---------------------------------------
        let stage = Stage::ConfigureReserves;
        self.enter(stage);
        reserves::configure_reserves(self.chain, admin, market, reserve_assets, &plan)
            .await
            .map_err(|e| self.abort(stage, e))?;

        // --- provision collateral manager -----------------------------
        let stage = Stage::ProvisionCollateralManager;
        self.enter(stage);
        let configured = self
            .configured_or_registered(stage, &market.addresses.collateral_manager, || {
                self.registry.collateral_manager()
            })
            .await?;
        let collateral_manager = provision(Component::CollateralManager, configured, || {
            self.chain.deploy_collateral_manager()
        })
        .await
        .map_err(|e| self.abort(stage, e))?;

        // --- register collateral manager ------------------------------
        let stage = Stage::RegisterCollateralManager;
        self.enter(stage);
        self.registry
            .set_collateral_manager(collateral_manager.address)
            .await
            .map_err(|e| self.abort(stage, e))?;
        log!(Ok, "📒 registry: collateral manager {}", collateral_manager.address);

        // --- register the read-only data providers --------------------
        let stage = Stage::RegisterDataProvider;
        self.enter(stage);

        let registry_address = self.registry.address();
        let data_provider = self
            .provision_slot(stage, SlotId::DATA_PROVIDER, Component::DataProvider, None, || {
                self.chain.deploy_data_provider(registry_address)
            })
            .await?;
        let wallet_balance_provider = self
            .provision_slot(
                stage,
                SlotId::WALLET_BALANCE_PROVIDER,
                Component::WalletBalanceProvider,
                None,
                || self.chain.deploy_wallet_balance_provider(),
            )
            .await?;

        let ui_data_provider = match market.addresses.feed_proxies.resolve(network).copied() {
            Some(proxies) => Some(
                self.provision_slot(
                    stage,
                    SlotId::UI_DATA_PROVIDER,
                    Component::UiDataProvider,
                    None,
                    || {
                        self.chain
                            .deploy_ui_data_provider(proxies.aggregator, proxies.quote_aggregator)
                    },
                )
                .await?,
            ),
            None => {
                log!(Warn, "no feed proxies for {network}, skipping ui data provider");
                None
            }
        };

        // --- provision gateway ----------------------------------------
        let stage = Stage::ProvisionGateway;
        self.enter(stage);
        let wrapped_native = *require(&market.addresses.wrapped_native, network, "wrapped native")
            .map_err(|e| self.abort(stage, e))?;
        let gateway = self
            .provision_slot(
                stage,
                SlotId::GATEWAY,
                Component::Gateway,
                Some(&market.addresses.gateway),
                || self.chain.deploy_gateway(wrapped_native),
            )
            .await?;

        // --- authorize gateway ----------------------------------------
        let stage = Stage::AuthorizeGateway;
        self.enter(stage);
        self.chain
            .authorize_gateway(gateway.address, lending_pool)
            .await
            .map_err(|e| self.abort(stage, e))?;
        log!(Ok, "🔓 gateway {} authorized for pool {lending_pool}", gateway.address);

        // --- done -----------------------------------------------------
        log!(Ok, "✅ {}: {} wired on {network}", Stage::Done, market.market_id);
        log!(Info, "   price oracle             {}", price_oracle.address);
        log!(Info, "   rate oracle              {}", rate_oracle.address);
        log!(Info, "   collateral manager       {}", collateral_manager.address);
        log!(Info, "   protocol data provider   {}", data_provider.address);
        log!(Info, "   wallet balance provider  {}", wallet_balance_provider.address);
        if let Some(ui) = &ui_data_provider {
            log!(Info, "   ui data provider         {}", ui.address);
        }
        log!(Info, "   native gateway           {}", gateway.address);

        Ok(BootstrapReport {
            network,
            market_id: market.market_id.clone(),
            price_oracle,
            rate_oracle,
            rates_seeded,
            collateral_manager,
            data_provider,
            wallet_balance_provider,
            ui_data_provider,
            gateway,
            reserves_onboarded: plan.onboarded,
            reserves_initialized,
            reserves_skipped: plan.skipped,
        })
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    fn enter(&self, stage: Stage) {
        log!(Info, "⚙️  {stage}");
    }

    /// Resolution order for a component's authoritative address: the
    /// market's per-network table first, then whatever a previous run
    /// registered. Only if both are unusable does the caller deploy.
    async fn configured_or_registered<F, Fut>(
        &self,
        stage: Stage,
        table: &PerNetwork<Address>,
        registered: F,
    ) -> Result<Option<Address>, Error>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Address, ChainError>>,
    {
        if let Some(address) = resolve_usable(table, self.network) {
            return Ok(Some(address));
        }

        let current = registered().await.map_err(|e| self.abort(stage, e))?;

        Ok(usable_address(current))
    }

    /// Provision a component whose authoritative record lives in one of
    /// the registry's extension slots, then (re-)register it there.
    async fn provision_slot<F, Fut>(
        &self,
        stage: Stage,
        slot: SlotId,
        component: Component,
        table: Option<&PerNetwork<Address>>,
        deploy: F,
    ) -> Result<Provisioned, Error>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Address, ChainError>>,
    {
        let configured = match table.and_then(|t| resolve_usable(t, self.network)) {
            Some(address) => Some(address),
            None => usable_address(
                self.registry
                    .slot(slot)
                    .await
                    .map_err(|e| self.abort(stage, e))?,
            ),
        };

        let provisioned = provision(component, configured, deploy)
            .await
            .map_err(|e| self.abort(stage, e))?;

        self.registry
            .set_slot(slot, provisioned.address)
            .await
            .map_err(|e| self.abort(stage, e))?;

        Ok(provisioned)
    }

    /// Wrap a stage failure with its diagnostic context. On fork
    /// environments the simulated-transaction locator is attached so the
    /// failure can be inspected out-of-band.
    fn abort(&self, stage: Stage, err: impl Into<Error>) -> Error {
        let source = Box::new(err.into());
        log!(Error, "💥 {stage} failed on {}: {source}", self.network);

        if self.network.is_fork()
            && let Some(locator) = self.chain.fork_locator()
        {
            log!(Error, "   inspect the simulated transaction at {locator}");

            return OpsError::AbortedOnFork {
                stage,
                network: self.network,
                locator,
                source,
            }
            .into();
        }

        OpsError::Aborted {
            stage,
            network: self.network,
            source,
        }
        .into()
    }
}
