use crate::{
    chain::{ChainError, ForkLocator, Receipt, SlotId},
    config::{RateStrategy, ReserveParams},
    types::{Address, Ray},
};
use async_trait::async_trait;

///
/// PriceOracleInit
/// Constructor arguments for a fresh price oracle: the initial asset/source
/// pairing plus the quote-currency identity.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PriceOracleInit {
    pub assets: Vec<Address>,
    pub sources: Vec<Address>,
    pub fallback_oracle: Address,
    pub quote_currency: Address,
    pub quote_unit: u64,
}

///
/// ReserveInput
/// One reserve's slice of the batched initialization call: the underlying
/// asset, the derived token triple, and the uniform wiring targets.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReserveInput {
    pub underlying: Address,
    pub decimals: u8,

    pub ib_token_name: String,
    pub ib_token_symbol: String,
    pub stable_debt_name: String,
    pub stable_debt_symbol: String,
    pub variable_debt_name: String,
    pub variable_debt_symbol: String,

    pub treasury: Address,
    pub incentives_controller: Address,

    pub strategy: RateStrategy,
}

///
/// ChainService
/// The deployment/action service. Deployments return the confirmed address
/// of the new instance; actions return the confirmation receipt. No method
/// retries; a failure is final for the run.
///

#[async_trait]
pub trait ChainService: Send + Sync {
    async fn deploy_price_oracle(&self, init: PriceOracleInit) -> Result<Address, ChainError>;

    async fn deploy_rate_oracle(&self) -> Result<Address, ChainError>;

    async fn deploy_collateral_manager(&self) -> Result<Address, ChainError>;

    async fn deploy_data_provider(&self, registry: Address) -> Result<Address, ChainError>;

    async fn deploy_wallet_balance_provider(&self) -> Result<Address, ChainError>;

    async fn deploy_ui_data_provider(
        &self,
        aggregator_proxy: Address,
        quote_aggregator_proxy: Address,
    ) -> Result<Address, ChainError>;

    async fn deploy_gateway(&self, wrapped_native: Address) -> Result<Address, ChainError>;

    /// Point the price oracle at a feed per tracked asset. The two slices
    /// are index-aligned.
    async fn set_asset_sources(
        &self,
        oracle: Address,
        assets: &[Address],
        sources: &[Address],
    ) -> Result<Receipt, ChainError>;

    /// Seed baseline borrow rates into a rate oracle. Index-aligned slices.
    async fn seed_market_rates(
        &self,
        oracle: Address,
        assets: &[Address],
        rates: &[Ray],
    ) -> Result<Receipt, ChainError>;

    /// Whether the reserve for `asset` already has its token triple
    /// created in the pool. Read-only; gates re-initialization on re-runs.
    async fn reserve_active(
        &self,
        lending_pool: Address,
        asset: Address,
    ) -> Result<bool, ChainError>;

    /// Create the whole reserve batch in one confirmed action.
    async fn init_reserves(
        &self,
        configurator: Address,
        market_id: &str,
        batch: &[ReserveInput],
    ) -> Result<Receipt, ChainError>;

    /// Apply one reserve's risk parameters. Presupposes the reserve tokens
    /// exist, so this only runs after the batch initialization confirmed.
    async fn configure_reserve(
        &self,
        admin: Address,
        asset: Address,
        params: &ReserveParams,
    ) -> Result<Receipt, ChainError>;

    async fn authorize_gateway(
        &self,
        gateway: Address,
        lending_pool: Address,
    ) -> Result<Receipt, ChainError>;

    /// Locator for the most recent simulated transaction, when the service
    /// targets a fork environment.
    fn fork_locator(&self) -> Option<ForkLocator>;
}

///
/// Registry
/// Handle to the central address registry, the protocol's single
/// service-discovery and wiring point. Setters resolve after confirmation.
///

#[async_trait]
pub trait Registry: Send + Sync {
    /// The registry's own on-chain address (constructor argument for the
    /// components that read it directly).
    fn address(&self) -> Address;

    async fn pool_admin(&self) -> Result<Address, ChainError>;

    async fn lending_pool(&self) -> Result<Address, ChainError>;

    async fn configurator(&self) -> Result<Address, ChainError>;

    async fn price_oracle(&self) -> Result<Address, ChainError>;

    async fn rate_oracle(&self) -> Result<Address, ChainError>;

    async fn collateral_manager(&self) -> Result<Address, ChainError>;

    /// Zero when the slot has never been written.
    async fn slot(&self, slot: SlotId) -> Result<Address, ChainError>;

    async fn set_price_oracle(&self, oracle: Address) -> Result<Receipt, ChainError>;

    async fn set_rate_oracle(&self, oracle: Address) -> Result<Receipt, ChainError>;

    async fn set_collateral_manager(&self, manager: Address) -> Result<Receipt, ChainError>;

    async fn set_slot(&self, slot: SlotId, value: Address) -> Result<Receipt, ChainError>;
}
