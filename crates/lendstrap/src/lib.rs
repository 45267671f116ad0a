//! Lendstrap: market provisioning and bootstrap toolkit for EVM lending
//! deployments.
//!
//! The crate drives the multi-step bootstrap of a lending market: it deploys
//! or reuses the protocol's satellite components (price oracle, rate oracle,
//! collateral manager, data providers, native-asset gateway), wires them into
//! the protocol's central address registry, and onboards the market's
//! reserves. Contract implementations and transaction submission are external
//! collaborators behind the traits in [`chain`]; this crate owns the
//! sequencing, the idempotency decisions, and the failure discipline.

pub mod chain;
pub mod config;
pub mod log;
pub mod ops;
pub mod types;

use thiserror::Error as ThisError;

///
/// Error
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    ChainError(#[from] chain::ChainError),

    #[error(transparent)]
    ConfigError(#[from] config::ConfigError),

    #[error(transparent)]
    OpsError(#[from] ops::OpsError),
}

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        Error,
        chain::{ChainService, Registry},
        config::MarketConfig,
        log,
        ops::bootstrap::Bootstrap,
        types::{Address, Network},
    };
}

pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
