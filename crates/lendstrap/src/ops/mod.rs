//!
//! The provisioning ops layer: pure resolution helpers, the idempotent
//! component provisioner, the oracle and reserve sequencing steps, and the
//! bootstrap orchestrator that drives them in dependency order.
//!

pub mod bootstrap;
pub mod oracles;
pub mod provision;
pub mod reserves;
pub mod resolve;

use crate::{
    Error,
    chain::ForkLocator,
    ops::bootstrap::Stage,
    types::{Network, Symbol},
};
use thiserror::Error as ThisError;

///
/// OpsError
///

#[derive(Debug, ThisError)]
#[remain::sorted]
pub enum OpsError {
    #[error("{stage} aborted on {network}: {source}")]
    Aborted {
        stage: Stage,
        network: Network,
        source: Box<Error>,
    },

    #[error("{stage} aborted on {network} (simulation {locator}): {source}")]
    AbortedOnFork {
        stage: Stage,
        network: Network,
        locator: ForkLocator,
        source: Box<Error>,
    },

    #[error("no price feed configured for {0}")]
    MissingFeed(Symbol),

    #[error("no {what} configured for network {network}")]
    MissingParam {
        what: &'static str,
        network: Network,
    },
}
