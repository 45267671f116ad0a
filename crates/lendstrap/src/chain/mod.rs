//!
//! Interfaces to the on-chain collaborators: the deployment/action service
//! and the central address registry. Implementations own signing, gas, and
//! submission; everything exposed here resolves only after on-chain
//! confirmation, which is what makes the orchestrator's one-action-at-a-time
//! model sound.
//!

mod service;

pub use service::*;

use crate::types::Address;
use std::fmt::{self, Display};
use thiserror::Error as ThisError;

///
/// ChainError
///

#[derive(Debug, ThisError)]
#[remain::sorted]
pub enum ChainError {
    #[error("deployment of {0} failed: {1}")]
    Deploy(Component, String),

    #[error("call to {0} reverted: {1}")]
    Reverted(Address, String),

    #[error("rpc transport: {0}")]
    Transport(String),

    #[error("transaction {0} was not confirmed: {1}")]
    Unconfirmed(String, String),
}

///
/// Component
/// The deployable component kinds the orchestrator knows about.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Component {
    PriceOracle,
    RateOracle,
    CollateralManager,
    DataProvider,
    WalletBalanceProvider,
    UiDataProvider,
    Gateway,
}

impl Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PriceOracle => "price oracle",
            Self::RateOracle => "rate oracle",
            Self::CollateralManager => "collateral manager",
            Self::DataProvider => "protocol data provider",
            Self::WalletBalanceProvider => "wallet balance provider",
            Self::UiDataProvider => "ui data provider",
            Self::Gateway => "native gateway",
        };

        write!(f, "{name}")
    }
}

///
/// Receipt
/// Proof of confirmation for one state-changing action.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Receipt {
    pub tx: String,
    pub block: u64,
}

///
/// SlotId
/// A named extension slot in the registry. The protocol reserves the low
/// single-byte ids for components the bootstrap records itself.
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct SlotId([u8; 32]);

impl SlotId {
    pub const DATA_PROVIDER: Self = Self::of(0x01);
    pub const WALLET_BALANCE_PROVIDER: Self = Self::of(0x02);
    pub const UI_DATA_PROVIDER: Self = Self::of(0x03);
    pub const GATEWAY: Self = Self::of(0x04);

    #[must_use]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    const fn of(tag: u8) -> Self {
        let mut bytes = [0u8; 32];
        bytes[0] = tag;

        Self(bytes)
    }
}

impl Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

///
/// ForkLocator
/// Where to find a failed simulated transaction on a fork environment, for
/// out-of-band inspection.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ForkLocator {
    pub project: String,
    pub fork: String,
    pub head: String,
}

impl Display for ForkLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/fork/{}/simulation/{}",
            self.project, self.fork, self.head
        )
    }
}
