//!
//! Per-network parameter resolution and the existence predicate behind
//! every provisioning decision.
//!

use crate::{
    ops::OpsError,
    types::{Address, Network, PerNetwork},
};

/// The idempotency switch: true only for an address that names a real,
/// usable deployment. A false positive here skips a required deployment; a
/// false negative orphans a duplicate one.
#[must_use]
pub fn usable(addr: Option<Address>) -> bool {
    addr.is_some_and(|a| !a.is_zero())
}

/// Collapse the zero sentinel back into absence.
#[must_use]
pub fn usable_address(addr: Address) -> Option<Address> {
    if usable(Some(addr)) { Some(addr) } else { None }
}

/// Resolve an optional per-network address, treating zero entries as
/// absent.
#[must_use]
pub fn resolve_usable(table: &PerNetwork<Address>, network: Network) -> Option<Address> {
    table.resolve(network).copied().and_then(usable_address)
}

/// Resolve a parameter the bootstrap cannot proceed without.
pub fn require<'a, T>(
    table: &'a PerNetwork<T>,
    network: Network,
    what: &'static str,
) -> Result<&'a T, OpsError> {
    table
        .resolve(network)
        .ok_or(OpsError::MissingParam { what, network })
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(tag: u8) -> Address {
        let mut bytes = [0u8; 20];
        bytes[19] = tag;

        Address::new(bytes)
    }

    #[test]
    fn usable_truth_table() {
        assert!(!usable(None));
        assert!(!usable(Some(Address::ZERO)));
        assert!(usable(Some(addr(1))));
    }

    #[test]
    fn resolve_usable_filters_zero_entries() {
        let table: PerNetwork<Address> = [
            (Network::Sepolia, addr(7)),
            (Network::Mainnet, Address::ZERO),
        ]
        .into_iter()
        .collect();

        assert_eq!(resolve_usable(&table, Network::Sepolia), Some(addr(7)));
        assert_eq!(resolve_usable(&table, Network::Mainnet), None);
        assert_eq!(resolve_usable(&table, Network::Fork), None);
    }

    #[test]
    fn require_reports_the_missing_parameter() {
        let table: PerNetwork<Address> = PerNetwork::default();
        let err = require(&table, Network::Fork, "treasury").unwrap_err();

        assert!(err.to_string().contains("treasury"));
        assert!(err.to_string().contains("fork"));
    }
}
