use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fmt::{self, Display},
};

///
/// Network
/// Deployment target for a bootstrap run. Fixed for the run's duration;
/// every per-environment table in the market configuration is keyed by it.
///

#[derive(
    Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Local development node.
    Local,
    /// Public test network.
    Sepolia,
    /// Simulation fork of mainnet state.
    Fork,
    /// Production network.
    Mainnet,
}

impl Network {
    /// Fork runs get failure diagnostics pointing at the simulated
    /// transaction (see `ops::bootstrap`).
    #[must_use]
    pub const fn is_fork(self) -> bool {
        matches!(self, Self::Fork)
    }
}

impl Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Local => "local",
            Self::Sepolia => "sepolia",
            Self::Fork => "fork",
            Self::Mainnet => "mainnet",
        };

        write!(f, "{name}")
    }
}

///
/// PerNetwork
/// A typed per-environment table. Entries are optional by construction:
/// `resolve` returns `None` for networks the table does not cover, so
/// "not configured" is never conflated with "configured as zero".
///

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(transparent)]
pub struct PerNetwork<T>(BTreeMap<Network, T>);

impl<T> PerNetwork<T> {
    #[must_use]
    pub fn resolve(&self, network: Network) -> Option<&T> {
        self.0.get(&network)
    }

    pub fn insert(&mut self, network: Network, value: T) -> Option<T> {
        self.0.insert(network, value)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Network, &T)> {
        self.0.iter().map(|(network, value)| (*network, value))
    }
}

impl<T> Default for PerNetwork<T> {
    fn default() -> Self {
        Self(BTreeMap::new())
    }
}

impl<T> FromIterator<(Network, T)> for PerNetwork<T> {
    fn from_iter<I: IntoIterator<Item = (Network, T)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_distinguishes_absent_from_present() {
        let table: PerNetwork<u32> = [(Network::Sepolia, 7u32)].into_iter().collect();

        assert_eq!(table.resolve(Network::Sepolia), Some(&7));
        assert_eq!(table.resolve(Network::Mainnet), None);
    }

    #[test]
    fn deserializes_from_toml_keyed_by_network_name() {
        #[derive(Deserialize)]
        struct Doc {
            treasury: PerNetwork<String>,
        }

        let doc: Doc = toml::from_str(
            r#"
            [treasury]
            sepolia = "a"
            mainnet = "b"
            "#,
        )
        .unwrap();

        assert_eq!(doc.treasury.resolve(Network::Sepolia).unwrap(), "a");
        assert_eq!(doc.treasury.resolve(Network::Mainnet).unwrap(), "b");
        assert!(doc.treasury.resolve(Network::Fork).is_none());
    }
}
