//!
//! Idempotent provision-or-reuse for a single infrastructure component.
//!

use crate::{
    chain::{ChainError, Component},
    log,
    ops::resolve::usable_address,
    types::Address,
};
use std::future::Future;

///
/// Provisioned
/// The authoritative address for a component after a provisioning
/// decision, and whether this run deployed it. `fresh` gates the one
/// follow-up that must not touch externally supplied components: baseline
/// rate seeding.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Provisioned {
    pub address: Address,
    pub fresh: bool,
}

/// Reuse the configured address when it names a usable deployment,
/// otherwise run `deploy` and adopt its confirmed address. No retries;
/// a deployment failure is final for the run.
pub async fn provision<F, Fut>(
    component: Component,
    configured: Option<Address>,
    deploy: F,
) -> Result<Provisioned, ChainError>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Address, ChainError>>,
{
    if let Some(address) = configured.and_then(usable_address) {
        log!(Ok, "♻️  reusing {component}: {address}");

        return Ok(Provisioned {
            address,
            fresh: false,
        });
    }

    let address = deploy().await?;
    log!(Ok, "⚡ deployed {component}: {address}");

    Ok(Provisioned {
        address,
        fresh: true,
    })
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn addr(tag: u8) -> Address {
        let mut bytes = [0u8; 20];
        bytes[19] = tag;

        Address::new(bytes)
    }

    #[tokio::test]
    async fn reuses_a_usable_configured_address() {
        let deployed = AtomicBool::new(false);

        let got = provision(Component::RateOracle, Some(addr(9)), || async {
            deployed.store(true, Ordering::SeqCst);
            Ok(addr(1))
        })
        .await
        .unwrap();

        assert_eq!(got.address, addr(9));
        assert!(!got.fresh);
        assert!(!deployed.load(Ordering::SeqCst), "must not deploy on reuse");
    }

    #[tokio::test]
    async fn deploys_when_unconfigured_or_zero() {
        for configured in [None, Some(Address::ZERO)] {
            let got = provision(Component::PriceOracle, configured, || async { Ok(addr(2)) })
                .await
                .unwrap();

            assert_eq!(got.address, addr(2));
            assert!(got.fresh);
        }
    }

    #[tokio::test]
    async fn deployment_failure_propagates_unmodified() {
        let err = provision(Component::Gateway, None, || async {
            Err(ChainError::Deploy(Component::Gateway, "out of gas".into()))
        })
        .await
        .unwrap_err();

        assert!(matches!(err, ChainError::Deploy(Component::Gateway, _)));
    }
}
