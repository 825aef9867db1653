//! Chain configuration and wallet constants.
//!
//! Known deployment addresses live in one injected record instead of being
//! hard-coded at the call sites; a [`SafeConfig`] is validated once when it
//! is constructed.

use crate::error::SafeError;
use ethers_core::types::{Address, H256, U256};

/// Canonical v1.3.0 proxy factory, deployed at the same address on every
/// supported chain.
const CANONICAL_FACTORY: &str = "0xa6B71E26C5e0845f74c812102Ca7114b6a896AB2";
/// Canonical v1.3.0 wallet singleton.
const CANONICAL_SINGLETON: &str = "0xd9Db270c1B5E3Bd161E8c8503c55cEABeE709552";
/// Sepolia uses the L2 singleton variant.
const SEPOLIA_SINGLETON: &str = "0xc650B598b095613cCddF0f49570FfA475175A5D5";
/// Default compatibility fallback handler.
const CANONICAL_HANDLER: &str = "0xf48f2B2d2a534e402487b3ee7C18c33Aec0Fe5e4";

/// Minimum owner count accepted by a deployment plan.
pub const MIN_OWNERS: usize = 3;

/// Default signature threshold for a new deployment.
pub const DEFAULT_THRESHOLD: usize = 2;

/// Default `baseGas` reimbursed to a relayer on top of the measured gas.
pub const DEFAULT_BASE_GAS: u64 = 30_000;

/// Deployment cost of a one-owner wallet, buffer included.
pub const DEPLOYMENT_BASE_GAS: u64 = 270_000;

/// Marginal deployment cost per additional owner, buffer included.
pub const DEPLOYMENT_OWNER_GAS: u64 = 25_000;

/// First link of the wallet's owner linked list.
pub fn sentinel_owners() -> Address {
    Address::from_low_u64_be(1)
}

/// Storage slot of the proxy's implementation (singleton) address.
pub fn singleton_slot() -> H256 {
    H256::zero()
}

/// Gas price written into relayed transactions: 100 ether.
///
/// The wallet charges `min(gasPrice, tx.gasprice)`, so a price this large
/// always resolves to the execution-time `tx.gasprice` and a stale quote can
/// never shortchange the relayer.
pub fn gas_price_sentinel() -> U256 {
    U256::exp10(20)
}

/// Addresses of one chain's Safe deployment, injected wherever the factory,
/// singleton or fallback handler is needed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SafeConfig {
    /// Chain id the wallet's domain separator is bound to.
    pub chain_id: u64,
    /// Proxy factory the deployment calls go through.
    pub factory: Address,
    /// Implementation contract every proxy delegates to.
    pub singleton: Address,
    /// Fallback handler wired into new deployments.
    pub fallback_handler: Address,
}

impl SafeConfig {
    /// Builds a configuration from explicit addresses, rejecting zero
    /// addresses up front so later operations can rely on it.
    pub fn new(
        chain_id: u64,
        factory: Address,
        singleton: Address,
        fallback_handler: Address,
    ) -> Result<Self, SafeError> {
        for (name, address) in [
            ("factory", factory),
            ("singleton", singleton),
            ("fallback handler", fallback_handler),
        ] {
            if address.is_zero() {
                return Err(SafeError::InvalidAddress(format!(
                    "{name} must not be the zero address"
                )));
            }
        }
        Ok(Self { chain_id, factory, singleton, fallback_handler })
    }

    /// The known deployment for `chain_id`, or [`SafeError::UnsupportedChain`].
    pub fn for_chain(chain_id: u64) -> Result<Self, SafeError> {
        let singleton = match chain_id {
            // mainnet, goerli, polygon, base
            1 | 5 | 137 | 8453 => CANONICAL_SINGLETON,
            // sepolia
            11155111 => SEPOLIA_SINGLETON,
            other => return Err(SafeError::UnsupportedChain(other)),
        };
        Self::new(chain_id, addr(CANONICAL_FACTORY), addr(singleton), addr(CANONICAL_HANDLER))
    }
}

fn addr(literal: &str) -> Address {
    literal.parse().expect("static address literal")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_chains_resolve() {
        for chain_id in [1u64, 5, 137, 8453, 11155111] {
            let config = SafeConfig::for_chain(chain_id).unwrap();
            assert_eq!(config.chain_id, chain_id);
            assert!(!config.factory.is_zero());
        }
        assert_ne!(
            SafeConfig::for_chain(1).unwrap().singleton,
            SafeConfig::for_chain(11155111).unwrap().singleton,
        );
    }

    #[test]
    fn unknown_chain_is_rejected() {
        assert!(matches!(SafeConfig::for_chain(42), Err(SafeError::UnsupportedChain(42))));
    }

    #[test]
    fn zero_addresses_are_rejected() {
        let config = SafeConfig::for_chain(1).unwrap();
        let err = SafeConfig::new(1, Address::zero(), config.singleton, config.fallback_handler);
        assert!(matches!(err, Err(SafeError::InvalidAddress(_))));
    }

    #[test]
    fn gas_price_sentinel_is_100_ether() {
        assert_eq!(gas_price_sentinel(), U256::from(100u64) * U256::exp10(18));
    }
}
