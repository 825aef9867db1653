//! Deployment planning: initializers, gas heuristics and counterfactual
//! proxy addresses.

use crate::{
    abi::{SafeAbi, SafeEncoder},
    address::extract_address,
    config::{
        sentinel_owners, SafeConfig, DEFAULT_THRESHOLD, DEPLOYMENT_BASE_GAS,
        DEPLOYMENT_OWNER_GAS, MIN_OWNERS,
    },
    error::SafeError,
    ledger::SafeLedger,
};
use ethers_core::{
    abi::Token,
    types::{Address, Bytes, U256},
};
use tracing::debug;

/// Parameters of one wallet deployment attempt.
///
/// A plan is constructed once, consumed to derive an initializer and a
/// counterfactual address, and not mutated afterwards: changing any field
/// invalidates a previously computed address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeploymentPlan {
    /// Initial owners; at least three, all unique.
    pub owners: Vec<Address>,
    /// Signature threshold, `1..=owners.len()`. Defaults to 2.
    pub threshold: usize,
    /// Refund paid to `payment_receiver` for the deployment, in wei.
    /// Native currency only; defaults to zero.
    pub payment: U256,
    /// Receiver of the deployment refund, e.g. a relayer.
    pub payment_receiver: Address,
    /// Salt distinguishing deployments with identical initializers.
    pub salt_nonce: U256,
}

impl DeploymentPlan {
    /// A plan with the default 2-of-N setup and no deployment refund.
    pub fn new(owners: Vec<Address>, salt_nonce: U256) -> Self {
        Self {
            owners,
            threshold: DEFAULT_THRESHOLD,
            payment: U256::zero(),
            payment_receiver: Address::zero(),
            salt_nonce,
        }
    }

    /// Overrides the signature threshold.
    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.threshold = threshold;
        self
    }

    /// Requests a deployment refund.
    pub fn with_payment(mut self, payment: U256, receiver: Address) -> Self {
        self.payment = payment;
        self.payment_receiver = receiver;
        self
    }
}

/// Plans wallet deployments against the configured proxy factory.
#[derive(Debug)]
pub struct Factory<L, E = SafeAbi> {
    config: SafeConfig,
    ledger: L,
    encoder: E,
}

impl<L: SafeLedger> Factory<L> {
    /// A factory facade for the configured chain.
    pub fn new(config: SafeConfig, ledger: L) -> Self {
        Self::with_encoder(config, ledger, SafeAbi)
    }
}

impl<L: SafeLedger, E: SafeEncoder> Factory<L, E> {
    /// Like [`Factory::new`] with a caller-supplied encoder.
    pub fn with_encoder(config: SafeConfig, ledger: L, encoder: E) -> Self {
        Self { config, ledger, encoder }
    }

    /// The injected chain configuration.
    pub fn config(&self) -> &SafeConfig {
        &self.config
    }

    /// Encodes the wallet's `setup` call for `plan`.
    ///
    /// Validates the plan first: at least [`MIN_OWNERS`] unique, usable
    /// owner addresses and a threshold within `1..=owners.len()`. The
    /// payload is opaque to everything downstream of the encoder. No
    /// delegate setup call is ever emitted and the payment currency is
    /// always the native one.
    pub fn initializer(&self, plan: &DeploymentPlan) -> Result<Bytes, SafeError> {
        validate_plan(plan)?;

        self.encoder.encode(
            "setup",
            &[
                Token::Array(plan.owners.iter().map(|owner| Token::Address(*owner)).collect()),
                Token::Uint(U256::from(plan.threshold)),
                Token::Address(Address::zero()),
                Token::Bytes(Vec::new()),
                Token::Address(self.config.fallback_handler),
                Token::Address(Address::zero()),
                Token::Uint(plan.payment),
                Token::Address(plan.payment_receiver),
            ],
        )
    }

    /// The address `plan` will deploy to, computed without deploying.
    ///
    /// Issues the factory's deterministic-address view call with the same
    /// `(singleton, initializer, saltNonce)` arguments the deployment call
    /// takes, so both resolve to one address. Read-only: no side effects, no
    /// gas cost to the caller.
    pub async fn calculate_proxy_address(
        &self,
        plan: &DeploymentPlan,
    ) -> Result<Address, SafeError> {
        let initializer = self.initializer(plan)?;
        let data = self.encoder.encode(
            "calculateCreateProxyWithNonceAddress",
            &[
                Token::Address(self.config.singleton),
                Token::Bytes(initializer.to_vec()),
                Token::Uint(plan.salt_nonce),
            ],
        )?;

        let returned = self
            .ledger
            .call(self.config.factory, data)
            .await
            .map_err(|e| SafeError::CallFailed {
                to: self.config.factory,
                message: e.to_string(),
            })?;
        let proxy = extract_address(&returned)?;

        debug!(factory = ?self.config.factory, ?proxy, "proxy address calculated");
        Ok(proxy)
    }

    /// The deployment call for `plan`: target factory, call data, and the
    /// gas estimate from [`deployment_gas`]. Submitting it is left to the
    /// caller's sender.
    pub fn deployment_call(
        &self,
        plan: &DeploymentPlan,
    ) -> Result<(Address, Bytes, U256), SafeError> {
        let initializer = self.initializer(plan)?;
        let data = self.encoder.encode(
            "createProxyWithNonce",
            &[
                Token::Address(self.config.singleton),
                Token::Bytes(initializer.to_vec()),
                Token::Uint(plan.salt_nonce),
            ],
        )?;
        Ok((self.config.factory, data, deployment_gas(plan.owners.len())))
    }
}

/// Deployment cost heuristic in gas units: a fixed base for one owner plus
/// a fixed increment per additional owner.
///
/// Deliberately conservative. An under-estimate reverts out of gas and
/// burns the deployer's fee; an over-estimate only leaves unused gas to be
/// returned.
pub fn deployment_gas(owner_count: usize) -> U256 {
    let base = U256::from(DEPLOYMENT_BASE_GAS);
    if owner_count <= 1 {
        base
    } else {
        base + U256::from(DEPLOYMENT_OWNER_GAS) * U256::from(owner_count - 1)
    }
}

fn validate_plan(plan: &DeploymentPlan) -> Result<(), SafeError> {
    if plan.owners.len() < MIN_OWNERS {
        return Err(SafeError::TooFewOwners(plan.owners.len()));
    }
    for (index, owner) in plan.owners.iter().enumerate() {
        if owner.is_zero() || *owner == sentinel_owners() {
            return Err(SafeError::InvalidAddress(format!("{owner:?} cannot be an owner")));
        }
        if plan.owners[..index].contains(owner) {
            return Err(SafeError::DuplicateOwner(*owner));
        }
    }
    if plan.threshold == 0 || plan.threshold > plan.owners.len() {
        return Err(SafeError::ThresholdOutOfRange {
            threshold: U256::from(plan.threshold),
            owners: plan.owners.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owners(count: usize) -> Vec<Address> {
        (1..=count).map(|i| Address::repeat_byte(i as u8)).collect()
    }

    #[test]
    fn plan_defaults() {
        let plan = DeploymentPlan::new(owners(3), U256::from(1111u64));
        assert_eq!(plan.threshold, DEFAULT_THRESHOLD);
        assert_eq!(plan.payment, U256::zero());
        assert_eq!(plan.payment_receiver, Address::zero());
    }

    #[test]
    fn too_few_owners() {
        let plan = DeploymentPlan::new(owners(2), U256::zero());
        assert!(matches!(validate_plan(&plan), Err(SafeError::TooFewOwners(2))));
    }

    #[test]
    fn duplicate_owner() {
        let mut list = owners(3);
        list.push(list[0]);
        let plan = DeploymentPlan::new(list, U256::zero());
        assert!(matches!(validate_plan(&plan), Err(SafeError::DuplicateOwner(_))));
    }

    #[test]
    fn unusable_owner_address() {
        let mut list = owners(2);
        list.push(Address::zero());
        let plan = DeploymentPlan::new(list, U256::zero());
        assert!(matches!(validate_plan(&plan), Err(SafeError::InvalidAddress(_))));
    }

    #[test]
    fn threshold_bounds() {
        let plan = DeploymentPlan::new(owners(3), U256::zero()).with_threshold(0);
        assert!(matches!(validate_plan(&plan), Err(SafeError::ThresholdOutOfRange { .. })));

        let plan = DeploymentPlan::new(owners(3), U256::zero()).with_threshold(4);
        assert!(matches!(validate_plan(&plan), Err(SafeError::ThresholdOutOfRange { .. })));

        for threshold in 1..=3 {
            let plan = DeploymentPlan::new(owners(3), U256::zero()).with_threshold(threshold);
            assert!(validate_plan(&plan).is_ok());
        }
    }

    #[test]
    fn gas_estimate_is_base_for_one_owner() {
        assert_eq!(deployment_gas(1), U256::from(DEPLOYMENT_BASE_GAS));
    }

    #[test]
    fn gas_estimate_is_monotonic() {
        let mut previous = U256::zero();
        for count in 1..=10 {
            let estimate = deployment_gas(count);
            assert!(estimate >= previous);
            previous = estimate;
        }
        assert_eq!(
            deployment_gas(5),
            U256::from(DEPLOYMENT_BASE_GAS) + U256::from(DEPLOYMENT_OWNER_GAS) * U256::from(4u64),
        );
    }
}
