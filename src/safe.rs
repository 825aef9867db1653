//! High-level interface to a deployed wallet.
//!
//! The facade orchestrates builders, hashing and the ledger; it owns no
//! cryptographic logic. Owner signatures come from
//! [`sign_transaction_hash`](crate::signature::sign_transaction_hash) and are
//! merged with [`aggregate`](crate::signature::aggregate).

use crate::{
    abi::{SafeAbi, SafeEncoder},
    address::decode_address_word,
    config::{sentinel_owners, singleton_slot, SafeConfig},
    error::SafeError,
    ledger::{ExecutionReceipt, SafeLedger},
    signature::SIGNATURE_LENGTH,
    transaction::{self, GasOptions, SafeTransaction},
};
use ethers_core::{
    abi::Token,
    types::{Address, Bytes, H256, U256},
};
use tracing::debug;

/// Read-only snapshot of wallet state.
///
/// Assembled fresh on every call and never cached: owners, threshold and
/// nonce can all change between an owner's first signature and a later one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SafeState {
    /// Current owners, in the contract's list order.
    pub owners: Vec<Address>,
    /// Signatures required per execution.
    pub threshold: U256,
    /// Next transaction nonce.
    pub nonce: U256,
    /// Contract version string.
    pub version: String,
    /// Implementation the proxy delegates to.
    pub singleton: Address,
}

/// A deployed wallet bound to a ledger.
#[derive(Debug)]
pub struct Safe<L, E = SafeAbi> {
    address: Address,
    config: SafeConfig,
    ledger: L,
    encoder: E,
}

impl<L: SafeLedger> Safe<L> {
    /// Binds the wallet at `address` on the configured chain.
    pub fn new(address: Address, config: SafeConfig, ledger: L) -> Self {
        Self::with_encoder(address, config, ledger, SafeAbi)
    }
}

impl<L: SafeLedger, E: SafeEncoder> Safe<L, E> {
    /// Like [`Safe::new`] with a caller-supplied encoder.
    pub fn with_encoder(address: Address, config: SafeConfig, ledger: L, encoder: E) -> Self {
        Self { address, config, ledger, encoder }
    }

    /// The wallet's address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// The injected chain configuration.
    pub fn config(&self) -> &SafeConfig {
        &self.config
    }

    /// The injected ledger.
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Current owners of the wallet.
    pub async fn owners(&self) -> Result<Vec<Address>, SafeError> {
        self.ledger.owners(self.address).await.map_err(|e| self.call_failed(e))
    }

    /// Current signature threshold.
    pub async fn threshold(&self) -> Result<U256, SafeError> {
        self.ledger.threshold(self.address).await.map_err(|e| self.call_failed(e))
    }

    /// Current transaction nonce.
    pub async fn nonce(&self) -> Result<U256, SafeError> {
        self.ledger.nonce(self.address).await.map_err(|e| self.call_failed(e))
    }

    /// Version string of the wallet contract.
    pub async fn version(&self) -> Result<String, SafeError> {
        self.ledger.version(self.address).await.map_err(|e| self.call_failed(e))
    }

    /// Native-currency balance of the wallet, in wei.
    pub async fn balance(&self) -> Result<U256, SafeError> {
        self.ledger.balance(self.address).await.map_err(|e| self.call_failed(e))
    }

    /// The implementation the proxy delegates to, read from its storage
    /// slot and decoded as a typed address.
    pub async fn singleton(&self) -> Result<Address, SafeError> {
        let word = self
            .ledger
            .storage_at(self.address, singleton_slot())
            .await
            .map_err(|e| self.call_failed(e))?;
        decode_address_word(word.as_bytes())
    }

    /// A fresh snapshot of the wallet's state.
    pub async fn state(&self) -> Result<SafeState, SafeError> {
        Ok(SafeState {
            owners: self.owners().await?,
            threshold: self.threshold().await?,
            nonce: self.nonce().await?,
            version: self.version().await?,
            singleton: self.singleton().await?,
        })
    }

    /// Fetches a fresh nonce and asks the wallet for the binding hash of
    /// `transaction`. Returns the hash together with the nonce it binds.
    ///
    /// The nonce is never reused from an earlier read; if it cannot be
    /// obtained, this fails with [`SafeError::HashUnavailable`] rather than
    /// guessing.
    pub async fn transaction_hash(
        &self,
        transaction: &SafeTransaction,
    ) -> Result<(H256, U256), SafeError> {
        let nonce = self
            .ledger
            .nonce(self.address)
            .await
            .map_err(|e| self.hash_unavailable(e))?;
        let hash = self
            .ledger
            .transaction_hash(self.address, transaction, nonce)
            .await
            .map_err(|e| self.hash_unavailable(e))?;

        debug!(safe = ?self.address, %nonce, ?hash, "transaction hash obtained");
        Ok((hash, nonce))
    }

    /// Builds a call to an external contract or address.
    ///
    /// The wallet's balance is checked first: a transfer it cannot cover
    /// fails with [`SafeError::InsufficientBalance`] before any hash is
    /// requested.
    pub async fn external_call(
        &self,
        to: Address,
        value: U256,
        data: Bytes,
        gas: &GasOptions,
    ) -> Result<SafeTransaction, SafeError> {
        let balance = self.balance().await?;
        if balance < value {
            return Err(SafeError::InsufficientBalance {
                safe: self.address,
                balance,
                required: value,
            });
        }
        Ok(transaction::external_call(to, value, data, gas))
    }

    /// Builds a plain ether transfer.
    pub async fn send_eth(
        &self,
        to: Address,
        value: U256,
        gas: &GasOptions,
    ) -> Result<SafeTransaction, SafeError> {
        self.external_call(to, value, Bytes::default(), gas).await
    }

    /// Builds the internal call adding `new_owner` and setting `threshold`.
    pub async fn add_owner_with_threshold(
        &self,
        new_owner: Address,
        threshold: U256,
        gas: &GasOptions,
    ) -> Result<SafeTransaction, SafeError> {
        let owners = self.owners().await?;
        verify_new_owner(&owners, new_owner, threshold)?;

        let data = self
            .encoder
            .encode("addOwnerWithThreshold", &[Token::Address(new_owner), Token::Uint(threshold)])?;
        Ok(transaction::internal_call(self.address, data, gas))
    }

    /// Builds the internal call removing `owner` and setting `threshold`.
    ///
    /// The contract keeps owners in a linked list, so the predecessor is
    /// looked up in the fresh owner list; the sentinel link is used when
    /// `owner` is first.
    pub async fn remove_owner(
        &self,
        owner: Address,
        threshold: U256,
        gas: &GasOptions,
    ) -> Result<SafeTransaction, SafeError> {
        let owners = self.owners().await?;
        let position = owners
            .iter()
            .position(|current| *current == owner)
            .ok_or_else(|| SafeError::InvalidAddress(format!("{owner:?} is not an owner")))?;
        let prev_owner = if position == 0 { sentinel_owners() } else { owners[position - 1] };

        let remaining = owners.len() - 1;
        if threshold.is_zero() || threshold > U256::from(remaining) {
            return Err(SafeError::ThresholdOutOfRange { threshold, owners: remaining });
        }

        let data = self.encoder.encode(
            "removeOwner",
            &[Token::Address(prev_owner), Token::Address(owner), Token::Uint(threshold)],
        )?;
        Ok(transaction::internal_call(self.address, data, gas))
    }

    /// Builds the internal call changing the signature threshold.
    pub async fn change_threshold(
        &self,
        threshold: U256,
        gas: &GasOptions,
    ) -> Result<SafeTransaction, SafeError> {
        let owners = self.owners().await?;
        if threshold.is_zero() || threshold > U256::from(owners.len()) {
            return Err(SafeError::ThresholdOutOfRange { threshold, owners: owners.len() });
        }

        let data = self.encoder.encode("changeThreshold", &[Token::Uint(threshold)])?;
        Ok(transaction::internal_call(self.address, data, gas))
    }

    /// Submits a fully signed transaction.
    ///
    /// The blob must carry at least `threshold` 65-byte entries; fewer would
    /// revert on chain, so it is rejected here before any submission. Ledger
    /// rejections, including on-chain signature-check reverts, surface as
    /// [`SafeError::SubmissionFailed`] and are never retried automatically.
    pub async fn execute(
        &self,
        transaction: &SafeTransaction,
        signatures: &Bytes,
    ) -> Result<ExecutionReceipt, SafeError> {
        let threshold = self.threshold().await?;
        let provided = signatures.len() / SIGNATURE_LENGTH;
        if U256::from(provided) < threshold {
            return Err(SafeError::InsufficientSignatures {
                got: provided,
                required: threshold.low_u64() as usize,
            });
        }

        let receipt = self
            .ledger
            .submit(self.address, transaction, signatures.clone())
            .await
            .map_err(|e| SafeError::SubmissionFailed {
                safe: self.address,
                message: e.to_string(),
            })?;

        debug!(
            safe = ?self.address,
            tx = ?receipt.transaction_hash,
            success = receipt.success,
            "transaction submitted"
        );
        Ok(receipt)
    }

    fn call_failed(&self, error: L::Error) -> SafeError {
        SafeError::CallFailed { to: self.address, message: error.to_string() }
    }

    fn hash_unavailable(&self, error: L::Error) -> SafeError {
        SafeError::HashUnavailable { safe: self.address, message: error.to_string() }
    }
}

fn verify_new_owner(
    owners: &[Address],
    new_owner: Address,
    threshold: U256,
) -> Result<(), SafeError> {
    if new_owner.is_zero() || new_owner == sentinel_owners() {
        return Err(SafeError::InvalidAddress(format!("{new_owner:?} cannot be an owner")));
    }
    if owners.contains(&new_owner) {
        return Err(SafeError::DuplicateOwner(new_owner));
    }
    // one more owner after the addition
    if threshold.is_zero() || threshold > U256::from(owners.len() + 1) {
        return Err(SafeError::ThresholdOutOfRange { threshold, owners: owners.len() + 1 });
    }
    Ok(())
}
