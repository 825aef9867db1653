//! The ledger collaborator: the crate's only boundary to the chain.
//!
//! Everything network-shaped goes through [`SafeLedger`]; the core hands it
//! opaque call bytes and gets opaque response bytes back. Implement the
//! trait over a provider stack, a transaction service, or a test double.

use crate::transaction::SafeTransaction;
use async_trait::async_trait;
use ethers_core::types::{Address, Bytes, H256, U256};
use serde::{Deserialize, Serialize};
use std::{error::Error, fmt::Debug};

/// Outcome of a submitted wallet transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionReceipt {
    /// Hash of the layer-1 transaction that carried the execution.
    pub transaction_hash: H256,
    /// Whether the wallet executed the inner call successfully.
    pub success: bool,
}

/// Read and submission access to a chain holding Safe wallets.
///
/// All operations are single read/write round trips. Implementations must
/// not cache wallet state: owners, threshold and nonce are re-read for every
/// operation that depends on them, because any execution (including one not
/// authored by this client) can change them between two reads.
#[async_trait]
pub trait SafeLedger: Debug + Send + Sync {
    /// Error produced by the underlying transport.
    type Error: Error + Send + Sync + 'static;

    /// Current owners of the wallet, in the contract's list order.
    async fn owners(&self, safe: Address) -> Result<Vec<Address>, Self::Error>;

    /// Minimum number of owner signatures required per execution.
    async fn threshold(&self, safe: Address) -> Result<U256, Self::Error>;

    /// The wallet's current transaction nonce.
    async fn nonce(&self, safe: Address) -> Result<U256, Self::Error>;

    /// Version string reported by the wallet contract.
    async fn version(&self, safe: Address) -> Result<String, Self::Error>;

    /// Native-currency balance of `address`, in wei.
    async fn balance(&self, address: Address) -> Result<U256, Self::Error>;

    /// Raw storage word of `address` at `slot`.
    async fn storage_at(&self, address: Address, slot: H256) -> Result<H256, Self::Error>;

    /// Executes a read-only call and returns the raw return data.
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, Self::Error>;

    /// Asks the wallet contract for the binding hash of `transaction` at
    /// `nonce` (its `getTransactionHash` view).
    async fn transaction_hash(
        &self,
        safe: Address,
        transaction: &SafeTransaction,
        nonce: U256,
    ) -> Result<H256, Self::Error>;

    /// Submits `transaction` with an aggregated signature blob for
    /// execution. At-most-once from the caller's perspective: a retry after
    /// a timeout risks double submission unless the nonce is reconfirmed
    /// first.
    async fn submit(
        &self,
        safe: Address,
        transaction: &SafeTransaction,
        signatures: Bytes,
    ) -> Result<ExecutionReceipt, Self::Error>;
}
