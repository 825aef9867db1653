//! Off-chain construction, hashing and multi-signature collection for Safe
//! smart-contract wallets.
//!
//! A Safe executes a transaction once `threshold` of its owners have signed
//! the wallet's own EIP-712 hash of it. This crate produces that hash bit-
//! for-bit ([`hash`]), signs it in the wallet's `eth_sign` convention and
//! merges the owners' signatures into the canonically ordered blob the
//! contract verifies ([`signature`]), and precomputes the address of a
//! not-yet-deployed wallet ([`factory`]).
//!
//! The chain sits behind the [`SafeLedger`] trait: the core never opens a
//! connection itself and is handed opaque call/response bytes, so any
//! provider stack (or a test double) can drive it.
//!
//! ```no_run
//! use ethers_core::types::{Address, U256};
//! use ethers_safe::{aggregate, sign_transaction_hash, GasOptions, Safe, SafeConfig};
//! use ethers_signers::LocalWallet;
//!
//! # async fn demo<L: ethers_safe::SafeLedger>(ledger: L) -> Result<(), Box<dyn std::error::Error>> {
//! let config = SafeConfig::for_chain(1)?;
//! let safe = Safe::new("0xDF1d1370A694FA0B0048b70eA97619e0d86aa4F0".parse()?, config, ledger);
//!
//! // build and hash a transfer; the nonce is fetched fresh
//! let to: Address = "0x06E5250dFf75ACA538a10e66357748d2889528bA".parse()?;
//! let tx = safe.send_eth(to, U256::exp10(16), &GasOptions::default()).await?;
//! let (hash, _nonce) = safe.transaction_hash(&tx).await?;
//!
//! // each owner signs independently, in any order
//! let owner_a: LocalWallet =
//!     "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80".parse()?;
//! let owner_b: LocalWallet =
//!     "59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d".parse()?;
//! let a = sign_transaction_hash(&owner_a, hash).await?;
//! let b = sign_transaction_hash(&owner_b, hash).await?;
//!
//! // aggregate into the contract's canonical blob and submit
//! let signatures = aggregate(&[a, b], 2)?;
//! safe.execute(&tx, &signatures).await?;
//! # Ok(())
//! # }
//! ```

#![deny(rustdoc::broken_intra_doc_links)]

pub mod abi;
pub mod address;
pub mod config;
pub mod error;
pub mod factory;
pub mod hash;
pub mod ledger;
pub mod safe;
pub mod signature;
pub mod transaction;

pub use crate::{
    abi::{SafeAbi, SafeEncoder},
    config::SafeConfig,
    error::SafeError,
    factory::{deployment_gas, DeploymentPlan, Factory},
    ledger::{ExecutionReceipt, SafeLedger},
    safe::{Safe, SafeState},
    signature::{
        aggregate, pack_pairwise, sign_transaction_hash, ExecutableTransaction, SafeSignature,
        SignedSafeTransaction,
    },
    transaction::{GasOptions, Operation, SafeTransaction},
};
