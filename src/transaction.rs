//! Wallet transaction records and their pure constructors.
//!
//! Constructors return a fresh value per call; there is no shared template
//! and no process-wide gas defaults to mutate. Anything that needs chain
//! state (balance checks, owner verification) lives on the facade instead.

use crate::config::{gas_price_sentinel, DEFAULT_BASE_GAS};
use ethers_core::types::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

/// The call kind a wallet transaction performs.
///
/// The wallet contract also knows delegate calls, which run foreign code in
/// the wallet's own storage context; this client never emits them, so the
/// variant is deliberately unrepresentable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    /// An ordinary call.
    #[default]
    Call,
}

impl Operation {
    /// Wire value of the operation, as the contract's enum encodes it.
    pub const fn as_u8(self) -> u8 {
        match self {
            Operation::Call => 0,
        }
    }
}

/// A wallet transaction, pending signature collection.
///
/// The nonce is intentionally absent: it is fetched fresh at hash time and
/// never stored, so a record cannot bind a stale nonce. Lifecycle: built →
/// hashed → signed by each owner → aggregated → submitted. Discarding a
/// record at any point is safe; hashing reserves nothing on chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafeTransaction {
    /// Call target.
    pub to: Address,
    /// Ether forwarded with the call, in wei.
    pub value: U256,
    /// Call data, empty for a plain transfer.
    pub data: Bytes,
    /// Always [`Operation::Call`].
    pub operation: Operation,
    /// Gas forwarded to the inner call; zero lets the wallet forward all.
    pub safe_tx_gas: U256,
    /// Overhead reimbursed on top of the measured gas when relaying.
    pub base_gas: U256,
    /// Refund gas price; zero when no refund, the sentinel when relaying.
    pub gas_price: U256,
    /// Refund currency; the zero address means the native currency.
    pub gas_token: Address,
    /// Receiver of the relayer refund; zero address when no refund.
    pub refund_receiver: Address,
}

/// Per-call gas parameters with documented defaults.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GasOptions {
    /// Gas forwarded to the inner call. Zero (the default) lets the wallet
    /// forward everything available.
    pub safe_tx_gas: U256,
    /// Relayer overhead reimbursement. Defaults to
    /// [`DEFAULT_BASE_GAS`](crate::config::DEFAULT_BASE_GAS) when a relayer
    /// is set and zero otherwise.
    pub base_gas: Option<U256>,
    /// Refund receiver for a relayed execution. `None` leaves all refund
    /// fields at zero: no refund.
    pub relayer: Option<Address>,
}

impl GasOptions {
    /// Gas options for a relayed execution refunding `relayer`.
    pub fn relayed(relayer: Address, safe_tx_gas: U256) -> Self {
        Self { safe_tx_gas, base_gas: None, relayer: Some(relayer) }
    }
}

/// Builds a transaction calling an arbitrary external contract or address.
///
/// Refund fields stay zero unless `gas.relayer` is set, in which case the
/// gas price becomes the sentinel the wallet resolves to `tx.gasprice` at
/// execution time. The refund currency is always the native one.
pub fn external_call(to: Address, value: U256, data: Bytes, gas: &GasOptions) -> SafeTransaction {
    let (gas_price, base_gas, refund_receiver) = match gas.relayer {
        Some(relayer) => (
            gas_price_sentinel(),
            gas.base_gas.unwrap_or_else(|| U256::from(DEFAULT_BASE_GAS)),
            relayer,
        ),
        None => (U256::zero(), gas.base_gas.unwrap_or_default(), Address::zero()),
    };

    SafeTransaction {
        to,
        value,
        data,
        operation: Operation::Call,
        safe_tx_gas: gas.safe_tx_gas,
        base_gas,
        gas_price,
        gas_token: Address::zero(),
        refund_receiver,
    }
}

/// Builds a transaction the wallet sends to itself, e.g. an ownership
/// change. The value is always zero and the target the wallet's own address.
pub fn internal_call(safe: Address, data: Bytes, gas: &GasOptions) -> SafeTransaction {
    external_call(safe, U256::zero(), data, gas)
}
