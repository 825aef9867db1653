//! EIP-712 hashing of wallet transactions.
//!
//! [`compute_transaction_hash`] reproduces, bit for bit, the hash the wallet
//! contract's `getTransactionHash` returns, so signatures collected off chain
//! verify on chain. The domain separator binds the hash to one wallet on one
//! chain; a transaction signed for one wallet can never replay on another.

use crate::transaction::SafeTransaction;
use ethers_core::{
    abi::{encode, Token},
    types::{Address, H256, U256},
    utils::keccak256,
};
use once_cell::sync::Lazy;

/// `keccak256("EIP712Domain(uint256 chainId,address verifyingContract)")`
static DOMAIN_SEPARATOR_TYPEHASH: Lazy<[u8; 32]> =
    Lazy::new(|| keccak256("EIP712Domain(uint256 chainId,address verifyingContract)"));

/// `keccak256("SafeTx(...)")` over the contract's exact field tuple.
static SAFE_TX_TYPEHASH: Lazy<[u8; 32]> = Lazy::new(|| {
    keccak256(
        "SafeTx(address to,uint256 value,bytes data,uint8 operation,uint256 safeTxGas,\
         uint256 baseGas,uint256 gasPrice,address gasToken,address refundReceiver,uint256 nonce)",
    )
});

/// Domain separator of the wallet at `safe` on `chain_id`.
pub fn domain_separator(chain_id: u64, safe: Address) -> H256 {
    keccak256(encode(&[
        Token::FixedBytes(DOMAIN_SEPARATOR_TYPEHASH.to_vec()),
        Token::Uint(U256::from(chain_id)),
        Token::Address(safe),
    ]))
    .into()
}

fn struct_hash(transaction: &SafeTransaction, nonce: U256) -> H256 {
    keccak256(encode(&[
        Token::FixedBytes(SAFE_TX_TYPEHASH.to_vec()),
        Token::Address(transaction.to),
        Token::Uint(transaction.value),
        // dynamic fields are hashed into the struct hash
        Token::FixedBytes(keccak256(&transaction.data).to_vec()),
        Token::Uint(transaction.operation.as_u8().into()),
        Token::Uint(transaction.safe_tx_gas),
        Token::Uint(transaction.base_gas),
        Token::Uint(transaction.gas_price),
        Token::Address(transaction.gas_token),
        Token::Address(transaction.refund_receiver),
        Token::Uint(nonce),
    ]))
    .into()
}

/// The binding hash of `transaction` for the wallet at `safe`, given the
/// wallet's current `nonce`.
///
/// Pure and deterministic in its inputs. Callers that talk to a ledger
/// should prefer [`Safe::transaction_hash`](crate::Safe::transaction_hash),
/// which fetches a fresh nonce and asks the contract itself; both paths
/// agree bit for bit.
pub fn compute_transaction_hash(
    safe: Address,
    chain_id: u64,
    transaction: &SafeTransaction,
    nonce: U256,
) -> H256 {
    let mut preimage = Vec::with_capacity(2 + 32 + 32);
    preimage.extend_from_slice(&[0x19, 0x01]);
    preimage.extend_from_slice(domain_separator(chain_id, safe).as_bytes());
    preimage.extend_from_slice(struct_hash(transaction, nonce).as_bytes());
    keccak256(preimage).into()
}
