//! Owner signatures in the wallet's `eth_sign` convention and their
//! aggregation into the blob the contract verifies.

use crate::{error::SafeError, transaction::SafeTransaction};
use ethers_core::types::{Address, Bytes, Signature, H256};
use ethers_signers::Signer;
use serde::{Deserialize, Serialize};

/// Length of one `r || s || v` signature entry.
pub const SIGNATURE_LENGTH: usize = 65;

/// Offset distinguishing prefixed (`eth_sign`) recovery tags from raw ECDSA
/// ones: the wallet sees 31/32 and knows to verify against the prefixed form
/// instead of re-prefixing.
const ETH_SIGN_V_OFFSET: u64 = 4;

/// One owner's signature over a transaction hash.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafeSignature {
    /// The owner that produced the signature.
    pub signer: Address,
    /// The signature, recovery tag already in `eth_sign` form (31/32).
    pub signature: Signature,
}

impl SafeSignature {
    /// The 65-byte `r || s || v` encoding the wallet contract consumes.
    pub fn to_bytes(&self) -> [u8; 65] {
        (&self.signature).into()
    }
}

/// A transaction record together with a single owner's signature over its
/// binding hash. This is what each owner's client produces independently.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedSafeTransaction {
    /// The transaction the signature commits to.
    pub transaction: SafeTransaction,
    /// The owner's signature entry.
    pub signature: SafeSignature,
}

/// A transaction ready for submission: the record plus an aggregated,
/// canonically ordered signature blob.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutableTransaction {
    /// The transaction to execute.
    pub transaction: SafeTransaction,
    /// Concatenated 65-byte entries, ascending by signer address.
    pub signatures: Bytes,
}

/// Signs `hash` as a prefixed personal message and retags the recovery byte
/// to the wallet's `eth_sign` convention (27 → 31, 28 → 32).
///
/// Pure beyond invoking the signing primitive; no network access.
pub async fn sign_transaction_hash<S: Signer>(
    signer: &S,
    hash: H256,
) -> Result<SafeSignature, SafeError> {
    let signature = signer
        .sign_message(hash.as_bytes())
        .await
        .map_err(|e| SafeError::SigningFailed(e.to_string()))?;
    let v = eth_sign_v(signature.v)?;

    Ok(SafeSignature { signer: signer.address(), signature: Signature { v, ..signature } })
}

fn eth_sign_v(v: u64) -> Result<u64, SafeError> {
    match v {
        27 | 28 => Ok(v + ETH_SIGN_V_OFFSET),
        // some signers return the bare recovery id
        0 | 1 => Ok(v + 27 + ETH_SIGN_V_OFFSET),
        31 | 32 => Ok(v),
        other => Err(SafeError::SigningFailed(format!("unexpected recovery tag {other}"))),
    }
}

/// Concatenates at least `required` signature entries into the single blob
/// the wallet contract verifies.
///
/// Entries are sorted ascending by the raw 20 signer bytes; for fixed-width
/// big-endian data that is exactly the `uint160` order the contract checks
/// owners in. Input order is irrelevant to the output. Duplicate signers are
/// an error, never silently deduped.
pub fn aggregate(entries: &[SafeSignature], required: usize) -> Result<Bytes, SafeError> {
    for (index, entry) in entries.iter().enumerate() {
        if entries[..index].iter().any(|seen| seen.signer == entry.signer) {
            return Err(SafeError::DuplicateSigner(entry.signer));
        }
    }
    if entries.len() < required {
        return Err(SafeError::InsufficientSignatures { got: entries.len(), required });
    }

    let mut ordered = entries.to_vec();
    ordered.sort_by(|a, b| a.signer.as_bytes().cmp(b.signer.as_bytes()));

    let mut blob = Vec::with_capacity(ordered.len() * SIGNATURE_LENGTH);
    for entry in &ordered {
        blob.extend_from_slice(&entry.to_bytes());
    }
    Ok(blob.into())
}

/// Merges two independently signed copies of the same transaction, the
/// 2-of-N convenience path.
///
/// Fails if the two records were signed by the same owner or disagree on
/// call data or value; differing gas/refund parameters are tolerated, the
/// submitted record takes them from `a`.
pub fn pack_pairwise(
    a: &SignedSafeTransaction,
    b: &SignedSafeTransaction,
) -> Result<ExecutableTransaction, SafeError> {
    if a.signature.signer == b.signature.signer {
        return Err(SafeError::DuplicateSigner(a.signature.signer));
    }
    if a.transaction.data != b.transaction.data {
        return Err(SafeError::CalldataMismatch);
    }
    if a.transaction.value != b.transaction.value {
        return Err(SafeError::ValueMismatch);
    }

    let signatures = aggregate(&[a.signature.clone(), b.signature.clone()], 2)?;
    Ok(ExecutableTransaction { transaction: a.transaction.clone(), signatures })
}
