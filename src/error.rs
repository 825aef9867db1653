use ethers_core::{
    abi::ethabi,
    types::{Address, U256},
};
use thiserror::Error;

/// An error involving a Safe operation.
///
/// Validation failures (`InvalidAddress`, `TooFewOwners`,
/// `ThresholdOutOfRange`, signer-set errors) are detected locally before any
/// network access and are not retryable: the input must be fixed.
/// `HashUnavailable`, `SubmissionFailed` and `CallFailed` surface a ledger
/// failure verbatim with the operation context; retrying a submission blindly
/// risks a double spend, so the caller decides.
#[derive(Debug, Error)]
pub enum SafeError {
    /// The address is malformed or not usable in this position, e.g. the
    /// zero address or the owner-list sentinel offered as an owner.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
    /// A deployment needs at least three owners.
    #[error("at least 3 owners are required, got {0}")]
    TooFewOwners(usize),
    /// The threshold must satisfy `1 <= threshold <= owners`.
    #[error("threshold {threshold} out of range for {owners} owner(s)")]
    ThresholdOutOfRange { threshold: U256, owners: usize },
    /// The same owner appears twice in a deployment plan or would be added
    /// to a wallet that already has it.
    #[error("owner {0:?} is already present")]
    DuplicateOwner(Address),
    /// Two signature entries share a signer. Aggregation never dedupes.
    #[error("duplicate signer {0:?}")]
    DuplicateSigner(Address),
    /// Fewer signatures than the wallet's threshold requires.
    #[error("insufficient signatures: got {got}, required {required}")]
    InsufficientSignatures { got: usize, required: usize },
    /// Two signed records disagree on call data; merging their signatures
    /// would produce a blob over different transaction contents.
    #[error("refusing to merge signatures over different call data")]
    CalldataMismatch,
    /// Two signed records disagree on the transferred value.
    #[error("refusing to merge signatures over different values")]
    ValueMismatch,
    /// The wallet cannot cover the requested transfer. Checked before any
    /// hash is requested.
    #[error("safe {safe:?} holds {balance} wei but the transfer needs {required}")]
    InsufficientBalance { safe: Address, balance: U256, required: U256 },
    /// Return data did not have the expected shape for a typed decode.
    #[error("could not decode return data: {0}")]
    DecodeError(String),
    /// The ledger could not provide a fresh nonce or the binding hash.
    /// A stale or guessed nonce is never substituted.
    #[error("could not obtain the transaction hash for safe {safe:?}: {message}")]
    HashUnavailable { safe: Address, message: String },
    /// The ledger rejected or failed the submission, including on-chain
    /// signature-check reverts.
    #[error("submission for safe {safe:?} failed: {message}")]
    SubmissionFailed { safe: Address, message: String },
    /// A read-only collaborator call failed.
    #[error("read-only call to {to:?} failed: {message}")]
    CallFailed { to: Address, message: String },
    /// The signing primitive refused to produce a signature.
    #[error("signer refused to sign: {0}")]
    SigningFailed(String),
    /// No known Safe deployment for this chain.
    #[error("unsupported chain id {0}")]
    UnsupportedChain(u64),
    /// Call-data encoding failed.
    #[error(transparent)]
    Abi(#[from] ethabi::Error),
}
