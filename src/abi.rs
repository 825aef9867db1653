//! Call-data encoding for the fixed Safe and proxy-factory interfaces.
//!
//! The encoder is purely a formatting concern: a function name plus typed
//! arguments in, call bytes out. Everything that decides *what* to encode
//! lives in the builders and facades.

use crate::error::SafeError;
use ethers_core::{
    abi::{parse_abi, Abi, Token},
    types::Bytes,
};
use once_cell::sync::Lazy;
use std::fmt::Debug;

static SAFE_ABI: Lazy<Abi> = Lazy::new(|| {
    parse_abi(&[
        "function setup(address[] owners, uint256 threshold, address to, bytes data, address fallbackHandler, address paymentToken, uint256 payment, address paymentReceiver)",
        "function addOwnerWithThreshold(address owner, uint256 threshold)",
        "function removeOwner(address prevOwner, address owner, uint256 threshold)",
        "function changeThreshold(uint256 threshold)",
        "function createProxyWithNonce(address singleton, bytes initializer, uint256 saltNonce) returns (address)",
        "function calculateCreateProxyWithNonceAddress(address singleton, bytes initializer, uint256 saltNonce) returns (address)",
    ])
    .expect("embedded safe interface is well formed")
});

/// Turns a function name and typed arguments into call bytes for a fixed
/// interface description.
pub trait SafeEncoder: Debug + Send + Sync {
    /// Encodes a call to `function` with `args`, selector included.
    fn encode(&self, function: &str, args: &[Token]) -> Result<Bytes, SafeError>;
}

/// [`SafeEncoder`] over the Safe singleton and proxy-factory interfaces.
#[derive(Clone, Copy, Debug, Default)]
pub struct SafeAbi;

impl SafeEncoder for SafeAbi {
    fn encode(&self, function: &str, args: &[Token]) -> Result<Bytes, SafeError> {
        let function = SAFE_ABI.function(function)?;
        Ok(function.encode_input(args)?.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers_core::{
        types::{Address, U256},
        utils::id,
    };

    #[test]
    fn encodes_known_selectors() {
        let encoder = SafeAbi;
        let data = encoder
            .encode(
                "addOwnerWithThreshold",
                &[Token::Address(Address::repeat_byte(0x11)), Token::Uint(U256::from(2u64))],
            )
            .unwrap();
        assert_eq!(&data[..4], &id("addOwnerWithThreshold(address,uint256)")[..]);
        assert_eq!(data.len(), 4 + 2 * 32);

        let data = encoder
            .encode(
                "createProxyWithNonce",
                &[
                    Token::Address(Address::repeat_byte(0x22)),
                    Token::Bytes(vec![0xde, 0xad]),
                    Token::Uint(U256::one()),
                ],
            )
            .unwrap();
        assert_eq!(&data[..4], &id("createProxyWithNonce(address,bytes,uint256)")[..]);
    }

    #[test]
    fn unknown_function_fails() {
        assert!(SafeAbi.encode("enableModule", &[]).is_err());
    }

    #[test]
    fn wrong_arity_fails() {
        assert!(SafeAbi.encode("changeThreshold", &[]).is_err());
    }
}
