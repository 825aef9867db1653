//! Byte-level address extraction and canonical display forms.
//!
//! Two addresses are equal iff their raw 20 bytes are equal; checksum casing
//! is display only and never participates in comparisons.

use crate::error::SafeError;
use ethers_core::{types::Address, utils::to_checksum};
use std::str::FromStr;

/// Bytes preceding the address in the factory's deterministic-address
/// payload: 4-byte selector, one offset word, one length word.
const FACTORY_PAYLOAD_PREFIX: usize = 4 + 32 + 32;
const FACTORY_PAYLOAD_LEN: usize = FACTORY_PAYLOAD_PREFIX + 20;

/// Extracts the proxy address from the factory's deterministic-address
/// return payload.
///
/// The factory surfaces the computed address packed into a revert-style
/// payload rather than a plain word, so the 20 address bytes sit right after
/// the selector, offset and length words. No general ABI decoder is needed:
/// the shape is fixed, and anything shorter than the fixed minimum fails
/// with [`SafeError::DecodeError`].
pub fn extract_address(return_data: &[u8]) -> Result<Address, SafeError> {
    if return_data.len() < FACTORY_PAYLOAD_LEN {
        return Err(SafeError::DecodeError(format!(
            "expected at least {FACTORY_PAYLOAD_LEN} bytes of factory return data, got {}",
            return_data.len()
        )));
    }
    Ok(Address::from_slice(&return_data[FACTORY_PAYLOAD_PREFIX..FACTORY_PAYLOAD_LEN]))
}

/// Decodes an address out of a single 32-byte word, e.g. the proxy's
/// singleton storage slot or a plain single-address return value.
///
/// The high 12 bytes must be zero; anything else means the word does not
/// hold an address and the decode fails loudly instead of truncating.
pub fn decode_address_word(word: &[u8]) -> Result<Address, SafeError> {
    if word.len() < 32 {
        return Err(SafeError::DecodeError(format!(
            "expected a 32-byte word, got {} bytes",
            word.len()
        )));
    }
    if word[..12].iter().any(|byte| *byte != 0) {
        return Err(SafeError::DecodeError(format!(
            "word 0x{} does not hold an address",
            hex::encode(&word[..32])
        )));
    }
    Ok(Address::from_slice(&word[12..32]))
}

/// Canonical EIP-55 checksummed display form of an address.
pub fn checksum(address: &Address) -> String {
    to_checksum(address, None)
}

/// Parses a textual address, accepting any checksum casing.
pub fn parse_address(input: &str) -> Result<Address, SafeError> {
    Address::from_str(input).map_err(|_| SafeError::InvalidAddress(input.to_string()))
}

/// Parses a batch of textual addresses, failing on the first malformed one.
pub fn sanitize_addresses(inputs: &[&str]) -> Result<Vec<Address>, SafeError> {
    inputs.iter().map(|input| parse_address(input)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factory_payload(address: Address) -> Vec<u8> {
        let mut payload = vec![0u8; FACTORY_PAYLOAD_PREFIX];
        payload.extend_from_slice(address.as_bytes());
        payload.extend_from_slice(&[0u8; 12]); // padding of the trailing word
        payload
    }

    #[test]
    fn extracts_address_from_factory_payload() {
        let expected: Address = "0xDF1d1370A694FA0B0048b70eA97619e0d86aa4F0".parse().unwrap();
        let payload = factory_payload(expected);
        assert_eq!(extract_address(&payload).unwrap(), expected);
        // exact minimum length also decodes
        assert_eq!(extract_address(&payload[..FACTORY_PAYLOAD_LEN]).unwrap(), expected);
    }

    #[test]
    fn short_payload_fails() {
        let err = extract_address(&[0u8; 32]).unwrap_err();
        assert!(matches!(err, SafeError::DecodeError(_)));
    }

    #[test]
    fn decodes_singleton_word() {
        let expected: Address = "0xd9Db270c1B5E3Bd161E8c8503c55cEABeE709552".parse().unwrap();
        let mut word = [0u8; 32];
        word[12..].copy_from_slice(expected.as_bytes());
        assert_eq!(decode_address_word(&word).unwrap(), expected);
    }

    #[test]
    fn dirty_high_bytes_fail() {
        let mut word = [0u8; 32];
        word[0] = 0x01;
        assert!(matches!(decode_address_word(&word), Err(SafeError::DecodeError(_))));
    }

    #[test]
    fn checksum_matches_eip55_vector() {
        let address = parse_address("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").unwrap();
        assert_eq!(checksum(&address), "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed");
    }

    #[test]
    fn equality_ignores_casing() {
        let lower = parse_address("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").unwrap();
        let upper = parse_address("0x5AAEB6053F3E94C9B9A09F33669435E7EF1BEAED").unwrap();
        assert_eq!(lower, upper);
    }

    #[test]
    fn sanitize_rejects_malformed_input() {
        let err = sanitize_addresses(&["0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed", "0xnope"]);
        assert!(matches!(err, Err(SafeError::InvalidAddress(_))));
    }
}
