//! ABI scalar codec
//!
//! Decodes the handful of static/dynamic ABI types needed to read revert
//! payloads and ERC20 calldata:
//! - `string`: offset word, length word, then the UTF-8 bytes
//! - `uint256`: one big-endian 32-byte word (arbitrary precision)
//! - `address`: low 20 bytes of a 32-byte word
//!
//! Decoding goes through alloy's dynamic ABI decoder. Truncated or malformed
//! input, including strings that are not valid UTF-8, is reported as
//! [`AbiDecodeError`], never as a panic.

use alloy::{
    dyn_abi::{DynSolType, DynSolValue},
    hex,
    primitives::{Address, U256},
};

use crate::errors::AbiDecodeError;

/// Size of one ABI word in bytes
pub const WORD_SIZE: usize = 32;

/// Scalar types understood by the codec
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbiScalar {
    String,
    Uint256,
    Address,
}

impl AbiScalar {
    fn name(self) -> &'static str {
        match self {
            AbiScalar::String => "string",
            AbiScalar::Uint256 => "uint256",
            AbiScalar::Address => "address",
        }
    }
}

impl From<AbiScalar> for DynSolType {
    fn from(ty: AbiScalar) -> Self {
        match ty {
            // Same layout as `string`; UTF-8 is checked after decoding
            AbiScalar::String => DynSolType::Bytes,
            AbiScalar::Uint256 => DynSolType::Uint(256),
            AbiScalar::Address => DynSolType::Address,
        }
    }
}

/// A decoded scalar value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScalarValue {
    String(String),
    Uint(U256),
    Address(Address),
}

impl ScalarValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ScalarValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_uint(&self) -> Option<U256> {
        match self {
            ScalarValue::Uint(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_address(&self) -> Option<Address> {
        match self {
            ScalarValue::Address(a) => Some(*a),
            _ => None,
        }
    }
}

/// Decode ABI-encoded parameters positionally
///
/// # Arguments
/// * `types` - Parameter types in declaration order
/// * `data` - Encoded parameters (without any selector)
///
/// # Returns
/// * `Ok(Vec<ScalarValue>)` - One value per requested type
/// * `Err(AbiDecodeError)` - If the payload is truncated or malformed
///
/// # Example
/// ```
/// use tx_preview::utils::abi_utils::{decode, AbiScalar};
///
/// let mut word = [0u8; 32];
/// word[31] = 0x11;
/// let values = decode(&[AbiScalar::Uint256], &word).unwrap();
/// assert_eq!(values[0].as_uint(), Some(alloy::primitives::U256::from(0x11)));
/// ```
pub fn decode(types: &[AbiScalar], data: &[u8]) -> Result<Vec<ScalarValue>, AbiDecodeError> {
    let head_size = types.len() * WORD_SIZE;
    if data.len() < head_size {
        return Err(AbiDecodeError::Truncated {
            expected: head_size,
            actual: data.len(),
        });
    }

    let tuple = DynSolType::Tuple(types.iter().copied().map(DynSolType::from).collect());
    let decoded = tuple
        .abi_decode_params(data)
        .map_err(|e| AbiDecodeError::Abi(e.to_string()))?;

    let values = match decoded {
        DynSolValue::Tuple(values) => values,
        _ => return Err(AbiDecodeError::TypeMismatch("tuple")),
    };

    types
        .iter()
        .zip(values)
        .map(|(ty, value)| match (ty, value) {
            (AbiScalar::String, DynSolValue::Bytes(bytes)) => String::from_utf8(bytes)
                .map(ScalarValue::String)
                .map_err(|e| AbiDecodeError::InvalidUtf8(e.to_string())),
            (AbiScalar::Uint256, DynSolValue::Uint(v, _)) => Ok(ScalarValue::Uint(v)),
            (AbiScalar::Address, DynSolValue::Address(a)) => Ok(ScalarValue::Address(a)),
            (ty, _) => Err(AbiDecodeError::TypeMismatch(ty.name())),
        })
        .collect()
}

/// Decode a single ABI `string` parameter
pub fn decode_string(data: &[u8]) -> Result<String, AbiDecodeError> {
    match decode(&[AbiScalar::String], data)?.pop() {
        Some(ScalarValue::String(s)) => Ok(s),
        _ => Err(AbiDecodeError::TypeMismatch("string")),
    }
}

/// Decode a single ABI `uint256` parameter
pub fn decode_uint256(data: &[u8]) -> Result<U256, AbiDecodeError> {
    match decode(&[AbiScalar::Uint256], data)?.pop() {
        Some(ScalarValue::Uint(v)) => Ok(v),
        _ => Err(AbiDecodeError::TypeMismatch("uint256")),
    }
}

/// Decode a single ABI `address` parameter
pub fn decode_address(data: &[u8]) -> Result<Address, AbiDecodeError> {
    match decode(&[AbiScalar::Address], data)?.pop() {
        Some(ScalarValue::Address(a)) => Ok(a),
        _ => Err(AbiDecodeError::TypeMismatch("address")),
    }
}

/// Decode a hex string with or without `0x` prefix
pub fn hex_to_bytes(s: &str) -> Result<Vec<u8>, AbiDecodeError> {
    hex::decode(s.trim()).map_err(|e| AbiDecodeError::InvalidHex(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::{primitives::address, sol_types::SolValue};

    #[test]
    fn test_decode_string() {
        // "Insufficient balance"
        let data = hex_to_bytes(
            "0000000000000000000000000000000000000000000000000000000000000020\
             0000000000000000000000000000000000000000000000000000000000000014\
             496e73756666696369656e742062616c616e6365000000000000000000000000",
        )
        .unwrap();
        assert_eq!(decode_string(&data).unwrap(), "Insufficient balance");

        let encoded = "ERC20: transfer amount exceeds allowance".to_string().abi_encode();
        assert_eq!(decode_string(&encoded).unwrap(), "ERC20: transfer amount exceeds allowance");
    }

    #[test]
    fn test_decode_string_truncated() {
        // Length word claims 0x20 bytes but none follow
        let data = hex_to_bytes(
            "0000000000000000000000000000000000000000000000000000000000000020\
             0000000000000000000000000000000000000000000000000000000000000020",
        )
        .unwrap();
        assert!(decode_string(&data).is_err());

        assert!(matches!(
            decode_string(&[0u8; 4]),
            Err(AbiDecodeError::Truncated { expected: 32, actual: 4 })
        ));
    }

    #[test]
    fn test_decode_string_invalid_utf8() {
        let data = hex_to_bytes(
            "0000000000000000000000000000000000000000000000000000000000000020\
             0000000000000000000000000000000000000000000000000000000000000002\
             fffe000000000000000000000000000000000000000000000000000000000000",
        )
        .unwrap();
        assert!(matches!(decode_string(&data), Err(AbiDecodeError::InvalidUtf8(_))));
    }

    #[test]
    fn test_decode_uint256_beyond_u64() {
        let max = U256::MAX;
        assert_eq!(decode_uint256(&max.abi_encode()).unwrap(), U256::MAX);

        let mut word = [0u8; 32];
        word[31] = 0x99;
        assert_eq!(decode_uint256(&word).unwrap(), U256::from(0x99));
    }

    #[test]
    fn test_decode_address_and_amount() {
        let recipient = address!("d8da6bf26964af9d7eed9e03e53415d37aa96045");
        let encoded = (recipient, U256::from(1_000_000u64)).abi_encode_params();

        let values = decode(&[AbiScalar::Address, AbiScalar::Uint256], &encoded).unwrap();
        assert_eq!(values[0].as_address(), Some(recipient));
        assert_eq!(values[1].as_uint(), Some(U256::from(1_000_000u64)));
        assert_eq!(decode_address(&encoded).unwrap(), recipient);
    }

    #[test]
    fn test_hex_to_bytes() {
        assert_eq!(hex_to_bytes("0x0102").unwrap(), vec![1, 2]);
        assert_eq!(hex_to_bytes("0102").unwrap(), vec![1, 2]);
        assert!(matches!(hex_to_bytes("0x123"), Err(AbiDecodeError::InvalidHex(_))));
        assert!(hex_to_bytes("0xzz").is_err());
    }
}
