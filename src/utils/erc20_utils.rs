//! ERC20 token utilities for querying token information and decoding calldata
//!
//! Provides typed view calls (metadata, balances, allowances) over any
//! [`ChainQuery`] and decoders for the three state-changing ERC20 calls the
//! analyzer recognizes: `transfer`, `transferFrom` and `approve`.

use alloy::{
    primitives::{Address, U256},
    sol,
    sol_types::SolCall,
};

use crate::{
    errors::{AbiDecodeError, ChainError},
    traits::ChainQuery,
    utils::abi_utils::{decode, AbiScalar, ScalarValue},
};

// ERC20 interface
//
// Generates Rust bindings for:
// - name(), symbol(), decimals(): token metadata
// - balanceOf(address), allowance(address,address): account state
// - transfer, transferFrom, approve: calldata recognized by the analyzer
sol! {
    function name() public returns (string);
    function symbol() public returns (string);
    function decimals() public returns (uint8);
    function balanceOf(address owner) public returns (uint256);
    function allowance(address owner, address spender) public returns (uint256);
    function transfer(address to, uint256 amount) public returns (bool);
    function transferFrom(address from, address to, uint256 amount) public returns (bool);
    function approve(address spender, uint256 amount) public returns (bool);
}

/// `transfer(address,uint256)`, `0xa9059cbb`
pub const TRANSFER_SELECTOR: [u8; 4] = transferCall::SELECTOR;

/// `transferFrom(address,address,uint256)`, `0x23b872dd`
pub const TRANSFER_FROM_SELECTOR: [u8; 4] = transferFromCall::SELECTOR;

/// `approve(address,uint256)`, `0x095ea7b3`
pub const APPROVE_SELECTOR: [u8; 4] = approveCall::SELECTOR;

/// Allowance wallets use for "unlimited" approvals
pub const MAX_UINT256: U256 = U256::MAX;

/// Decimals assumed when `decimals()` cannot be read
pub const DEFAULT_DECIMALS: u8 = 18;

/// Check if an approval amount is the unlimited sentinel `2^256 - 1`
pub fn is_unlimited_approval(amount: U256) -> bool {
    amount == MAX_UINT256
}

/// A recognized ERC20 call decoded from calldata
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Erc20Call {
    Transfer {
        to: Address,
        amount: U256,
    },
    TransferFrom {
        from: Address,
        to: Address,
        amount: U256,
    },
    Approve {
        spender: Address,
        amount: U256,
    },
}

/// Decode ERC20 calldata
///
/// Selectors come from the `sol!` bindings; arguments are read with the
/// ABI scalar codec.
///
/// # Returns
/// * `Ok(Some(call))` - Calldata is a well-formed transfer, transferFrom or approve
/// * `Ok(None)` - Calldata is shorter than a selector or uses another selector
/// * `Err(AbiDecodeError)` - Selector matched but arguments are malformed
pub fn decode_erc20_call(data: &[u8]) -> Result<Option<Erc20Call>, AbiDecodeError> {
    let Some((selector, args)) = data.split_first_chunk::<4>() else {
        return Ok(None);
    };

    let call = match *selector {
        TRANSFER_SELECTOR => {
            let [to, amount] = decode_args(&[AbiScalar::Address, AbiScalar::Uint256], args)?;
            Erc20Call::Transfer {
                to: address_arg(&to)?,
                amount: uint_arg(&amount)?,
            }
        }
        TRANSFER_FROM_SELECTOR => {
            let [from, to, amount] =
                decode_args(&[AbiScalar::Address, AbiScalar::Address, AbiScalar::Uint256], args)?;
            Erc20Call::TransferFrom {
                from: address_arg(&from)?,
                to: address_arg(&to)?,
                amount: uint_arg(&amount)?,
            }
        }
        APPROVE_SELECTOR => {
            let [spender, amount] = decode_args(&[AbiScalar::Address, AbiScalar::Uint256], args)?;
            Erc20Call::Approve {
                spender: address_arg(&spender)?,
                amount: uint_arg(&amount)?,
            }
        }
        _ => return Ok(None),
    };
    Ok(Some(call))
}

fn decode_args<const N: usize>(
    types: &[AbiScalar; N],
    args: &[u8],
) -> Result<[ScalarValue; N], AbiDecodeError> {
    decode(types, args)?
        .try_into()
        .map_err(|_| AbiDecodeError::TypeMismatch("tuple"))
}

fn address_arg(value: &ScalarValue) -> Result<Address, AbiDecodeError> {
    value.as_address().ok_or(AbiDecodeError::TypeMismatch("address"))
}

fn uint_arg(value: &ScalarValue) -> Result<U256, AbiDecodeError> {
    value.as_uint().ok_or(AbiDecodeError::TypeMismatch("uint256"))
}

/// Query the token symbol
pub async fn get_symbol<Q: ChainQuery>(chain: &Q, token: Address) -> Result<String, ChainError> {
    chain.read_contract(token, &symbolCall {}).await
}

/// Query the token decimals
pub async fn get_decimals<Q: ChainQuery>(chain: &Q, token: Address) -> Result<u8, ChainError> {
    chain.read_contract(token, &decimalsCall {}).await
}

/// Query the token name
pub async fn get_name<Q: ChainQuery>(chain: &Q, token: Address) -> Result<String, ChainError> {
    chain.read_contract(token, &nameCall {}).await
}

/// Query the ERC20 balance of `owner`
///
/// # Returns
/// * `Ok(U256)` - Balance in the token's smallest unit
/// * `Err(ChainError)` - If the call fails or returns invalid data
pub async fn query_erc20_balance<Q: ChainQuery>(
    chain: &Q,
    token: Address,
    owner: Address,
) -> Result<U256, ChainError> {
    chain.read_contract(token, &balanceOfCall { owner }).await
}

/// Query how much `spender` may move on behalf of `owner`
pub async fn query_erc20_allowance<Q: ChainQuery>(
    chain: &Q,
    token: Address,
    owner: Address,
    spender: Address,
) -> Result<U256, ChainError> {
    chain
        .read_contract(token, &allowanceCall { owner, spender })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    #[test]
    fn test_selectors() {
        assert_eq!(TRANSFER_SELECTOR, [0xa9, 0x05, 0x9c, 0xbb]);
        assert_eq!(TRANSFER_FROM_SELECTOR, [0x23, 0xb8, 0x72, 0xdd]);
        assert_eq!(APPROVE_SELECTOR, [0x09, 0x5e, 0xa7, 0xb3]);
    }

    #[test]
    fn test_decode_transfer_and_approve() {
        let to = address!("d8da6bf26964af9d7eed9e03e53415d37aa96045");
        let data = transferCall { to, amount: U256::from(1_000_000u64) }.abi_encode();
        assert_eq!(
            decode_erc20_call(&data).unwrap(),
            Some(Erc20Call::Transfer { to, amount: U256::from(1_000_000u64) })
        );

        let data = approveCall { spender: to, amount: U256::MAX }.abi_encode();
        match decode_erc20_call(&data).unwrap() {
            Some(Erc20Call::Approve { spender, amount }) => {
                assert_eq!(spender, to);
                assert!(is_unlimited_approval(amount));
            }
            other => panic!("unexpected decode: {:?}", other),
        }
    }

    #[test]
    fn test_decode_unrelated_or_short() {
        assert_eq!(decode_erc20_call(&[]).unwrap(), None);
        assert_eq!(decode_erc20_call(&[0xa9, 0x05, 0x9c]).unwrap(), None);
        assert_eq!(decode_erc20_call(&[0xde, 0xad, 0xbe, 0xef, 0x00]).unwrap(), None);
    }

    #[test]
    fn test_decode_truncated_arguments() {
        // transfer selector with a single argument word
        let mut data = TRANSFER_SELECTOR.to_vec();
        data.extend_from_slice(&[0u8; 32]);
        assert!(matches!(
            decode_erc20_call(&data),
            Err(AbiDecodeError::Truncated { expected: 64, actual: 32 })
        ));
    }

    #[test]
    fn test_decode_transfer_from() {
        let from = address!("c255fc198eedac7af8af0f6e0ca781794b094a61");
        let to = address!("d8da6bf26964af9d7eed9e03e53415d37aa96045");
        let data = transferFromCall { from, to, amount: U256::MAX }.abi_encode();
        assert_eq!(
            decode_erc20_call(&data).unwrap(),
            Some(Erc20Call::TransferFrom { from, to, amount: U256::MAX })
        );
    }
}
