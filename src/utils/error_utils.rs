//! Error decoding utilities for failed transactions
//!
//! Turns raw revert payloads into [`DecodedError`]s with a title, an
//! explanation and a suggestion:
//! - `Error(string)` (selector `0x08c379a0`): the reason is matched against an
//!   ordered keyword table, first match wins
//! - `Panic(uint256)` (selector `0x4e487b71`): the code is looked up in the
//!   table of Solidity panic codes
//! - Any other selector: looked up in a table of well-known custom errors
//!   (EIP-6093, Uniswap, OpenZeppelin), otherwise labelled as a generic
//!   contract error
//!
//! Decoding never fails: malformed payloads degrade to generic messages.

use alloy::primitives::U256;
use serde_json::Value;

use crate::{
    types::{DecodedError, ErrorType},
    utils::abi_utils::{decode_string, decode_uint256, hex_to_bytes},
};

/// Selector of `Error(string)`
pub const ERROR_STRING_SELECTOR: &str = "0x08c379a0";

/// Selector of `Panic(uint256)`
pub const PANIC_SELECTOR: &str = "0x4e487b71";

/// `0x` plus 8 hex characters
const SELECTOR_HEX_LEN: usize = 10;

/// Title, explanation and suggestion shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorMessage {
    pub title: &'static str,
    pub explanation: &'static str,
    pub suggestion: &'static str,
}

const fn msg(title: &'static str, explanation: &'static str, suggestion: &'static str) -> ErrorMessage {
    ErrorMessage {
        title,
        explanation,
        suggestion,
    }
}

/// Solidity panic codes
pub static PANIC_CODES: &[(u32, ErrorMessage)] = &[
    (0x00, msg(
        "Generic compiler panic",
        "An unexpected error occurred in the smart contract.",
        "This is likely a bug in the contract. Contact the project team.",
    )),
    (0x01, msg(
        "Assertion failed",
        "A condition the contract expected to be true was false.",
        "The contract's internal state doesn't match expected conditions.",
    )),
    (0x11, msg(
        "Arithmetic overflow or underflow",
        "A math operation resulted in a number too large or below zero.",
        "Try a smaller amount or check if the values are correct.",
    )),
    (0x12, msg(
        "Division by zero",
        "The contract tried to divide by zero.",
        "Check input values - one of them might be zero when it shouldn't be.",
    )),
    (0x21, msg(
        "Invalid enum value",
        "An invalid option was selected in the contract.",
        "The input parameters may be incorrect.",
    )),
    (0x22, msg(
        "Storage encoding error",
        "The contract's storage data is corrupted.",
        "This is a serious contract bug. Do not interact with this contract.",
    )),
    (0x31, msg(
        "Empty array error",
        "The contract tried to remove an item from an empty list.",
        "There may be nothing left to withdraw or remove.",
    )),
    (0x32, msg(
        "Array index out of bounds",
        "The contract tried to access an item that doesn't exist.",
        "Check if the index or ID you're using is valid.",
    )),
    (0x41, msg(
        "Out of memory",
        "The transaction requires too much memory to execute.",
        "Try processing smaller batches of data.",
    )),
    (0x51, msg(
        "Internal function error",
        "The contract tried to call an uninitialized function.",
        "This is a contract bug. Contact the project team.",
    )),
];

/// Revert reasons, matched as lowercase substrings in order
pub static REVERT_REASONS: &[(&str, ErrorMessage)] = &[
    // ERC20
    ("insufficient balance", msg(
        "Insufficient Balance",
        "You don't have enough tokens to complete this transfer.",
        "Check your token balance and try a smaller amount.",
    )),
    ("transfer amount exceeds balance", msg(
        "Insufficient Balance",
        "The transfer amount is more than your available balance.",
        "Reduce the amount or add more tokens to your wallet.",
    )),
    ("insufficient allowance", msg(
        "Approval Required",
        "You haven't approved the contract to spend your tokens.",
        "First approve the contract to spend your tokens, then try again.",
    )),
    ("approve from the zero address", msg(
        "Invalid Approval",
        "Cannot approve from an empty address.",
        "Make sure your wallet is connected properly.",
    )),
    ("transfer to the zero address", msg(
        "Invalid Recipient",
        "Cannot send tokens to the zero address (0x000...000).",
        "Double-check the recipient address.",
    )),
    // Ownership
    ("ownable: caller is not the owner", msg(
        "Not Authorized",
        "Only the contract owner can perform this action.",
        "This function is restricted to the contract administrator.",
    )),
    ("caller is not the owner", msg(
        "Not Authorized",
        "You don't have permission to call this function.",
        "Only the contract owner can perform this action.",
    )),
    // Pausable
    ("pausable: paused", msg(
        "Contract Paused",
        "This contract is temporarily paused and not accepting transactions.",
        "Wait for the contract to be unpaused, or check project announcements.",
    )),
    ("contract is paused", msg(
        "Contract Paused",
        "The contract has been paused by the administrator.",
        "Try again later when the contract is active.",
    )),
    // Reentrancy
    ("reentrant call", msg(
        "Reentrancy Blocked",
        "The contract blocked a potentially dangerous recursive call.",
        "This is a security feature. Your transaction structure may be incorrect.",
    )),
    ("reentrancyguard: reentrant call", msg(
        "Reentrancy Blocked",
        "Multiple calls to the contract in one transaction are not allowed.",
        "Try calling the function directly without batching.",
    )),
    // DEX / swaps
    ("insufficient liquidity", msg(
        "Not Enough Liquidity",
        "The trading pool doesn't have enough tokens for this swap.",
        "Try a smaller amount or use a different trading pair.",
    )),
    ("insufficient output amount", msg(
        "Slippage Too High",
        "The price moved and you would receive less than your minimum.",
        "Increase slippage tolerance or try a smaller trade.",
    )),
    ("insufficient input amount", msg(
        "Invalid Input",
        "The input amount is too small for this trade.",
        "Increase the input amount.",
    )),
    ("expired", msg(
        "Transaction Expired",
        "The transaction deadline has passed.",
        "Try again with a new transaction.",
    )),
    ("deadline", msg(
        "Deadline Passed",
        "The transaction took too long and expired.",
        "Increase the deadline or try again immediately.",
    )),
    ("slippage", msg(
        "Price Slippage",
        "The price changed more than your allowed tolerance.",
        "Increase slippage tolerance in your settings.",
    )),
    // NFTs
    ("erc721: invalid token id", msg(
        "NFT Not Found",
        "This NFT token ID doesn't exist.",
        "Verify the token ID is correct.",
    )),
    ("erc721: caller is not token owner or approved", msg(
        "Not NFT Owner",
        "You don't own this NFT or have approval to transfer it.",
        "Check that you own this NFT in your wallet.",
    )),
    // General
    ("execution reverted", msg(
        "Transaction Reverted",
        "The smart contract rejected this transaction.",
        "Check the transaction parameters and try again.",
    )),
    ("out of gas", msg(
        "Out of Gas",
        "The transaction ran out of gas before completing.",
        "Increase the gas limit for this transaction.",
    )),
    ("gas required exceeds allowance", msg(
        "Gas Limit Too Low",
        "The transaction needs more gas than provided.",
        "Increase the gas limit.",
    )),
];

/// A well-known custom error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CustomError {
    /// `0x`-prefixed lowercase selector
    pub selector: &'static str,
    /// Solidity signature the selector was derived from
    pub signature: &'static str,
    pub message: ErrorMessage,
}

const fn custom(selector: &'static str, signature: &'static str, message: ErrorMessage) -> CustomError {
    CustomError {
        selector,
        signature,
        message,
    }
}

/// Custom error selectors with user-facing messages
pub static KNOWN_CUSTOM_ERRORS: &[CustomError] = &[
    // ERC20 (EIP-6093)
    custom("0xe450d38c", "ERC20InsufficientBalance(address,uint256,uint256)", msg(
        "Insufficient Token Balance",
        "Your token balance is less than the amount you're trying to send.",
        "Check your balance and reduce the transfer amount.",
    )),
    custom("0xfb8f41b2", "ERC20InsufficientAllowance(address,address,uint256,uint256)", msg(
        "Approval Required",
        "The contract doesn't have permission to spend your tokens.",
        "Approve the contract to spend tokens first.",
    )),
    custom("0x96c6fd1e", "ERC20InvalidSender(address)", msg(
        "Invalid Sender",
        "The sender address is not valid for this operation.",
        "Check the 'from' address is correct.",
    )),
    custom("0xec442f05", "ERC20InvalidReceiver(address)", msg(
        "Invalid Recipient",
        "Cannot send tokens to this address.",
        "Verify the recipient address is correct and can receive tokens.",
    )),
    // Uniswap
    custom("0x5a59f53c", "InsufficientInputAmount()", msg(
        "Input Too Low",
        "The input amount is too small for this swap.",
        "Increase the amount you're swapping.",
    )),
    custom("0x849eaf98", "InsufficientOutputAmount()", msg(
        "Slippage Exceeded",
        "You would receive less than your minimum due to price movement.",
        "Increase slippage tolerance or reduce trade size.",
    )),
    custom("0xced3e100", "InsufficientLiquidity()", msg(
        "Low Liquidity",
        "Not enough liquidity in the pool for this trade.",
        "Try a smaller amount or different trading pair.",
    )),
    // OpenZeppelin access control / pausable
    custom("0x118cdaa7", "OwnableUnauthorizedAccount(address)", msg(
        "Not Authorized",
        "Your wallet is not authorized to perform this action.",
        "This function is restricted to specific addresses.",
    )),
    custom("0x1e4fbdf7", "OwnableInvalidOwner(address)", msg(
        "Invalid Owner",
        "The provided owner address is invalid.",
        "Check the owner address parameter.",
    )),
    custom("0xe07c8dba", "EnforcedPause()", msg(
        "Contract Paused",
        "This contract is currently paused.",
        "Wait for the contract to be unpaused.",
    )),
    custom("0xd93c0665", "ExpectedPause()", msg(
        "Contract Not Paused",
        "This action requires the contract to be paused.",
        "The contract must be paused first.",
    )),
    // Transfers
    custom("0xd92e233d", "ZeroAddress()", msg(
        "Zero Address",
        "Cannot use the zero address (0x000...000) for this operation.",
        "Provide a valid Ethereum address.",
    )),
    custom("0x2e076300", "NotEnoughBalance()", msg(
        "Insufficient Balance",
        "Not enough balance to complete this transaction.",
        "Add more funds or reduce the amount.",
    )),
];

/// Look up a panic code in [`PANIC_CODES`]
pub fn panic_message(code: u32) -> Option<&'static ErrorMessage> {
    PANIC_CODES.iter().find(|(c, _)| *c == code).map(|(_, m)| m)
}

/// Look up a selector (`0x`-prefixed, lowercase) in [`KNOWN_CUSTOM_ERRORS`]
pub fn custom_error(selector: &str) -> Option<&'static CustomError> {
    KNOWN_CUSTOM_ERRORS.iter().find(|e| e.selector == selector)
}

/// Find the first [`REVERT_REASONS`] entry whose keyword occurs in `reason`
pub fn revert_reason_message(reason: &str) -> Option<&'static ErrorMessage> {
    let reason = reason.to_lowercase();
    let reason = reason.trim();
    REVERT_REASONS
        .iter()
        .find(|(keyword, _)| reason.contains(keyword))
        .map(|(_, m)| m)
}

/// Decode raw error data into a user-facing error
///
/// # Arguments
/// * `error_data` - `0x`-prefixed revert payload, if the provider returned one
///
/// # Returns
/// A [`DecodedError`]; missing or too-short payloads yield `ErrorType::Unknown`
///
/// # Example
/// ```
/// use tx_preview::{utils::error_utils::decode_error, types::ErrorType};
///
/// let decoded = decode_error(Some(
///     "0x4e487b710000000000000000000000000000000000000000000000000000000000000012",
/// ));
/// assert_eq!(decoded.error_type, ErrorType::Panic);
/// assert_eq!(decoded.message, "Division by zero");
/// ```
pub fn decode_error(error_data: Option<&str>) -> DecodedError {
    let raw = match error_data.filter(|s| !s.is_empty()) {
        Some(raw) if raw != "0x" && raw.len() >= SELECTOR_HEX_LEN => raw,
        other => return unknown_error(other.unwrap_or("0x")),
    };
    let Some((selector, data)) = raw
        .get(..SELECTOR_HEX_LEN)
        .zip(raw.get(SELECTOR_HEX_LEN..))
    else {
        return unknown_error(raw);
    };
    let selector = selector.to_lowercase();

    match selector.as_str() {
        ERROR_STRING_SELECTOR => decode_revert_string(data, raw),
        PANIC_SELECTOR => decode_panic(data, raw),
        _ => decode_custom_error(selector, raw),
    }
}

fn unknown_error(raw: &str) -> DecodedError {
    DecodedError::new(
        ErrorType::Unknown,
        "Transaction failed",
        "The transaction was rejected by the smart contract.",
        "Double-check all transaction parameters and try again.",
        raw,
    )
}

fn decode_revert_string(data: &str, raw: &str) -> DecodedError {
    let reason = match hex_to_bytes(data).and_then(|bytes| decode_string(&bytes)) {
        Ok(reason) => reason,
        Err(_) => {
            return DecodedError::new(
                ErrorType::Revert,
                "Transaction Reverted",
                "The contract rejected this transaction but didn't provide a clear reason.",
                "Try with different parameters or contact the project team.",
                raw,
            )
        }
    };

    if let Some(m) = revert_reason_message(&reason) {
        return DecodedError::new(ErrorType::Revert, m.title, m.explanation, m.suggestion, raw);
    }

    let (message, user_message) = if reason.is_empty() {
        ("Transaction Reverted".to_string(), "The contract rejected this transaction.".to_string())
    } else {
        (reason.clone(), reason)
    };
    DecodedError::new(
        ErrorType::Revert,
        message,
        user_message,
        "Review the error message above and check your transaction parameters.",
        raw,
    )
}

fn decode_panic(data: &str, raw: &str) -> DecodedError {
    let code = match hex_to_bytes(data).and_then(|bytes| decode_uint256(&bytes)) {
        Ok(code) => code,
        Err(_) => {
            return DecodedError::new(
                ErrorType::Panic,
                "Panic Error",
                "The contract encountered a critical error.",
                "Do not retry. This may indicate a serious issue with the contract.",
                raw,
            )
        }
    };
    // Codes beyond u32 saturate and never match the table
    let panic_code: u32 = code.saturating_to();
    let known = panic_message(panic_code).filter(|_| code <= U256::from(u32::MAX));

    let decoded = match known {
        Some(m) => DecodedError::new(ErrorType::Panic, m.title, m.explanation, m.suggestion, raw),
        None => DecodedError::new(
            ErrorType::Panic,
            format!("Panic Error (0x{:x})", code),
            "The smart contract encountered an unexpected error.",
            "This may be a bug in the contract. Contact the project team.",
            raw,
        ),
    };
    decoded.with_panic_code(panic_code)
}

fn decode_custom_error(selector: String, raw: &str) -> DecodedError {
    let decoded = match custom_error(&selector) {
        Some(known) => DecodedError::new(
            ErrorType::Custom,
            known.message.title,
            known.message.explanation,
            known.message.suggestion,
            raw,
        ),
        None => DecodedError::new(
            ErrorType::Custom,
            "Contract Error",
            format!("The contract returned an error ({}).", selector),
            "This may be a custom error from the contract. Check the contract documentation.",
            raw,
        ),
    };
    decoded.with_selector(selector)
}

/// Extract revert data from a provider error object
///
/// Providers nest revert data differently. Checked in order:
/// 1. `data`
/// 2. `error.data`
/// 3. `info.error.data`
///
/// Only non-empty string values count.
///
/// # Returns
/// * `Some(String)` - The first revert payload found
/// * `None` - If `error` is not an object or carries no payload
pub fn extract_error_data(error: &Value) -> Option<String> {
    const PATHS: [&[&str]; 3] = [&["data"], &["error", "data"], &["info", "error", "data"]];

    if !error.is_object() {
        return None;
    }
    PATHS.iter().find_map(|path| {
        path.iter()
            .try_fold(error, |value, key| value.as_object()?.get(*key))
            .and_then(Value::as_str)
            .filter(|data| !data.is_empty())
            .map(str::to_string)
    })
}

/// One-line summary of a decoded error: `"<message>: <userMessage>"`
pub fn error_summary(error: &DecodedError) -> String {
    error.summary()
}
