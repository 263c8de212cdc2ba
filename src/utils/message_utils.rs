//! Provider message heuristics
//!
//! When a provider reports a failure without structured revert data, the only
//! thing left is its free-text message. This module classifies such messages
//! ("execution reverted: ...", "insufficient funds for gas ...", "nonce too
//! low", ...) into user-facing [`DecodedError`]s.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    types::{DecodedError, ErrorType},
    utils::error_utils::ErrorMessage,
};

/// Hardhat-style "reverted with reason string 'X'"
static REASON_STRING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"reverted with reason string ['"](.*?)['"]"#).expect("valid regex"));

/// Geth-style "execution reverted: X", optionally followed by " (...)"
static EXECUTION_REVERTED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)execution reverted(?::\s*(.+?))?(?:\s*\(|$)").expect("valid regex"));

/// Longest reason echoed verbatim as a title
const MAX_TITLE_LEN: usize = 50;

/// Keyword groups for textual revert reasons, matched as lowercase substrings in order
static REASON_KEYWORDS: &[(&[&str], ErrorMessage)] = &[
    (
        &["insufficient balance", "transfer amount exceeds balance", "exceeds balance"],
        ErrorMessage {
            title: "Insufficient Balance",
            explanation: "You don't have enough tokens to complete this transfer.",
            suggestion: "Check your token balance and try a smaller amount.",
        },
    ),
    (
        &["insufficient allowance", "allowance"],
        ErrorMessage {
            title: "Approval Required",
            explanation: "You haven't approved the contract to spend your tokens.",
            suggestion: "First approve the contract to spend your tokens, then try again.",
        },
    ),
    (
        &["not owner", "caller is not the owner", "unauthorized"],
        ErrorMessage {
            title: "Not Authorized",
            explanation: "You don't have permission to perform this action.",
            suggestion: "Only the contract owner or authorized addresses can do this.",
        },
    ),
    (
        &["paused", "pausable"],
        ErrorMessage {
            title: "Contract Paused",
            explanation: "This contract is temporarily paused.",
            suggestion: "Wait for the contract to be unpaused before trying again.",
        },
    ),
    (
        &["zero address", "invalid address"],
        ErrorMessage {
            title: "Invalid Address",
            explanation: "One of the addresses provided is invalid.",
            suggestion: "Double-check the recipient address.",
        },
    ),
    (
        &["expired", "deadline"],
        ErrorMessage {
            title: "Transaction Expired",
            explanation: "The transaction deadline has passed.",
            suggestion: "Try again with a new transaction.",
        },
    ),
    (
        &["slippage", "output amount"],
        ErrorMessage {
            title: "Slippage Too High",
            explanation: "The price changed more than your allowed tolerance.",
            suggestion: "Increase slippage tolerance or try a smaller trade.",
        },
    ),
    (
        &["liquidity"],
        ErrorMessage {
            title: "Insufficient Liquidity",
            explanation: "Not enough liquidity in the pool for this trade.",
            suggestion: "Try a smaller amount or different trading pair.",
        },
    ),
];

/// Classify a textual revert reason
///
/// # Arguments
/// * `error_type` - Classification to attach to the result
/// * `reason` - Revert reason text (kept as `raw`)
///
/// # Returns
/// The first matching keyword group's message, or the reason itself
/// (titles longer than 50 characters are shortened with "...")
pub fn friendly_error_from_reason(error_type: ErrorType, reason: &str) -> DecodedError {
    let lower = reason.to_lowercase();
    let matched = REASON_KEYWORDS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(_, m)| m);

    match matched {
        Some(m) => DecodedError::new(error_type, m.title, m.explanation, m.suggestion, reason),
        None => DecodedError::new(
            error_type,
            shorten_title(reason),
            reason,
            "Review the error message and check your transaction parameters.",
            reason,
        ),
    }
}

fn shorten_title(reason: &str) -> String {
    if reason.chars().count() > MAX_TITLE_LEN {
        let head: String = reason.chars().take(MAX_TITLE_LEN).collect();
        format!("{}...", head)
    } else {
        reason.to_string()
    }
}

/// Classify a provider's free-text failure message
///
/// Used when structured decoding produced nothing better than
/// `ErrorType::Unknown`. Patterns are tried in order, first match wins.
///
/// # Arguments
/// * `message` - Provider error message
/// * `fallback` - Result of structured decoding; its `raw` is kept for every
///   classification that does not extract a reason from the text
pub fn parse_provider_error(message: &str, fallback: &DecodedError) -> DecodedError {
    if let Some(reason) = REASON_STRING_RE.captures(message).and_then(|c| c.get(1)) {
        return friendly_error_from_reason(ErrorType::Revert, reason.as_str());
    }

    if message.contains("execution reverted") {
        let reason = EXECUTION_REVERTED_RE
            .captures(message)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim())
            .filter(|r| !r.is_empty());

        return match reason {
            Some(reason) => friendly_error_from_reason(ErrorType::Revert, reason),
            None => DecodedError::new(
                ErrorType::Revert,
                "Transaction Reverted",
                "The smart contract rejected this transaction.",
                "The contract didn't provide a specific reason. Check your input parameters.",
                fallback.raw.as_str(),
            ),
        };
    }

    let (error_type, title, explanation, suggestion) = if contains_any(message, &["insufficient funds", "insufficient balance"]) {
        (
            ErrorType::Revert,
            "Insufficient Funds",
            "You don't have enough ETH to cover the transaction value and gas fees.",
            "Add more ETH to your wallet or reduce the transaction amount.",
        )
    } else if contains_any(message, &["gas required exceeds", "out of gas"]) {
        (
            ErrorType::Revert,
            "Gas Limit Exceeded",
            "The transaction requires more gas than allowed.",
            "Increase the gas limit or simplify the transaction.",
        )
    } else if message.contains("nonce") {
        (
            ErrorType::Revert,
            "Nonce Error",
            "There's a transaction sequencing issue with your account.",
            "Wait for pending transactions to complete or reset your wallet nonce.",
        )
    } else if message.contains("missing revert data") {
        (
            ErrorType::Revert,
            "Transaction Would Fail",
            "The contract rejected this transaction but didn't specify why.",
            "Common causes: insufficient token balance, missing approval, or invalid parameters.",
        )
    } else if contains_any(message, &["network", "connect", "timeout"]) {
        (
            ErrorType::Unknown,
            "Network Error",
            "Could not connect to the Ethereum network.",
            "Check your internet connection and try again.",
        )
    } else {
        (
            ErrorType::Unknown,
            "Transaction Failed",
            "The transaction could not be completed.",
            "Please verify all parameters are correct and try again.",
        )
    };

    DecodedError::new(error_type, title, explanation, suggestion, fallback.raw.as_str())
}

fn contains_any(message: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| message.contains(n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error_utils::decode_error;

    fn fallback() -> DecodedError {
        decode_error(None)
    }

    #[test]
    fn test_reason_string() {
        let decoded = parse_provider_error(
            "Error: VM Exception while processing transaction: reverted with reason string 'Ownable: caller is not the owner'",
            &fallback(),
        );
        assert_eq!(decoded.error_type, ErrorType::Revert);
        assert_eq!(decoded.message, "Not Authorized");
        assert_eq!(decoded.raw, "Ownable: caller is not the owner");
    }

    #[test]
    fn test_execution_reverted_with_reason() {
        let decoded = parse_provider_error(
            "execution reverted: ERC20: transfer amount exceeds balance (action=\"estimateGas\")",
            &fallback(),
        );
        assert_eq!(decoded.error_type, ErrorType::Revert);
        assert_eq!(decoded.message, "Insufficient Balance");
        assert_eq!(decoded.raw, "ERC20: transfer amount exceeds balance");
    }

    #[test]
    fn test_execution_reverted_without_reason() {
        let decoded = parse_provider_error("execution reverted", &fallback());
        assert_eq!(decoded.error_type, ErrorType::Revert);
        assert_eq!(decoded.message, "Transaction Reverted");
        assert_eq!(decoded.raw, "0x");

        let decoded = parse_provider_error("execution reverted (unknown custom error)", &fallback());
        assert_eq!(decoded.message, "Transaction Reverted");
    }

    #[test]
    fn test_unmatched_reason_is_echoed() {
        let decoded = parse_provider_error("execution reverted: Revert demo", &fallback());
        assert_eq!(decoded.message, "Revert demo");
        assert_eq!(decoded.user_message, "Revert demo");

        let long = "x".repeat(60);
        let decoded = friendly_error_from_reason(ErrorType::Revert, &long);
        assert_eq!(decoded.message, format!("{}...", "x".repeat(50)));
        assert_eq!(decoded.user_message, long);
    }

    #[test]
    fn test_node_errors() {
        let cases = [
            ("insufficient funds for gas * price + value", ErrorType::Revert, "Insufficient Funds"),
            ("gas required exceeds allowance (30000000)", ErrorType::Revert, "Gas Limit Exceeded"),
            ("nonce too low", ErrorType::Revert, "Nonce Error"),
            ("missing revert data in call exception", ErrorType::Revert, "Transaction Would Fail"),
            ("could not connect to server", ErrorType::Unknown, "Network Error"),
            ("request timeout", ErrorType::Unknown, "Network Error"),
            ("something odd happened", ErrorType::Unknown, "Transaction Failed"),
        ];
        for (message, error_type, title) in cases {
            let decoded = parse_provider_error(message, &fallback());
            assert_eq!(decoded.error_type, error_type, "{}", message);
            assert_eq!(decoded.message, title, "{}", message);
            assert_eq!(decoded.raw, "0x");
        }
    }

    #[test]
    fn test_keyword_groups_in_order() {
        // "exceeds allowance" hits the allowance group, not the balance group
        let decoded = friendly_error_from_reason(ErrorType::Revert, "ERC20: transfer amount exceeds allowance");
        assert_eq!(decoded.message, "Approval Required");

        let decoded = friendly_error_from_reason(ErrorType::Revert, "UniswapV2Router: EXPIRED");
        assert_eq!(decoded.message, "Transaction Expired");

        let decoded = friendly_error_from_reason(ErrorType::Revert, "UniswapV2: INSUFFICIENT_LIQUIDITY");
        assert_eq!(decoded.message, "Insufficient Liquidity");
        assert_eq!(decoded.raw, "UniswapV2: INSUFFICIENT_LIQUIDITY");
    }

    #[test]
    fn test_earlier_checks_win_on_overlap() {
        let cases = [
            ("insufficient funds for gas: nonce too low", "Insufficient Funds"),
            ("gas required exceeds allowance: nonce too high", "Gas Limit Exceeded"),
            ("nonce too low (network timeout)", "Nonce Error"),
            ("missing revert data; could not connect", "Transaction Would Fail"),
        ];
        for (message, title) in cases {
            let decoded = parse_provider_error(message, &fallback());
            assert_eq!(decoded.message, title, "{}", message);
            assert_eq!(decoded.error_type, ErrorType::Revert, "{}", message);
        }

        // The revert branch runs before the gas keywords
        let decoded = parse_provider_error("execution reverted: out of gas", &fallback());
        assert_eq!(decoded.error_type, ErrorType::Revert);
        assert_eq!(decoded.message, "out of gas");
        assert_eq!(decoded.raw, "out of gas");

        // Reason strings run before "execution reverted"
        let decoded = parse_provider_error(
            "execution reverted: reverted with reason string 'Pausable: paused'",
            &fallback(),
        );
        assert_eq!(decoded.message, "Contract Paused");
        assert_eq!(decoded.raw, "Pausable: paused");
    }
}
