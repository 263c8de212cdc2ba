//! Unit formatting
//!
//! Converts integer amounts in a token's smallest unit into decimal strings.
//! The fractional part is stripped of trailing zeros but always keeps at least
//! one digit (`1000000` with 6 decimals is `"1.0"`).

use alloy::primitives::U256;

/// Decimals of native ether
pub const ETHER_DECIMALS: u8 = 18;

/// Format `amount` scaled down by `10^decimals`
///
/// # Example
/// ```
/// use alloy::primitives::U256;
/// use tx_preview::utils::unit_utils::format_token_amount;
///
/// assert_eq!(format_token_amount(U256::from(1_500_000u64), 6), "1.5");
/// assert_eq!(format_token_amount(U256::ZERO, 18), "0.0");
/// ```
pub fn format_token_amount(amount: U256, decimals: u8) -> String {
    // alloy's `format_units` keeps every trailing zero ("1.000000"), so trim by hand
    let digits = amount.to_string();
    let decimals = usize::from(decimals);

    let (whole, fraction) = if digits.len() > decimals {
        let (whole, fraction) = digits.split_at(digits.len() - decimals);
        (whole.to_string(), fraction.to_string())
    } else {
        ("0".to_string(), format!("{:0>width$}", digits, width = decimals))
    };

    let fraction = fraction.trim_end_matches('0');
    let fraction = if fraction.is_empty() { "0" } else { fraction };
    format!("{}.{}", whole, fraction)
}

/// Format a wei amount as ether
pub fn format_ether(wei: U256) -> String {
    format_token_amount(wei, ETHER_DECIMALS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_token_amount() {
        assert_eq!(format_token_amount(U256::from(1_000_000u64), 6), "1.0");
        assert_eq!(format_token_amount(U256::from(1u64), 6), "0.000001");
        assert_eq!(format_token_amount(U256::from(123_456_789u64), 6), "123.456789");
        assert_eq!(format_token_amount(U256::from(42u64), 0), "42.0");
    }

    #[test]
    fn test_format_ether() {
        assert_eq!(format_ether(U256::from(1_000_000_000_000_000_000u128)), "1.0");
        assert_eq!(format_ether(U256::from(120_000_000_000_000_000u128)), "0.12");
        assert_eq!(format_ether(U256::ZERO), "0.0");
    }

    #[test]
    fn test_format_max_uint() {
        let formatted = format_token_amount(U256::MAX, 18);
        assert!(formatted.starts_with("115792089237316195423570985008687907853269984665640564039457."));
    }
}
