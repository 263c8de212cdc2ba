//! Utility functions for transaction preview
//!
//! # Modules
//!
//! - [`abi_utils`]: ABI scalar decoding (`string`, `uint256`, `address`)
//!
//! - [`error_utils`]: Smart contract error handling
//!   - `Error(string)` revert reasons
//!   - Solidity panic code interpretation
//!   - Well-known custom error selectors
//!   - Revert data extraction from provider errors
//!
//! - [`message_utils`]: Classification of provider error messages
//!
//! - [`erc20_utils`]: ERC20 token interaction utilities
//!   - Metadata, balance and allowance queries
//!   - `transfer` / `transferFrom` / `approve` calldata decoding
//!
//! - [`unit_utils`]: Formatting amounts in human units
//!
//! # Example
//!
//! ```
//! use tx_preview::utils::error_utils::{decode_error, error_summary};
//!
//! let decoded = decode_error(Some("0xe07c8dba"));
//! assert_eq!(
//!     error_summary(&decoded),
//!     "Contract Paused: This contract is currently paused."
//! );
//! ```

/// ABI scalar codec
pub mod abi_utils;

/// ERC20 token interaction utilities
pub mod erc20_utils;

/// Error parsing utilities
pub mod error_utils;

/// Provider message heuristics
pub mod message_utils;

/// Unit formatting utilities
pub mod unit_utils;
