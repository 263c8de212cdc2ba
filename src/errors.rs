//! Error types for transaction preview
//!
//! This module defines the error handling system that covers:
//! - Chain-query (RPC) failures and the provider's structured error shape
//! - ABI decoding failures
//! - Request validation and configuration errors
//!
//! Decoding and token-analysis errors never escape the public decoding and
//! simulation entry points; they degrade into generic user-facing messages.

use serde_json::Value;
use thiserror::Error;

/// Top-level error type for building a simulator and validating input
///
/// `Simulator::simulate` itself never fails: every failure of the simulated
/// transaction is reported inside the returned `SimulationResult`.
#[derive(Debug, Error)]
pub enum SimulatorError {
    /// Errors occurring while loading configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Errors occurring while validating a raw request
    #[error("{0}")]
    Request(#[from] RequestError),

    /// Errors occurring while talking to the node
    #[error("Chain query failed: {0}")]
    Chain(#[from] ChainError),
}

/// Failure reported by the chain-query capability
///
/// Carries the provider's free-text message together with its structured
/// error object. Providers nest revert data differently, so the raw shape is
/// kept as JSON and inspected by `error_utils::extract_error_data`.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ChainError {
    /// Human readable provider message (e.g. "execution reverted: ...")
    pub message: String,
    /// Structured provider error (`data`, `error.data`, `info.error.data`, ...)
    pub details: Value,
}

impl ChainError {
    /// Creates an error with a message and no structured details
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            details: Value::Null,
        }
    }

    /// Creates an error carrying the provider's structured error object
    pub fn with_details(message: impl Into<String>, details: Value) -> Self {
        Self {
            message: message.into(),
            details,
        }
    }
}

/// ABI decoding failures
///
/// Produced by the scalar codec when a payload is truncated or malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AbiDecodeError {
    /// Payload is not valid hex
    #[error("Invalid hex payload: {0}")]
    InvalidHex(String),

    /// Payload is shorter than the requested layout
    ///
    /// # Fields
    /// * `expected` - Minimum number of bytes required
    /// * `actual` - Number of bytes available
    #[error("Payload truncated: expected at least {expected} bytes, got {actual}")]
    Truncated {
        expected: usize,
        actual: usize,
    },

    /// Decoded value did not have the requested type
    #[error("Decoded value does not match requested type {0}")]
    TypeMismatch(&'static str),

    /// Error reported by the underlying ABI decoder
    #[error("ABI decoding failed: {0}")]
    Abi(String),

    /// `string` payload is not valid UTF-8
    #[error("Invalid UTF-8 in string payload: {0}")]
    InvalidUtf8(String),
}

/// Request validation failure
///
/// # Fields
/// * `field` - Name of the offending request field
/// * `reason` - What is wrong with it
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid {field}: {reason}")]
pub struct RequestError {
    pub field: &'static str,
    pub reason: String,
}

impl RequestError {
    pub(crate) fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `ETHEREUM_RPC_URL` is not set
    #[error("ETHEREUM_RPC_URL not set")]
    MissingRpcUrl,

    /// Invalid or malformed RPC URL
    #[error("Invalid RPC URL: {0}")]
    InvalidRpcUrl(String),

    /// An environment variable could not be parsed
    #[error("Invalid value for {name}: {value}")]
    InvalidValue {
        name: &'static str,
        value: String,
    },
}
