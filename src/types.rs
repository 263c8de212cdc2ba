//! Core types for transaction preview
//!
//! This module defines the core data structures used throughout the crate:
//! - Simulation requests and the read-only call handed to the node
//! - Decoded errors with user-facing messaging
//! - Token metadata, ERC20 transfers and approval changes
//! - The success/failure simulation result
//!
//! Result types serialize to the camelCase JSON shape consumed by UIs.

pub use alloy::primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize, Serializer};

/// Classification of a failed transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorType {
    /// Contract reverted with a reason (or the provider surfaced one)
    Revert,
    /// Solidity built-in runtime check failed (`Panic(uint256)`)
    Panic,
    /// Selector-based custom error, recognized or not
    Custom,
    /// No structured or textual classification was possible
    Unknown,
}

/// A decoded, user-presentable error
///
/// Constructed once per decode call and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedError {
    /// Error classification
    #[serde(rename = "type")]
    pub error_type: ErrorType,
    /// Short title
    pub message: String,
    /// Plain-language explanation
    pub user_message: String,
    /// Actionable suggestion
    pub suggestion: String,
    /// First 4 bytes of the payload for custom errors (`0x`-prefixed, lowercase)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
    /// Solidity panic code for `Panic(uint256)`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub panic_code: Option<u32>,
    /// Original error payload (or provider reason text)
    pub raw: String,
}

impl DecodedError {
    pub(crate) fn new(
        error_type: ErrorType,
        message: impl Into<String>,
        user_message: impl Into<String>,
        suggestion: impl Into<String>,
        raw: impl Into<String>,
    ) -> Self {
        Self {
            error_type,
            message: message.into(),
            user_message: user_message.into(),
            suggestion: suggestion.into(),
            selector: None,
            panic_code: None,
            raw: raw.into(),
        }
    }

    pub(crate) fn with_selector(mut self, selector: impl Into<String>) -> Self {
        self.selector = Some(selector.into());
        self
    }

    pub(crate) fn with_panic_code(mut self, code: u32) -> Self {
        self.panic_code = Some(code);
        self
    }

    /// One-line summary: `"<message>: <userMessage>"`
    pub fn summary(&self) -> String {
        format!("{}: {}", self.message, self.user_message)
    }
}

/// ERC20 token metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    /// Token contract address
    pub address: Address,
    /// Token symbol (e.g., "USDC", "DAI")
    pub symbol: String,
    /// Number of decimal places (18 when unreadable)
    pub decimals: u8,
    /// Token name, if the contract exposes one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// An ERC20 transfer the transaction would perform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenTransfer {
    /// Token contract address
    pub token: Address,
    pub symbol: String,
    pub decimals: u8,
    pub from: Address,
    pub to: Address,
    /// Raw amount in the token's smallest unit (decimal string)
    pub amount: String,
    /// Amount in human units
    pub formatted_amount: String,
}

/// An ERC20 allowance change the transaction would perform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalChange {
    pub token: Address,
    pub symbol: String,
    pub owner: Address,
    pub spender: Address,
    /// Allowance before the transaction (decimal string, "0" when unreadable)
    pub current_allowance: String,
    /// Allowance after the transaction (decimal string)
    pub new_allowance: String,
    /// True iff the new allowance is `2^256 - 1`
    pub is_unlimited: bool,
}

/// Native ETH moved by the transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EthTransfer {
    pub from: Address,
    pub to: Address,
    /// Value in wei (decimal string)
    pub value: String,
    /// Value in ether (decimal string)
    pub formatted_value: String,
}

/// Token movements and allowance changes detected in calldata
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TokenAnalysis {
    pub transfers: Vec<TokenTransfer>,
    pub approvals: Vec<ApprovalChange>,
}

impl TokenAnalysis {
    /// Check if nothing was detected
    pub fn is_empty(&self) -> bool {
        self.transfers.is_empty() && self.approvals.is_empty()
    }
}

/// Successful simulation outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationSuccess {
    /// Gas estimate, or `"unknown"` when estimation failed
    pub gas_estimate: String,
    /// Return data of the read-only call
    pub return_data: Bytes,
    /// Native transfer, present only for a nonzero value
    pub eth_transfer: Option<EthTransfer>,
    pub token_transfers: Vec<TokenTransfer>,
    pub approval_changes: Vec<ApprovalChange>,
}

/// Failed simulation outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationFailure {
    pub error: DecodedError,
    /// Best-effort gas estimate, `None` when estimation failed as well
    pub gas_estimate: Option<String>,
}

/// Result of a simulation: exactly one of success or failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimulationResult {
    Success(SimulationSuccess),
    Failure(SimulationFailure),
}

impl SimulationResult {
    /// Check if the simulated call succeeded
    pub fn is_success(&self) -> bool {
        matches!(self, SimulationResult::Success(_))
    }

    /// Get the decoded error if the simulation failed
    pub fn error(&self) -> Option<&DecodedError> {
        match self {
            SimulationResult::Success(_) => None,
            SimulationResult::Failure(failure) => Some(&failure.error),
        }
    }

    /// Get the gas estimate, if one is available
    pub fn gas_estimate(&self) -> Option<&str> {
        match self {
            SimulationResult::Success(success) => Some(&success.gas_estimate),
            SimulationResult::Failure(failure) => failure.gas_estimate.as_deref(),
        }
    }
}

/// Serializes the active branch flattened next to a boolean `success` field
impl Serialize for SimulationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Tagged<'a, T: Serialize> {
            success: bool,
            #[serde(flatten)]
            inner: &'a T,
        }

        match self {
            SimulationResult::Success(inner) => Tagged { success: true, inner }.serialize(serializer),
            SimulationResult::Failure(inner) => Tagged { success: false, inner }.serialize(serializer),
        }
    }
}

/// Block against which the read-only call is executed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BlockTag {
    #[default]
    Latest,
    Pending,
    Number(u64),
}

impl Serialize for BlockTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            BlockTag::Latest => serializer.serialize_str("latest"),
            BlockTag::Pending => serializer.serialize_str("pending"),
            BlockTag::Number(number) => serializer.serialize_u64(*number),
        }
    }
}

/// A validated simulation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationRequest {
    /// Transaction sender
    pub from: Address,
    /// Transaction target
    pub to: Address,
    /// Native value in wei
    pub value: U256,
    /// Transaction calldata
    pub data: Bytes,
    /// Optional gas limit
    pub gas_limit: Option<u64>,
    /// Block to execute against
    pub block_tag: BlockTag,
}

impl SimulationRequest {
    /// Creates a zero-value, empty-calldata request against the latest block
    pub fn new(from: Address, to: Address) -> Self {
        Self {
            from,
            to,
            value: U256::ZERO,
            data: Bytes::new(),
            gas_limit: None,
            block_tag: BlockTag::Latest,
        }
    }

    pub fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }

    pub fn with_data(mut self, data: impl Into<Bytes>) -> Self {
        self.data = data.into();
        self
    }

    pub fn with_gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = Some(gas_limit);
        self
    }

    pub fn with_block_tag(mut self, block_tag: BlockTag) -> Self {
        self.block_tag = block_tag;
        self
    }

    /// The call handed to the node for `eth_call` / `eth_estimateGas`
    pub fn call_request(&self) -> CallRequest {
        CallRequest {
            from: Some(self.from),
            to: self.to,
            value: self.value,
            data: self.data.clone(),
            gas_limit: self.gas_limit,
        }
    }
}

/// Transaction parameters for a read-only call or gas estimate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRequest {
    /// Caller, omitted for plain view calls
    pub from: Option<Address>,
    pub to: Address,
    pub value: U256,
    pub data: Bytes,
    pub gas_limit: Option<u64>,
}

impl CallRequest {
    /// A view call with no sender and no value
    pub fn read(to: Address, data: impl Into<Bytes>) -> Self {
        Self {
            from: None,
            to,
            value: U256::ZERO,
            data: data.into(),
            gas_limit: None,
        }
    }

    /// 4-byte function selector of the calldata, if present
    pub fn selector(&self) -> Option<[u8; 4]> {
        self.data.get(..4).and_then(|s| s.try_into().ok())
    }
}
