//! Raw request validation
//!
//! [`RawSimulationRequest`] is the wire shape of a simulation request (camelCase
//! JSON, every field a string except a numeric `blockTag`). Converting it into
//! a [`SimulationRequest`] checks and normalizes every field:
//! - `from` / `to`: required, `0x` followed by 40 hex characters
//! - `value`: optional decimal or `0x` hex integer, zero when absent
//! - `data`: optional `0x`-prefixed even-length hex, empty when absent
//! - `gasLimit`: optional decimal or `0x` hex integer
//! - `blockTag`: `"latest"` (default), `"pending"` or a block number

use alloy::primitives::{Address, Bytes, U256};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    errors::RequestError,
    types::{BlockTag, SimulationRequest},
    utils::abi_utils::hex_to_bytes,
};

static ADDRESS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^0x[a-fA-F0-9]{40}$").expect("valid regex"));

static HEX_DATA_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^0x([a-fA-F0-9]{2})*$").expect("valid regex"));

static HEX_NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^0x[a-fA-F0-9]+$").expect("valid regex"));

static DECIMAL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").expect("valid regex"));

/// Unvalidated simulation request as received over the wire
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSimulationRequest {
    pub from: Option<String>,
    pub to: Option<String>,
    pub value: Option<String>,
    pub data: Option<String>,
    pub gas_limit: Option<String>,
    /// `"latest"`, `"pending"` or an integer block number
    pub block_tag: Option<Value>,
}

impl RawSimulationRequest {
    /// Parse a JSON body into a raw request
    ///
    /// # Returns
    /// * `Ok(RawSimulationRequest)` - Body is an object with string fields
    /// * `Err(RequestError)` - Body is not an object or a field has the wrong JSON type
    pub fn from_json(body: Value) -> Result<Self, RequestError> {
        if !body.is_object() {
            return Err(RequestError::new("request", "must be an object"));
        }
        serde_json::from_value(body).map_err(|e| RequestError::new("request", e.to_string()))
    }
}

impl TryFrom<RawSimulationRequest> for SimulationRequest {
    type Error = RequestError;

    fn try_from(raw: RawSimulationRequest) -> Result<Self, Self::Error> {
        let from = parse_address("from", raw.from.as_deref())?;
        let to = parse_address("to", raw.to.as_deref())?;
        let value = parse_value(raw.value.as_deref())?;
        let data = parse_data(raw.data.as_deref())?;
        let gas_limit = raw
            .gas_limit
            .as_deref()
            .map(parse_gas_limit)
            .transpose()?;
        let block_tag = parse_block_tag(raw.block_tag.as_ref())?;

        Ok(SimulationRequest {
            from,
            to,
            value,
            data,
            gas_limit,
            block_tag,
        })
    }
}

fn parse_address(field: &'static str, input: Option<&str>) -> Result<Address, RequestError> {
    let input = input
        .filter(|s| !s.is_empty())
        .ok_or_else(|| RequestError::new(field, "is required and must be a string"))?;
    if !ADDRESS_RE.is_match(input) {
        return Err(RequestError::new(
            field,
            "must be a valid Ethereum address (0x + 40 hex characters)",
        ));
    }
    input
        .parse()
        .map_err(|_| RequestError::new(field, "must be a valid Ethereum address (0x + 40 hex characters)"))
}

fn parse_value(input: Option<&str>) -> Result<U256, RequestError> {
    match input {
        None | Some("") | Some("0") | Some("0x0") | Some("0x") => Ok(U256::ZERO),
        Some(value) => parse_numeric("value", value),
    }
}

fn parse_data(input: Option<&str>) -> Result<Bytes, RequestError> {
    match input {
        None | Some("") | Some("0x") => Ok(Bytes::new()),
        Some(data) if HEX_DATA_RE.is_match(data) => hex_to_bytes(data)
            .map(Bytes::from)
            .map_err(|_| RequestError::new("data", "must be valid hex data (0x...)")),
        Some(_) => Err(RequestError::new("data", "must be valid hex data (0x...)")),
    }
}

fn parse_gas_limit(input: &str) -> Result<u64, RequestError> {
    let gas_limit = parse_numeric("gasLimit", input)?;
    u64::try_from(gas_limit).map_err(|_| RequestError::new("gasLimit", "is too large"))
}

/// Decimal or `0x` hex integer of arbitrary size
fn parse_numeric(field: &'static str, input: &str) -> Result<U256, RequestError> {
    let invalid = || RequestError::new(field, "must be a valid number (decimal or hex)");
    if let Some(hex) = input.strip_prefix("0x") {
        if !HEX_NUMBER_RE.is_match(input) {
            return Err(invalid());
        }
        U256::from_str_radix(hex, 16).map_err(|_| invalid())
    } else if DECIMAL_RE.is_match(input) {
        U256::from_str_radix(input, 10).map_err(|_| invalid())
    } else {
        Err(invalid())
    }
}

fn parse_block_tag(input: Option<&Value>) -> Result<BlockTag, RequestError> {
    let invalid = || RequestError::new("blockTag", r#"must be "latest", "pending", or a block number"#);
    match input {
        None | Some(Value::Null) => Ok(BlockTag::Latest),
        Some(Value::String(tag)) if tag == "latest" => Ok(BlockTag::Latest),
        Some(Value::String(tag)) if tag == "pending" => Ok(BlockTag::Pending),
        Some(Value::Number(number)) => number.as_u64().map(BlockTag::Number).ok_or_else(invalid),
        Some(_) => Err(invalid()),
    }
}
