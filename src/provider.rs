//! JSON-RPC implementation of [`ChainQuery`]
//!
//! Wraps an alloy provider (HTTP or WebSocket) and bounds every request with a
//! deadline. JSON-RPC error responses are kept as structured
//! `{"code", "message", "data"}` objects so revert data can be decoded.

use std::{
    fmt,
    future::{Future, IntoFuture},
    time::Duration,
};

use alloy::{
    eips::BlockId,
    providers::{DynProvider, Provider, ProviderBuilder, WsConnect},
    rpc::types::{TransactionInput, TransactionRequest},
    transports::TransportError,
};
use serde_json::Value;

use crate::{
    config::SimulatorConfig,
    errors::{ChainError, ConfigError},
    traits::ChainQuery,
    types::{BlockTag, Bytes, CallRequest},
};

/// Chain access over an alloy provider
#[derive(Clone)]
pub struct RpcChainClient {
    provider: DynProvider,
    request_timeout: Duration,
}

impl fmt::Debug for RpcChainClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RpcChainClient")
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}

impl RpcChainClient {
    /// Wraps an existing provider
    pub fn new(provider: DynProvider, request_timeout: Duration) -> Self {
        Self {
            provider,
            request_timeout,
        }
    }

    /// Connects to the configured endpoint
    ///
    /// `http(s)://` URLs use HTTP, anything else is treated as a WebSocket URL.
    ///
    /// # Returns
    /// * `Ok(RpcChainClient)` - Connected client
    /// * `Err(ConfigError)` - If the URL is malformed or the WebSocket handshake fails
    pub async fn connect(config: &SimulatorConfig) -> Result<Self, ConfigError> {
        let rpc_url = config.rpc_url.as_str();
        let provider = if rpc_url.starts_with("http") {
            let url = rpc_url
                .parse()
                .map_err(|_| ConfigError::InvalidRpcUrl(format!("Failed to parse RPC URL {}", rpc_url)))?;
            ProviderBuilder::new().connect_http(url).erased()
        } else {
            let ws_connect = WsConnect::new(rpc_url);
            ProviderBuilder::new()
                .connect_ws(ws_connect)
                .await
                .map_err(|e| ConfigError::InvalidRpcUrl(format!("Failed to connect to WebSocket: {}", e)))?
                .erased()
        };
        Ok(Self::new(provider, config.request_timeout))
    }

    async fn with_deadline<T>(
        &self,
        method: &str,
        request: impl Future<Output = Result<T, TransportError>>,
    ) -> Result<T, ChainError> {
        match tokio::time::timeout(self.request_timeout, request).await {
            Ok(result) => result.map_err(chain_error),
            Err(_) => Err(ChainError::new(format!(
                "{} request timeout after {}ms",
                method,
                self.request_timeout.as_millis()
            ))),
        }
    }
}

impl ChainQuery for RpcChainClient {
    async fn call(&self, tx: &CallRequest, block: BlockTag) -> Result<Bytes, ChainError> {
        let request = transaction_request(tx);
        self.with_deadline("eth_call", self.provider.call(request).block(block_id(block)).into_future())
            .await
    }

    async fn estimate_gas(&self, tx: &CallRequest) -> Result<u64, ChainError> {
        let request = transaction_request(tx);
        self.with_deadline("eth_estimateGas", self.provider.estimate_gas(request).into_future())
            .await
    }
}

fn transaction_request(tx: &CallRequest) -> TransactionRequest {
    let mut request = TransactionRequest::default()
        .to(tx.to)
        .value(tx.value)
        .input(TransactionInput::new(tx.data.clone()));
    if let Some(from) = tx.from {
        request = request.from(from);
    }
    if let Some(gas_limit) = tx.gas_limit {
        request = request.gas_limit(gas_limit);
    }
    request
}

fn block_id(block: BlockTag) -> BlockId {
    match block {
        BlockTag::Latest => BlockId::latest(),
        BlockTag::Pending => BlockId::pending(),
        BlockTag::Number(number) => BlockId::number(number),
    }
}

/// Keep the JSON-RPC error object when the node returned one
fn chain_error(err: TransportError) -> ChainError {
    let details = err
        .as_error_resp()
        .and_then(|payload| serde_json::to_value(payload).ok())
        .unwrap_or(Value::Null);
    ChainError::with_details(err.to_string(), details)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::{
        eips::BlockNumberOrTag,
        primitives::{address, U256},
        rpc::json_rpc::{ErrorPayload, RpcError},
    };
    use crate::utils::error_utils::extract_error_data;

    #[test]
    fn test_transaction_request() {
        let to = address!("a0b86991c6218b36c1d19d4a2e9eb0ce3606eb48");
        let from = address!("c255fc198eedac7af8af0f6e0ca781794b094a61");
        let tx = CallRequest {
            from: Some(from),
            to,
            value: U256::from(7),
            data: Bytes::from(vec![0x09, 0x5e, 0xa7, 0xb3]),
            gas_limit: Some(100_000),
        };

        let request = transaction_request(&tx);
        assert_eq!(request.from, Some(from));
        assert_eq!(request.value, Some(U256::from(7)));
        assert_eq!(request.gas, Some(100_000));
        assert_eq!(request.input.input().map(|b| b.to_vec()), Some(vec![0x09, 0x5e, 0xa7, 0xb3]));

        let request = transaction_request(&CallRequest::read(to, vec![]));
        assert_eq!(request.from, None);
        assert_eq!(request.gas, None);
    }

    #[test]
    fn test_block_id() {
        assert_eq!(block_id(BlockTag::Latest), BlockId::Number(BlockNumberOrTag::Latest));
        assert_eq!(block_id(BlockTag::Pending), BlockId::Number(BlockNumberOrTag::Pending));
        assert_eq!(block_id(BlockTag::Number(21_784_863)), BlockId::Number(BlockNumberOrTag::Number(21_784_863)));
    }

    #[test]
    fn test_error_response_keeps_revert_data() {
        let payload: ErrorPayload =
            serde_json::from_str(r#"{"code":3,"message":"execution reverted","data":"0xe07c8dba"}"#).unwrap();
        let err = chain_error(RpcError::ErrorResp(payload));

        assert!(err.message.contains("execution reverted"));
        assert_eq!(err.details["code"], 3);
        assert_eq!(extract_error_data(&err.details).as_deref(), Some("0xe07c8dba"));
    }

    #[test]
    fn test_transport_error_has_no_details() {
        let err = chain_error(TransportError::local_usage_str("connection refused"));
        assert_eq!(err.details, Value::Null);
        assert!(err.message.contains("connection refused"));
    }
}
