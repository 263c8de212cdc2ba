//! Transaction simulation
//!
//! [`Simulator::simulate`] previews a transaction without sending it:
//! 1. The read-only call, a gas estimate and token analysis run concurrently
//! 2. On success, return data, gas, the native transfer and token effects are
//!    combined into a [`SimulationSuccess`]
//! 3. On failure, revert data is decoded (falling back to the provider's
//!    message) and a best-effort gas estimate is retried
//!
//! Simulation never returns an error; every failure is described in the
//! returned [`SimulationResult`].

use std::sync::Arc;

use alloy::primitives::{Address, U256};
use log::{debug, warn};

use crate::{
    analyzer::{TokenAnalyzer, TokenCache},
    config::SimulatorConfig,
    errors::{ChainError, SimulatorError},
    provider::RpcChainClient,
    traits::ChainQuery,
    types::{
        CallRequest, DecodedError, ErrorType, EthTransfer, SimulationFailure, SimulationRequest,
        SimulationResult, SimulationSuccess,
    },
    utils::{
        error_utils::{decode_error, extract_error_data},
        message_utils::parse_provider_error,
        unit_utils::format_ether,
    },
};

/// Gas estimate reported when estimation fails on the success path
pub const UNKNOWN_GAS: &str = "unknown";

/// Previews transactions against a chain
///
/// # Example
/// ```no_run
/// use tx_preview::{Simulator, SimulatorConfig, SimulationRequest};
/// use alloy::primitives::{address, U256};
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = SimulatorConfig::from_env()?;
/// let simulator = Simulator::connect(&config).await?;
///
/// let request = SimulationRequest::new(
///     address!("C255fC198eEdAC7AF8aF0f6e0ca781794B094A61"),
///     address!("d878229c9c3575F224784DE610911B5607a3ad15"),
/// )
/// .with_value(U256::from(120000000000000000u64)); // 0.12 ETH
///
/// let result = simulator.simulate(&request).await;
/// println!("{}", serde_json::to_string_pretty(&result)?);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Simulator<Q> {
    chain: Arc<Q>,
    analyzer: TokenAnalyzer<Q>,
}

impl<Q> Clone for Simulator<Q> {
    fn clone(&self) -> Self {
        Self {
            chain: Arc::clone(&self.chain),
            analyzer: self.analyzer.clone(),
        }
    }
}

impl<Q: ChainQuery> Simulator<Q> {
    /// Creates a simulator with a fresh token cache
    pub fn new(chain: Q) -> Self {
        Self::with_token_cache(chain, Arc::new(TokenCache::new()))
    }

    /// Creates a simulator sharing an existing token cache
    pub fn with_token_cache(chain: Q, cache: Arc<TokenCache>) -> Self {
        let chain = Arc::new(chain);
        let analyzer = TokenAnalyzer::with_cache(Arc::clone(&chain), cache);
        Self { chain, analyzer }
    }

    pub fn chain(&self) -> &Q {
        &self.chain
    }

    pub fn token_cache(&self) -> &Arc<TokenCache> {
        self.analyzer.cache()
    }

    /// Simulate a transaction and describe its outcome
    ///
    /// # Arguments
    /// * `request` - Validated transaction parameters
    ///
    /// # Returns
    /// * `SimulationResult::Success` - The read-only call succeeded
    /// * `SimulationResult::Failure` - The call failed; the error is decoded for display
    pub async fn simulate(&self, request: &SimulationRequest) -> SimulationResult {
        let tx = request.call_request();

        let (call, gas, analysis) = tokio::join!(
            self.chain.call(&tx, request.block_tag),
            self.estimate_gas(&tx),
            self.analyzer
                .analyze_transaction(request.from, request.to, &request.data),
        );

        match call {
            Ok(return_data) => SimulationResult::Success(SimulationSuccess {
                gas_estimate: gas.unwrap_or_else(|| UNKNOWN_GAS.to_string()),
                return_data,
                eth_transfer: build_eth_transfer(request.from, request.to, request.value),
                token_transfers: analysis.transfers,
                approval_changes: analysis.approvals,
            }),
            Err(err) => {
                let error = decode_chain_error(&err);
                debug!("Simulation of call to {} failed: {}", request.to, error.summary());

                let gas_estimate = self.estimate_gas(&tx).await;
                if gas_estimate.is_none() {
                    warn!("Gas estimation for call to {} failed on retry", request.to);
                }
                SimulationResult::Failure(SimulationFailure { error, gas_estimate })
            }
        }
    }

    async fn estimate_gas(&self, tx: &CallRequest) -> Option<String> {
        match self.chain.estimate_gas(tx).await {
            Ok(gas) => Some(gas.to_string()),
            Err(e) => {
                debug!("Gas estimation failed: {}", e);
                None
            }
        }
    }
}

impl Simulator<RpcChainClient> {
    /// Connects to the configured JSON-RPC endpoint
    ///
    /// # Returns
    /// * `Ok(Simulator)` - Simulator backed by an [`RpcChainClient`]
    /// * `Err(SimulatorError::Config)` - If the endpoint cannot be used
    pub async fn connect(config: &SimulatorConfig) -> Result<Self, SimulatorError> {
        let client = RpcChainClient::connect(config).await?;
        Ok(Self::new(client))
    }
}

/// Decode a chain-query failure into a user-facing error
///
/// Structured revert data wins; when it yields nothing better than
/// `ErrorType::Unknown`, the provider's message is classified instead.
pub fn decode_chain_error(err: &ChainError) -> DecodedError {
    let data = extract_error_data(&err.details);
    let decoded = decode_error(data.as_deref());
    if decoded.error_type == ErrorType::Unknown {
        parse_provider_error(&err.message, &decoded)
    } else {
        decoded
    }
}

/// Build the native transfer record, `None` for a zero value
pub fn build_eth_transfer(from: Address, to: Address, value: U256) -> Option<EthTransfer> {
    if value.is_zero() {
        return None;
    }
    Some(EthTransfer {
        from,
        to,
        value: value.to_string(),
        formatted_value: format_ether(value),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;
    use serde_json::json;

    #[test]
    fn test_build_eth_transfer() {
        let from = address!("c255fc198eedac7af8af0f6e0ca781794b094a61");
        let to = address!("d878229c9c3575f224784de610911b5607a3ad15");

        assert_eq!(build_eth_transfer(from, to, U256::ZERO), None);

        let transfer = build_eth_transfer(from, to, U256::from(120_000_000_000_000_000u128)).unwrap();
        assert_eq!(transfer.value, "120000000000000000");
        assert_eq!(transfer.formatted_value, "0.12");
        assert_eq!(transfer.from, from);
    }

    #[test]
    fn test_decode_chain_error_prefers_revert_data() {
        let err = ChainError::with_details(
            "execution reverted: custom error 0x118cdaa7",
            json!({
                "code": 3,
                "message": "execution reverted",
                "data": "0x118cdaa70000000000000000000000001111111111111111111111111111111111111111"
            }),
        );
        let decoded = decode_chain_error(&err);
        assert_eq!(decoded.error_type, ErrorType::Custom);
        assert_eq!(decoded.message, "Not Authorized");
    }

    #[test]
    fn test_decode_chain_error_falls_back_to_message() {
        let err = ChainError::new("insufficient funds for gas * price + value");
        let decoded = decode_chain_error(&err);
        assert_eq!(decoded.message, "Insufficient Funds");
        assert_eq!(decoded.raw, "0x");

        // Payload too short to classify
        let err = ChainError::with_details("nonce too low", json!({ "data": "0x" }));
        let decoded = decode_chain_error(&err);
        assert_eq!(decoded.message, "Nonce Error");
    }
}
