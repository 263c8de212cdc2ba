//! Chain-query capability
//!
//! The simulator never talks to a node directly. Everything it needs from the
//! chain goes through [`ChainQuery`]:
//! - `call`: read-only execution of a transaction (`eth_call`)
//! - `estimate_gas`: gas estimation (`eth_estimateGas`)
//! - `read_contract`: typed view calls built on top of `call`
//!
//! `provider::RpcChainClient` implements it over JSON-RPC; tests use in-memory
//! implementations.

use std::future::Future;

use alloy::{primitives::Address, sol_types::SolCall};

use crate::{
    errors::ChainError,
    types::{BlockTag, Bytes, CallRequest},
};

/// Node access needed to preview a transaction
pub trait ChainQuery: Send + Sync {
    /// Executes `tx` read-only against `block` and returns the raw return data
    ///
    /// # Returns
    /// * `Ok(Bytes)` - Return data of the call
    /// * `Err(ChainError)` - The call reverted or the node could not be reached;
    ///   revert data is kept in `ChainError::details`
    fn call(
        &self,
        tx: &CallRequest,
        block: BlockTag,
    ) -> impl Future<Output = Result<Bytes, ChainError>> + Send;

    /// Estimates the gas `tx` would consume
    fn estimate_gas(&self, tx: &CallRequest) -> impl Future<Output = Result<u64, ChainError>> + Send;

    /// Calls a view function generated by `sol!` and decodes its return value
    ///
    /// # Arguments
    /// * `contract` - Contract to query
    /// * `call` - Encoded function call (e.g. `symbolCall {}`)
    ///
    /// # Returns
    /// * `Ok(C::Return)` - Decoded return value
    /// * `Err(ChainError)` - If the call fails or returns undecodable data
    fn read_contract<C>(
        &self,
        contract: Address,
        call: &C,
    ) -> impl Future<Output = Result<C::Return, ChainError>> + Send
    where
        C: SolCall + Sync,
    {
        async move {
            let tx = CallRequest::read(contract, call.abi_encode());
            let output = self.call(&tx, BlockTag::Latest).await?;
            C::abi_decode_returns(&output).map_err(|e| {
                ChainError::new(format!(
                    "Failed to decode {} return value from {}: {}",
                    C::SIGNATURE,
                    contract,
                    e
                ))
            })
        }
    }
}
