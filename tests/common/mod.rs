//! In-memory chain used by the integration tests

#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
};

use alloy::{
    primitives::{address, Address, Bytes, U256},
    sol_types::{SolCall, SolValue},
};
use serde_json::Value;
use tx_preview::{
    types::{BlockTag, CallRequest},
    utils::erc20_utils::{allowanceCall, balanceOfCall, decimalsCall, nameCall, symbolCall},
    ChainError, ChainQuery,
};

pub const USDC: Address = address!("a0b86991c6218b36c1d19d4a2e9eb0ce3606eb48");
pub const ALICE: Address = address!("742d35cc6634c0532925a3b844bc9e7595f0ab2d");
pub const BOB: Address = address!("d8da6bf26964af9d7eed9e03e53415d37aa96045");
pub const ROUTER: Address = address!("7a250d5630b4cf539739df2c5dacb4c659f2488d");

/// Chain whose view calls, main call and gas estimate are scripted
///
/// Calls without a sender are treated as view calls and answered from the
/// `(contract, selector)` table; unknown view calls revert.
pub struct MockChain {
    reads: HashMap<(Address, [u8; 4]), Result<Bytes, ChainError>>,
    call_result: Result<Bytes, ChainError>,
    gas_result: Result<u64, ChainError>,
    read_counts: Mutex<HashMap<(Address, [u8; 4]), usize>>,
    main_calls: AtomicUsize,
    gas_calls: AtomicUsize,
}

impl Default for MockChain {
    fn default() -> Self {
        Self {
            reads: HashMap::new(),
            call_result: Ok(Bytes::new()),
            gas_result: Ok(21_000),
            read_counts: Mutex::new(HashMap::new()),
            main_calls: AtomicUsize::new(0),
            gas_calls: AtomicUsize::new(0),
        }
    }
}

impl MockChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer a view call with an ABI-encoded return value
    pub fn with_read(mut self, contract: Address, selector: [u8; 4], output: impl Into<Bytes>) -> Self {
        self.reads.insert((contract, selector), Ok(output.into()));
        self
    }

    /// Make a view call revert
    pub fn with_failing_read(mut self, contract: Address, selector: [u8; 4]) -> Self {
        self.reads
            .insert((contract, selector), Err(ChainError::new("execution reverted")));
        self
    }

    /// Register ERC20 metadata for `token`
    pub fn with_token(self, token: Address, symbol: &str, decimals: u8, name: &str) -> Self {
        self.with_read(token, symbolCall::SELECTOR, symbol.to_string().abi_encode())
            .with_read(token, decimalsCall::SELECTOR, U256::from(decimals).abi_encode())
            .with_read(token, nameCall::SELECTOR, name.to_string().abi_encode())
    }

    pub fn with_allowance(self, token: Address, allowance: U256) -> Self {
        self.with_read(token, allowanceCall::SELECTOR, allowance.abi_encode())
    }

    pub fn with_balance(self, token: Address, balance: U256) -> Self {
        self.with_read(token, balanceOfCall::SELECTOR, balance.abi_encode())
    }

    pub fn with_call_result(mut self, result: Result<Bytes, ChainError>) -> Self {
        self.call_result = result;
        self
    }

    /// Make the main call fail with a JSON-RPC style error object
    pub fn with_call_error(self, message: &str, details: Value) -> Self {
        self.with_call_result(Err(ChainError::with_details(message, details)))
    }

    pub fn with_gas_result(mut self, result: Result<u64, ChainError>) -> Self {
        self.gas_result = result;
        self
    }

    /// Number of view calls issued for `(contract, selector)`
    pub fn read_count(&self, contract: Address, selector: [u8; 4]) -> usize {
        self.read_counts
            .lock()
            .unwrap()
            .get(&(contract, selector))
            .copied()
            .unwrap_or_default()
    }

    pub fn total_reads(&self) -> usize {
        self.read_counts.lock().unwrap().values().sum()
    }

    pub fn main_calls(&self) -> usize {
        self.main_calls.load(Ordering::SeqCst)
    }

    pub fn gas_calls(&self) -> usize {
        self.gas_calls.load(Ordering::SeqCst)
    }
}

impl ChainQuery for MockChain {
    async fn call(&self, tx: &CallRequest, _block: BlockTag) -> Result<Bytes, ChainError> {
        if tx.from.is_some() {
            self.main_calls.fetch_add(1, Ordering::SeqCst);
            return self.call_result.clone();
        }

        let selector = tx.selector().unwrap_or_default();
        *self
            .read_counts
            .lock()
            .unwrap()
            .entry((tx.to, selector))
            .or_default() += 1;

        self.reads
            .get(&(tx.to, selector))
            .cloned()
            .unwrap_or_else(|| Err(ChainError::new("execution reverted")))
    }

    async fn estimate_gas(&self, _tx: &CallRequest) -> Result<u64, ChainError> {
        self.gas_calls.fetch_add(1, Ordering::SeqCst);
        self.gas_result.clone()
    }
}

/// Initialize logging once per test binary
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
