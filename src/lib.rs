//! # Transaction Preview
//!
//! Previews Ethereum transactions before they are signed and broadcast.
//!
//! ## Core Features
//!
//! - **Transaction Simulation**
//!   - Read-only execution (`eth_call`) against latest, pending or a fixed block
//!   - Gas estimation
//!   - Native ETH transfer detection
//!
//! - **Error Decoding**
//!   - `Error(string)` revert reasons
//!   - Solidity `Panic(uint256)` codes
//!   - Well-known custom errors (EIP-6093, Ownable, Pausable, Uniswap)
//!   - Provider message heuristics when no revert data is available
//!
//! - **Token Effect Analysis**
//!   - ERC20 `transfer` / `transferFrom` detection
//!   - ERC20 `approve` detection with current allowance and unlimited-approval flag
//!   - Cached token metadata (symbol, decimals, name)
//!
//! ## Features
//!
//! - `rustls-tls`: Uses rustls as the TLS implementation instead of native-tls (OpenSSL).
//!
//!   Usage example:
//!   ```toml
//!   [dependencies]
//!   tx-preview = { version = "0.1.0", default-features = false, features = ["rustls-tls"] }
//!   ```
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use tx_preview::{Simulator, SimulatorConfig, SimulationRequest};
//! use alloy::primitives::{address, hex, U256};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = SimulatorConfig::from_env()?;
//! let simulator = Simulator::connect(&config).await?;
//!
//! // approve(spender, type(uint256).max) on USDC
//! let request = SimulationRequest::new(
//!     address!("C255fC198eEdAC7AF8aF0f6e0ca781794B094A61"),
//!     address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"),
//! )
//! .with_data(hex::decode(
//!     "095ea7b3\
//!      0000000000000000000000007a250d5630b4cf539739df2c5dacb4c659f2488d\
//!      ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff",
//! )?);
//!
//! let result = simulator.simulate(&request).await;
//! match result.error() {
//!     None => println!("Transaction would succeed"),
//!     Some(error) => println!("{}\n{}", error.summary(), error.suggestion),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Structure
//!
//! - `simulator`: Simulation orchestration
//! - `analyzer`: ERC20 effect analysis and token metadata cache
//! - `provider`: JSON-RPC chain access
//! - `types`: Core data structures and type definitions
//! - `traits`: Chain-query capability
//! - `errors`: Error types and handling
//! - `config`: Environment configuration
//! - `request`: Raw request validation
//! - `utils`: ABI, error and unit helpers

pub mod analyzer;
pub mod config;
pub mod errors;
pub mod provider;
pub mod request;
pub mod simulator;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export only the essential types and functions
pub use analyzer::{TokenAnalyzer, TokenCache};
pub use config::SimulatorConfig;
pub use errors::{ChainError, SimulatorError};
pub use provider::RpcChainClient;
pub use request::RawSimulationRequest;
pub use simulator::Simulator;
pub use traits::ChainQuery;
pub use types::{DecodedError, ErrorType, SimulationRequest, SimulationResult};
pub use utils::error_utils::{decode_error, error_summary, extract_error_data};
