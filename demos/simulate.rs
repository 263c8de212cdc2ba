//! Preview an unlimited USDC approval for the Uniswap V2 router
//!
//! ```text
//! ETHEREUM_RPC_URL=https://eth.llamarpc.com RUST_LOG=debug cargo run --example simulate
//! ```

use alloy::{
    primitives::{address, U256},
    sol_types::SolCall,
};
use anyhow::Result;
use tx_preview::{
    utils::erc20_utils::approveCall, SimulationRequest, SimulationResult, Simulator,
    SimulatorConfig,
};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let config = SimulatorConfig::from_env()?;
    let simulator = Simulator::connect(&config).await?;

    let owner = address!("28C6c06298d514Db089934071355E5743bf21d60");
    let usdc = address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48");
    let router = address!("7a250d5630B4cF539739dF2C5dAcb4c659F2488D");

    let data = approveCall { spender: router, amount: U256::MAX }.abi_encode();
    let request = SimulationRequest::new(owner, usdc).with_data(data);

    let result = simulator.simulate(&request).await;
    match &result {
        SimulationResult::Success(success) => {
            println!("✅ Transaction would succeed (gas: {})", success.gas_estimate);
            for approval in &success.approval_changes {
                println!(
                    "🔓 {} allowance for {}: {} -> {}{}",
                    approval.symbol,
                    approval.spender,
                    approval.current_allowance,
                    approval.new_allowance,
                    if approval.is_unlimited { " (unlimited)" } else { "" }
                );
            }
        }
        SimulationResult::Failure(failure) => {
            println!("❌ {}", failure.error.summary());
            println!("💡 {}", failure.error.suggestion);
        }
    }

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
