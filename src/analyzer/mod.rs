//! Transaction effect analysis
//!
//! Inspects calldata for the ERC20 calls that move or approve tokens and
//! reports what the transaction would do:
//! - `transfer(to, amount)`: caller sends `amount` to `to`
//! - `transferFrom(from, to, amount)`: `amount` moves between the decoded parties
//! - `approve(spender, amount)`: caller's allowance for `spender` changes
//!
//! Analysis is best-effort. Malformed calldata, contracts that are not ERC20
//! tokens and RPC failures all produce an empty [`TokenAnalysis`].

pub mod cache;

use std::sync::Arc;

use alloy::primitives::{Address, U256};
use log::debug;

use crate::{
    traits::ChainQuery,
    types::{ApprovalChange, TokenAnalysis, TokenInfo, TokenTransfer},
    utils::{
        erc20_utils::{
            decode_erc20_call, get_decimals, get_name, get_symbol, is_unlimited_approval,
            query_erc20_allowance, query_erc20_balance, Erc20Call, DEFAULT_DECIMALS,
        },
        unit_utils::format_token_amount,
    },
};

pub use cache::TokenCache;

/// Detects ERC20 transfers and approval changes in calldata
///
/// Token metadata is resolved through the chain and memoized in a
/// [`TokenCache`] that can be shared between analyzers.
#[derive(Debug)]
pub struct TokenAnalyzer<Q> {
    chain: Arc<Q>,
    cache: Arc<TokenCache>,
}

impl<Q> Clone for TokenAnalyzer<Q> {
    fn clone(&self) -> Self {
        Self {
            chain: Arc::clone(&self.chain),
            cache: Arc::clone(&self.cache),
        }
    }
}

impl<Q: ChainQuery> TokenAnalyzer<Q> {
    /// Creates an analyzer with its own empty cache
    pub fn new(chain: Arc<Q>) -> Self {
        Self::with_cache(chain, Arc::new(TokenCache::new()))
    }

    /// Creates an analyzer that shares `cache`
    pub fn with_cache(chain: Arc<Q>, cache: Arc<TokenCache>) -> Self {
        Self { chain, cache }
    }

    pub fn cache(&self) -> &Arc<TokenCache> {
        &self.cache
    }

    /// Analyze a transaction for token transfers and approval changes
    ///
    /// # Arguments
    /// * `from` - Transaction sender
    /// * `to` - Transaction target, treated as the token contract
    /// * `data` - Transaction calldata
    ///
    /// # Returns
    /// Detected transfers and approvals; empty when nothing could be detected
    pub async fn analyze_transaction(&self, from: Address, to: Address, data: &[u8]) -> TokenAnalysis {
        let call = match decode_erc20_call(data) {
            Ok(Some(call)) => call,
            Ok(None) => return TokenAnalysis::default(),
            Err(e) => {
                debug!("Skipping token analysis for {}: malformed ERC20 calldata: {}", to, e);
                return TokenAnalysis::default();
            }
        };

        let Some(token) = self.get_token_info(to).await else {
            debug!("Skipping token analysis: {} does not look like an ERC20 token", to);
            return TokenAnalysis::default();
        };

        let mut analysis = TokenAnalysis::default();
        match call {
            Erc20Call::Transfer { to: recipient, amount } => {
                analysis.transfers.push(token_transfer(&token, from, recipient, amount));
            }
            Erc20Call::TransferFrom { from: sender, to: recipient, amount } => {
                analysis.transfers.push(token_transfer(&token, sender, recipient, amount));
            }
            Erc20Call::Approve { spender, amount } => {
                let current_allowance = self.get_allowance(to, from, spender).await;
                analysis.approvals.push(ApprovalChange {
                    token: token.address,
                    symbol: token.symbol,
                    owner: from,
                    spender,
                    current_allowance,
                    new_allowance: amount.to_string(),
                    is_unlimited: is_unlimited_approval(amount),
                });
            }
        }
        analysis
    }

    /// Get token metadata (symbol, decimals, name)
    ///
    /// `symbol`, `decimals` and `name` are read concurrently. Unreadable
    /// decimals default to 18 and an unreadable name is omitted.
    ///
    /// # Returns
    /// * `Some(TokenInfo)` - Metadata, cached for later calls
    /// * `None` - If the symbol is unreadable or empty; nothing is cached
    pub async fn get_token_info(&self, token: Address) -> Option<TokenInfo> {
        if let Some(info) = self.cache.get(&token).await {
            return Some(info);
        }

        let chain = self.chain.as_ref();
        let (symbol, decimals, name) = tokio::join!(
            get_symbol(chain, token),
            get_decimals(chain, token),
            get_name(chain, token),
        );

        let symbol = match symbol {
            Ok(symbol) if !symbol.is_empty() => symbol,
            Ok(_) => {
                debug!("Token {} returned an empty symbol", token);
                return None;
            }
            Err(e) => {
                debug!("Failed to read symbol of {}: {}", token, e);
                return None;
            }
        };
        let decimals = decimals.unwrap_or_else(|e| {
            debug!("Failed to read decimals of {}, assuming {}: {}", token, DEFAULT_DECIMALS, e);
            DEFAULT_DECIMALS
        });

        let info = TokenInfo {
            address: token,
            symbol,
            decimals,
            name: name.ok().filter(|n| !n.is_empty()),
        };
        self.cache.insert(info.clone()).await;
        Some(info)
    }

    /// Get the current allowance as a decimal string, `"0"` when unreadable
    pub async fn get_allowance(&self, token: Address, owner: Address, spender: Address) -> String {
        query_erc20_allowance(self.chain.as_ref(), token, owner, spender)
            .await
            .map(|allowance| allowance.to_string())
            .unwrap_or_else(|e| {
                debug!("Failed to read allowance on {}: {}", token, e);
                "0".to_string()
            })
    }

    /// Get a token balance as a decimal string, `"0"` when unreadable
    pub async fn get_balance(&self, token: Address, account: Address) -> String {
        query_erc20_balance(self.chain.as_ref(), token, account)
            .await
            .map(|balance| balance.to_string())
            .unwrap_or_else(|e| {
                debug!("Failed to read balance on {}: {}", token, e);
                "0".to_string()
            })
    }
}

fn token_transfer(token: &TokenInfo, from: Address, to: Address, amount: U256) -> TokenTransfer {
    TokenTransfer {
        token: token.address,
        symbol: token.symbol.clone(),
        decimals: token.decimals,
        from,
        to,
        amount: amount.to_string(),
        formatted_amount: format_token_amount(amount, token.decimals),
    }
}
