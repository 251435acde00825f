//! Read-only views of the tracked ERC-20 token contract.

use alloy_primitives::{Address, U256};
use alloy_provider::Provider;
use alloy_sol_types::sol;
use serde::Serialize;

use crate::ChainError;

sol! {
    #[sol(rpc)]
    interface IERC20 {
        function balanceOf(address owner) external view returns (uint256);
        function decimals() external view returns (uint8);
        function symbol() external view returns (string);
    }
}

/// Static metadata of the tracked token, read once per request.
#[derive(Clone, Debug, Serialize)]
pub struct TokenMetadata {
    pub address: Address,
    pub symbol: String,
    pub decimals: u8,
}

/// Reads the token's symbol and decimal count.
pub async fn metadata<P: Provider>(provider: P, token: Address) -> Result<TokenMetadata, ChainError> {
    let erc20 = IERC20::new(token, provider);
    let decimals = erc20.decimals().call().await?;
    let symbol = erc20.symbol().call().await?;
    Ok(TokenMetadata { address: token, symbol, decimals })
}

/// Reads `owner`'s token balance in base units.
pub async fn balance_of<P: Provider>(
    provider: P,
    token: Address,
    owner: Address,
) -> Result<U256, ChainError> {
    Ok(IERC20::new(token, provider).balanceOf(owner).call().await?)
}
