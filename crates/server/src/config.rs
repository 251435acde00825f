//! CLI and environment configuration.

use alloy_primitives::Address;
use clap::Parser;
use url::Url;

/// Mainnet USDC.
const DEFAULT_TOKEN: &str = "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48";

/// GitPay badge service: donation badges, history and a donation page for a
/// stablecoin tip jar, rendered straight from chain data.
#[derive(Clone, Debug, Parser)]
#[command(name = "gitpay-server", version, about)]
pub struct ServerArgs {
    /// JSON-RPC endpoint. Must serve the asset-transfers indexing extension.
    #[arg(long, env = "ETH_RPC_URL")]
    pub rpc_url: Url,

    /// Host to bind.
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Port to bind.
    #[arg(long, short, default_value_t = 8587)]
    pub port: u16,

    /// Tracked stablecoin contract.
    #[arg(long, env = "GITPAY_TOKEN", default_value = DEFAULT_TOKEN)]
    pub token: Address,

    /// Chain id the donation page asks the wallet to switch to.
    #[arg(long, default_value_t = 1)]
    pub chain_id: u64,

    /// Donations shown on the history image.
    #[arg(long, default_value_t = 10)]
    pub list_limit: usize,

    /// Donations shown on the badge summary.
    #[arg(long, default_value_t = 4)]
    pub summary_limit: usize,

    /// Transfers resolved to transactions per scan.
    #[arg(long, default_value_t = 50)]
    pub fetch_limit: usize,

    /// Concurrent transaction lookups per scan.
    #[arg(long, default_value_t = 8)]
    pub max_concurrency: usize,

    /// Match the payment tag anywhere in call-data (legacy) instead of at the
    /// fixed offset after the transfer arguments.
    #[arg(long)]
    pub scan_tag: bool,

    /// Keep untagged transfers in listings, with their classification attached.
    #[arg(long)]
    pub keep_untagged: bool,

    /// Cache-Control max-age for rendered badges and API responses, in seconds.
    #[arg(long, default_value_t = 300)]
    pub cache_ttl: u64,
}
