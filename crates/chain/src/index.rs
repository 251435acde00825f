//! Typed access to the external asset-transfer indexing API.
//!
//! The indexing API answers "which ERC-20 transfer events touched this address"
//! without a chain scan. It is a JSON-RPC method on the same endpoint as the node,
//! so requests ride the provider's transport; an `error` payload from the API
//! therefore surfaces as a transport error and fails the whole query.

use alloy_primitives::{Address, TxHash, U64, U256};
use alloy_provider::Provider;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ChainError;

const METHOD: &str = "alchemy_getAssetTransfers";

/// Records fetched per page, as a hex quantity per the API contract.
const PAGE_SIZE: &str = "0x3e8";

/// Hard cap on followed `pageKey` continuations per directional query.
const MAX_PAGES: usize = 10;

/// Which side of the transfer the subject address is on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Transfers where the subject is the recipient.
    Incoming,
    /// Transfers where the subject is the sender.
    Outgoing,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AssetTransfersRequest {
    from_block: &'static str,
    to_block: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    from_address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    to_address: Option<Address>,
    contract_addresses: [Address; 1],
    category: [&'static str; 1],
    with_metadata: bool,
    max_count: &'static str,
    order: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    page_key: Option<String>,
}

impl AssetTransfersRequest {
    fn new(token: Address, subject: Address, direction: Direction) -> Self {
        let (from_address, to_address) = match direction {
            Direction::Incoming => (None, Some(subject)),
            Direction::Outgoing => (Some(subject), None),
        };
        Self {
            from_block: "0x0",
            to_block: "latest",
            from_address,
            to_address,
            contract_addresses: [token],
            category: ["erc20"],
            with_metadata: true,
            max_count: PAGE_SIZE,
            order: "desc",
            page_key: None,
        }
    }
}

/// One page of transfer-event records.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetTransfersPage {
    #[serde(default)]
    pub transfers: Vec<AssetTransfer>,
    #[serde(default)]
    pub page_key: Option<String>,
}

/// One transfer-event record as reported by the indexing API.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetTransfer {
    pub hash: TxHash,
    pub from: Address,
    pub to: Option<Address>,
    pub block_num: U64,
    pub raw_contract: RawContract,
    pub metadata: TransferMetadata,
}

/// Raw contract-level fields of a transfer event.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawContract {
    /// Event value in token base units.
    #[serde(default)]
    pub value: Option<U256>,
    #[serde(default)]
    pub address: Option<Address>,
    /// Token decimal count, as a hex quantity.
    #[serde(default)]
    pub decimal: Option<U64>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferMetadata {
    /// Block timestamp, RFC 3339.
    pub block_timestamp: DateTime<Utc>,
}

/// Fetches all transfer events for `subject` in the given direction, following
/// `pageKey` continuations up to the page cap.
pub async fn fetch_transfers<P: Provider>(
    provider: &P,
    token: Address,
    subject: Address,
    direction: Direction,
) -> Result<Vec<AssetTransfer>, ChainError> {
    let mut request = AssetTransfersRequest::new(token, subject, direction);
    let mut records = Vec::new();

    for _ in 0..MAX_PAGES {
        let page: AssetTransfersPage =
            provider.raw_request(METHOD.into(), (request.clone(),)).await?;
        records.extend(page.transfers);
        match page.page_key {
            Some(key) => request.page_key = Some(key),
            None => return Ok(records),
        }
    }

    debug!(%subject, ?direction, pages = MAX_PAGES, "transfer history truncated at page cap");
    Ok(records)
}
