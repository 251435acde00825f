//! The reconstructed view of one on-chain token movement.

use alloy_primitives::{Address, TxHash, U256};
use chrono::{DateTime, Utc};
use gitpay_primitives::Classification;
use serde::Serialize;

/// One token transfer touching the subject address, joined with the classification
/// of its originating transaction's call-data.
///
/// Constructed fresh per request from externally fetched data; never persisted.
#[derive(Clone, Debug, Serialize)]
pub struct TaggedTransfer {
    /// Transaction hash; the dedup key.
    pub hash: TxHash,
    /// Sender, as reported by the transfer event.
    pub from: Address,
    /// Recipient, as reported by the transfer event. May differ from the intended
    /// recipient decoded out of the call-data.
    pub to: Option<Address>,
    /// Event value in token base units.
    #[serde(serialize_with = "gitpay_primitives::ser::u256_decimal")]
    pub raw_value: U256,
    pub block_number: u64,
    /// Block timestamp; the ordering key.
    pub timestamp: DateTime<Utc>,
    pub classification: Classification,
}

impl TaggedTransfer {
    /// The recipient the payment was addressed to: the decoded call-data intent
    /// wins over the event field.
    pub fn effective_recipient(&self) -> Option<Address> {
        self.classification.recipient.or(self.to)
    }

    /// The amount the payment carried, in token base units: the decoded call-data
    /// intent wins over the event value.
    pub fn effective_amount(&self) -> U256 {
        self.classification.amount.unwrap_or(self.raw_value)
    }
}
