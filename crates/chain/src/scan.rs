//! The donation scanner: turns an address into an ordered list of classified
//! transfers.

use std::collections::HashSet;

use alloy_consensus::Transaction as _;
use alloy_primitives::Address;
use alloy_provider::Provider;
use futures::{StreamExt, stream};
use gitpay_primitives::{TagDetection, classify};
use tracing::{debug, warn};

use crate::{
    ChainError, TaggedTransfer,
    index::{self, AssetTransfer, Direction},
};

/// What the scanner keeps from the transfer history.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RetentionPolicy {
    /// Only transfers whose call-data carries the payment tag.
    #[default]
    TaggedOnly,
    /// Every transfer, with its classification attached. Legacy behavior.
    All,
}

const DEFAULT_FETCH_LIMIT: usize = 50;
const DEFAULT_MAX_CONCURRENCY: usize = 8;

/// Scans an address's token-transfer history and reconstructs GitPay payments.
#[derive(Clone, Debug)]
pub struct DonationScanner<P> {
    provider: P,
    token: Address,
    detection: TagDetection,
    retention: RetentionPolicy,
    fetch_limit: usize,
    max_concurrency: usize,
}

impl<P: Provider> DonationScanner<P> {
    pub fn new(provider: P, token: Address) -> Self {
        Self {
            provider,
            token,
            detection: TagDetection::default(),
            retention: RetentionPolicy::default(),
            fetch_limit: DEFAULT_FETCH_LIMIT,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }

    pub fn with_detection(mut self, detection: TagDetection) -> Self {
        self.detection = detection;
        self
    }

    pub fn with_retention(mut self, retention: RetentionPolicy) -> Self {
        self.retention = retention;
        self
    }

    /// Caps how many unique transfers get their transaction resolved per scan.
    pub fn with_fetch_limit(mut self, limit: usize) -> Self {
        self.fetch_limit = limit;
        self
    }

    /// Bounds concurrent transaction lookups, to stay inside provider rate limits.
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    /// Fetches, classifies and orders the transfers touching `subject`.
    ///
    /// The two directional event queries are issued concurrently; if either fails
    /// the whole scan fails and no partial result is returned. A failed lookup of
    /// a single transaction is logged and that transfer skipped.
    pub async fn scan(&self, subject: Address) -> Result<Vec<TaggedTransfer>, ChainError> {
        let (incoming, outgoing) = tokio::try_join!(
            index::fetch_transfers(&self.provider, self.token, subject, Direction::Incoming),
            index::fetch_transfers(&self.provider, self.token, subject, Direction::Outgoing),
        )?;
        debug!(
            %subject,
            incoming = incoming.len(),
            outgoing = outgoing.len(),
            "fetched transfer events"
        );

        // A transfer shows up in both query results when sender and recipient are
        // the same address; the hash dedups it.
        let records = dedup_by_hash(incoming.into_iter().chain(outgoing));

        let mut transfers: Vec<TaggedTransfer> = stream::iter(records.into_iter().take(self.fetch_limit))
            .map(|record| self.resolve_record(record))
            .buffer_unordered(self.max_concurrency)
            .filter_map(futures::future::ready)
            .collect()
            .await;

        if self.retention == RetentionPolicy::TaggedOnly {
            transfers.retain(|transfer| transfer.classification.tagged);
        }
        sort_newest_first(&mut transfers);
        Ok(transfers)
    }

    /// Resolves one event record to a classified transfer. `None` means the
    /// transaction could not be fetched; the scan continues without it.
    async fn resolve_record(&self, record: AssetTransfer) -> Option<TaggedTransfer> {
        let tx = match self.provider.get_transaction_by_hash(record.hash).await {
            Ok(Some(tx)) => tx,
            Ok(None) => {
                warn!(hash = %record.hash, "transaction not found, skipping transfer");
                return None;
            }
            Err(err) => {
                warn!(hash = %record.hash, %err, "transaction lookup failed, skipping transfer");
                return None;
            }
        };

        Some(TaggedTransfer {
            hash: record.hash,
            from: record.from,
            to: record.to,
            raw_value: record.raw_contract.value.unwrap_or_default(),
            block_number: record.block_num.to::<u64>(),
            timestamp: record.metadata.block_timestamp,
            classification: classify(tx.input(), self.detection),
        })
    }
}

fn dedup_by_hash(records: impl Iterator<Item = AssetTransfer>) -> Vec<AssetTransfer> {
    let mut seen = HashSet::new();
    records.filter(|record| seen.insert(record.hash)).collect()
}

/// Descending by timestamp, tie-broken by block number then hash so the order is
/// total and stable across runs.
fn sort_newest_first(transfers: &mut [TaggedTransfer]) {
    transfers.sort_unstable_by(|a, b| {
        (b.timestamp, b.block_number, b.hash).cmp(&(a.timestamp, a.block_number, a.hash))
    });
}
