//! Shared request state.

use alloy_primitives::Address;
use alloy_provider::DynProvider;
use gitpay_chain::{DonationScanner, RetentionPolicy};
use gitpay_primitives::TagDetection;

use crate::config::ServerArgs;

/// Everything a handler needs, assembled once at startup.
///
/// Holds no request-scoped state: handlers are stateless and every request
/// re-reads the chain through the provider.
#[derive(Clone)]
pub struct AppState {
    provider: DynProvider,
    pub token: Address,
    pub chain_id: u64,
    pub list_limit: usize,
    pub summary_limit: usize,
    pub cache_ttl: u64,
    detection: TagDetection,
    retention: RetentionPolicy,
    fetch_limit: usize,
    max_concurrency: usize,
}

impl AppState {
    pub fn new(provider: DynProvider, args: &ServerArgs) -> Self {
        Self {
            provider,
            token: args.token,
            chain_id: args.chain_id,
            list_limit: args.list_limit,
            summary_limit: args.summary_limit,
            cache_ttl: args.cache_ttl,
            detection: if args.scan_tag { TagDetection::Scan } else { TagDetection::FixedOffset },
            retention: if args.keep_untagged {
                RetentionPolicy::All
            } else {
                RetentionPolicy::TaggedOnly
            },
            fetch_limit: args.fetch_limit,
            max_concurrency: args.max_concurrency,
        }
    }

    pub fn provider(&self) -> &DynProvider {
        &self.provider
    }

    /// A scanner configured per the server policy flags.
    pub fn scanner(&self) -> DonationScanner<DynProvider> {
        DonationScanner::new(self.provider.clone(), self.token)
            .with_detection(self.detection)
            .with_retention(self.retention)
            .with_fetch_limit(self.fetch_limit)
            .with_max_concurrency(self.max_concurrency)
    }
}
