//! Chain access for the GitPay badge service.
//!
//! Everything here runs against an injected [`alloy_provider::Provider`]; there is
//! no process-global client and no server-side caching. Each request re-reads the
//! chain through the provider it was handed.

pub mod ens;
pub mod error;
pub mod index;
pub mod scan;
pub mod stats;
pub mod token;
pub mod transfer;

pub use error::ChainError;
pub use scan::{DonationScanner, RetentionPolicy};
pub use stats::DonationStats;
pub use transfer::TaggedTransfer;
