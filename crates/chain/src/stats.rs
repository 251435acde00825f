//! Aggregate donation statistics.

use alloy_primitives::{
    Address, U256,
    utils::{ParseUnits, format_units},
};
use serde::Serialize;

use crate::TaggedTransfer;

/// Totals and counts over a list of classified transfers, partitioned by which
/// side of each payment the subject address is on.
///
/// Totals are exact base-unit sums; conversion to decimal token units happens only
/// when formatting for display, so the displayed figures are presentation values,
/// not settlement figures.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DonationStats {
    /// Base-unit sum of payments addressed to the subject.
    #[serde(serialize_with = "gitpay_primitives::ser::u256_decimal")]
    pub total_received: U256,
    /// Base-unit sum of payments sent by the subject.
    #[serde(serialize_with = "gitpay_primitives::ser::u256_decimal")]
    pub total_donated: U256,
    pub received_count: usize,
    pub donated_count: usize,
    /// Token decimal count captured at computation time, for display scaling.
    pub decimals: u8,
}

impl DonationStats {
    /// Computes stats for `subject` over `transfers`.
    ///
    /// A transfer counts as received when its effective recipient (decoded
    /// call-data intent, falling back to the event `to`) is the subject, and as
    /// donated when the subject is the sender. The recipient check wins, so a
    /// self-transfer counts exactly once.
    pub fn compute(subject: Address, transfers: &[TaggedTransfer], decimals: u8) -> Self {
        let mut stats = Self { decimals, ..Self::default() };
        for transfer in transfers {
            let amount = transfer.effective_amount();
            if transfer.effective_recipient() == Some(subject) {
                stats.total_received = stats.total_received.saturating_add(amount);
                stats.received_count += 1;
            } else if transfer.from == subject {
                stats.total_donated = stats.total_donated.saturating_add(amount);
                stats.donated_count += 1;
            }
        }
        stats
    }

    /// Total received, formatted in decimal token units.
    pub fn total_received_display(&self) -> String {
        display_amount(self.total_received, self.decimals)
    }

    /// Total donated, formatted in decimal token units.
    pub fn total_donated_display(&self) -> String {
        display_amount(self.total_donated, self.decimals)
    }
}

/// Formats a base-unit amount in decimal token units, trimming trailing zeros
/// (`1500000` at 6 decimals becomes `"1.5"`).
pub fn display_amount(amount: U256, decimals: u8) -> String {
    let formatted = format_units(ParseUnits::U256(amount), decimals)
        .unwrap_or_else(|_| amount.to_string());
    match formatted.trim_end_matches('0').trim_end_matches('.') {
        "" => "0".to_string(),
        trimmed => trimmed.to_string(),
    }
}
