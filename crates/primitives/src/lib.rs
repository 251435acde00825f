//! Call-data primitives for GitPay tagged token transfers.
//!
//! A GitPay payment is an ordinary ERC-20 `transfer(address,uint256)` call with the
//! 32-byte [`PAYMENT_TAG`] appended after the encoded arguments, optionally followed
//! by a UTF-8 memo. [`classify`] recognizes such call-data and reconstructs the
//! intended recipient, amount and memo; [`encode_tagged_transfer`] is the inverse,
//! used by the donation page and to produce test vectors.
//!
//! Everything in this crate is pure and synchronous. Call-data comes from arbitrary
//! chain transactions, so malformed input is never an error: it classifies as
//! untagged.

use alloy_primitives::{Address, Bytes, U256, hex};
use alloy_sol_types::{SolCall, sol};
use serde::Serialize;

sol! {
    interface IERC20 {
        function transfer(address to, uint256 amount) external returns (bool);
    }
}

/// The `transfer(address,uint256)` function selector (`0xa9059cbb`).
pub const TRANSFER_SELECTOR: [u8; 4] = IERC20::transferCall::SELECTOR;

/// The 32-byte application tag: ASCII `"GITPAY"` zero-padded on the right.
///
/// A transfer whose call-data carries this marker after the `transfer` arguments is
/// a GitPay payment; anything else is an ordinary transfer.
pub const PAYMENT_TAG: [u8; 32] = {
    let mut tag = [0u8; 32];
    let name = b"GITPAY";
    let mut i = 0;
    while i < name.len() {
        tag[i] = name[i];
        i += 1;
    }
    tag
};

const SELECTOR_LEN: usize = 4;
const WORD: usize = 32;

/// Byte offset of the tag in well-formed tagged call-data: selector plus the two
/// encoded `transfer` arguments.
pub const TAG_OFFSET: usize = SELECTOR_LEN + 2 * WORD;

/// Where the payment tag may appear in call-data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TagDetection {
    /// The tag must sit at byte offset 68, immediately after well-formed
    /// `transfer(address,uint256)` arguments.
    #[default]
    FixedOffset,
    /// The tag may appear at any byte offset. Legacy behavior; an unrelated payload
    /// that happens to contain the byte pattern is misclassified as tagged.
    Scan,
}

/// The reconstructed application-level view of one piece of transfer call-data.
///
/// When present, `recipient` and `amount` reflect the intent encoded in the
/// call-data and take precedence over the transfer event's `to`/`value` fields.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Classification {
    /// Whether the call-data carries the payment tag.
    pub tagged: bool,
    /// Decoded `transfer` recipient, if the call-data is a well-formed transfer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient: Option<Address>,
    /// Decoded `transfer` amount in token base units.
    #[serde(
        serialize_with = "ser::opt_u256_decimal",
        skip_serializing_if = "Option::is_none"
    )]
    pub amount: Option<U256>,
    /// UTF-8 memo following the tag. Never `Some("")`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
}

impl Classification {
    /// The classification of call-data that does not carry the payment tag.
    pub fn untagged() -> Self {
        Self::default()
    }
}

/// Classifies raw transaction call-data.
///
/// Returns [`Classification::untagged`] unless the 32-byte [`PAYMENT_TAG`] is found
/// per `detection`. Recipient and amount are only decoded from data that starts
/// with the `transfer(address,uint256)` selector and carries both argument words;
/// a tagged payload of any other shape yields `tagged: true` with no decoded
/// fields.
pub fn classify(data: &[u8], detection: TagDetection) -> Classification {
    let Some(tag_offset) = find_tag(data, detection) else {
        return Classification::untagged();
    };

    let (recipient, amount) = match decode_transfer_args(data) {
        Some((to, value)) => (Some(to), Some(value)),
        None => (None, None),
    };
    let memo = decode_memo(&data[tag_offset + WORD..]);

    Classification { tagged: true, recipient, amount, memo }
}

/// Classifies `0x`-prefixed hex call-data.
///
/// Input that is not valid hex classifies as untagged.
pub fn classify_hex(data: &str, detection: TagDetection) -> Classification {
    match hex::decode(data) {
        Ok(bytes) => classify(&bytes, detection),
        Err(_) => Classification::untagged(),
    }
}

/// Builds tagged transfer call-data: `transfer(recipient, amount)` arguments
/// followed by the payment tag and the raw memo bytes.
///
/// Classifying the result recovers `recipient`, `amount` and the memo (modulo
/// trailing-NUL/whitespace trimming).
pub fn encode_tagged_transfer(recipient: Address, amount: U256, memo: Option<&str>) -> Bytes {
    let mut data = IERC20::transferCall { to: recipient, amount }.abi_encode();
    data.extend_from_slice(&PAYMENT_TAG);
    if let Some(memo) = memo {
        data.extend_from_slice(memo.as_bytes());
    }
    data.into()
}

fn find_tag(data: &[u8], detection: TagDetection) -> Option<usize> {
    match detection {
        TagDetection::FixedOffset => (data.len() >= TAG_OFFSET + WORD
            && data[TAG_OFFSET..TAG_OFFSET + WORD] == PAYMENT_TAG)
            .then_some(TAG_OFFSET),
        TagDetection::Scan => data.windows(WORD).position(|window| window == PAYMENT_TAG),
    }
}

fn decode_transfer_args(data: &[u8]) -> Option<(Address, U256)> {
    if data.len() < TAG_OFFSET || data[..SELECTOR_LEN] != TRANSFER_SELECTOR {
        return None;
    }
    // Both arguments are 32-byte words; the address is left-padded to 32 bytes.
    let recipient = Address::from_slice(&data[SELECTOR_LEN + 12..SELECTOR_LEN + WORD]);
    let amount = U256::from_be_slice(&data[SELECTOR_LEN + WORD..TAG_OFFSET]);
    Some((recipient, amount))
}

fn decode_memo(raw: &[u8]) -> Option<String> {
    let end = raw.iter().rposition(|&byte| byte != 0).map_or(0, |i| i + 1);
    let memo = std::str::from_utf8(&raw[..end]).ok()?.trim();
    (!memo.is_empty()).then(|| memo.to_string())
}

/// Serde helpers rendering base-unit amounts as decimal strings.
pub mod ser {
    use alloy_primitives::U256;
    use serde::Serializer;

    /// Serializes a [`U256`] as its decimal string representation.
    pub fn u256_decimal<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    /// Serializes an optional [`U256`] as a decimal string.
    pub fn opt_u256_decimal<S: Serializer>(
        value: &Option<U256>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(value) => u256_decimal(value, serializer),
            None => serializer.serialize_none(),
        }
    }
}
