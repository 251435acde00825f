//! Error taxonomy for chain access.

use alloy_transport::TransportError;

/// Errors surfaced by the chain layer.
///
/// Classification of call-data is deliberately absent here: malformed call-data is
/// not an error, it classifies as untagged. Likewise a single failed transaction
/// lookup during a scan is logged and skipped rather than surfaced.
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    /// Forward name resolution yielded no address.
    #[error("no address found for `{0}`")]
    NameNotFound(String),

    /// The subject is neither a hex address nor a plausible ENS name.
    #[error("`{0}` is not an address or ENS name")]
    InvalidName(String),

    /// The node or indexing API failed: transport error or JSON-RPC error payload.
    #[error("upstream request failed: {0}")]
    Upstream(#[from] TransportError),

    /// A read-only token contract call failed.
    #[error("token read failed: {0}")]
    Token(#[from] alloy_contract::Error),
}
