//! Name resolution for badge subjects.

use alloy_ens::ProviderEnsExt;
use alloy_primitives::Address;
use alloy_provider::Provider;
use tracing::debug;

use crate::ChainError;

/// Resolves user input, a hex address or an ENS name, to an address.
///
/// A resolution miss (no resolver, no record, or a failing registry read) is a
/// [`ChainError::NameNotFound`]; input that cannot be a name at all is rejected
/// up front as [`ChainError::InvalidName`].
pub async fn resolve_subject<P: Provider>(provider: &P, input: &str) -> Result<Address, ChainError> {
    if let Ok(address) = input.parse::<Address>() {
        return Ok(address);
    }
    if !input.contains('.') {
        return Err(ChainError::InvalidName(input.to_string()));
    }
    provider.resolve_name(input).await.map_err(|err| {
        debug!(name = input, %err, "forward name resolution failed");
        ChainError::NameNotFound(input.to_string())
    })
}

/// Best-effort reverse resolution of an address to a display name.
///
/// Reverse resolution is cosmetic, so any failure just means "no name".
pub async fn display_name<P: Provider>(provider: &P, address: Address) -> Option<String> {
    match provider.lookup_address(&address).await {
        Ok(name) => Some(name),
        Err(err) => {
            debug!(%address, %err, "reverse name resolution failed");
            None
        }
    }
}
