//! Deployment error taxonomy.

use crate::crypto::Address;

/// Errors raised by address derivation, proof recovery, and deployment.
///
/// Every variant is fatal to the operation that raised it; a failed
/// deployment leaves the ledger exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FactoryError {
    /// The implementation target is the zero address.
    #[error("implementation address must not be zero")]
    InvalidImplementation,

    /// The authorization proof is malformed or does not recover a signer.
    #[error("invalid authorization proof: {0}")]
    InvalidSignature(&'static str),

    /// Code is already present at the derived address.
    #[error("address already materialized: {0}")]
    AddressCollision(Address),

    /// The wallet rejected its one-time initialization.
    #[error("wallet initialization failed: {0}")]
    Initialization(String),
}
