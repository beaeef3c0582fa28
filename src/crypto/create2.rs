//! Deterministic wallet address computation.
//!
//! Matches the factory's creation path:
//!   address = keccak256(0xff || factory || effectiveSalt || initCodeHash)[12..32]

use crate::error::FactoryError;

use super::proxy::init_code_hash;
use super::{keccak256, Address};

/// Computes the creation address from a precomputed init code hash.
/// Preimage: 0xff (1) || deployer (20) || salt (32) || init_code_hash (32) = 85 bytes.
/// Address = keccak256(preimage)[12..32].
pub fn wallet_address(
    deployer: Address,
    effective_salt: &[u8; 32],
    init_code_hash: &[u8; 32],
) -> Address {
    let mut preimage = [0u8; 85];
    preimage[0] = 0xff;
    preimage[1..21].copy_from_slice(deployer.as_bytes());
    preimage[21..53].copy_from_slice(effective_salt);
    preimage[53..85].copy_from_slice(init_code_hash);

    let hash = keccak256(&preimage);
    let mut addr = [0u8; 20];
    addr.copy_from_slice(&hash[12..32]);
    Address::from_bytes(addr)
}

/// Derives the address a deployment with these inputs will produce.
///
/// Builds the init code for `implementation`, hashes it, and folds the
/// hash into the creation preimage. Pure: identical inputs yield the
/// identical address inside the factory and in off-chain prediction.
///
/// Fails with [`FactoryError::InvalidImplementation`] when
/// `implementation` is the zero address; a proxy with no target is
/// rejected before any derivation happens.
pub fn derive(
    deployer: Address,
    effective_salt: &[u8; 32],
    implementation: Address,
) -> Result<Address, FactoryError> {
    if implementation.is_zero() {
        return Err(FactoryError::InvalidImplementation);
    }
    Ok(wallet_address(
        deployer,
        effective_salt,
        &init_code_hash(implementation),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_deterministic() {
        let factory = Address::from_bytes([0xaa; 20]);
        let implementation = Address::from_bytes([0xbb; 20]);
        let salt = [0u8; 32];

        let a1 = derive(factory, &salt, implementation).unwrap();
        let a2 = derive(factory, &salt, implementation).unwrap();
        assert_eq!(a1, a2);
    }

    #[test]
    fn test_derive_tracks_every_input() {
        let factory = Address::from_bytes([0xaa; 20]);
        let implementation = Address::from_bytes([0xbb; 20]);
        let salt = [0u8; 32];
        let base = derive(factory, &salt, implementation).unwrap();

        let other_factory = Address::from_bytes([0xab; 20]);
        assert_ne!(base, derive(other_factory, &salt, implementation).unwrap());

        let other_salt = [1u8; 32];
        assert_ne!(base, derive(factory, &other_salt, implementation).unwrap());

        let other_implementation = Address::from_bytes([0xbc; 20]);
        assert_ne!(base, derive(factory, &salt, other_implementation).unwrap());
    }

    #[test]
    fn test_derive_rejects_zero_implementation() {
        let factory = Address::from_bytes([0xaa; 20]);
        let err = derive(factory, &[0u8; 32], Address::ZERO).unwrap_err();
        assert_eq!(err, FactoryError::InvalidImplementation);
    }

    #[test]
    fn test_wallet_address_matches_derive() {
        let factory = Address::from_bytes([0xaa; 20]);
        let implementation = Address::from_bytes([0xbb; 20]);
        let salt = [7u8; 32];

        let via_derive = derive(factory, &salt, implementation).unwrap();
        let via_hash = wallet_address(factory, &salt, &init_code_hash(implementation));
        assert_eq!(via_derive, via_hash);
    }
}
