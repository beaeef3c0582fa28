//! Off-chain wallet address prediction.
//!
//! Mirrors the factory's internal derivation so an address can be
//! computed, shared, and funded before any deployment is sent. Every
//! prediction carries the scheme that produced it: predicting under one
//! scheme while the factory runs the other yields a wrong but
//! plausible-looking address, with no error anywhere to catch it.

use crate::crypto::{controller_salt, derive, recover_controller, Address, SaltScheme};
use crate::error::FactoryError;

/// A predicted deployment, with enough context to audit the derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prediction {
    /// The counterfactual wallet address.
    pub address: Address,
    /// The salt actually consumed by the creation primitive.
    pub effective_salt: [u8; 32],
    /// Label of the mixing rule that produced the effective salt.
    pub scheme: &'static str,
}

/// Predicts the address of an unsigned-path deployment.
pub fn unsigned_wallet_address(
    factory: Address,
    scheme: SaltScheme,
    implementation: Address,
    raw_salt: &[u8; 32],
) -> Result<Prediction, FactoryError> {
    let effective_salt = scheme.mix(raw_salt);
    let address = derive(factory, &effective_salt, implementation)?;
    Ok(Prediction {
        address,
        effective_salt,
        scheme: scheme.label(),
    })
}

/// Predicts the address of a signed-path deployment for a known controller.
pub fn controller_wallet_address(
    factory: Address,
    implementation: Address,
    controller: Address,
) -> Result<Prediction, FactoryError> {
    let effective_salt = controller_salt(controller);
    let address = derive(factory, &effective_salt, implementation)?;
    Ok(Prediction {
        address,
        effective_salt,
        scheme: "controller-mix",
    })
}

/// Predicts the address of a signed-path deployment from the proof itself.
pub fn signed_wallet_address(
    factory: Address,
    implementation: Address,
    proof: &[u8],
) -> Result<Prediction, FactoryError> {
    let controller = recover_controller(proof)?;
    controller_wallet_address(factory, implementation, controller)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{sign_approval, Keypair};

    fn addr(byte: u8) -> Address {
        Address::from_bytes([byte; 20])
    }

    #[test]
    fn test_unsigned_prediction_is_deterministic_and_labeled() {
        let a = unsigned_wallet_address(addr(0xaa), SaltScheme::HashMix, addr(0xbb), &[0u8; 32])
            .unwrap();
        let b = unsigned_wallet_address(addr(0xaa), SaltScheme::HashMix, addr(0xbb), &[0u8; 32])
            .unwrap();

        assert_eq!(a, b);
        assert_eq!(a.scheme, "hash-mix");
        assert_eq!(a.effective_salt, SaltScheme::HashMix.mix(&[0u8; 32]));
    }

    #[test]
    fn test_scheme_mismatch_mispredicts() {
        let hash = unsigned_wallet_address(addr(0xaa), SaltScheme::HashMix, addr(0xbb), &[0u8; 32])
            .unwrap();
        let xor = unsigned_wallet_address(addr(0xaa), SaltScheme::XorMix, addr(0xbb), &[0u8; 32])
            .unwrap();

        assert_ne!(hash.address, xor.address);
        assert_ne!(hash.scheme, xor.scheme);
    }

    #[test]
    fn test_signed_prediction_matches_controller_form() {
        let keypair = Keypair::generate();
        let proof = sign_approval(&keypair);

        let from_proof = signed_wallet_address(addr(0xaa), addr(0xbb), &proof).unwrap();
        let from_controller =
            controller_wallet_address(addr(0xaa), addr(0xbb), *keypair.address()).unwrap();

        assert_eq!(from_proof, from_controller);
        assert_eq!(from_proof.scheme, "controller-mix");
    }

    #[test]
    fn test_zero_implementation_rejected() {
        assert_eq!(
            unsigned_wallet_address(addr(0xaa), SaltScheme::HashMix, Address::ZERO, &[0u8; 32]),
            Err(FactoryError::InvalidImplementation)
        );
        assert_eq!(
            controller_wallet_address(addr(0xaa), Address::ZERO, addr(0xcc)),
            Err(FactoryError::InvalidImplementation)
        );
    }
}
