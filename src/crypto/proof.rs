//! Deployment authorization proofs.
//!
//! A controller authorizes wallet creation by signing one fixed message.
//! The signed payload carries no nonce, chain id, or factory binding, so a
//! valid proof is a standing authorization: it stays valid forever and can
//! be replayed against any factory and implementation pair that accepts
//! this scheme. There is no revocation at this layer.

use std::sync::OnceLock;

use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use secp256k1::{Message, Secp256k1, SecretKey};

use crate::error::FactoryError;

use super::keypair::address_from_public_key;
use super::{keccak256, Address, Keypair};

/// Label behind the fixed approval message.
const APPROVAL_LABEL: &[u8] = b"Approve wallet creation";

/// Envelope prefix for a signed 32-byte payload.
const SIGNED_MESSAGE_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n32";

/// Proof length: r (32) || s (32) || v (1).
pub const PROOF_LEN: usize = 65;

/// Upper bound for the s component. Signatures with a larger s are
/// malleable re-encodings and are rejected.
const SECP256K1_HALF_ORDER: [u8; 32] = [
    0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0x5d, 0x57, 0x6e, 0x73, 0x57, 0xa4, 0x50, 0x1d, 0xdf, 0xe9, 0x2f, 0x46, 0x68, 0x1b,
    0x20, 0xa0,
];

static APPROVAL_MESSAGE: OnceLock<[u8; 32]> = OnceLock::new();
static APPROVAL_DIGEST: OnceLock<[u8; 32]> = OnceLock::new();

/// The fixed approval message: keccak256 of the label.
pub fn approval_message() -> [u8; 32] {
    *APPROVAL_MESSAGE.get_or_init(|| keccak256(APPROVAL_LABEL))
}

/// The digest actually signed: the approval message wrapped in the
/// standard signed-message envelope.
pub fn approval_digest() -> [u8; 32] {
    *APPROVAL_DIGEST.get_or_init(|| {
        let mut preimage = [0u8; 60];
        preimage[..28].copy_from_slice(SIGNED_MESSAGE_PREFIX);
        preimage[28..].copy_from_slice(&approval_message());
        keccak256(&preimage)
    })
}

/// Signs the approval digest, producing a 65-byte proof (v as 27/28).
///
/// The output is exactly what [`recover_controller`] and the factory's
/// signed deployment path accept.
pub fn sign_approval(keypair: &Keypair) -> [u8; PROOF_LEN] {
    let secp = Secp256k1::new();
    let secret_key =
        SecretKey::from_slice(keypair.secret_key_bytes()).expect("keypair holds a valid key");
    let message = Message::from_digest(approval_digest());
    let signature = secp.sign_ecdsa_recoverable(&message, &secret_key);
    let (recovery_id, compact) = signature.serialize_compact();

    let mut proof = [0u8; PROOF_LEN];
    proof[..64].copy_from_slice(&compact);
    proof[64] = 27 + recovery_id.to_i32() as u8;
    proof
}

/// Recovers the controller identity from an approval proof.
///
/// Accepts v as 0/1 or 27/28 and requires a canonical low-s encoding.
/// Fails with [`FactoryError::InvalidSignature`] on malformed input or
/// failed recovery; no other outcome exists, so a proof either names a
/// controller or authorizes nothing.
pub fn recover_controller(proof: &[u8]) -> Result<Address, FactoryError> {
    if proof.len() != PROOF_LEN {
        return Err(FactoryError::InvalidSignature("proof must be 65 bytes"));
    }

    if &proof[32..64] > &SECP256K1_HALF_ORDER[..] {
        return Err(FactoryError::InvalidSignature("s is not canonical"));
    }

    let v = match proof[64] {
        v @ 0..=1 => v,
        v @ 27..=28 => v - 27,
        _ => return Err(FactoryError::InvalidSignature("unknown recovery id")),
    };
    let recovery_id = RecoveryId::from_i32(i32::from(v))
        .map_err(|_| FactoryError::InvalidSignature("unknown recovery id"))?;

    let signature = RecoverableSignature::from_compact(&proof[..64], recovery_id)
        .map_err(|_| FactoryError::InvalidSignature("malformed r or s"))?;

    let secp = Secp256k1::new();
    let message = Message::from_digest(approval_digest());
    let public_key = secp
        .recover_ecdsa(&message, &signature)
        .map_err(|_| FactoryError::InvalidSignature("recovery failed"))?;

    Ok(address_from_public_key(&public_key))
}
