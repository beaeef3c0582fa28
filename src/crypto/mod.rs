//! Cryptographic operations behind wallet deployment.
//!
//! Wallet proxy address (from the factory's creation path):
//! - effective salt = SaltScheme(rawSalt), or keccak256(controller) on the signed path
//! - address = keccak256(0xff || factory || salt || initCodeHash)[12..32]  [85 bytes -> 20 bytes]

mod address;
pub mod create2;
mod keypair;
pub mod proof;
pub mod proxy;
pub mod salt;

pub use address::Address;
pub use create2::{derive, wallet_address};
pub use keypair::Keypair;
pub use proof::{recover_controller, sign_approval};
pub use salt::{controller_salt, SaltScheme};

use tiny_keccak::{Hasher, Keccak};

/// Keccak-256 of arbitrary bytes (output 32 bytes).
pub fn keccak256(input: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(input);
    let mut out = [0u8; 32];
    hasher.finalize(&mut out);
    out
}
