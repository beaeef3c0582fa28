//! Salt mixing policies.
//!
//! The factory never consumes a caller-supplied salt directly. Unsigned
//! deployments mix the raw salt with a fixed domain constant under exactly
//! one of two schemes; signed deployments always hash the controller
//! identity. The two schemes are not interchangeable: predicting with one
//! while the factory deploys with the other mispredicts every address,
//! silently.

use std::str::FromStr;
use std::sync::OnceLock;

use super::{keccak256, Address};

/// Label behind the shared mixing constant.
const SALT_DOMAIN_LABEL: &[u8] = b"DOS_SALT_HASH";

static DOMAIN_CONSTANT: OnceLock<[u8; 32]> = OnceLock::new();

/// The fixed 32-byte mixing constant: keccak256 of the domain label.
///
/// Publicly derivable. The mixing buys deterministic disambiguation of
/// raw salts, not secrecy.
pub fn domain_constant() -> [u8; 32] {
    *DOMAIN_CONSTANT.get_or_init(|| keccak256(SALT_DOMAIN_LABEL))
}

/// Salt mixing policy for the unsigned deployment path.
///
/// A factory instance pins exactly one scheme. There is deliberately no
/// default: clients must know which scheme their factory was deployed
/// with and say so.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaltScheme {
    /// effective = keccak256(rawSalt || domainConstant)
    HashMix,
    /// effective = rawSalt XOR domainConstant
    XorMix,
}

impl SaltScheme {
    /// Applies the scheme to a raw salt.
    #[inline]
    pub fn mix(self, raw_salt: &[u8; 32]) -> [u8; 32] {
        let constant = domain_constant();
        match self {
            SaltScheme::HashMix => {
                let mut preimage = [0u8; 64];
                preimage[..32].copy_from_slice(raw_salt);
                preimage[32..].copy_from_slice(&constant);
                keccak256(&preimage)
            }
            SaltScheme::XorMix => {
                let mut out = [0u8; 32];
                for i in 0..32 {
                    out[i] = raw_salt[i] ^ constant[i];
                }
                out
            }
        }
    }

    /// Short label, also used in prediction output.
    pub fn label(self) -> &'static str {
        match self {
            SaltScheme::HashMix => "hash-mix",
            SaltScheme::XorMix => "xor-mix",
        }
    }
}

impl FromStr for SaltScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hash-mix" | "hashmix" | "hash" => Ok(SaltScheme::HashMix),
            "xor-mix" | "xormix" | "xor" => Ok(SaltScheme::XorMix),
            _ => Err(format!(
                "Unknown salt scheme: {} (expected hash-mix or xor-mix)",
                s
            )),
        }
    }
}

impl std::fmt::Display for SaltScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Effective salt for the signed path: keccak256 of the 20 identity bytes.
///
/// Makes the wallet address a function of the controller alone,
/// independent of raw input and of which account submits the transaction.
#[inline]
pub fn controller_salt(controller: Address) -> [u8; 32] {
    keccak256(controller.as_bytes())
}
