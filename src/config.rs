//! Runtime configuration for the wallet factory CLI.
//!
//! Every subcommand validates its arguments up front and exposes typed
//! accessors that decode the validated hex. Wherever the unsigned path is
//! involved, `--scheme` is required: the factory's mixing rule cannot be
//! guessed, only configured.

use clap::{Args, Parser, Subcommand};
use secp256k1::SecretKey;

use crate::crypto::{Address, SaltScheme};
use crate::matcher::PatternType;

/// Deterministic wallet address toolkit
///
/// Predicts counterfactual wallet addresses for a proxy factory, produces
/// and verifies controller approval proofs, and mines raw salts for
/// vanity wallet addresses.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Predict the wallet address of an unsigned-path deployment
    PredictUnsigned(PredictUnsignedArgs),
    /// Predict the wallet address of a signed-path deployment
    PredictSigned(PredictSignedArgs),
    /// Produce a controller's approval proof
    Sign(SignArgs),
    /// Recover the controller identity from an approval proof
    Recover(RecoverArgs),
    /// Mine raw salts until the wallet address matches a pattern
    Mine(MineArgs),
}

#[derive(Args, Debug, Clone)]
pub struct PredictUnsignedArgs {
    /// Factory address (20 bytes, hex with or without 0x)
    #[arg(long)]
    pub factory: String,

    /// Wallet implementation address (20 bytes hex, non-zero)
    #[arg(long)]
    pub implementation: String,

    /// Raw salt (32 bytes hex), mixed through the scheme before use
    #[arg(long)]
    pub salt: String,

    /// Salt mixing scheme the factory was deployed with: hash-mix or xor-mix
    #[arg(long)]
    pub scheme: SaltScheme,
}

impl PredictUnsignedArgs {
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_hex_bytes("factory", &self.factory, 20)?;
        validate_implementation(&self.implementation)?;
        validate_hex_bytes("salt", &self.salt, 32)?;
        Ok(())
    }

    pub fn factory(&self) -> Address {
        address_from_hex(&self.factory)
    }

    pub fn implementation(&self) -> Address {
        address_from_hex(&self.implementation)
    }

    pub fn salt_bytes(&self) -> [u8; 32] {
        bytes32_from_hex(&self.salt)
    }
}

#[derive(Args, Debug, Clone)]
pub struct PredictSignedArgs {
    /// Factory address (20 bytes hex)
    #[arg(long)]
    pub factory: String,

    /// Wallet implementation address (20 bytes hex, non-zero)
    #[arg(long)]
    pub implementation: String,

    /// Controller identity (20 bytes hex), if already known
    #[arg(long)]
    pub controller: Option<String>,

    /// Approval proof (65 bytes hex) to recover the controller from
    #[arg(long)]
    pub signature: Option<String>,
}

impl PredictSignedArgs {
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_hex_bytes("factory", &self.factory, 20)?;
        validate_implementation(&self.implementation)?;

        match (&self.controller, &self.signature) {
            (Some(controller), None) => validate_hex_bytes("controller", controller, 20),
            (None, Some(signature)) => validate_hex_bytes("signature", signature, 65),
            _ => Err(ConfigError::InvalidConfig(
                "exactly one of --controller and --signature must be given".into(),
            )),
        }
    }

    pub fn factory(&self) -> Address {
        address_from_hex(&self.factory)
    }

    pub fn implementation(&self) -> Address {
        address_from_hex(&self.implementation)
    }

    pub fn controller(&self) -> Option<Address> {
        self.controller.as_deref().map(address_from_hex)
    }

    pub fn signature_bytes(&self) -> Option<Vec<u8>> {
        self.signature.as_deref().map(hex_bytes)
    }
}

#[derive(Args, Debug, Clone)]
pub struct SignArgs {
    /// Controller secret key (32 bytes hex)
    #[arg(long)]
    pub secret_key: String,
}

impl SignArgs {
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_hex_bytes("secret-key", &self.secret_key, 32)?;
        // Rejects zero and anything >= the curve order, not just zero.
        if SecretKey::from_slice(&self.secret_key_bytes()).is_err() {
            return Err(ConfigError::InvalidConfig(
                "secret-key is not a valid secp256k1 secret key".into(),
            ));
        }
        Ok(())
    }

    pub fn secret_key_bytes(&self) -> [u8; 32] {
        bytes32_from_hex(&self.secret_key)
    }
}

#[derive(Args, Debug, Clone)]
pub struct RecoverArgs {
    /// Approval proof (65 bytes hex)
    #[arg(long)]
    pub signature: String,
}

impl RecoverArgs {
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_hex_bytes("signature", &self.signature, 65)
    }

    pub fn signature_bytes(&self) -> Vec<u8> {
        hex_bytes(&self.signature)
    }
}

#[derive(Args, Debug, Clone)]
pub struct MineArgs {
    /// Pattern to search for (hex characters only: 0-9, a-f)
    #[arg(short, long)]
    pub pattern: String,

    /// Suffix pattern (when used, --pattern becomes the prefix and matching uses both)
    #[arg(short = 's', long)]
    pub suffix: Option<String>,

    /// Pattern type: prefix, suffix, or contains
    #[arg(short = 't', long, default_value = "prefix")]
    pub pattern_type: PatternType,

    /// Factory address (20 bytes, hex with or without 0x)
    #[arg(long)]
    pub factory: String,

    /// Wallet implementation address (20 bytes hex, non-zero)
    #[arg(long)]
    pub implementation: String,

    /// Salt mixing scheme the factory was deployed with: hash-mix or xor-mix
    #[arg(long)]
    pub scheme: SaltScheme,

    /// Number of worker threads (default: number of CPU cores)
    #[arg(short = 'w', long)]
    pub workers: Option<usize>,

    /// Case sensitive matching (against the EIP-55 checksum form)
    #[arg(short = 'c', long, default_value = "false")]
    pub case_sensitive: bool,

    /// Stop after finding N addresses (0 = run forever)
    #[arg(short = 'n', long, default_value = "1")]
    pub count: usize,

    /// Progress report interval in seconds
    #[arg(short = 'r', long, default_value = "5")]
    pub report_interval: u64,
}

impl MineArgs {
    /// Returns the number of workers, defaulting to CPU count.
    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(num_cpus::get)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let pattern = self.normalized_pattern();
        if !pattern.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ConfigError::InvalidPattern(
                "Pattern must contain only hex characters (0-9, a-f)".into(),
            ));
        }
        if pattern.is_empty() {
            return Err(ConfigError::InvalidPattern("Pattern cannot be empty".into()));
        }
        if pattern.len() > 40 {
            return Err(ConfigError::InvalidPattern(
                "Pattern cannot be longer than 40 characters (full address)".into(),
            ));
        }

        if let Some(suffix) = self.normalized_suffix() {
            if !suffix.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(ConfigError::InvalidPattern(
                    "Suffix must contain only hex characters (0-9, a-f)".into(),
                ));
            }
            if suffix.is_empty() {
                return Err(ConfigError::InvalidPattern("Suffix cannot be empty".into()));
            }
            if pattern.len() + suffix.len() > 40 {
                return Err(ConfigError::InvalidPattern(
                    "Combined prefix + suffix cannot be longer than 40 characters".into(),
                ));
            }
        } else if self.pattern_type == PatternType::PrefixAndSuffix {
            return Err(ConfigError::InvalidPattern(
                "Pattern type prefix+suffix requires --suffix".into(),
            ));
        }

        validate_hex_bytes("factory", &self.factory, 20)?;
        validate_implementation(&self.implementation)?;

        Ok(())
    }

    /// Returns the normalized pattern (lowercase if case insensitive).
    pub fn normalized_pattern(&self) -> String {
        if self.case_sensitive {
            self.pattern.clone()
        } else {
            self.pattern.to_lowercase()
        }
    }

    /// Returns the normalized suffix.
    pub fn normalized_suffix(&self) -> Option<String> {
        self.suffix.as_ref().map(|s| {
            if self.case_sensitive {
                s.clone()
            } else {
                s.to_lowercase()
            }
        })
    }

    /// Effective pattern type (prefix+suffix if suffix is set).
    pub fn effective_pattern_type(&self) -> PatternType {
        if self.suffix.is_some() {
            PatternType::PrefixAndSuffix
        } else {
            self.pattern_type
        }
    }

    pub fn factory(&self) -> Address {
        address_from_hex(&self.factory)
    }

    pub fn implementation(&self) -> Address {
        address_from_hex(&self.implementation)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

fn validate_hex_bytes(label: &str, value: &str, bytes: usize) -> Result<(), ConfigError> {
    let h = value.strip_prefix("0x").unwrap_or(value);
    if h.len() != bytes * 2 || !h.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ConfigError::InvalidConfig(format!(
            "{} must be {} bytes ({} hex chars)",
            label,
            bytes,
            bytes * 2
        )));
    }
    Ok(())
}

fn validate_implementation(value: &str) -> Result<(), ConfigError> {
    validate_hex_bytes("implementation", value, 20)?;
    if address_from_hex(value).is_zero() {
        return Err(ConfigError::InvalidConfig(
            "implementation must not be the zero address".into(),
        ));
    }
    Ok(())
}

fn hex_bytes(value: &str) -> Vec<u8> {
    let h = value.strip_prefix("0x").unwrap_or(value);
    hex::decode(h).expect("validated hex")
}

fn address_from_hex(value: &str) -> Address {
    Address::from_hex(value).expect("validated hex")
}

fn bytes32_from_hex(value: &str) -> [u8; 32] {
    hex_bytes(value).try_into().expect("32 bytes")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_mine_args(pattern: &str) -> MineArgs {
        MineArgs {
            pattern: pattern.into(),
            suffix: None,
            pattern_type: PatternType::Prefix,
            factory: "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa".into(),
            implementation: "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb".into(),
            scheme: SaltScheme::HashMix,
            workers: None,
            case_sensitive: false,
            count: 1,
            report_interval: 5,
        }
    }

    #[test]
    fn test_valid_mine_args() {
        let args = make_mine_args("dead");
        assert!(args.validate().is_ok());
        assert_eq!(args.factory(), Address::from_bytes([0xaa; 20]));
        assert_eq!(args.implementation(), Address::from_bytes([0xbb; 20]));
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(make_mine_args("xyz").validate().is_err());
        assert!(make_mine_args("").validate().is_err());
    }

    #[test]
    fn test_zero_implementation_rejected() {
        let mut args = make_mine_args("dead");
        args.implementation = "0x0000000000000000000000000000000000000000".into();
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_combined_pattern_length_capped() {
        let mut args = make_mine_args(&"a".repeat(30));
        args.suffix = Some("b".repeat(11));
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_prefix_and_suffix_type_requires_suffix() {
        let mut args = make_mine_args("dead");
        args.pattern_type = PatternType::PrefixAndSuffix;
        assert!(args.validate().is_err());

        args.suffix = Some("beef".into());
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_predict_signed_needs_exactly_one_source() {
        let base = PredictSignedArgs {
            factory: "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa".into(),
            implementation: "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb".into(),
            controller: None,
            signature: None,
        };
        assert!(base.validate().is_err());

        let both = PredictSignedArgs {
            controller: Some("0xcccccccccccccccccccccccccccccccccccccccc".into()),
            signature: Some(format!("0x{}", "11".repeat(65))),
            ..base.clone()
        };
        assert!(both.validate().is_err());

        let controller_only = PredictSignedArgs {
            controller: Some("0xcccccccccccccccccccccccccccccccccccccccc".into()),
            ..base.clone()
        };
        assert!(controller_only.validate().is_ok());
        assert_eq!(
            controller_only.controller(),
            Some(Address::from_bytes([0xcc; 20]))
        );

        let signature_only = PredictSignedArgs {
            signature: Some("11".repeat(65)),
            ..base
        };
        assert!(signature_only.validate().is_ok());
        assert_eq!(signature_only.signature_bytes().unwrap().len(), 65);
    }

    #[test]
    fn test_salt_must_be_32_bytes() {
        let mut args = PredictUnsignedArgs {
            factory: "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa".into(),
            implementation: "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb".into(),
            salt: format!("0x{}", "00".repeat(32)),
            scheme: SaltScheme::XorMix,
        };
        assert!(args.validate().is_ok());
        assert_eq!(args.salt_bytes(), [0u8; 32]);

        args.salt = "0x1234".into();
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_secret_key_must_be_valid_scalar() {
        let mut args = SignArgs {
            secret_key: "00".repeat(32),
        };
        assert!(args.validate().is_err());

        // All-ones is above the curve order.
        args.secret_key = "ff".repeat(32);
        assert!(args.validate().is_err());

        args.secret_key = format!("{}01", "00".repeat(31));
        assert!(args.validate().is_ok());
    }
}
