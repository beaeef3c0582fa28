//! Pattern matching for mined wallet addresses.
//!
//! Supports multiple matching strategies:
//! - Prefix: Match at the start of the address
//! - Suffix: Match at the end of the address
//! - Contains: Match anywhere in the address
//!
//! Case-insensitive patterns match the lowercase hex form. Case-sensitive
//! patterns match the EIP-55 checksum form, so letter casing becomes part
//! of the pattern.

mod pattern;

pub use pattern::{MatchResult, Pattern, PatternType};
