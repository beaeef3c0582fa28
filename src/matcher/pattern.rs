//! Pattern matching implementation.

use std::str::FromStr;

use crate::crypto::Address;

/// The type of pattern matching to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PatternType {
    /// Match at the beginning of the address
    #[default]
    Prefix,
    /// Match at the end of the address
    Suffix,
    /// Match anywhere in the address
    Contains,
    /// Match both prefix and suffix
    PrefixAndSuffix,
}

impl FromStr for PatternType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "prefix" | "start" | "begin" => Ok(PatternType::Prefix),
            "suffix" | "end" => Ok(PatternType::Suffix),
            "contains" | "anywhere" | "any" => Ok(PatternType::Contains),
            "prefixandsuffix" | "both" => Ok(PatternType::PrefixAndSuffix),
            _ => Err(format!("Unknown pattern type: {}", s)),
        }
    }
}

impl std::fmt::Display for PatternType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PatternType::Prefix => write!(f, "prefix"),
            PatternType::Suffix => write!(f, "suffix"),
            PatternType::Contains => write!(f, "contains"),
            PatternType::PrefixAndSuffix => write!(f, "prefix+suffix"),
        }
    }
}

/// Result of a pattern match operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchResult {
    /// Full match found
    Match,
    /// No match
    NoMatch,
}

impl MatchResult {
    #[inline]
    pub fn is_match(self) -> bool {
        matches!(self, MatchResult::Match)
    }
}

/// A compiled pattern for efficient matching.
#[derive(Debug, Clone)]
pub struct Pattern {
    /// The pattern string (normalized)
    pattern: String,
    /// Optional suffix pattern for PrefixAndSuffix mode
    suffix: Option<String>,
    /// The pattern type
    pattern_type: PatternType,
    /// Whether matching is case sensitive
    case_sensitive: bool,
}

impl Pattern {
    /// Creates a new pattern.
    pub fn new(pattern: impl Into<String>, pattern_type: PatternType, case_sensitive: bool) -> Self {
        let pattern = pattern.into();
        let pattern = if case_sensitive {
            pattern
        } else {
            pattern.to_lowercase()
        };

        Self {
            pattern,
            suffix: None,
            pattern_type,
            case_sensitive,
        }
    }

    /// Creates a new prefix+suffix pattern.
    pub fn new_prefix_and_suffix(
        prefix: impl Into<String>,
        suffix: impl Into<String>,
        case_sensitive: bool,
    ) -> Self {
        let normalize = |s: String| if case_sensitive { s } else { s.to_lowercase() };

        Self {
            pattern: normalize(prefix.into()),
            suffix: Some(normalize(suffix.into())),
            pattern_type: PatternType::PrefixAndSuffix,
            case_sensitive,
        }
    }

    /// Returns the pattern string.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns the suffix pattern, if any.
    pub fn suffix(&self) -> Option<&str> {
        self.suffix.as_deref()
    }

    /// Returns the pattern type.
    pub fn pattern_type(&self) -> PatternType {
        self.pattern_type
    }

    /// Returns whether matching is case sensitive.
    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Matches an address against this pattern.
    ///
    /// Case-insensitive patterns match the lowercase hex form.
    /// Case-sensitive patterns match the EIP-55 checksum form, so the
    /// casing of every letter in the pattern must line up with the
    /// checksum casing of the address.
    #[inline]
    pub fn matches(&self, address: &Address) -> MatchResult {
        let addr_hex = if self.case_sensitive {
            let checksum = address.to_checksum();
            checksum[2..].to_string() // drop the 0x prefix
        } else {
            address.to_hex()
        };

        let matched = match self.pattern_type {
            PatternType::Prefix => addr_hex.starts_with(&self.pattern),
            PatternType::Suffix => addr_hex.ends_with(&self.pattern),
            PatternType::Contains => addr_hex.contains(&self.pattern),
            PatternType::PrefixAndSuffix => {
                let suffix = self.suffix.as_deref().unwrap_or("");
                addr_hex.starts_with(&self.pattern) && addr_hex.ends_with(suffix)
            }
        };

        if matched {
            MatchResult::Match
        } else {
            MatchResult::NoMatch
        }
    }

    /// Returns the estimated difficulty (number of attempts to find a match).
    ///
    /// Each hex digit has 16 possible values. In case-sensitive mode a
    /// letter must also land on the right checksum casing, which halves
    /// the odds again: 32 possibilities per letter, 16 per digit.
    pub fn estimated_difficulty(&self) -> u64 {
        let chars = self
            .pattern
            .chars()
            .chain(self.suffix.iter().flat_map(|s| s.chars()));

        let mut difficulty = 1u64;
        for c in chars {
            let per_char = if self.case_sensitive && c.is_ascii_alphabetic() {
                32
            } else {
                16
            };
            difficulty = difficulty.saturating_mul(per_char);
        }
        difficulty
    }

    /// Returns a human-readable difficulty estimate.
    pub fn difficulty_description(&self) -> String {
        let diff = self.estimated_difficulty();
        match diff {
            0..=1_000 => "Very Easy (< 1 second)".into(),
            1_001..=100_000 => "Easy (seconds)".into(),
            100_001..=10_000_000 => "Medium (minutes)".into(),
            10_000_001..=1_000_000_000 => "Hard (hours)".into(),
            _ => "Very Hard (days or more)".into(),
        }
    }
}
