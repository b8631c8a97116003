//! Pluggable one-way digest comparison
//!
//! The search only needs a yes/no answer per candidate. [`DigestComparator`]
//! is that seam; [`HexDigestComparator`] is the stock implementation which
//! decodes the target hex once and compares raw digest bytes, making the
//! match case-insensitive on the hex form.

use std::fmt;
use std::str::FromStr;

use md5::Md5;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::{CrackError, CrackResult};

/// Decides whether a candidate's digest equals the target
pub trait DigestComparator: Send + Sync {
    fn matches(&self, candidate: &str) -> bool;
}

impl<F> DigestComparator for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn matches(&self, candidate: &str) -> bool {
        self(candidate)
    }
}

/// Supported hash functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    #[default]
    Md5,
    Sha256,
}

impl DigestAlgorithm {
    /// Raw digest of `data`
    pub fn digest(&self, data: &[u8]) -> Vec<u8> {
        match self {
            Self::Md5 => Md5::digest(data).to_vec(),
            Self::Sha256 => Sha256::digest(data).to_vec(),
        }
    }

    /// Lowercase hex digest of a word
    pub fn hex_digest(&self, word: &str) -> String {
        hex::encode(self.digest(word.as_bytes()))
    }

    /// Length of a digest in bytes
    pub fn output_len(&self) -> usize {
        match self {
            Self::Md5 => 16,
            Self::Sha256 => 32,
        }
    }

    /// Build a comparator against `target_hash` (hex, any case)
    pub fn comparator(&self, target_hash: &str) -> CrackResult<HexDigestComparator> {
        HexDigestComparator::new(*self, target_hash)
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Md5 => write!(f, "md5"),
            Self::Sha256 => write!(f, "sha256"),
        }
    }
}

impl FromStr for DigestAlgorithm {
    type Err = CrackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "md5" => Ok(Self::Md5),
            "sha256" | "sha-256" => Ok(Self::Sha256),
            other => Err(CrackError::Validation(format!(
                "unknown digest '{}'. Supported: md5, sha256",
                other
            ))),
        }
    }
}

/// Normalise a target hash to lowercase hex, rejecting anything else
pub fn normalize_hex(target_hash: &str) -> CrackResult<String> {
    let trimmed = target_hash.trim();
    if trimmed.is_empty() {
        return Err(CrackError::Validation("hash must not be empty".to_string()));
    }
    if !trimmed.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(CrackError::Validation(format!("hash '{}' is not hexadecimal", trimmed)));
    }
    if let Err(e) = hex::decode(trimmed) {
        return Err(CrackError::Validation(format!("hash '{}' is not valid hex: {}", trimmed, e)));
    }
    Ok(trimmed.to_ascii_lowercase())
}

/// Compares candidates against a decoded target digest
#[derive(Debug, Clone)]
pub struct HexDigestComparator {
    algorithm: DigestAlgorithm,
    target: Vec<u8>,
}

impl HexDigestComparator {
    pub fn new(algorithm: DigestAlgorithm, target_hash: &str) -> CrackResult<Self> {
        debug!(%algorithm, %target_hash, "HexDigestComparator::new: called");
        let normalized = normalize_hex(target_hash)?;
        let target = hex::decode(&normalized)
            .map_err(|e| CrackError::Validation(format!("hash '{}' is not valid hex: {}", normalized, e)))?;
        if target.len() != algorithm.output_len() {
            debug!(
                target_len = target.len(),
                expected = algorithm.output_len(),
                "HexDigestComparator::new: target length differs from digest length, nothing can match"
            );
        }
        Ok(Self { algorithm, target })
    }

    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }
}

impl DigestComparator for HexDigestComparator {
    fn matches(&self, candidate: &str) -> bool {
        self.algorithm.digest(candidate.as_bytes()) == self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_md5_known_vectors() {
        assert_eq!(DigestAlgorithm::Md5.hex_digest(""), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(DigestAlgorithm::Md5.hex_digest("abc"), "900150983cd24fb0d6963f7d28e17f72");
    }

    #[test]
    fn test_sha256_known_vector() {
        assert_eq!(
            DigestAlgorithm::Sha256.hex_digest("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_comparator_matches_case_insensitively() {
        let upper = "900150983CD24FB0D6963F7D28E17F72";
        let comparator = DigestAlgorithm::Md5.comparator(upper).unwrap();
        assert!(comparator.matches("abc"));
        assert!(!comparator.matches("abd"));
    }

    #[test]
    fn test_comparator_rejects_non_hex() {
        assert!(DigestAlgorithm::Md5.comparator("not-a-hash").is_err());
        assert!(DigestAlgorithm::Md5.comparator("").is_err());
        // Odd length passes the character check but cannot decode
        assert!(DigestAlgorithm::Md5.comparator("abc").is_err());
    }

    #[test]
    fn test_wrong_length_target_never_matches() {
        let comparator = DigestAlgorithm::Md5.comparator("abcd").unwrap();
        assert!(!comparator.matches("abc"));
    }

    #[test]
    fn test_closure_comparator() {
        let comparator = |candidate: &str| candidate == "ba";
        assert!(comparator.matches("ba"));
        assert!(!comparator.matches("ab"));
    }

    #[test]
    fn test_algorithm_parse_and_display() {
        assert_eq!("MD5".parse::<DigestAlgorithm>().unwrap(), DigestAlgorithm::Md5);
        assert_eq!("sha-256".parse::<DigestAlgorithm>().unwrap(), DigestAlgorithm::Sha256);
        assert!("crc32".parse::<DigestAlgorithm>().is_err());
        assert_eq!(DigestAlgorithm::Sha256.to_string(), "sha256");
    }

    #[test]
    fn test_normalize_hex() {
        assert_eq!(normalize_hex("  ABcd ").unwrap(), "abcd");
        assert!(normalize_hex("xyz").is_err());
        // Digits must pair up into whole bytes
        assert!(matches!(normalize_hex("abc"), Err(CrackError::Validation(_))));
    }
}
