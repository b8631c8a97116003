//! Ordered symbol set candidates are spelled with

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::error::{CrackError, CrackResult};

/// Lowercase Latin letters followed by decimal digits
pub const DEFAULT_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz0123456789";

/// Ordered sequence of distinct symbols
///
/// Digit `d` of a base-`len()` numeral maps to `symbol(d)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<char>,
}

impl Alphabet {
    /// Build an alphabet from a string, rejecting repeated symbols
    pub fn new(symbols: &str) -> CrackResult<Self> {
        let mut seen = HashSet::new();
        let mut ordered = Vec::with_capacity(symbols.len());
        for c in symbols.chars() {
            if !seen.insert(c) {
                return Err(CrackError::Validation(format!("alphabet repeats symbol '{}'", c)));
            }
            ordered.push(c);
        }
        Ok(Self { symbols: ordered })
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Symbol for digit `d`; callers keep `d < len()`
    pub fn symbol(&self, digit: usize) -> char {
        self.symbols[digit]
    }

    /// Digit value of a symbol, if it belongs to the alphabet
    pub fn position(&self, symbol: char) -> Option<usize> {
        self.symbols.iter().position(|&c| c == symbol)
    }

    pub fn contains(&self, symbol: char) -> bool {
        self.symbols.contains(&symbol)
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self {
            symbols: DEFAULT_ALPHABET.chars().collect(),
        }
    }
}

impl FromStr for Alphabet {
    type Err = CrackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in &self.symbols {
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_alphabet_has_36_symbols() {
        let alphabet = Alphabet::default();
        assert_eq!(alphabet.len(), 36);
        assert_eq!(alphabet.symbol(0), 'a');
        assert_eq!(alphabet.symbol(25), 'z');
        assert_eq!(alphabet.symbol(26), '0');
        assert_eq!(alphabet.symbol(35), '9');
    }

    #[test]
    fn test_rejects_duplicates() {
        let result = Alphabet::new("abca");
        assert!(matches!(result, Err(CrackError::Validation(_))));
    }

    #[test]
    fn test_empty_alphabet_is_allowed_but_empty() {
        let alphabet = Alphabet::new("").unwrap();
        assert!(alphabet.is_empty());
        assert_eq!(alphabet.len(), 0);
    }

    #[test]
    fn test_position_and_contains() {
        let alphabet: Alphabet = "xyz".parse().unwrap();
        assert_eq!(alphabet.position('x'), Some(0));
        assert_eq!(alphabet.position('z'), Some(2));
        assert_eq!(alphabet.position('a'), None);
        assert!(alphabet.contains('y'));
        assert!(!alphabet.contains('q'));
    }

    #[test]
    fn test_display_roundtrips_source_string() {
        let alphabet = Alphabet::default();
        assert_eq!(alphabet.to_string(), DEFAULT_ALPHABET);
    }

    #[test]
    fn test_multibyte_symbols() {
        let alphabet = Alphabet::new("αβγ").unwrap();
        assert_eq!(alphabet.len(), 3);
        assert_eq!(alphabet.symbol(1), 'β');
    }
}
